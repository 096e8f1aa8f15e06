//! Timetabling domain models.
//!
//! Provides the problem catalog (what must be scheduled and where it can
//! go), the declarative scoring rule table, and the decoded schedule view
//! handed to report writers.
//!
//! # Domain Mappings
//!
//! | u-timetable | Course scheduling | Meetings | Clinics |
//! |-------------|------------------|----------|---------|
//! | Activity | Course section | Meeting | Appointment block |
//! | Room | Classroom | Meeting room | Exam room |
//! | TimeSlot | Teaching hour | Calendar slot | Shift hour |
//! | Facilitator | Instructor | Chair | Clinician |

mod activity;
mod catalog;
mod room;
mod rules;
mod schedule;

pub use activity::{Activity, FacilitatorPreference};
pub use catalog::{reference_catalog, Catalog};
pub use room::{Facilitator, Room, TimeSlot};
pub use rules::{
    ConsecutiveRule, CourseSpacing, LinkedPair, LoadException, LoadRule, PairRule,
    PreferenceRule, RoomSizeRule, ScoringRules, SectionSpacing, SlotLoadRule,
};
pub use schedule::{Schedule, ScheduledActivity};
