//! Problem catalog.
//!
//! The catalog is the immutable input to the optimizer: the activities to
//! place, the three gene domains (rooms, time slots, facilitators), and the
//! scoring rule table. Chromosomes refer to catalog entries by index.

use serde::{Deserialize, Serialize};

use super::{Activity, Facilitator, LinkedPair, Room, ScoringRules, TimeSlot};

/// Immutable lookup tables for a timetabling problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Activities, in gene order.
    pub activities: Vec<Activity>,
    /// Room domain.
    pub rooms: Vec<Room>,
    /// Time slot domain, ordered by hour.
    pub time_slots: Vec<TimeSlot>,
    /// Facilitator domain.
    pub facilitators: Vec<Facilitator>,
    /// Scoring magnitudes and linked pairs.
    #[serde(default)]
    pub rules: ScoringRules,
}

impl Catalog {
    /// Creates an empty catalog with default scoring rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an activity.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a time slot.
    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slots.push(slot);
        self
    }

    /// Adds a facilitator.
    pub fn with_facilitator(mut self, facilitator: Facilitator) -> Self {
        self.facilitators.push(facilitator);
        self
    }

    /// Adds several facilitators by id.
    pub fn with_facilitators<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facilitators
            .extend(ids.into_iter().map(Facilitator::new));
        self
    }

    /// Replaces the scoring rules.
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn time_slot_count(&self) -> usize {
        self.time_slots.len()
    }

    pub fn facilitator_count(&self) -> usize {
        self.facilitators.len()
    }

    /// Index of an activity by id.
    pub fn activity_index(&self, id: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.id == id)
    }

    /// Index of a room by id.
    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.rooms.iter().position(|r| r.id == id)
    }

    /// Index of a time slot by label.
    pub fn time_slot_index(&self, label: &str) -> Option<usize> {
        self.time_slots.iter().position(|t| t.label == label)
    }

    /// Index of a facilitator by id.
    pub fn facilitator_index(&self, id: &str) -> Option<usize> {
        self.facilitators.iter().position(|f| f.id == id)
    }
}

/// The SLA course catalog: eleven activities, nine rooms, six hourly
/// slots from 10 AM to 3 PM, and ten facilitators.
///
/// SLA101 and SLA191 each run two sections. The sections of one course are
/// linked by a section-spacing rule, and every SLA101 × SLA191 section pair
/// is linked by a course-spacing rule. Roman and Beach rooms are the split
/// buildings. Tyler carries a minimum load of two instead of three.
pub fn reference_catalog() -> Catalog {
    const SECTION_LEADS: [&str; 3] = ["Glen", "Lock", "Banks"];
    const SECTION_OTHERS: [&str; 4] = ["Numen", "Richards", "Shaw", "Singer"];
    const SURVEY_LEADS: [&str; 5] = ["Glen", "Banks", "Zeldin", "Lock", "Singer"];
    const SURVEY_OTHERS: [&str; 3] = ["Richards", "Uther", "Shaw"];

    let section = |id: &str, enrollment| {
        Activity::new(id, enrollment)
            .with_preferred(SECTION_LEADS)
            .with_other(SECTION_OTHERS)
    };
    let survey = |id: &str, enrollment| {
        Activity::new(id, enrollment)
            .with_preferred(SURVEY_LEADS)
            .with_other(SURVEY_OTHERS)
    };

    let mut rules = ScoringRules::default()
        .with_split_buildings(["Roman", "Beach"])
        .with_load_exception("Tyler", 2)
        .with_pair(LinkedPair::sections("SLA101A", "SLA101B"))
        .with_pair(LinkedPair::sections("SLA191A", "SLA191B"));
    for course_191 in ["SLA191A", "SLA191B"] {
        for course_101 in ["SLA101A", "SLA101B"] {
            rules = rules.with_pair(LinkedPair::courses(course_191, course_101));
        }
    }

    let mut catalog = Catalog::new()
        .with_activity(section("SLA101A", 40))
        .with_activity(section("SLA101B", 35))
        .with_activity(section("SLA191A", 45))
        .with_activity(section("SLA191B", 40))
        .with_activity(survey("SLA201", 60))
        .with_activity(survey("SLA291", 50))
        .with_activity(
            Activity::new("SLA303", 25)
                .with_preferred(["Glen", "Zeldin"])
                .with_other(["Banks"]),
        )
        .with_activity(
            Activity::new("SLA304", 20)
                .with_preferred(["Singer", "Uther"])
                .with_other(["Richards"]),
        )
        .with_activity(
            Activity::new("SLA394", 15)
                .with_preferred(["Tyler", "Singer"])
                .with_other(["Richards", "Zeldin"]),
        )
        .with_activity(
            Activity::new("SLA449", 30)
                .with_preferred(["Tyler", "Zeldin", "Uther"])
                .with_other(["Zeldin", "Shaw"]),
        )
        .with_activity(
            Activity::new("SLA451", 90)
                .with_preferred(["Lock", "Banks", "Zeldin"])
                .with_other(["Tyler", "Singer", "Shaw", "Glen"]),
        )
        .with_room(Room::new("Beach 201", 18))
        .with_room(Room::new("Beach 301", 25))
        .with_room(Room::new("Frank 119", 95))
        .with_room(Room::new("Loft 206", 55))
        .with_room(Room::new("Loft 310", 48))
        .with_room(Room::new("James 325", 110))
        .with_room(Room::new("Roman 201", 40))
        .with_room(Room::new("Roman 216", 80))
        .with_room(Room::new("Slater 003", 32))
        .with_facilitators([
            "Lock", "Glen", "Banks", "Richards", "Shaw", "Singer", "Uther", "Tyler", "Numen",
            "Zeldin",
        ])
        .with_rules(rules);

    for hour in 10..=15 {
        catalog = catalog.with_time_slot(TimeSlot::at_hour(hour));
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PairRule;

    #[test]
    fn test_reference_catalog_shape() {
        let catalog = reference_catalog();
        assert_eq!(catalog.activity_count(), 11);
        assert_eq!(catalog.room_count(), 9);
        assert_eq!(catalog.time_slot_count(), 6);
        assert_eq!(catalog.facilitator_count(), 10);
        assert_eq!(catalog.time_slots[0].label, "10 AM");
        assert_eq!(catalog.time_slots[5].label, "3 PM");
    }

    #[test]
    fn test_reference_linked_pairs() {
        let rules = reference_catalog().rules;
        let sections = rules
            .linked_pairs
            .iter()
            .filter(|p| matches!(p.rule, PairRule::Sections(_)))
            .count();
        let courses = rules
            .linked_pairs
            .iter()
            .filter(|p| matches!(p.rule, PairRule::Courses(_)))
            .count();
        assert_eq!(sections, 2);
        assert_eq!(courses, 4);
        assert_eq!(rules.total_load.min_load_for("Tyler"), 2);
    }

    #[test]
    fn test_index_lookups() {
        let catalog = reference_catalog();
        assert_eq!(catalog.activity_index("SLA101A"), Some(0));
        assert_eq!(catalog.activity_index("SLA451"), Some(10));
        assert_eq!(catalog.room_index("Slater 003"), Some(8));
        assert_eq!(catalog.time_slot_index("12 PM"), Some(2));
        assert_eq!(catalog.facilitator_index("Zeldin"), Some(9));
        assert_eq!(catalog.facilitator_index("Nobody"), None);
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = reference_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
