//! Activity (course section) model.
//!
//! An activity is the unit being timetabled: one course section with a
//! fixed enrollment and a ranked view of which facilitators may teach it.
//!
//! # Facilitator Preference
//!
//! Each activity carries two ordered lists:
//! - **Preferred**: facilitators the department wants on this section
//! - **Other**: facilitators who are acceptable but not ideal
//!
//! Any facilitator on neither list is *unlisted*. Unlisted assignments are
//! legal, they just score worse.

use serde::{Deserialize, Serialize};

/// A course activity to be placed in a room, time slot, and facilitator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier (e.g. "SLA101A").
    pub id: String,
    /// Expected number of enrolled students.
    pub enrollment: u32,
    /// Facilitators the activity should preferably be taught by.
    pub preferred_facilitators: Vec<String>,
    /// Facilitators that are acceptable alternatives.
    pub other_facilitators: Vec<String>,
    /// Equipment tag the assigned room should provide, if any.
    #[serde(default)]
    pub required_equipment: Option<String>,
}

/// How well a facilitator matches an activity's preference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilitatorPreference {
    /// Listed in the preferred set.
    Preferred,
    /// Listed in the other-acceptable set.
    Other,
    /// On neither list.
    Unlisted,
}

impl Activity {
    /// Creates an activity with no facilitator preferences.
    pub fn new(id: impl Into<String>, enrollment: u32) -> Self {
        Self {
            id: id.into(),
            enrollment,
            preferred_facilitators: Vec::new(),
            other_facilitators: Vec::new(),
            required_equipment: None,
        }
    }

    /// Sets the preferred facilitator list.
    pub fn with_preferred<I, S>(mut self, facilitators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_facilitators = facilitators.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the other-acceptable facilitator list.
    pub fn with_other<I, S>(mut self, facilitators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_facilitators = facilitators.into_iter().map(Into::into).collect();
        self
    }

    /// Requires a room providing the given equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.required_equipment = Some(tag.into());
        self
    }

    /// Classifies a facilitator against this activity's preference lists.
    ///
    /// The preferred list wins when a facilitator appears on both.
    pub fn preference_of(&self, facilitator_id: &str) -> FacilitatorPreference {
        if self.preferred_facilitators.iter().any(|f| f == facilitator_id) {
            FacilitatorPreference::Preferred
        } else if self.other_facilitators.iter().any(|f| f == facilitator_id) {
            FacilitatorPreference::Other
        } else {
            FacilitatorPreference::Unlisted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_builder() {
        let act = Activity::new("SLA303", 25)
            .with_preferred(["Glen", "Zeldin"])
            .with_other(["Banks"])
            .with_equipment("projector");

        assert_eq!(act.id, "SLA303");
        assert_eq!(act.enrollment, 25);
        assert_eq!(act.preferred_facilitators, vec!["Glen", "Zeldin"]);
        assert_eq!(act.other_facilitators, vec!["Banks"]);
        assert_eq!(act.required_equipment.as_deref(), Some("projector"));
    }

    #[test]
    fn test_preference_of() {
        let act = Activity::new("SLA303", 25)
            .with_preferred(["Glen", "Zeldin"])
            .with_other(["Banks"]);

        assert_eq!(act.preference_of("Glen"), FacilitatorPreference::Preferred);
        assert_eq!(act.preference_of("Banks"), FacilitatorPreference::Other);
        assert_eq!(act.preference_of("Tyler"), FacilitatorPreference::Unlisted);
    }

    #[test]
    fn test_preferred_wins_over_other() {
        // SLA449 lists Zeldin on both lists
        let act = Activity::new("SLA449", 30)
            .with_preferred(["Tyler", "Zeldin", "Uther"])
            .with_other(["Zeldin", "Shaw"]);
        assert_eq!(act.preference_of("Zeldin"), FacilitatorPreference::Preferred);
    }

    #[test]
    fn test_deserialize_without_equipment() {
        let json = r#"{
            "id": "SLA304",
            "enrollment": 20,
            "preferred_facilitators": ["Singer", "Uther"],
            "other_facilitators": ["Richards"]
        }"#;
        let act: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(act.id, "SLA304");
        assert!(act.required_equipment.is_none());
    }
}
