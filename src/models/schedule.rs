//! Schedule (solution) model.
//!
//! A schedule is the human-facing view of a chromosome: one row per
//! activity naming its room, time slot, and facilitator. It is what a
//! report or file writer consumes.

use serde::{Deserialize, Serialize};

/// A decoded timetable, sorted by time slot then room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// One entry per activity.
    pub entries: Vec<ScheduledActivity>,
}

/// An activity placed in a room and time slot with a facilitator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledActivity {
    pub activity_id: String,
    pub room_id: String,
    /// Time slot label.
    pub time_slot: String,
    /// Time slot start hour (sort key).
    pub hour: i32,
    pub facilitator_id: String,
    /// Denormalized for reporting.
    pub enrollment: u32,
    /// Denormalized for reporting.
    pub capacity: u32,
}

impl Schedule {
    /// Builds a schedule, sorting entries by hour then room.
    pub fn from_entries(mut entries: Vec<ScheduledActivity>) -> Self {
        entries.sort_by(|a, b| a.hour.cmp(&b.hour).then_with(|| a.room_id.cmp(&b.room_id)));
        Self { entries }
    }

    /// Number of scheduled activities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry for an activity.
    pub fn entry_for_activity(&self, activity_id: &str) -> Option<&ScheduledActivity> {
        self.entries.iter().find(|e| e.activity_id == activity_id)
    }

    /// Entries in the given time slot.
    pub fn at_time_slot(&self, label: &str) -> Vec<&ScheduledActivity> {
        self.entries.iter().filter(|e| e.time_slot == label).collect()
    }

    /// Entries taught by the given facilitator.
    pub fn for_facilitator(&self, facilitator_id: &str) -> Vec<&ScheduledActivity> {
        self.entries
            .iter()
            .filter(|e| e.facilitator_id == facilitator_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(activity: &str, room: &str, hour: i32, facilitator: &str) -> ScheduledActivity {
        ScheduledActivity {
            activity_id: activity.into(),
            room_id: room.into(),
            time_slot: format!("{hour}:00"),
            hour,
            facilitator_id: facilitator.into(),
            enrollment: 20,
            capacity: 30,
        }
    }

    #[test]
    fn test_sorted_by_hour_then_room() {
        let schedule = Schedule::from_entries(vec![
            entry("A", "Loft 206", 12, "Glen"),
            entry("B", "Roman 201", 10, "Lock"),
            entry("C", "Beach 201", 12, "Glen"),
        ]);

        let order: Vec<&str> = schedule.entries.iter().map(|e| e.activity_id.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_queries() {
        let schedule = Schedule::from_entries(vec![
            entry("A", "Loft 206", 12, "Glen"),
            entry("B", "Roman 201", 10, "Lock"),
            entry("C", "Beach 201", 12, "Glen"),
        ]);

        assert_eq!(schedule.len(), 3);
        assert!(!schedule.is_empty());
        assert_eq!(schedule.at_time_slot("12:00").len(), 2);
        assert_eq!(schedule.for_facilitator("Glen").len(), 2);
        assert_eq!(
            schedule.entry_for_activity("B").map(|e| e.room_id.as_str()),
            Some("Roman 201")
        );
        assert!(schedule.entry_for_activity("Z").is_none());
    }
}
