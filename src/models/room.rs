//! Room, time slot, and facilitator models.
//!
//! These are the three gene domains: every activity is assigned exactly
//! one value from each.

use serde::{Deserialize, Serialize};

/// A classroom that can host activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (e.g. "Roman 201").
    pub id: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Building the room belongs to.
    pub building: String,
    /// Equipment tags available in the room.
    #[serde(default)]
    pub equipment: Vec<String>,
}

impl Room {
    /// Creates a room. The building is taken from the first word of the id.
    ///
    /// ```
    /// use u_timetable::models::Room;
    ///
    /// let room = Room::new("Roman 201", 40);
    /// assert_eq!(room.building, "Roman");
    /// ```
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        let building = id.split_whitespace().next().unwrap_or_default().to_string();
        Self {
            id,
            capacity,
            building,
            equipment: Vec::new(),
        }
    }

    /// Overrides the building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Adds an equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment.push(tag.into());
        self
    }

    /// Whether the room provides the given equipment tag.
    pub fn has_equipment(&self, tag: &str) -> bool {
        self.equipment.iter().any(|e| e == tag)
    }
}

/// A time slot in the teaching day.
///
/// Slots are ordered by `hour`. Spacing rules measure distance between
/// slots in hours, so "consecutive" means one hour apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Display label (e.g. "10 AM").
    pub label: String,
    /// Start hour on a 24-hour clock.
    pub hour: i32,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(label: impl Into<String>, hour: i32) -> Self {
        Self {
            label: label.into(),
            hour,
        }
    }

    /// Creates a slot labelled in 12-hour form ("1 PM") from a 24-hour hour.
    pub fn at_hour(hour: i32) -> Self {
        let label = match hour {
            0 => "12 AM".to_string(),
            h if h < 12 => format!("{h} AM"),
            12 => "12 PM".to_string(),
            h => format!("{} PM", h - 12),
        };
        Self::new(label, hour)
    }
}

/// A facilitator (instructor).
///
/// Workload limits and preferences are expressed by activities and
/// scoring rules, not stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilitator {
    /// Unique facilitator identifier.
    pub id: String,
}

impl Facilitator {
    /// Creates a facilitator.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
