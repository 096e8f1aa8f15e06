//! Declarative scoring rule table.
//!
//! Every reward and penalty magnitude used by the fitness evaluator lives
//! here, together with the table of linked activity pairs that get
//! spacing rules. The evaluator interprets this table; it never compares
//! activity identifiers itself.
//!
//! # Rule Kinds
//!
//! | Rule | Unit | Default |
//! |------|------|---------|
//! | Room conflict | Room × slot with ≥2 activities | −0.5 |
//! | Room size | Activity | −0.5 / −0.4 / −0.2 / +0.3 |
//! | Preference | Activity | +0.5 / +0.2 / −0.1 |
//! | Slot load | Facilitator × slot | +0.2 / −0.2 |
//! | Total load | Facilitator | −0.5 / −0.4 |
//! | Consecutive | Same facilitator, adjacent slots | +0.5 / −0.4 |
//! | Section spacing | Linked section pair | +0.5 / −0.5 |
//! | Course spacing | Linked cross-course pair | ±0.5, −0.4, ±0.25 |

use serde::{Deserialize, Serialize};

/// Complete scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Penalty per room × time slot hosting two or more activities.
    pub room_conflict_penalty: f64,
    /// Room capacity versus enrollment bands.
    pub room_size: RoomSizeRule,
    /// Facilitator preference bands.
    pub preference: PreferenceRule,
    /// Per facilitator × time slot load.
    pub slot_load: SlotLoadRule,
    /// Per facilitator total load.
    pub total_load: LoadRule,
    /// Applied when one facilitator teaches in two adjacent slots.
    pub facilitator_consecutive: ConsecutiveRule,
    /// Buildings that are far from every other building.
    ///
    /// A consecutive pair with exactly one room in these buildings is
    /// penalized.
    pub split_buildings: Vec<String>,
    /// Activity pairs with spacing rules.
    pub linked_pairs: Vec<LinkedPair>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            room_conflict_penalty: -0.5,
            room_size: RoomSizeRule::default(),
            preference: PreferenceRule::default(),
            slot_load: SlotLoadRule::default(),
            total_load: LoadRule::default(),
            facilitator_consecutive: ConsecutiveRule::default(),
            split_buildings: Vec::new(),
            linked_pairs: Vec::new(),
        }
    }
}

impl ScoringRules {
    /// Sets the split buildings.
    pub fn with_split_buildings<I, S>(mut self, buildings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.split_buildings = buildings.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a linked activity pair.
    pub fn with_pair(mut self, pair: LinkedPair) -> Self {
        self.linked_pairs.push(pair);
        self
    }

    /// Adds a per-facilitator minimum load exception.
    pub fn with_load_exception(mut self, facilitator: impl Into<String>, min_load: usize) -> Self {
        self.total_load.exceptions.push(LoadException {
            facilitator: facilitator.into(),
            min_load,
        });
        self
    }

    /// Whether a building is in the split set.
    pub fn is_split_building(&self, building: &str) -> bool {
        self.split_buildings.iter().any(|b| b == building)
    }
}

/// Room size bands, checked in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSizeRule {
    /// Enrollment exceeds capacity.
    pub too_small: f64,
    /// Capacity above `large_factor` × enrollment.
    pub very_large: f64,
    /// Capacity above `oversized_factor` × enrollment.
    pub oversized: f64,
    /// Any other room.
    pub good_fit: f64,
    pub large_factor: f64,
    pub oversized_factor: f64,
}

impl Default for RoomSizeRule {
    fn default() -> Self {
        Self {
            too_small: -0.5,
            very_large: -0.4,
            oversized: -0.2,
            good_fit: 0.3,
            large_factor: 3.0,
            oversized_factor: 1.5,
        }
    }
}

/// Facilitator preference bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceRule {
    pub preferred: f64,
    pub other: f64,
    pub unlisted: f64,
}

impl Default for PreferenceRule {
    fn default() -> Self {
        Self {
            preferred: 0.5,
            other: 0.2,
            unlisted: -0.1,
        }
    }
}

/// Facilitator load within a single time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLoadRule {
    /// Exactly one activity in the slot.
    pub single: f64,
    /// More than one activity in the slot.
    pub double_booked: f64,
}

impl Default for SlotLoadRule {
    fn default() -> Self {
        Self {
            single: 0.2,
            double_booked: -0.2,
        }
    }
}

/// Facilitator total load across the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadRule {
    /// Loads above this are overloaded.
    pub max_load: usize,
    /// Loads below this are underloaded.
    pub min_load: usize,
    pub overload: f64,
    pub underload: f64,
    /// Facilitators with their own minimum load.
    pub exceptions: Vec<LoadException>,
}

impl Default for LoadRule {
    fn default() -> Self {
        Self {
            max_load: 4,
            min_load: 3,
            overload: -0.5,
            underload: -0.4,
            exceptions: Vec::new(),
        }
    }
}

impl LoadRule {
    /// Minimum load that applies to a facilitator.
    pub fn min_load_for(&self, facilitator_id: &str) -> usize {
        self.exceptions
            .iter()
            .find(|e| e.facilitator == facilitator_id)
            .map_or(self.min_load, |e| e.min_load)
    }
}

/// Per-facilitator override of the minimum load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadException {
    pub facilitator: String,
    pub min_load: usize,
}

/// Scoring for two activities in adjacent time slots.
///
/// The pair earns `bonus` when both rooms are on the same side of the
/// split, and `split_building_penalty` instead when exactly one room is in
/// a split building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsecutiveRule {
    pub bonus: f64,
    pub split_building_penalty: f64,
}

impl Default for ConsecutiveRule {
    fn default() -> Self {
        Self {
            bonus: 0.5,
            split_building_penalty: -0.4,
        }
    }
}

impl ConsecutiveRule {
    /// Score for a consecutive pair given each room's split-building flag.
    pub fn score(&self, first_split: bool, second_split: bool) -> f64 {
        if first_split != second_split {
            self.split_building_penalty
        } else {
            self.bonus
        }
    }
}

/// Two activities linked by a spacing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedPair {
    pub first: String,
    pub second: String,
    pub rule: PairRule,
}

impl LinkedPair {
    /// Links two sections of the same course with default magnitudes.
    pub fn sections(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            rule: PairRule::Sections(SectionSpacing::default()),
        }
    }

    /// Links sections of two related courses with default magnitudes.
    pub fn courses(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            rule: PairRule::Courses(CourseSpacing::default()),
        }
    }
}

/// Spacing rule variants. Each is evaluated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PairRule {
    /// Two sections of one course should be spread across the day.
    Sections(SectionSpacing),
    /// Sections of two related courses should sit close together.
    Courses(CourseSpacing),
}

/// Spacing between two sections of the same course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSpacing {
    /// Gap (hours) the sections must exceed to earn the bonus.
    pub far_apart_hours: u32,
    pub far_apart_bonus: f64,
    pub same_slot_penalty: f64,
}

impl Default for SectionSpacing {
    fn default() -> Self {
        Self {
            far_apart_hours: 4,
            far_apart_bonus: 0.5,
            same_slot_penalty: -0.5,
        }
    }
}

impl SectionSpacing {
    /// Score for two sections `gap` hours apart.
    pub fn score(&self, gap: u32) -> f64 {
        if gap > self.far_apart_hours {
            self.far_apart_bonus
        } else if gap == 0 {
            self.same_slot_penalty
        } else {
            0.0
        }
    }
}

/// Spacing between sections of two related courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSpacing {
    /// Applied when the sections are one hour apart.
    pub consecutive: ConsecutiveRule,
    /// Applied when the sections are two hours apart.
    pub one_gap_bonus: f64,
    pub same_slot_penalty: f64,
}

impl Default for CourseSpacing {
    fn default() -> Self {
        Self {
            consecutive: ConsecutiveRule::default(),
            one_gap_bonus: 0.25,
            same_slot_penalty: -0.25,
        }
    }
}
