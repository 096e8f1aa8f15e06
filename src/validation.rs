//! Input validation for timetabling catalogs.
//!
//! Checks structural integrity of the catalog before optimization.
//! Detects:
//! - Empty gene domains (no rooms, slots, facilitators, or activities)
//! - Duplicate IDs
//! - Preference lists and load exceptions naming unknown facilitators
//! - Linked pairs naming unknown activities
//! - Time slots out of hour order

use crate::models::Catalog;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A gene domain or the activity list is empty.
    EmptyDomain,
    /// Two entities share the same ID.
    DuplicateId,
    /// A facilitator reference doesn't resolve.
    UnknownFacilitator,
    /// A linked pair references a missing activity or links one to itself.
    UnknownActivity,
    /// Time slot hours are not strictly increasing.
    UnorderedTimeSlots,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog.
///
/// Checks:
/// 1. Activities, rooms, time slots, and facilitators are all non-empty
/// 2. No duplicate activity, room, or facilitator IDs or slot labels
/// 3. Every preference list entry names a known facilitator
/// 4. Every load exception names a known facilitator
/// 5. Every linked pair names two distinct known activities
/// 6. Time slot hours are strictly increasing
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    for (domain, len) in [
        ("activities", catalog.activities.len()),
        ("rooms", catalog.rooms.len()),
        ("time slots", catalog.time_slots.len()),
        ("facilitators", catalog.facilitators.len()),
    ] {
        if len == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyDomain,
                format!("Catalog has no {domain}"),
            ));
        }
    }

    let activity_ids = collect_unique(
        catalog.activities.iter().map(|a| a.id.as_str()),
        "activity",
        &mut errors,
    );
    collect_unique(catalog.rooms.iter().map(|r| r.id.as_str()), "room", &mut errors);
    collect_unique(
        catalog.time_slots.iter().map(|t| t.label.as_str()),
        "time slot",
        &mut errors,
    );
    let facilitator_ids = collect_unique(
        catalog.facilitators.iter().map(|f| f.id.as_str()),
        "facilitator",
        &mut errors,
    );

    // Preference references
    for act in &catalog.activities {
        for fac in act
            .preferred_facilitators
            .iter()
            .chain(&act.other_facilitators)
        {
            if !facilitator_ids.contains(fac.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownFacilitator,
                    format!("Activity '{}' references unknown facilitator '{}'", act.id, fac),
                ));
            }
        }
    }

    for exception in &catalog.rules.total_load.exceptions {
        if !facilitator_ids.contains(exception.facilitator.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownFacilitator,
                format!(
                    "Load exception references unknown facilitator '{}'",
                    exception.facilitator
                ),
            ));
        }
    }

    for pair in &catalog.rules.linked_pairs {
        for id in [&pair.first, &pair.second] {
            if !activity_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownActivity,
                    format!("Linked pair references unknown activity '{id}'"),
                ));
            }
        }
        if pair.first == pair.second {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownActivity,
                format!("Linked pair links activity '{}' to itself", pair.first),
            ));
        }
    }

    for window in catalog.time_slots.windows(2) {
        if window[1].hour <= window[0].hour {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnorderedTimeSlots,
                format!(
                    "Time slot '{}' ({}h) does not follow '{}' ({}h)",
                    window[1].label, window[1].hour, window[0].label, window[0].hour
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collects IDs into a set, reporting duplicates.
fn collect_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{reference_catalog, Activity, LinkedPair, Room, ScoringRules, TimeSlot};

    fn small_catalog() -> Catalog {
        Catalog::new()
            .with_activity(Activity::new("A1", 30).with_preferred(["F1"]))
            .with_activity(Activity::new("A2", 20).with_other(["F2"]))
            .with_room(Room::new("R1", 30))
            .with_time_slot(TimeSlot::at_hour(10))
            .with_time_slot(TimeSlot::at_hour(11))
            .with_facilitators(["F1", "F2"])
    }

    #[test]
    fn test_valid_catalog() {
        assert!(validate_catalog(&small_catalog()).is_ok());
        assert!(validate_catalog(&reference_catalog()).is_ok());
    }

    #[test]
    fn test_empty_catalog_reports_every_domain() {
        let errors = validate_catalog(&Catalog::new()).unwrap_err();
        let empty = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::EmptyDomain)
            .count();
        assert_eq!(empty, 4);
    }

    #[test]
    fn test_zero_rooms() {
        let mut catalog = small_catalog();
        catalog.rooms.clear();

        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyDomain);
        assert!(errors[0].message.contains("rooms"));
    }

    #[test]
    fn test_duplicate_room_id() {
        let catalog = small_catalog().with_room(Room::new("R1", 50));

        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("room")));
    }

    #[test]
    fn test_unknown_preferred_facilitator() {
        let catalog = small_catalog().with_activity(Activity::new("A3", 10).with_preferred(["Ghost"]));

        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownFacilitator && e.message.contains("Ghost")));
    }

    #[test]
    fn test_unknown_load_exception() {
        let catalog = small_catalog().with_rules(ScoringRules::default().with_load_exception("Ghost", 1));

        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownFacilitator));
    }

    #[test]
    fn test_linked_pair_references() {
        let catalog = small_catalog().with_rules(
            ScoringRules::default()
                .with_pair(LinkedPair::sections("A1", "Missing"))
                .with_pair(LinkedPair::courses("A2", "A2")),
        );

        let errors = validate_catalog(&catalog).unwrap_err();
        let unknown = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::UnknownActivity)
            .count();
        assert_eq!(unknown, 2);
    }

    #[test]
    fn test_unordered_time_slots() {
        let catalog = small_catalog().with_time_slot(TimeSlot::at_hour(9));

        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnorderedTimeSlots));
    }

    #[test]
    fn test_multiple_errors() {
        let catalog = Catalog::new()
            .with_activity(Activity::new("A1", 10).with_preferred(["Ghost"]))
            .with_activity(Activity::new("A1", 10));

        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
