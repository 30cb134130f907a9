//! Integrity checks for a matrix store.
//!
//! The store's mutators keep it consistent on their own; this module
//! checks a store built from outside data (an event snapshot) and backs
//! the invariant tests. Detects:
//! - Slot count not equal to `activities × windows`
//! - Slots whose position fields disagree with their flat position
//! - Gaps or repeats in activity/window/detail indices
//! - Duplicate service ids
//! - RSVP counts that disagree with the RSVP set
//! - Caps above the maximum
//! - Volunteer RSVP sets that disagree with the slots

use std::collections::{BTreeSet, HashSet};

use crate::error::MatrixError;
use crate::matrix::MatrixStore;
use crate::models::{SlotCoord, MAX_VOLUNTEER_CAP};

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
    /// Slot count does not match the matrix shape.
    ShapeMismatch,
    /// A slot's position fields disagree with where it is stored.
    MisplacedSlot,
    /// An `index` field is not equal to the entity's position.
    SparseIndex,
    /// Two entities share the same id.
    DuplicateId,
    /// `rsvp_count` disagrees with the RSVP set.
    RsvpCountMismatch,
    /// A cap exceeds the maximum.
    CapOutOfRange,
    /// A volunteer's RSVP set disagrees with the slots.
    StaleVolunteerRsvp,
    /// A mutator refused the data while building the store.
    Rejected,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn from_matrix(err: &MatrixError) -> Self {
        let kind = match err {
            MatrixError::ShapeMismatch { .. } => ValidationErrorKind::ShapeMismatch,
            MatrixError::CapOutOfRange { .. } => ValidationErrorKind::CapOutOfRange,
            _ => ValidationErrorKind::Rejected,
        };
        Self::new(kind, err.to_string())
    }
}

/// Validates every invariant of a store.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_store(store: &MatrixStore) -> ValidationResult {
    let mut errors = Vec::new();
    let columns = store.num_activities();
    let rows = store.num_windows();
    let grid = store.slots();

    if grid.len() != columns * rows || grid.columns() != columns || grid.rows() != rows {
        errors.push(ValidationError::new(
            ValidationErrorKind::ShapeMismatch,
            format!(
                "{} slots for {columns} activities x {rows} windows",
                grid.len()
            ),
        ));
    }

    if columns > 0 {
        for (p, slot) in grid.iter().enumerate() {
            let expected = SlotCoord::new(p % columns, p / columns);
            if slot.coord() != expected {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MisplacedSlot,
                    format!("slot at {p} claims {} (expected {expected})", slot.coord()),
                ));
            }
        }
    }

    check_dense("activity", store.activities().iter().map(|a| a.index), &mut errors);
    check_dense("window", store.windows().iter().map(|w| w.index), &mut errors);
    check_dense("detail", store.details().iter().map(|d| d.index), &mut errors);

    check_unique("activity", store.activities().iter().filter_map(|a| a.id.as_deref()), &mut errors);
    check_unique("window", store.windows().iter().filter_map(|w| w.id.as_deref()), &mut errors);
    check_unique("detail", store.details().iter().filter_map(|d| d.id.as_deref()), &mut errors);
    check_unique("volunteer", store.volunteers().iter().filter_map(|v| v.id.as_deref()), &mut errors);

    for activity in store.activities() {
        for cap in [activity.activity_volunteer_cap, activity.slot_volunteer_cap_default] {
            if cap > MAX_VOLUNTEER_CAP {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CapOutOfRange,
                    format!("activity '{}' has cap {cap}", activity.label),
                ));
            }
        }
    }

    for slot in grid.iter() {
        if slot.rsvp_count as usize != slot.rsvps.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::RsvpCountMismatch,
                format!(
                    "slot {} counts {} RSVPs but holds {}",
                    slot.coord(),
                    slot.rsvp_count,
                    slot.rsvps.len()
                ),
            ));
        }
        if slot.volunteer_cap > MAX_VOLUNTEER_CAP {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapOutOfRange,
                format!("slot {} has cap {}", slot.coord(), slot.volunteer_cap),
            ));
        }
    }

    for (pos, volunteer) in store.volunteers().iter().enumerate() {
        let key = volunteer.key(pos);
        let derived: BTreeSet<SlotCoord> = grid
            .iter()
            .filter(|s| s.has_rsvp(&key))
            .map(|s| s.coord())
            .collect();
        if derived != volunteer.rsvps {
            errors.push(ValidationError::new(
                ValidationErrorKind::StaleVolunteerRsvp,
                format!("volunteer {key} RSVP set disagrees with slots"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_dense(
    what: &str,
    indices: impl Iterator<Item = usize>,
    errors: &mut Vec<ValidationError>,
) {
    for (pos, index) in indices.enumerate() {
        if pos != index {
            errors.push(ValidationError::new(
                ValidationErrorKind::SparseIndex,
                format!("{what} at position {pos} has index {index}"),
            ));
        }
    }
}

fn check_unique<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Slot, Volunteer, Window};

    fn sample_store() -> MatrixStore {
        let mut store = MatrixStore::new();
        store.add_window(Window::new("W0", 0, 10).with_id("w0"), vec![]).unwrap();
        store.add_window(Window::new("W1", 10, 20).with_id("w1"), vec![]).unwrap();
        store
            .add_activity(
                Activity::new("A0").with_id("a0"),
                vec![Slot::enabled(0), Slot::enabled(0)],
            )
            .unwrap();
        store.add_volunteer(Volunteer::new("Ada").with_id("v0"));
        store
    }

    #[test]
    fn test_valid_store() {
        assert!(validate_store(&sample_store()).is_ok());
        assert!(validate_store(&MatrixStore::new()).is_ok());
    }

    #[test]
    fn test_duplicate_activity_id() {
        let mut store = sample_store();
        store
            .add_activity(
                Activity::new("A1").with_id("a0"),
                vec![Slot::new(), Slot::new()],
            )
            .unwrap();

        let errors = validate_store(&store).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("activity")));
    }

    #[test]
    fn test_rsvp_count_mismatch() {
        let mut store = sample_store();
        let mut slot = Slot::enabled(0);
        slot.rsvp_count = 2;
        store.add_window(Window::new("W2", 20, 30), vec![slot]).unwrap();

        let errors = validate_store(&store).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::RsvpCountMismatch));
    }

    #[test]
    fn test_multiple_errors() {
        let mut store = sample_store();
        let mut slot = Slot::enabled(0);
        slot.rsvp_count = 1;
        store
            .add_activity(Activity::new("A1").with_id("a0"), vec![slot, Slot::new()])
            .unwrap();

        let errors = validate_store(&store).unwrap_err();
        assert!(errors.len() >= 2);
    }

    #[test]
    fn test_from_matrix_kind() {
        let err = MatrixError::CapOutOfRange { cap: 300, max: 255 };
        assert_eq!(
            ValidationError::from_matrix(&err).kind,
            ValidationErrorKind::CapOutOfRange
        );
    }
}
