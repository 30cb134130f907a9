//! Capacity and RSVP evaluation.
//!
//! Decides, for one slot and the currently selected volunteer, whether the
//! slot is full and whether a click may book or release it.
//!
//! # Rules
//!
//! | Flag | True when |
//! |------|-----------|
//! | `has_rsvp` | the selected volunteer holds the slot |
//! | `at_slot_capacity` | slot cap ≠ 0 and slot RSVPs ≥ cap |
//! | `at_activity_capacity` | activity cap ≠ 0 and RSVPs over the whole column ≥ cap |
//! | bookable | slot enabled and (`has_rsvp` or not at capacity) |
//!
//! A holder may always release, even after a cap was lowered below the
//! current count.

use serde::{Deserialize, Serialize};

use crate::error::{Axis, MatrixError};
use crate::matrix::MatrixStore;
use crate::models::SlotCoord;

/// Evaluated state of one slot for one (optional) volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatus {
    pub enabled: bool,
    pub has_rsvp: bool,
    pub at_slot_capacity: bool,
    pub at_activity_capacity: bool,
}

impl SlotStatus {
    /// Slot or activity is full.
    #[inline]
    pub fn at_capacity(&self) -> bool {
        self.at_slot_capacity || self.at_activity_capacity
    }

    /// Whether a click may change this volunteer's booking.
    #[inline]
    pub fn bookable(&self) -> bool {
        self.enabled && (self.has_rsvp || !self.at_capacity())
    }
}

/// Direction of a booking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingTransition {
    /// Add the volunteer to the slot.
    Reserve,
    /// Remove the volunteer from the slot.
    Release,
}

/// Open seats left in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seats {
    Limited(u32),
    Unlimited,
}

impl Seats {
    fn tighter(self, other: Self) -> Self {
        match (self, other) {
            (Self::Limited(a), Self::Limited(b)) => Self::Limited(a.min(b)),
            (Self::Limited(a), Self::Unlimited) | (Self::Unlimited, Self::Limited(a)) => {
                Self::Limited(a)
            }
            (Self::Unlimited, Self::Unlimited) => Self::Unlimited,
        }
    }

    fn of(cap: u32, used: u32) -> Self {
        if cap == 0 {
            Self::Unlimited
        } else {
            Self::Limited(cap.saturating_sub(used))
        }
    }
}

/// Total RSVPs across every window of activity `activity_index`.
pub fn activity_rsvp_count(store: &MatrixStore, activity_index: usize) -> u32 {
    store
        .slots()
        .column(activity_index)
        .map(|s| s.rsvp_count)
        .sum()
}

/// Evaluates slot `coord` for the volunteer at `volunteer` (roster
/// position), or for nobody.
///
/// With no volunteer selected, `has_rsvp` is false.
pub fn evaluate(
    store: &MatrixStore,
    coord: SlotCoord,
    volunteer: Option<usize>,
) -> Result<SlotStatus, MatrixError> {
    let activity = store.activity(coord.activity_index).ok_or_else(|| {
        MatrixError::out_of_bounds(Axis::Activity, coord.activity_index, store.num_activities())
    })?;
    let slot = store.slot(coord).ok_or_else(|| {
        MatrixError::out_of_bounds(Axis::Window, coord.window_index, store.num_windows())
    })?;

    let has_rsvp = match volunteer {
        Some(pos) => store
            .volunteer(pos)
            .ok_or_else(|| {
                MatrixError::out_of_bounds(Axis::Volunteer, pos, store.volunteers().len())
            })?
            .has_rsvp(coord),
        None => false,
    };

    let at_slot_capacity = slot.volunteer_cap != 0 && slot.rsvp_count >= slot.volunteer_cap;
    let at_activity_capacity = activity.activity_volunteer_cap != 0
        && activity_rsvp_count(store, coord.activity_index) >= activity.activity_volunteer_cap;

    Ok(SlotStatus {
        enabled: slot.enabled,
        has_rsvp,
        at_slot_capacity,
        at_activity_capacity,
    })
}

/// What a click on a slot with `status` would do, if anything.
pub fn plan_booking(status: &SlotStatus) -> Option<BookingTransition> {
    if !status.bookable() {
        None
    } else if status.has_rsvp {
        Some(BookingTransition::Release)
    } else {
        Some(BookingTransition::Reserve)
    }
}

/// Evaluates and applies a booking click for the volunteer at `position`.
///
/// Returns the applied transition, or `None` when the slot is not
/// bookable (the store is unchanged).
pub fn book(
    store: &mut MatrixStore,
    position: usize,
    coord: SlotCoord,
) -> Result<Option<BookingTransition>, MatrixError> {
    let status = evaluate(store, coord, Some(position))?;
    let Some(transition) = plan_booking(&status) else {
        return Ok(None);
    };
    store.apply_booking(position, coord, transition)?;
    Ok(Some(transition))
}

/// Open seats in slot `coord`: the tighter of the slot and activity caps.
pub fn remaining_seats(store: &MatrixStore, coord: SlotCoord) -> Result<Seats, MatrixError> {
    let activity = store.activity(coord.activity_index).ok_or_else(|| {
        MatrixError::out_of_bounds(Axis::Activity, coord.activity_index, store.num_activities())
    })?;
    let slot = store.slot(coord).ok_or_else(|| {
        MatrixError::out_of_bounds(Axis::Window, coord.window_index, store.num_windows())
    })?;
    let by_slot = Seats::of(slot.volunteer_cap, slot.rsvp_count);
    let by_activity = Seats::of(
        activity.activity_volunteer_cap,
        activity_rsvp_count(store, coord.activity_index),
    );
    Ok(by_slot.tighter(by_activity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Slot, SlotChanges, Volunteer, Window};

    /// One activity capped at 2 over two windows, three volunteers.
    fn capped_store() -> MatrixStore {
        let mut store = MatrixStore::new();
        store.add_window(Window::new("Morning", 0, 10), vec![]).unwrap();
        store.add_window(Window::new("Evening", 10, 20), vec![]).unwrap();
        store
            .add_activity(
                Activity::new("Setup").with_activity_cap(2),
                vec![Slot::enabled(0), Slot::enabled(0)],
            )
            .unwrap();
        store.add_volunteer(Volunteer::new("A").with_id("a"));
        store.add_volunteer(Volunteer::new("B").with_id("b"));
        store.add_volunteer(Volunteer::new("C"));
        store
    }

    #[test]
    fn test_activity_capacity_scenario() {
        let mut store = capped_store();
        let w0 = SlotCoord::new(0, 0);
        let w1 = SlotCoord::new(0, 1);

        assert_eq!(book(&mut store, 0, w0).unwrap(), Some(BookingTransition::Reserve));
        assert_eq!(book(&mut store, 0, w1).unwrap(), Some(BookingTransition::Reserve));
        assert_eq!(activity_rsvp_count(&store, 0), 2);

        for coord in [w0, w1] {
            let third = evaluate(&store, coord, Some(2)).unwrap();
            assert!(third.at_capacity());
            assert!(third.at_activity_capacity);
            assert!(!third.at_slot_capacity);
            assert!(!third.bookable());

            let holder = evaluate(&store, coord, Some(0)).unwrap();
            assert!(holder.has_rsvp);
            assert!(holder.bookable());
        }

        // Third volunteer is refused without touching the store.
        let before = store.clone();
        assert_eq!(book(&mut store, 2, w0).unwrap(), None);
        assert_eq!(store, before);

        // Holder releases; seat opens for the others.
        assert_eq!(book(&mut store, 0, w1).unwrap(), Some(BookingTransition::Release));
        assert!(evaluate(&store, w1, Some(2)).unwrap().bookable());
    }

    #[test]
    fn test_slot_capacity() {
        let mut store = capped_store();
        let coord = SlotCoord::new(0, 0);
        store.set_slot(coord, &SlotChanges::enable(Some(1))).unwrap();
        book(&mut store, 1, coord).unwrap();

        let status = evaluate(&store, coord, Some(2)).unwrap();
        assert!(status.at_slot_capacity);
        assert!(!status.at_activity_capacity);
        assert!(!status.bookable());
    }

    #[test]
    fn test_disabled_slot_never_bookable() {
        let mut store = capped_store();
        let coord = SlotCoord::new(0, 1);
        store.apply_booking(0, coord, BookingTransition::Reserve).unwrap();
        store.set_slot(coord, &SlotChanges::disable()).unwrap();

        let status = evaluate(&store, coord, Some(0)).unwrap();
        assert!(status.has_rsvp);
        assert!(!status.bookable());
        assert_eq!(plan_booking(&status), None);
    }

    #[test]
    fn test_no_volunteer_selected() {
        let mut store = capped_store();
        let coord = SlotCoord::new(0, 0);
        store.apply_booking(0, coord, BookingTransition::Reserve).unwrap();

        let status = evaluate(&store, coord, None).unwrap();
        assert!(!status.has_rsvp);
        assert!(status.bookable());
    }

    #[test]
    fn test_release_after_cap_lowered() {
        let mut store = capped_store();
        let coord = SlotCoord::new(0, 0);
        book(&mut store, 0, coord).unwrap();
        book(&mut store, 1, coord).unwrap();
        store.set_slot(coord, &SlotChanges::enable(Some(1))).unwrap();

        let status = evaluate(&store, coord, Some(1)).unwrap();
        assert!(status.at_capacity());
        assert_eq!(plan_booking(&status), Some(BookingTransition::Release));
    }

    #[test]
    fn test_evaluate_out_of_bounds() {
        let store = capped_store();
        assert!(matches!(
            evaluate(&store, SlotCoord::new(3, 0), None),
            Err(MatrixError::IndexOutOfBounds { axis: Axis::Activity, .. })
        ));
        assert!(matches!(
            evaluate(&store, SlotCoord::new(0, 5), None),
            Err(MatrixError::IndexOutOfBounds { axis: Axis::Window, .. })
        ));
        assert!(matches!(
            evaluate(&store, SlotCoord::new(0, 0), Some(9)),
            Err(MatrixError::IndexOutOfBounds { axis: Axis::Volunteer, .. })
        ));
    }

    #[test]
    fn test_remaining_seats() {
        let mut store = capped_store();
        let coord = SlotCoord::new(0, 0);
        assert_eq!(remaining_seats(&store, coord).unwrap(), Seats::Limited(2));

        store.set_slot(coord, &SlotChanges::enable(Some(1))).unwrap();
        assert_eq!(remaining_seats(&store, coord).unwrap(), Seats::Limited(1));

        book(&mut store, 0, SlotCoord::new(0, 1)).unwrap();
        book(&mut store, 1, SlotCoord::new(0, 1)).unwrap();
        assert_eq!(remaining_seats(&store, coord).unwrap(), Seats::Limited(0));
    }

    #[test]
    fn test_remaining_seats_unlimited() {
        let mut store = MatrixStore::new();
        store.add_window(Window::new("W", 0, 1), vec![]).unwrap();
        store
            .add_activity(Activity::new("Open"), vec![Slot::enabled(0)])
            .unwrap();
        assert_eq!(
            remaining_seats(&store, SlotCoord::new(0, 0)).unwrap(),
            Seats::Unlimited
        );
    }
}
