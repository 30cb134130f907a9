//! The matrix store: activities, windows, slots, details, and volunteers.
//!
//! # Invariants
//! After every public method returns:
//! - `slots.len() == activities.len() × windows.len()`
//! - the slot at flat position `w × activities.len() + a` has
//!   `activity_index == a` and `window_index == w`
//! - `activity.index`, `window.index`, `detail.index` equal their positions
//! - each volunteer's `rsvps` is exactly the set of slots recording that
//!   volunteer's key
//!
//! Mutators validate every argument before touching state, so an `Err`
//! leaves the store unchanged. Position fields are never patched
//! incrementally; they are re-derived by a full pass after each change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::grid::SlotGrid;
use super::priority::OrderKey;
use super::sequence::{check_index, check_move, move_item, reindex};
use crate::capacity::BookingTransition;
use crate::error::{Axis, MatrixError};
use crate::models::{
    Activity, ActivityChanges, Detail, DetailChanges, Slot, SlotChanges, SlotCoord, Volunteer,
    VolunteerChanges, VolunteerKey, Window, WindowChanges, MAX_VOLUNTEER_CAP,
};

/// In-memory model of one event's sign-up matrix.
///
/// A store is scoped to a single event and owned by exactly one caller;
/// construct independent stores freely in tests.
///
/// # Example
/// ```
/// use u_signup::matrix::MatrixStore;
/// use u_signup::models::{Activity, Slot, SlotCoord, Window};
///
/// let mut store = MatrixStore::new();
/// store.add_window(Window::new("Morning", 0, 3_600_000), vec![]).unwrap();
/// store.add_activity(Activity::new("Parking"), vec![Slot::enabled(2)]).unwrap();
///
/// assert_eq!(store.num_activities(), 1);
/// assert!(store.slot(SlotCoord::new(0, 0)).unwrap().enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixStore {
    activities: Vec<Activity>,
    windows: Vec<Window>,
    slots: SlotGrid,
    details: Vec<Detail>,
    volunteers: Vec<Volunteer>,
}

impl MatrixStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ─────────────────────────────────────

    /// Activities in column order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Windows in row order.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// The slot grid.
    pub fn slots(&self) -> &SlotGrid {
        &self.slots
    }

    /// Registration details in order.
    pub fn details(&self) -> &[Detail] {
        &self.details
    }

    /// Volunteer roster. Unconfirmed volunteers are keyed by position here.
    pub fn volunteers(&self) -> &[Volunteer] {
        &self.volunteers
    }

    /// Number of activity columns.
    #[inline]
    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }

    /// Number of window rows.
    #[inline]
    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    /// Activity at a column.
    pub fn activity(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    /// Window at a row.
    pub fn window(&self, index: usize) -> Option<&Window> {
        self.windows.get(index)
    }

    /// Detail at a position.
    pub fn detail(&self, index: usize) -> Option<&Detail> {
        self.details.get(index)
    }

    /// Volunteer at a roster position.
    pub fn volunteer(&self, position: usize) -> Option<&Volunteer> {
        self.volunteers.get(position)
    }

    /// Slot at a coordinate.
    pub fn slot(&self, coord: SlotCoord) -> Option<&Slot> {
        self.slots.get(coord)
    }

    /// Roster position of the volunteer recorded under `key`.
    pub fn volunteer_position(&self, key: &VolunteerKey) -> Option<usize> {
        match key {
            VolunteerKey::Pending(pos) => self
                .volunteers
                .get(*pos)
                .filter(|v| !v.is_confirmed())
                .map(|_| *pos),
            VolunteerKey::Id(id) => self
                .volunteers
                .iter()
                .position(|v| v.id.as_deref() == Some(id.as_str())),
        }
    }

    /// Position of the activity with a service id.
    pub fn activity_position(&self, id: &str) -> Option<usize> {
        self.activities
            .iter()
            .position(|a| a.id.as_deref() == Some(id))
    }

    /// Position of the window with a service id.
    pub fn window_position(&self, id: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.id.as_deref() == Some(id))
    }

    // ── Activities ──────────────────────────────────

    /// Appends an activity column.
    ///
    /// `slots_by_window` must hold one slot per existing window, in window
    /// order; slot `w` lands at the end of window `w`'s block.
    /// Returns the new activity's index.
    pub fn add_activity(
        &mut self,
        mut activity: Activity,
        slots_by_window: Vec<Slot>,
    ) -> Result<usize, MatrixError> {
        if slots_by_window.len() != self.num_windows() {
            return Err(MatrixError::ShapeMismatch {
                axis: Axis::Activity,
                expected: self.num_windows(),
                actual: slots_by_window.len(),
            });
        }
        check_cap(activity.activity_volunteer_cap)?;
        check_cap(activity.slot_volunteer_cap_default)?;
        for slot in &slots_by_window {
            check_cap(slot.volunteer_cap)?;
        }

        let index = self.num_activities();
        activity.index = index;
        log::debug!("add activity '{}' at column {index}", activity.label);
        self.activities.push(activity);
        self.slots.push_column(slots_by_window);
        self.derive_volunteer_rsvps();
        Ok(index)
    }

    /// Moves column `from` toward `to` (list-move semantics, `to` in `0..=len`).
    pub fn move_activity(&mut self, from: usize, to: usize) -> Result<(), MatrixError> {
        check_move(Axis::Activity, from, to, self.num_activities())?;
        if from == to {
            return Ok(());
        }
        log::debug!("move activity column {from} -> {to}");
        move_item(&mut self.activities, from, to);
        self.slots.move_column(from, to);
        self.reindex_all();
        Ok(())
    }

    /// Removes column `target` and every slot in it.
    pub fn remove_activity(&mut self, target: usize) -> Result<(Activity, Vec<Slot>), MatrixError> {
        check_index(Axis::Activity, target, self.num_activities())?;
        let removed_slots = self.slots.remove_column(target);
        let activity = self.activities.remove(target);
        log::debug!("remove activity '{}' from column {target}", activity.label);
        self.reindex_all();
        Ok((activity, removed_slots))
    }

    /// Applies a change set to an activity's descriptive fields.
    pub fn update_activity(
        &mut self,
        index: usize,
        changes: &ActivityChanges,
    ) -> Result<(), MatrixError> {
        check_index(Axis::Activity, index, self.num_activities())?;
        for cap in changes.caps() {
            check_cap(cap)?;
        }
        changes.apply_to(&mut self.activities[index]);
        Ok(())
    }

    // ── Windows ─────────────────────────────────────

    /// Appends a window row.
    ///
    /// `slots_by_activity` must hold one slot per existing activity, in
    /// activity order. Returns the new window's index.
    pub fn add_window(
        &mut self,
        mut window: Window,
        slots_by_activity: Vec<Slot>,
    ) -> Result<usize, MatrixError> {
        if slots_by_activity.len() != self.num_activities() {
            return Err(MatrixError::ShapeMismatch {
                axis: Axis::Window,
                expected: self.num_activities(),
                actual: slots_by_activity.len(),
            });
        }
        for slot in &slots_by_activity {
            check_cap(slot.volunteer_cap)?;
        }

        let index = self.num_windows();
        window.index = index;
        log::debug!("add window '{}' at row {index}", window.label);
        self.windows.push(window);
        self.slots.push_row(slots_by_activity);
        self.derive_volunteer_rsvps();
        Ok(index)
    }

    /// Moves row `from` toward `to`, relocating its whole slot block.
    pub fn move_window(&mut self, from: usize, to: usize) -> Result<(), MatrixError> {
        check_move(Axis::Window, from, to, self.num_windows())?;
        if from == to {
            return Ok(());
        }
        log::debug!("move window row {from} -> {to}");
        move_item(&mut self.windows, from, to);
        self.slots.move_row(from, to);
        self.reindex_all();
        Ok(())
    }

    /// Removes row `target` and its slot block.
    pub fn remove_window(&mut self, target: usize) -> Result<(Window, Vec<Slot>), MatrixError> {
        check_index(Axis::Window, target, self.num_windows())?;
        let removed_slots = self.slots.remove_row(target);
        let window = self.windows.remove(target);
        log::debug!("remove window '{}' from row {target}", window.label);
        self.reindex_all();
        Ok((window, removed_slots))
    }

    /// Applies a change set to a window.
    pub fn update_window(&mut self, index: usize, changes: &WindowChanges) -> Result<(), MatrixError> {
        check_index(Axis::Window, index, self.num_windows())?;
        changes.apply_to(&mut self.windows[index]);
        Ok(())
    }

    // ── Slots ───────────────────────────────────────

    /// Enables/disables a slot and sets its cap.
    ///
    /// Enabling without an explicit cap applies the activity's default
    /// slot cap. Existing RSVPs are kept either way.
    pub fn set_slot(&mut self, coord: SlotCoord, changes: &SlotChanges) -> Result<(), MatrixError> {
        let default_cap = self
            .slot_activity(coord)?
            .slot_volunteer_cap_default;
        if let Some(cap) = changes.max_slot_volunteers {
            check_cap(cap)?;
        }
        let slot = self.slot_mut(coord)?;
        match changes.enabled {
            Some(true) if !slot.enabled => {
                slot.enabled = true;
                slot.volunteer_cap = changes.max_slot_volunteers.unwrap_or(default_cap);
            }
            Some(enabled) => {
                slot.enabled = enabled;
                if let Some(cap) = changes.max_slot_volunteers {
                    slot.volunteer_cap = cap;
                }
            }
            None => {
                if let Some(cap) = changes.max_slot_volunteers {
                    slot.volunteer_cap = cap;
                }
            }
        }
        Ok(())
    }

    /// Applies a booking transition for the volunteer at `position`.
    ///
    /// Does not evaluate capacity; see [`crate::capacity::book`] for the
    /// checked entry point.
    pub fn apply_booking(
        &mut self,
        position: usize,
        coord: SlotCoord,
        transition: BookingTransition,
    ) -> Result<(), MatrixError> {
        check_index(Axis::Volunteer, position, self.volunteers.len())?;
        let key = self.volunteers[position].key(position);
        let slot = self.slot_mut(coord)?;
        match transition {
            BookingTransition::Reserve => slot.insert_rsvp(key),
            BookingTransition::Release => slot.remove_rsvp(&key),
        };
        let held = &mut self.volunteers[position].rsvps;
        match transition {
            BookingTransition::Reserve => held.insert(coord),
            BookingTransition::Release => held.remove(&coord),
        };
        log::debug!("{transition:?} slot {coord} for volunteer {position}");
        Ok(())
    }

    // ── Details ─────────────────────────────────────

    /// Appends a registration detail. Returns its index.
    pub fn add_detail(&mut self, mut detail: Detail) -> usize {
        let index = self.details.len();
        detail.index = index;
        log::debug!("add detail '{}' at {index}", detail.label);
        self.details.push(detail);
        index
    }

    /// Moves detail `from` toward `to`.
    pub fn move_detail(&mut self, from: usize, to: usize) -> Result<(), MatrixError> {
        check_move(Axis::Detail, from, to, self.details.len())?;
        if from == to {
            return Ok(());
        }
        move_item(&mut self.details, from, to);
        reindex(&mut self.details);
        Ok(())
    }

    /// Removes detail `target`.
    pub fn remove_detail(&mut self, target: usize) -> Result<Detail, MatrixError> {
        check_index(Axis::Detail, target, self.details.len())?;
        let detail = self.details.remove(target);
        reindex(&mut self.details);
        Ok(detail)
    }

    /// Applies a change set to a detail.
    pub fn update_detail(&mut self, index: usize, changes: &DetailChanges) -> Result<(), MatrixError> {
        check_index(Axis::Detail, index, self.details.len())?;
        changes.apply_to(&mut self.details[index]);
        Ok(())
    }

    // ── Volunteers ──────────────────────────────────

    /// Adds a volunteer to the roster and returns its position.
    ///
    /// The volunteer's RSVP set is derived from the slots, so any
    /// pre-filled set is discarded.
    pub fn add_volunteer(&mut self, mut volunteer: Volunteer) -> usize {
        volunteer.rsvps.clear();
        let position = self.volunteers.len();
        self.volunteers.push(volunteer);
        self.derive_volunteer_rsvps();
        position
    }

    /// Records the service id of an unconfirmed volunteer, re-keying every
    /// RSVP held under its positional key.
    pub fn confirm_volunteer(&mut self, position: usize, id: impl Into<String>) -> Result<(), MatrixError> {
        check_index(Axis::Volunteer, position, self.volunteers.len())?;
        let old = self.volunteers[position].key(position);
        let id = id.into();
        self.rekey(&old, &VolunteerKey::Id(id.clone()));
        self.volunteers[position].id = Some(id);
        self.derive_volunteer_rsvps();
        Ok(())
    }

    /// Removes a volunteer, releasing every slot it holds.
    pub fn remove_volunteer(&mut self, position: usize) -> Result<Volunteer, MatrixError> {
        check_index(Axis::Volunteer, position, self.volunteers.len())?;
        let key = self.volunteers[position].key(position);
        for slot in self.slots.iter_mut() {
            slot.remove_rsvp(&key);
        }
        let mut volunteer = self.volunteers.remove(position);
        volunteer.rsvps.clear();

        // Later unconfirmed volunteers shift down one position.
        for pos in position..self.volunteers.len() {
            if !self.volunteers[pos].is_confirmed() {
                self.rekey(&VolunteerKey::Pending(pos + 1), &VolunteerKey::Pending(pos));
            }
        }
        self.derive_volunteer_rsvps();
        Ok(volunteer)
    }

    /// Applies a change set to a volunteer.
    pub fn update_volunteer(
        &mut self,
        position: usize,
        changes: &VolunteerChanges,
    ) -> Result<(), MatrixError> {
        check_index(Axis::Volunteer, position, self.volunteers.len())?;
        changes.apply_to(&mut self.volunteers[position]);
        Ok(())
    }

    /// Records the service id of a newly created entity.
    ///
    /// A volunteer is confirmed through [`Self::confirm_volunteer`] so its
    /// RSVPs are re-keyed.
    pub(crate) fn assign_id(&mut self, axis: Axis, index: usize, id: String) -> Result<(), MatrixError> {
        match axis {
            Axis::Activity => {
                check_index(axis, index, self.activities.len())?;
                self.activities[index].id = Some(id);
            }
            Axis::Window => {
                check_index(axis, index, self.windows.len())?;
                self.windows[index].id = Some(id);
            }
            Axis::Detail => {
                check_index(axis, index, self.details.len())?;
                self.details[index].id = Some(id);
            }
            Axis::Volunteer => return self.confirm_volunteer(index, id),
        }
        Ok(())
    }

    /// Load-order keys of the activities or details, in local order.
    /// Other axes have none.
    pub(crate) fn order_keys(&self, axis: Axis) -> Vec<OrderKey<'_>> {
        match axis {
            Axis::Activity => self
                .activities
                .iter()
                .map(|a| OrderKey::new(a.priority, &a.label))
                .collect(),
            Axis::Detail => self
                .details
                .iter()
                .map(|d| OrderKey::new(d.priority, &d.label))
                .collect(),
            Axis::Window | Axis::Volunteer => Vec::new(),
        }
    }

    pub(crate) fn set_priority(
        &mut self,
        axis: Axis,
        index: usize,
        priority: i32,
    ) -> Result<(), MatrixError> {
        match axis {
            Axis::Activity => self.update_activity(index, &ActivityChanges::priority(priority)),
            Axis::Detail => self.update_detail(index, &DetailChanges::priority(priority)),
            Axis::Window | Axis::Volunteer => Ok(()),
        }
    }

    // ── Internals ───────────────────────────────────

    fn slot_activity(&self, coord: SlotCoord) -> Result<&Activity, MatrixError> {
        check_index(Axis::Window, coord.window_index, self.num_windows())?;
        self.activities.get(coord.activity_index).ok_or_else(|| {
            MatrixError::out_of_bounds(Axis::Activity, coord.activity_index, self.num_activities())
        })
    }

    pub(crate) fn slot_mut(&mut self, coord: SlotCoord) -> Result<&mut Slot, MatrixError> {
        check_index(Axis::Activity, coord.activity_index, self.num_activities())?;
        check_index(Axis::Window, coord.window_index, self.num_windows())?;
        let len = self.num_windows();
        self.slots
            .get_mut(coord)
            .ok_or(MatrixError::out_of_bounds(Axis::Window, coord.window_index, len))
    }

    fn rekey(&mut self, from: &VolunteerKey, to: &VolunteerKey) {
        for slot in self.slots.iter_mut() {
            if slot.rsvps.remove(from) {
                slot.rsvps.insert(to.clone());
            }
        }
    }

    fn reindex_all(&mut self) {
        reindex(&mut self.activities);
        reindex(&mut self.windows);
        reindex(&mut self.details);
        self.derive_volunteer_rsvps();
    }

    /// Rebuilds every volunteer's RSVP set from the slots.
    fn derive_volunteer_rsvps(&mut self) {
        let positions: HashMap<VolunteerKey, usize> = self
            .volunteers
            .iter()
            .enumerate()
            .map(|(pos, v)| (v.key(pos), pos))
            .collect();
        for v in &mut self.volunteers {
            v.rsvps.clear();
        }
        for slot in self.slots.iter() {
            for key in &slot.rsvps {
                if let Some(&pos) = positions.get(key) {
                    self.volunteers[pos].rsvps.insert(slot.coord());
                }
            }
        }
    }
}

fn check_cap(cap: u32) -> Result<(), MatrixError> {
    if cap > MAX_VOLUNTEER_CAP {
        Err(MatrixError::CapOutOfRange {
            cap,
            max: MAX_VOLUNTEER_CAP,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_store;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn empty_slots(n: usize) -> Vec<Slot> {
        (0..n).map(|_| Slot::enabled(0)).collect()
    }

    /// `activities × windows` store with labels A0.., W0..
    fn sample_store(activities: usize, windows: usize) -> MatrixStore {
        let mut store = MatrixStore::new();
        for w in 0..windows {
            store
                .add_window(Window::new(format!("W{w}"), w as i64 * 100, w as i64 * 100 + 100), vec![])
                .unwrap();
        }
        for a in 0..activities {
            store
                .add_activity(Activity::new(format!("A{a}")), empty_slots(windows))
                .unwrap();
        }
        store
    }

    fn labels(store: &MatrixStore) -> Vec<&str> {
        store.activities().iter().map(|a| a.label.as_str()).collect()
    }

    fn window_labels(store: &MatrixStore) -> Vec<&str> {
        store.windows().iter().map(|w| w.label.as_str()).collect()
    }

    fn assert_consistent(store: &MatrixStore) {
        if let Err(errors) = validate_store(store) {
            panic!("store inconsistent: {errors:?}");
        }
    }

    #[test]
    fn test_add_activity_appends_column() {
        let mut store = sample_store(2, 3);
        let idx = store
            .add_activity(Activity::new("New"), empty_slots(3))
            .unwrap();
        assert_eq!(idx, 2);
        assert_eq!(store.slots().len(), 9);
        assert_eq!(store.slot(SlotCoord::new(2, 1)).unwrap().coord(), SlotCoord::new(2, 1));
        assert_consistent(&store);
    }

    #[test]
    fn test_add_activity_shape_mismatch() {
        let mut store = sample_store(1, 3);
        let err = store
            .add_activity(Activity::new("Bad"), empty_slots(2))
            .unwrap_err();
        assert_eq!(
            err,
            MatrixError::ShapeMismatch {
                axis: Axis::Activity,
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(store.num_activities(), 1);
        assert_consistent(&store);
    }

    #[test]
    fn test_add_window_shape_mismatch() {
        let mut store = sample_store(2, 1);
        let before = store.clone();
        assert!(matches!(
            store.add_window(Window::new("W", 0, 1), empty_slots(3)),
            Err(MatrixError::ShapeMismatch { .. })
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_cap_out_of_range_rejected() {
        let mut store = sample_store(0, 1);
        let err = store
            .add_activity(Activity::new("Huge").with_activity_cap(256), empty_slots(1))
            .unwrap_err();
        assert_eq!(err, MatrixError::CapOutOfRange { cap: 256, max: 255 });
        assert_eq!(store.num_activities(), 0);
    }

    #[test]
    fn test_add_then_remove_activity_round_trip() {
        let mut store = sample_store(3, 2);
        store.add_volunteer(Volunteer::new("Ada"));
        store
            .apply_booking(0, SlotCoord::new(1, 1), BookingTransition::Reserve)
            .unwrap();
        let before = store.clone();

        let idx = store
            .add_activity(Activity::new("Temp"), empty_slots(2))
            .unwrap();
        store.remove_activity(idx).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_then_remove_window_round_trip() {
        let mut store = sample_store(3, 2);
        let before = store.clone();
        let idx = store
            .add_window(Window::new("Temp", 0, 1), empty_slots(3))
            .unwrap();
        store.remove_window(idx).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_move_activity_semantics() {
        let mut store = sample_store(4, 2);
        store.move_activity(0, 3).unwrap();
        assert_eq!(labels(&store), vec!["A1", "A2", "A0", "A3"]);
        assert_consistent(&store);

        store.move_activity(3, 0).unwrap();
        assert_eq!(labels(&store), vec!["A3", "A1", "A2", "A0"]);
        assert_consistent(&store);

        store.move_activity(0, 4).unwrap();
        assert_eq!(labels(&store), vec!["A1", "A2", "A0", "A3"]);
    }

    #[test]
    fn test_move_carries_slot_contents() {
        let mut store = sample_store(3, 2);
        store
            .set_slot(SlotCoord::new(0, 1), &SlotChanges::disable())
            .unwrap();
        store.move_activity(0, 3).unwrap();
        assert!(!store.slot(SlotCoord::new(2, 1)).unwrap().enabled);
        assert!(store.slot(SlotCoord::new(0, 1)).unwrap().enabled);

        store.move_window(1, 0).unwrap();
        assert!(!store.slot(SlotCoord::new(2, 0)).unwrap().enabled);
        assert_eq!(window_labels(&store), vec!["W1", "W0"]);
        assert_consistent(&store);
    }

    #[test]
    fn test_moves_to_self_are_noops() {
        let mut store = sample_store(3, 3);
        let before = store.clone();
        store.move_activity(1, 1).unwrap();
        store.move_window(2, 2).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_move_out_of_bounds() {
        let mut store = sample_store(2, 2);
        let before = store.clone();
        assert_eq!(
            store.move_activity(2, 0),
            Err(MatrixError::out_of_bounds(Axis::Activity, 2, 2))
        );
        assert_eq!(
            store.move_window(0, 3),
            Err(MatrixError::out_of_bounds(Axis::Window, 3, 2))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_activity_drops_column() {
        let mut store = sample_store(3, 2);
        let (removed, slots) = store.remove_activity(1).unwrap();
        assert_eq!(removed.label, "A1");
        assert_eq!(slots.len(), 2);
        assert_eq!(labels(&store), vec!["A0", "A2"]);
        assert_eq!(store.activity(1).unwrap().index, 1);
        assert_consistent(&store);

        assert!(store.remove_activity(2).is_err());
    }

    #[test]
    fn test_remove_window_drops_block() {
        let mut store = sample_store(2, 3);
        let (removed, slots) = store.remove_window(0).unwrap();
        assert_eq!(removed.label, "W0");
        assert_eq!(slots.len(), 2);
        assert_eq!(window_labels(&store), vec!["W1", "W2"]);
        assert_consistent(&store);
    }

    #[test]
    fn test_remove_last_activity_keeps_windows() {
        let mut store = sample_store(1, 2);
        store.remove_activity(0).unwrap();
        assert_eq!(store.num_windows(), 2);
        assert!(store.slots().is_empty());
        store
            .add_activity(Activity::new("Back"), empty_slots(2))
            .unwrap();
        assert_consistent(&store);
    }

    #[test]
    fn test_details_keep_dense_indices() {
        use crate::models::DetailType;
        let mut store = MatrixStore::new();
        store.add_detail(Detail::new(DetailType::String, "Name"));
        store.add_detail(Detail::new(DetailType::Email, "Email"));
        store.add_detail(Detail::new(DetailType::Phone, "Phone"));

        store.move_detail(2, 0).unwrap();
        let order: Vec<_> = store.details().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(order, vec!["Phone", "Name", "Email"]);

        store.remove_detail(1).unwrap();
        assert_eq!(store.detail(1).unwrap().index, 1);
        assert!(store.remove_detail(2).is_err());
        assert_consistent(&store);
    }

    #[test]
    fn test_set_slot_uses_activity_default_cap() {
        let mut store = MatrixStore::new();
        store.add_window(Window::new("W", 0, 1), vec![]).unwrap();
        store
            .add_activity(Activity::new("A").with_slot_cap_default(4), vec![Slot::new()])
            .unwrap();
        let coord = SlotCoord::new(0, 0);

        store.set_slot(coord, &SlotChanges::enable(None)).unwrap();
        assert_eq!(store.slot(coord).unwrap().volunteer_cap, 4);

        store.set_slot(coord, &SlotChanges::enable(Some(7))).unwrap();
        assert_eq!(store.slot(coord).unwrap().volunteer_cap, 7);

        store.set_slot(coord, &SlotChanges::disable()).unwrap();
        assert!(!store.slot(coord).unwrap().enabled);
        assert!(store
            .set_slot(SlotCoord::new(1, 0), &SlotChanges::disable())
            .is_err());
    }

    #[test]
    fn test_volunteer_rsvps_follow_moves() {
        let mut store = sample_store(3, 2);
        let v = store.add_volunteer(Volunteer::new("Ada"));
        store
            .apply_booking(v, SlotCoord::new(0, 1), BookingTransition::Reserve)
            .unwrap();

        store.move_activity(0, 3).unwrap();
        assert!(store.volunteer(v).unwrap().has_rsvp(SlotCoord::new(2, 1)));

        store.move_window(1, 0).unwrap();
        assert!(store.volunteer(v).unwrap().has_rsvp(SlotCoord::new(2, 0)));

        store.remove_activity(2).unwrap();
        assert!(store.volunteer(v).unwrap().rsvps.is_empty());
        assert_consistent(&store);
    }

    #[test]
    fn test_confirm_volunteer_rekeys() {
        let mut store = sample_store(1, 1);
        let v = store.add_volunteer(Volunteer::new("Ada"));
        let coord = SlotCoord::new(0, 0);
        store.apply_booking(v, coord, BookingTransition::Reserve).unwrap();

        store.confirm_volunteer(v, "v-1").unwrap();
        let slot = store.slot(coord).unwrap();
        assert!(slot.has_rsvp(&VolunteerKey::Id("v-1".into())));
        assert!(!slot.has_rsvp(&VolunteerKey::Pending(0)));
        assert!(store.volunteer(v).unwrap().has_rsvp(coord));
        assert_consistent(&store);
    }

    #[test]
    fn test_remove_volunteer_releases_and_shifts() {
        let mut store = sample_store(2, 1);
        let a = store.add_volunteer(Volunteer::new("Ada"));
        let b = store.add_volunteer(Volunteer::new("Bob"));
        store
            .apply_booking(a, SlotCoord::new(0, 0), BookingTransition::Reserve)
            .unwrap();
        store
            .apply_booking(b, SlotCoord::new(1, 0), BookingTransition::Reserve)
            .unwrap();

        store.remove_volunteer(a).unwrap();
        assert_eq!(store.slot(SlotCoord::new(0, 0)).unwrap().rsvp_count, 0);
        let slot = store.slot(SlotCoord::new(1, 0)).unwrap();
        assert!(slot.has_rsvp(&VolunteerKey::Pending(0)));
        assert!(store.volunteer(0).unwrap().has_rsvp(SlotCoord::new(1, 0)));
        assert_consistent(&store);
    }

    #[test]
    fn test_volunteer_position_lookup() {
        let mut store = MatrixStore::new();
        store.add_volunteer(Volunteer::new("Ada").with_id("v-1"));
        store.add_volunteer(Volunteer::new("Bob"));

        assert_eq!(store.volunteer_position(&VolunteerKey::Id("v-1".into())), Some(0));
        assert_eq!(store.volunteer_position(&VolunteerKey::Pending(1)), Some(1));
        assert_eq!(store.volunteer_position(&VolunteerKey::Pending(0)), None);
    }

    #[test]
    fn test_random_mutations_preserve_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut store = sample_store(2, 2);
        store.add_volunteer(Volunteer::new("Ada"));
        store.add_volunteer(Volunteer::new("Bob").with_id("v-bob"));

        for step in 0..500 {
            let a = store.num_activities();
            let w = store.num_windows();
            match rng.random_range(0..8) {
                0 => {
                    store
                        .add_activity(Activity::new(format!("A{step}")), empty_slots(w))
                        .unwrap();
                }
                1 => {
                    store
                        .add_window(Window::new(format!("W{step}"), 0, 1), empty_slots(a))
                        .unwrap();
                }
                2 if a > 0 => {
                    let from = rng.random_range(0..a);
                    let to = rng.random_range(0..=a);
                    store.move_activity(from, to).unwrap();
                }
                3 if w > 0 => {
                    let from = rng.random_range(0..w);
                    let to = rng.random_range(0..=w);
                    store.move_window(from, to).unwrap();
                }
                4 if a > 3 => {
                    store.remove_activity(rng.random_range(0..a)).unwrap();
                }
                5 if w > 3 => {
                    store.remove_window(rng.random_range(0..w)).unwrap();
                }
                6 | 7 if a > 0 && w > 0 => {
                    let coord = SlotCoord::new(rng.random_range(0..a), rng.random_range(0..w));
                    let who = rng.random_range(0..2);
                    let transition = if store.volunteer(who).unwrap().has_rsvp(coord) {
                        BookingTransition::Release
                    } else {
                        BookingTransition::Reserve
                    };
                    store.apply_booking(who, coord, transition).unwrap();
                }
                _ => {}
            }
            assert_consistent(&store);
        }
    }
}
