//! Slot model: one activity/window intersection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::VolunteerKey;

/// Column/row address of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCoord {
    /// Column (activity) position.
    pub activity_index: usize,
    /// Row (window) position.
    pub window_index: usize,
}

impl SlotCoord {
    /// Creates a coordinate.
    pub fn new(activity_index: usize, window_index: usize) -> Self {
        Self {
            activity_index,
            window_index,
        }
    }
}

impl fmt::Display for SlotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.activity_index, self.window_index)
    }
}

/// The bookable cell at one activity/window intersection.
///
/// `activity_index` and `window_index` are position fields owned by the
/// store; they are rewritten after every structural mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Service-side identifier, if any.
    pub id: Option<String>,
    /// Column position.
    pub activity_index: usize,
    /// Row position.
    pub window_index: usize,
    /// Whether volunteers may book this slot at all.
    pub enabled: bool,
    /// Maximum RSVPs for this slot (0 = unlimited).
    pub volunteer_cap: u32,
    /// Number of RSVPs currently held.
    pub rsvp_count: u32,
    /// Volunteers holding an RSVP.
    pub rsvps: BTreeSet<VolunteerKey>,
}

impl Slot {
    /// Creates a disabled, empty, uncapped slot.
    ///
    /// Position fields are assigned when the slot is inserted into a store.
    pub fn new() -> Self {
        Self {
            id: None,
            activity_index: 0,
            window_index: 0,
            enabled: false,
            volunteer_cap: 0,
            rsvp_count: 0,
            rsvps: BTreeSet::new(),
        }
    }

    /// Creates an enabled, empty slot with the given cap.
    pub fn enabled(volunteer_cap: u32) -> Self {
        Self::new().with_enabled(true).with_cap(volunteer_cap)
    }

    /// Sets the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the volunteer cap.
    pub fn with_cap(mut self, volunteer_cap: u32) -> Self {
        self.volunteer_cap = volunteer_cap;
        self
    }

    /// Current address.
    #[inline]
    pub fn coord(&self) -> SlotCoord {
        SlotCoord::new(self.activity_index, self.window_index)
    }

    /// Whether `key` holds an RSVP here.
    pub fn has_rsvp(&self, key: &VolunteerKey) -> bool {
        self.rsvps.contains(key)
    }

    /// Records an RSVP. Returns `false` if it was already present.
    pub(crate) fn insert_rsvp(&mut self, key: VolunteerKey) -> bool {
        let added = self.rsvps.insert(key);
        if added {
            self.rsvp_count += 1;
        }
        added
    }

    /// Drops an RSVP. Returns `false` if it was not present.
    pub(crate) fn remove_rsvp(&mut self, key: &VolunteerKey) -> bool {
        let removed = self.rsvps.remove(key);
        if removed {
            self.rsvp_count = self.rsvp_count.saturating_sub(1);
        }
        removed
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}
