//! Activity (matrix column) model.
//!
//! An activity is a bookable kind of task: "set up chairs", "run the
//! registration desk". Each activity owns one slot per window and may
//! limit how many volunteers it accepts across all of those slots.
//!
//! # Caps
//! Every cap uses `0` to mean "unlimited". Non-zero caps are bounded by
//! [`MAX_VOLUNTEER_CAP`](crate::models::MAX_VOLUNTEER_CAP).

use serde::{Deserialize, Serialize};

/// A labeled column of the sign-up matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Service-assigned identifier. `None` until the event service confirms it.
    pub id: Option<String>,
    /// Short label shown in the column header.
    pub label: String,
    /// Longer free-form description.
    pub description: String,
    /// Maximum RSVPs across every slot of this activity (0 = unlimited).
    pub activity_volunteer_cap: u32,
    /// Cap applied to a slot of this activity when it is enabled without
    /// an explicit cap (0 = unlimited).
    pub slot_volunteer_cap_default: u32,
    /// Ascending display rank used by the event service.
    pub priority: i32,
    /// Current column position (0-based, dense). Maintained by the store.
    pub index: usize,
}

impl Activity {
    /// Creates an unconfirmed activity with no caps.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            description: String::new(),
            activity_volunteer_cap: 0,
            slot_volunteer_cap_default: 0,
            priority: 0,
            index: 0,
        }
    }

    /// Sets the service-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the activity-wide volunteer cap.
    pub fn with_activity_cap(mut self, cap: u32) -> Self {
        self.activity_volunteer_cap = cap;
        self
    }

    /// Sets the default slot cap.
    pub fn with_slot_cap_default(mut self, cap: u32) -> Self {
        self.slot_volunteer_cap_default = cap;
        self
    }

    /// Sets the display priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether the activity limits its total RSVPs.
    #[inline]
    pub fn is_capped(&self) -> bool {
        self.activity_volunteer_cap != 0
    }

    /// Whether the event service has confirmed this activity.
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }
}
