//! Partial-update change sets.
//!
//! Each field is `None` when unchanged. The same structs are applied to
//! the local store and sent to the event service, where `None` fields
//! are omitted from the payload.

use serde::{Deserialize, Serialize};

use super::{Activity, Detail, DetailType, DetailValue, Volunteer, Window};

/// Changes to an activity's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_activity_volunteers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_slot_volunteers_default: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl ActivityChanges {
    /// Every field of `activity`, as sent when creating it.
    pub fn full(activity: &Activity) -> Self {
        Self {
            short_description: Some(activity.label.clone()),
            long_description: Some(activity.description.clone()),
            max_activity_volunteers: Some(activity.activity_volunteer_cap),
            max_slot_volunteers_default: Some(activity.slot_volunteer_cap_default),
            priority: Some(activity.priority),
        }
    }

    /// Only a priority change.
    pub fn priority(priority: i32) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    /// Caps this change set would assign.
    pub(crate) fn caps(&self) -> impl Iterator<Item = u32> {
        self.max_activity_volunteers
            .into_iter()
            .chain(self.max_slot_volunteers_default)
    }

    pub(crate) fn apply_to(&self, activity: &mut Activity) {
        if let Some(label) = &self.short_description {
            activity.label = label.clone();
        }
        if let Some(description) = &self.long_description {
            activity.description = description.clone();
        }
        if let Some(cap) = self.max_activity_volunteers {
            activity.activity_volunteer_cap = cap;
        }
        if let Some(cap) = self.max_slot_volunteers_default {
            activity.slot_volunteer_cap_default = cap;
        }
        if let Some(priority) = self.priority {
            activity.priority = priority;
        }
    }
}

/// Changes to a window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<i64>,
    /// `Some(None)` clears the end time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Option<i64>>,
}

impl WindowChanges {
    /// Every field of `window`.
    pub fn full(window: &Window) -> Self {
        Self {
            label: Some(window.label.clone()),
            begin: Some(window.start_ms),
            end: Some(window.end_ms),
        }
    }

    pub(crate) fn apply_to(&self, window: &mut Window) {
        if let Some(label) = &self.label {
            window.label = label.clone();
        }
        if let Some(begin) = self.begin {
            window.start_ms = begin;
        }
        if let Some(end) = self.end {
            window.end_ms = end;
        }
    }
}

/// Changes to a registration detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailChanges {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<DetailType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl DetailChanges {
    /// Every field of `detail`.
    pub fn full(detail: &Detail) -> Self {
        Self {
            detail_type: Some(detail.detail_type),
            label: Some(detail.label.clone()),
            hint: Some(detail.hint.clone()),
            required: Some(detail.required),
            priority: Some(detail.priority),
        }
    }

    /// Only a priority change.
    pub fn priority(priority: i32) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub(crate) fn apply_to(&self, detail: &mut Detail) {
        if let Some(detail_type) = self.detail_type {
            detail.detail_type = detail_type;
        }
        if let Some(label) = &self.label {
            detail.label = label.clone();
        }
        if let Some(hint) = &self.hint {
            detail.hint = hint.clone();
        }
        if let Some(required) = self.required {
            detail.required = required;
        }
        if let Some(priority) = self.priority {
            detail.priority = priority;
        }
    }
}

/// Changes to a volunteer's registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<DetailValue>>,
}

impl VolunteerChanges {
    /// Every field of `volunteer`.
    pub fn full(volunteer: &Volunteer) -> Self {
        Self {
            name: Some(volunteer.name.clone()),
            details: Some(volunteer.details.clone()),
        }
    }

    pub(crate) fn apply_to(&self, volunteer: &mut Volunteer) {
        if let Some(name) = &self.name {
            volunteer.name = name.clone();
        }
        if let Some(details) = &self.details {
            volunteer.details = details.clone();
        }
    }
}

/// Changes to one slot's availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_slot_volunteers: Option<u32>,
}

impl SlotChanges {
    /// Enables a slot, optionally with an explicit cap.
    pub fn enable(cap: Option<u32>) -> Self {
        Self {
            enabled: Some(true),
            max_slot_volunteers: cap,
        }
    }

    /// Disables a slot.
    pub fn disable() -> Self {
        Self {
            enabled: Some(false),
            max_slot_volunteers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changed_fields_serialize() {
        let json = serde_json::to_value(ActivityChanges::priority(4)).unwrap();
        assert_eq!(json, serde_json::json!({ "priority": 4 }));

        let json = serde_json::to_value(SlotChanges::disable()).unwrap();
        assert_eq!(json, serde_json::json!({ "enabled": false }));
    }

    #[test]
    fn test_apply_activity_changes() {
        let mut act = Activity::new("Old").with_activity_cap(3);
        ActivityChanges {
            short_description: Some("New".into()),
            max_slot_volunteers_default: Some(2),
            ..Default::default()
        }
        .apply_to(&mut act);

        assert_eq!(act.label, "New");
        assert_eq!(act.activity_volunteer_cap, 3);
        assert_eq!(act.slot_volunteer_cap_default, 2);
    }

    #[test]
    fn test_window_end_can_be_cleared() {
        let mut w = Window::new("Shift", 0, 100);
        WindowChanges {
            end: Some(None),
            ..Default::default()
        }
        .apply_to(&mut w);
        assert_eq!(w.end_ms, None);
    }
}
