//! Event snapshots: the event service's full-event payload, and the
//! reconstruction of a [`MatrixStore`] from it.
//!
//! # Ordering
//! The service does not send positions. They are rebuilt on load:
//! - activities by `priority`, then label (case-insensitive)
//! - windows by begin time, then end time (open-ended last)
//! - details by `priority`, then label (case-insensitive)
//!
//! # Slots
//! Activities carry the slots that exist server-side. Any
//! `(activity, window)` pair with no slot record becomes a disabled,
//! empty slot capped at the activity's default.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::MatrixStore;
use crate::models::{Activity, Detail, DetailType, DetailValue, Slot, Volunteer, VolunteerKey, Window};
use crate::validation::{validate_store, ValidationError};

/// A whole event as returned by the event service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: String,
    /// User id of the event's administrator.
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
    #[serde(default)]
    pub details: Vec<DetailRecord>,
    #[serde(default)]
    pub volunteers: Vec<VolunteerRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub max_activity_volunteers: u32,
    #[serde(default)]
    pub max_slot_volunteers_default: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    /// Window id.
    pub window: String,
    #[serde(default)]
    pub max_slot_volunteers: u32,
    /// Volunteer ids holding an RSVP.
    #[serde(default)]
    pub rsvps: Vec<String>,
    #[serde(default)]
    pub rsvp_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Epoch ms.
    pub begin: i64,
    #[serde(default)]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub detail_type: DetailType,
    pub label: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub details: Vec<VolunteerDetailRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerDetailRecord {
    /// Detail id.
    pub detail: String,
    pub value: String,
}

pub(super) fn label_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl MatrixStore {
    /// Rebuilds a store from a service snapshot.
    ///
    /// Every entity goes through the regular mutators. The result is
    /// checked with [`validate_store`]; duplicate ids or inconsistent
    /// RSVP counts in the payload are reported as validation errors.
    pub fn from_snapshot(snapshot: &EventSnapshot) -> Result<Self, Vec<ValidationError>> {
        let mut store = Self::new();
        let mut errors = Vec::new();

        let mut windows: Vec<Window> = snapshot
            .windows
            .iter()
            .map(|w| Window {
                id: Some(w.id.clone()),
                label: w.label.clone(),
                start_ms: w.begin,
                end_ms: w.end,
                index: 0,
            })
            .collect();
        windows.sort_by(|a, b| a.temporal_cmp(b));

        let window_pos: HashMap<String, usize> = windows
            .iter()
            .enumerate()
            .filter_map(|(pos, w)| w.id.clone().map(|id| (id, pos)))
            .collect();
        let num_windows = windows.len();
        for window in windows {
            // Columns are still empty, so every row takes zero slots.
            if let Err(e) = store.add_window(window, Vec::new()) {
                errors.push(ValidationError::from_matrix(&e));
            }
        }

        let mut activities: Vec<&ActivityRecord> = snapshot.activities.iter().collect();
        activities.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| label_cmp(&a.short_description, &b.short_description))
        });

        for record in activities {
            let activity = Activity {
                id: Some(record.id.clone()),
                label: record.short_description.clone(),
                description: record.long_description.clone(),
                activity_volunteer_cap: record.max_activity_volunteers,
                slot_volunteer_cap_default: record.max_slot_volunteers_default,
                priority: record.priority,
                index: 0,
            };
            let mut slots: Vec<Slot> = (0..num_windows)
                .map(|_| Slot::new().with_cap(record.max_slot_volunteers_default))
                .collect();
            for slot_record in &record.slots {
                match window_pos.get(slot_record.window.as_str()) {
                    Some(&w) => slots[w] = slot_from_record(slot_record),
                    None => log::warn!(
                        "snapshot {}: activity {} has a slot in unknown window {}",
                        snapshot.id,
                        record.id,
                        slot_record.window
                    ),
                }
            }
            if let Err(e) = store.add_activity(activity, slots) {
                errors.push(ValidationError::from_matrix(&e));
            }
        }

        let mut details: Vec<&DetailRecord> = snapshot.details.iter().collect();
        details.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| label_cmp(&a.label, &b.label))
        });
        for record in details {
            let mut detail = Detail::new(record.detail_type, record.label.clone())
                .with_id(record.id.clone())
                .with_hint(record.hint.clone())
                .with_priority(record.priority);
            detail.required = record.required;
            store.add_detail(detail);
        }

        for record in &snapshot.volunteers {
            let mut volunteer = Volunteer::new(record.name.clone()).with_id(record.id.clone());
            volunteer.details = record
                .details
                .iter()
                .map(|d| DetailValue {
                    detail_id: d.detail.clone(),
                    value: d.value.clone(),
                })
                .collect();
            store.add_volunteer(volunteer);
        }

        if let Err(mut found) = validate_store(&store) {
            errors.append(&mut found);
        }
        if errors.is_empty() {
            log::debug!(
                "loaded event {}: {} activities x {} windows",
                snapshot.id,
                store.num_activities(),
                store.num_windows()
            );
            Ok(store)
        } else {
            Err(errors)
        }
    }
}

fn slot_from_record(record: &SlotRecord) -> Slot {
    let mut slot = Slot::enabled(record.max_slot_volunteers);
    slot.rsvps = record
        .rsvps
        .iter()
        .map(|id| VolunteerKey::Id(id.clone()))
        .collect();
    slot.rsvp_count = record
        .rsvp_count
        .unwrap_or(slot.rsvps.len() as u32);
    slot
}
