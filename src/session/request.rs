//! Logical requests to the event service.
//!
//! Entities are addressed by service id. Change sets carry only the
//! fields that changed; unchanged fields are left out of the payload.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityChanges, DetailChanges, SlotChanges, VolunteerChanges, WindowChanges};

/// A slot addressed by service ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub activity: String,
    pub window: String,
}

/// One RSVP: a volunteer holding a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RsvpKey {
    pub activity: String,
    pub window: String,
    pub volunteer: String,
}

/// A mutation sent to the event service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    CreateActivity { changes: ActivityChanges },
    UpdateActivity { id: String, changes: ActivityChanges },
    DeleteActivity { id: String },

    CreateWindow { changes: WindowChanges },
    UpdateWindow { id: String, changes: WindowChanges },
    DeleteWindow { id: String },

    CreateDetail { changes: DetailChanges },
    UpdateDetail { id: String, changes: DetailChanges },
    DeleteDetail { id: String },

    /// Registers a volunteer together with the slots it already holds.
    CreateVolunteer {
        changes: VolunteerChanges,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rsvps: Vec<SlotRef>,
    },
    UpdateVolunteer { id: String, changes: VolunteerChanges },
    DeleteVolunteer { id: String },

    SetSlot { slot: SlotRef, changes: SlotChanges },
    UnsetSlot(SlotRef),

    CreateRsvp(RsvpKey),
    DeleteRsvp(RsvpKey),
}

impl Request {
    /// Operation name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateActivity { .. } => "createActivity",
            Self::UpdateActivity { .. } => "updateActivity",
            Self::DeleteActivity { .. } => "deleteActivity",
            Self::CreateWindow { .. } => "createWindow",
            Self::UpdateWindow { .. } => "updateWindow",
            Self::DeleteWindow { .. } => "deleteWindow",
            Self::CreateDetail { .. } => "createDetail",
            Self::UpdateDetail { .. } => "updateDetail",
            Self::DeleteDetail { .. } => "deleteDetail",
            Self::CreateVolunteer { .. } => "createVolunteer",
            Self::UpdateVolunteer { .. } => "updateVolunteer",
            Self::DeleteVolunteer { .. } => "deleteVolunteer",
            Self::SetSlot { .. } => "setSlot",
            Self::UnsetSlot(_) => "unsetSlot",
            Self::CreateRsvp(_) => "createRsvp",
            Self::DeleteRsvp(_) => "deleteRsvp",
        }
    }
}

/// Successful reply to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Id of the created entity, when the request created one.
    #[serde(default)]
    pub id: Option<String>,
}

impl Ack {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_carries_only_changes() {
        let req = Request::UpdateActivity {
            id: "act-1".into(),
            changes: ActivityChanges::priority(2),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "op": "updateActivity", "id": "act-1", "changes": { "priority": 2 } })
        );
        assert_eq!(req.name(), "updateActivity");
    }

    #[test]
    fn test_rsvp_request_shape() {
        let req = Request::CreateRsvp(RsvpKey {
            activity: "a".into(),
            window: "w".into(),
            volunteer: "v".into(),
        });
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "op": "createRsvp", "activity": "a", "window": "w", "volunteer": "v" })
        );
    }

    #[test]
    fn test_unset_slot_shape() {
        let req = Request::UnsetSlot(SlotRef {
            activity: "a".into(),
            window: "w".into(),
        });
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({ "op": "unsetSlot", "activity": "a", "window": "w" }));
        let back: Request = serde_json::from_value(value).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_create_volunteer_omits_empty_rsvps() {
        let req = Request::CreateVolunteer {
            changes: VolunteerChanges {
                name: Some("Ada".into()),
                details: None,
            },
            rsvps: vec![],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "op": "createVolunteer", "changes": { "name": "Ada" } })
        );
    }

    #[test]
    fn test_ack_without_id() {
        let ack: Ack = serde_json::from_str("{}").unwrap();
        assert_eq!(ack.id, None);
        assert_eq!(Ack::with_id("x").id.as_deref(), Some("x"));
    }
}
