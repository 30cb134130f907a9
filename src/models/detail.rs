//! Custom registration detail model.
//!
//! Details are organizer-defined form fields ("T-shirt size", "Phone").
//! They are ordered like activities and windows but have no slots.

use serde::{Deserialize, Serialize};

/// Datatype accepted by a detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailType {
    /// Free text.
    String,
    /// `true` / `false`.
    Boolean,
    /// Non-negative integer.
    Integer,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
}

/// A registration form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    /// Service-assigned identifier, `None` until confirmed.
    pub id: Option<String>,
    /// Field type.
    #[serde(rename = "type")]
    pub detail_type: DetailType,
    /// Field label.
    pub label: String,
    /// Placeholder hint.
    pub hint: String,
    /// Whether volunteers must answer.
    pub required: bool,
    /// Ascending display rank used by the event service.
    pub priority: i32,
    /// Current position (0-based, dense). Maintained by the store.
    pub index: usize,
}

impl Detail {
    /// Creates an optional, unconfirmed detail.
    pub fn new(detail_type: DetailType, label: impl Into<String>) -> Self {
        Self {
            id: None,
            detail_type,
            label: label.into(),
            hint: String::new(),
            required: false,
            priority: 0,
            index: 0,
        }
    }

    /// Sets the service-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Marks the detail as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the display priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_builder() {
        let d = Detail::new(DetailType::Email, "Email")
            .with_hint("you@example.org")
            .required()
            .with_priority(1);

        assert_eq!(d.detail_type, DetailType::Email);
        assert!(d.required);
        assert_eq!(d.hint, "you@example.org");
        assert_eq!(d.priority, 1);
    }

    #[test]
    fn test_detail_type_wire_name() {
        let json = serde_json::to_string(&DetailType::Phone).unwrap();
        assert_eq!(json, "\"PHONE\"");
        let back: DetailType = serde_json::from_str("\"BOOLEAN\"").unwrap();
        assert_eq!(back, DetailType::Boolean);
    }
}
