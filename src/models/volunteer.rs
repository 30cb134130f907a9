//! Volunteer model.
//!
//! A volunteer signs up for slots. Until the event service confirms a
//! volunteer it has no id, and its identity is its position in the
//! store's volunteer list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::SlotCoord;

/// Identity under which a slot records an RSVP.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolunteerKey {
    /// Service-confirmed volunteer id.
    Id(String),
    /// Unconfirmed volunteer, keyed by its position in the roster.
    Pending(usize),
}

impl fmt::Display for VolunteerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Pending(pos) => write!(f, "#{pos}"),
        }
    }
}

/// A volunteer's answer to one registration detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailValue {
    /// Detail identifier.
    pub detail_id: String,
    /// Raw answer.
    pub value: String,
}

/// A person signing up for slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    /// Service-assigned identifier, `None` until confirmed.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Answers to registration details, in detail order.
    pub details: Vec<DetailValue>,
    /// Slots this volunteer holds. Derived from the slots by the store.
    pub rsvps: BTreeSet<SlotCoord>,
}

impl Volunteer {
    /// Creates an unconfirmed volunteer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            details: Vec::new(),
            rsvps: BTreeSet::new(),
        }
    }

    /// Sets the service-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a detail answer.
    pub fn with_detail(mut self, detail_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push(DetailValue {
            detail_id: detail_id.into(),
            value: value.into(),
        });
        self
    }

    /// Whether the event service has confirmed this volunteer.
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }

    /// The key this volunteer's RSVPs are recorded under, given its roster position.
    pub fn key(&self, position: usize) -> VolunteerKey {
        match &self.id {
            Some(id) => VolunteerKey::Id(id.clone()),
            None => VolunteerKey::Pending(position),
        }
    }

    /// Whether this volunteer holds the slot at `coord`.
    pub fn has_rsvp(&self, coord: SlotCoord) -> bool {
        self.rsvps.contains(&coord)
    }

    /// Answer for a detail, if given.
    pub fn detail(&self, detail_id: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|d| d.detail_id == detail_id)
            .map(|d| d.value.as_str())
    }
}
