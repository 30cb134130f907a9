//! Window (matrix row) model.
//!
//! A window is a concrete span of time during which every activity may
//! be staffed. Windows never overlap or recur; each is a single row.
//!
//! # Time Model
//! Times are epoch milliseconds, as sent by the event service. A window
//! may be open-ended (`end_ms = None`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A labeled row of the sign-up matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// Service-assigned identifier. `None` until the event service confirms it.
    pub id: Option<String>,
    /// Row label.
    pub label: String,
    /// Start of the span (epoch ms, inclusive).
    pub start_ms: i64,
    /// End of the span (epoch ms, exclusive). `None` = open-ended.
    pub end_ms: Option<i64>,
    /// Current row position (0-based, dense). Maintained by the store.
    pub index: usize,
}

impl Window {
    /// Creates an unconfirmed window covering `[start_ms, end_ms)`.
    pub fn new(label: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            id: None,
            label: label.into(),
            start_ms,
            end_ms: Some(end_ms),
            index: 0,
        }
    }

    /// Creates an unconfirmed window with no end time.
    pub fn open_ended(label: impl Into<String>, start_ms: i64) -> Self {
        Self {
            id: None,
            label: label.into(),
            start_ms,
            end_ms: None,
            index: 0,
        }
    }

    /// Sets the service-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Duration in ms, if the window has an end.
    pub fn duration_ms(&self) -> Option<i64> {
        self.end_ms.map(|end| end - self.start_ms)
    }

    /// Whether the event service has confirmed this window.
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }

    /// Temporal order: by start, then by end. A missing end sorts last.
    pub fn temporal_cmp(&self, other: &Self) -> Ordering {
        self.start_ms
            .cmp(&other.start_ms)
            .then_with(|| match (self.end_ms, other.end_ms) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_duration() {
        let w = Window::new("Morning", 1_000, 4_600_000);
        assert_eq!(w.duration_ms(), Some(4_599_000));
        assert_eq!(Window::open_ended("Late", 0).duration_ms(), None);
    }

    #[test]
    fn test_temporal_order() {
        let early = Window::new("A", 0, 100);
        let longer = Window::new("B", 0, 200);
        let open = Window::open_ended("C", 0);
        let later = Window::new("D", 50, 60);

        assert_eq!(early.temporal_cmp(&longer), Ordering::Less);
        assert_eq!(longer.temporal_cmp(&open), Ordering::Less);
        assert_eq!(open.temporal_cmp(&later), Ordering::Less);
        assert_eq!(open.temporal_cmp(&open.clone()), Ordering::Equal);
    }
}
