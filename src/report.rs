//! Printable sign-in roster.
//!
//! One section per window, in window order. Each enabled slot lists its
//! activity, the volunteers holding it, and blank sign-in lines for the
//! seats still open.
//!
//! # Blank lines
//!
//! | Open seats | Lines |
//! |------------|-------|
//! | `Limited(n)` | `n` |
//! | `Unlimited` | [`UNCAPPED_BLANK_LINES`] |

use std::fmt;

use crate::capacity::{remaining_seats, Seats};
use crate::error::MatrixError;
use crate::matrix::MatrixStore;
use crate::models::SlotCoord;

/// Blank lines printed under a slot with no cap.
pub const UNCAPPED_BLANK_LINES: usize = 5;

/// Roster of a whole event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub title: String,
    pub windows: Vec<WindowRoster>,
}

/// One window's section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRoster {
    pub label: String,
    pub start_ms: i64,
    pub end_ms: Option<i64>,
    pub entries: Vec<RosterEntry>,
}

/// One enabled slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub coord: SlotCoord,
    pub activity: String,
    /// Names of the volunteers holding the slot.
    pub volunteers: Vec<String>,
    pub seats: Seats,
}

impl RosterEntry {
    /// Blank sign-in lines to print after the names.
    pub fn blank_lines(&self) -> usize {
        match self.seats {
            Seats::Limited(n) => n as usize,
            Seats::Unlimited => UNCAPPED_BLANK_LINES,
        }
    }
}

impl Roster {
    /// Builds the roster of `store`.
    pub fn build(store: &MatrixStore, title: impl Into<String>) -> Result<Self, MatrixError> {
        let mut windows = Vec::with_capacity(store.num_windows());
        for (window, row) in store.windows().iter().zip(store.slots().row_blocks()) {
            let mut entries = Vec::new();
            for slot in row.iter().filter(|s| s.enabled) {
                let coord = slot.coord();
                let activity = store
                    .activity(coord.activity_index)
                    .map(|a| a.label.clone())
                    .unwrap_or_default();
                let volunteers = slot
                    .rsvps
                    .iter()
                    .map(|key| match store.volunteer_position(key) {
                        Some(pos) => store
                            .volunteer(pos)
                            .map(|v| v.name.clone())
                            .unwrap_or_else(|| key.to_string()),
                        None => {
                            log::warn!("slot {coord} holds RSVP for unknown volunteer {key}");
                            key.to_string()
                        }
                    })
                    .collect();
                entries.push(RosterEntry {
                    coord,
                    activity,
                    volunteers,
                    seats: remaining_seats(store, coord)?,
                });
            }
            windows.push(WindowRoster {
                label: window.label.clone(),
                start_ms: window.start_ms,
                end_ms: window.end_ms,
                entries,
            });
        }
        Ok(Self {
            title: title.into(),
            windows,
        })
    }

    /// Total RSVPs listed.
    pub fn rsvp_count(&self) -> usize {
        self.windows
            .iter()
            .flat_map(|w| &w.entries)
            .map(|e| e.volunteers.len())
            .sum()
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for window in &self.windows {
            writeln!(f)?;
            writeln!(f, "== {} ==", window.label)?;
            for entry in &window.entries {
                writeln!(f, "{}", entry.activity)?;
                for name in &entry.volunteers {
                    writeln!(f, "  [ ] {name}")?;
                }
                for _ in 0..entry.blank_lines() {
                    writeln!(f, "  [ ] ____________________")?;
                }
            }
        }
        Ok(())
    }
}
