//! The sign-up matrix and its mutation operators.
//!
//! A matrix is the cross-product of activities (columns) and windows
//! (rows). [`SlotGrid`] hides the flat-storage addressing;
//! [`MatrixStore`] owns every collection and is the only way to change
//! them.
//!
//! # Operations
//!
//! | Operation | Slots touched | Cost |
//! |-----------|---------------|------|
//! | `add_activity` | one per window, appended to each block | O(windows × slots) |
//! | `add_window` | one block appended | O(activities) |
//! | `move_activity` | one per window, same move in each block | O(slots) |
//! | `move_window` | one whole block | O(slots) |
//! | `remove_activity` | one per window, walked last block first | O(slots) |
//! | `remove_window` | one whole block | O(slots) |

mod grid;
mod priority;
mod sequence;
mod snapshot;
mod store;

pub use grid::SlotGrid;
pub use priority::{plan as plan_priorities, OrderKey, MAX_PRIORITY};
pub(crate) use sequence::landing;
pub use snapshot::{
    ActivityRecord, DetailRecord, EventSnapshot, SlotRecord, VolunteerDetailRecord,
    VolunteerRecord, WindowRecord,
};
pub use store::MatrixStore;
