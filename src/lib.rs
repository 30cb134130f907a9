//! Volunteer sign-up matrix for the U-Engine ecosystem.
//!
//! An event is described as a cross-product of activities (what can be
//! done) and time windows (when it can be done). Every intersection is a
//! slot that volunteers reserve, subject to per-slot and per-activity
//! caps.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Activity`, `Window`, `Slot`, `Volunteer`,
//!   `Detail`, and partial-update change sets
//! - **`matrix`**: `MatrixStore`, the ordered insert/move/remove operators
//!   over the flat slot grid, and loading from an event snapshot
//! - **`pagination`**: the horizontally scrolling viewport over activity columns
//! - **`capacity`**: booking eligibility and open-seat counts
//! - **`session`**: View/Edit modes and mutations guarded by the event service
//! - **`validation`**: Store integrity checks (shape, index density, duplicate IDs)
//! - **`report`**: Printable per-window sign-in roster
//!
//! # Architecture
//!
//! Everything below `session` is synchronous and side-effect free apart
//! from mutating the store it is handed. `session` is the only module
//! that talks to the event service, through the [`session::EventService`]
//! trait.

pub mod capacity;
pub mod error;
pub mod matrix;
pub mod models;
pub mod pagination;
pub mod report;
pub mod session;
pub mod validation;

pub use error::{MatrixError, SessionError};
pub use matrix::MatrixStore;
