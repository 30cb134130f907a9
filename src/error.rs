//! Error types.
//!
//! Two tiers:
//! - [`MatrixError`]: the caller broke an invariant of the store (bad index,
//!   wrong slot count). These are programming errors and are never retried.
//! - [`SessionError`]: everything a user action can fail with, including
//!   [`SessionError::RemoteRejected`], the only recoverable failure.

use std::fmt;
use thiserror::Error as ThisError;

use crate::models::SlotCoord;
use crate::session::Mode;

///
/// Axis
///
/// Which ordered collection an index argument refers to.
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Activity,
    Window,
    Detail,
    Volunteer,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Activity => "activity",
            Self::Window => "window",
            Self::Detail => "detail",
            Self::Volunteer => "volunteer",
        };
        f.write_str(name)
    }
}

///
/// MatrixError
///
/// Invariant violations reported by store mutators. A mutator that
/// returns one of these has left the store unchanged.
///

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum MatrixError {
    #[error("{axis} index {index} out of bounds (len {len})")]
    IndexOutOfBounds { axis: Axis, index: usize, len: usize },

    #[error("new {axis} needs {expected} slots, got {actual}")]
    ShapeMismatch {
        axis: Axis,
        expected: usize,
        actual: usize,
    },

    #[error("volunteer cap {cap} exceeds maximum {max}")]
    CapOutOfRange { cap: u32, max: u32 },
}

impl MatrixError {
    pub(crate) fn out_of_bounds(axis: Axis, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { axis, index, len }
    }

    /// Matrix errors mean the caller and the store disagree about shape;
    /// they are always fatal.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

///
/// SessionError
///
/// Failures of a user action routed through a [`Session`](crate::session::Session).
///

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SessionError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("event service rejected the request: {0}")]
    RemoteRejected(String),

    #[error("only the event administrator may edit")]
    NotAdministrator,

    #[error("action requires {required} mode")]
    WrongMode { required: Mode },

    #[error("no volunteer selected")]
    NoVolunteerSelected,

    #[error("slot {coord} cannot be booked")]
    NotBookable { coord: SlotCoord },

    #[error("event snapshot is inconsistent: {}", .0.join("; "))]
    InvalidSnapshot(Vec<String>),

    #[error("event service returned no id for the new {axis}")]
    MissingId { axis: Axis },

    #[error("slot {coord} has no service id yet")]
    UnconfirmedSlot { coord: SlotCoord },

    #[error("{axis} order cannot be saved within the priority range")]
    PriorityExhausted { axis: Axis },
}

impl SessionError {
    /// Whether the user may retry the same action.
    ///
    /// Only remote rejections are recoverable; the store is unchanged and
    /// the action can be reissued as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RemoteRejected(_))
    }

    /// Whether this wraps a fatal matrix error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Matrix(e) if e.is_fatal())
    }
}
