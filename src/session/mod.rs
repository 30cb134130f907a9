//! One user's session on one event.
//!
//! A [`Session`] owns the [`MatrixStore`](crate::matrix::MatrixStore) of
//! the event being viewed, the [`ModeController`], and the connection to
//! the event service. It is the only place user actions turn into store
//! mutations.
//!
//! # Guarded mutations
//!
//! For an event the service already knows, each action is checked against
//! a staged copy of the store, sent as one [`Request`], and committed only
//! when the service acknowledges it. A rejected request leaves the store
//! unchanged and surfaces as
//! [`SessionError::RemoteRejected`](crate::error::SessionError::RemoteRejected).
//!
//! | Action | Request (confirmed event) |
//! |--------|---------------------------|
//! | add / update / remove activity | `CreateActivity` / `UpdateActivity` / `DeleteActivity` |
//! | move activity | `UpdateActivity` for each priority that changes |
//! | add / update / remove window | `CreateWindow` / `UpdateWindow` / `DeleteWindow` |
//! | move window | none |
//! | add / move / update / remove detail | as for activities |
//! | set slot | `SetSlot`, or `UnsetSlot` when disabling |
//! | book / release | `CreateRsvp` / `DeleteRsvp`, only for a confirmed volunteer |
//! | save volunteer | `CreateVolunteer` or `UpdateVolunteer` |
//!
//! Added and moved activities and details get priorities that load them
//! back in the same order (see [`crate::matrix::plan_priorities`]). A
//! create acknowledged without an id fails with
//! [`SessionError::MissingId`](crate::error::SessionError::MissingId).
//!
//! A draft event (no service id yet) applies every action locally.

mod controller;
mod mode;
mod request;

pub use controller::Session;
pub use mode::{interpret_click, ClickTarget, Interaction, Mode, ModeController};
pub use request::{Ack, Request, RsvpKey, SlotRef};

use crate::matrix::EventSnapshot;

/// The remote event service.
///
/// Failures are reported as a reason string; the session turns them into
/// [`SessionError::RemoteRejected`](crate::error::SessionError::RemoteRejected).
/// Calls are never retried.
pub trait EventService {
    /// Fetches a whole event.
    fn fetch_event(&mut self, event_id: &str) -> Result<EventSnapshot, String>;

    /// Sends one mutation for `event_id`.
    fn send(&mut self, event_id: &str, request: &Request) -> Result<Ack, String>;
}

impl<S: EventService + ?Sized> EventService for &mut S {
    fn fetch_event(&mut self, event_id: &str) -> Result<EventSnapshot, String> {
        (**self).fetch_event(event_id)
    }

    fn send(&mut self, event_id: &str, request: &Request) -> Result<Ack, String> {
        (**self).send(event_id, request)
    }
}
