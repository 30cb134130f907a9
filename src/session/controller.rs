//! The session: event scope, guarded mutations, and bookings.

use super::{
    Ack, ClickTarget, EventService, Interaction, Mode, ModeController, Request, RsvpKey, SlotRef,
};
use crate::capacity::{self, BookingTransition, SlotStatus};
use crate::error::{Axis, MatrixError, SessionError};
use crate::matrix::{landing, plan_priorities, MatrixStore};
use crate::models::{
    Activity, ActivityChanges, Detail, DetailChanges, Slot, SlotChanges, SlotCoord, Volunteer,
    VolunteerChanges, Window, WindowChanges,
};
use crate::pagination::{visible_slice, ScrollState, Viewport, VisibleSlice};

/// One user working on one event.
///
/// # Usage
///
/// ```
/// use u_signup::matrix::EventSnapshot;
/// use u_signup::models::{Activity, Slot, SlotCoord, Volunteer, Window};
/// use u_signup::session::{Ack, ClickTarget, EventService, Request, Session};
///
/// struct Offline;
///
/// impl EventService for Offline {
///     fn fetch_event(&mut self, event_id: &str) -> Result<EventSnapshot, String> {
///         Err(format!("{event_id}: offline"))
///     }
///
///     fn send(&mut self, _event_id: &str, _request: &Request) -> Result<Ack, String> {
///         Err("offline".into())
///     }
/// }
///
/// let mut session = Session::new(Offline, "user-1");
/// assert!(session.load("evt-42").unwrap_err().is_recoverable());
///
/// // Still a draft, so edits stay local.
/// session.enter_edit()?;
/// session.add_window(Window::new("Saturday", 0, 3_600_000), vec![])?;
/// session.add_activity(Activity::new("Cooking"), vec![Slot::enabled(2)])?;
/// let ada = session.add_volunteer(Volunteer::new("Ada"));
///
/// session.enter_view();
/// session.select_volunteer(Some(ada))?;
/// let coord = SlotCoord::new(0, 0);
/// session.click(ClickTarget::Slot(coord))?;
/// assert!(session.status(coord)?.has_rsvp);
/// # Ok::<(), u_signup::SessionError>(())
/// ```
#[derive(Debug)]
pub struct Session<S> {
    service: S,
    user_id: String,
    /// Service id of the event; `None` while the event is a draft.
    event_id: Option<String>,
    title: String,
    store: MatrixStore,
    modes: ModeController,
    viewport: Viewport,
    scroll: ScrollState,
}

impl<S: EventService> Session<S> {
    /// Starts a draft event administered by `user_id`.
    pub fn new(service: S, user_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: user_id.into(),
            event_id: None,
            title: String::new(),
            store: MatrixStore::new(),
            modes: ModeController::new(true),
            viewport: Viewport::default(),
            scroll: ScrollState::new(),
        }
    }

    /// Sets the viewport used by [`Self::visible`].
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self.scroll.sync(&self.viewport, self.store.num_activities());
        self
    }

    // ── Accessors ───────────────────────────────────

    pub fn store(&self) -> &MatrixStore {
        &self.store
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    /// Whether the event has no service id yet.
    pub fn is_draft(&self) -> bool {
        self.event_id.is_none()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    // ── Event scope ─────────────────────────────────

    /// Fetches `event_id` and replaces the whole session state with it.
    ///
    /// On failure the session is left as it was.
    pub fn load(&mut self, event_id: &str) -> Result<(), SessionError> {
        let snapshot = self.service.fetch_event(event_id).map_err(|reason| {
            log::warn!("fetch of event {event_id} rejected: {reason}");
            SessionError::RemoteRejected(reason)
        })?;
        let store = MatrixStore::from_snapshot(&snapshot).map_err(|errors| {
            log::warn!("event {event_id} snapshot has {} problems", errors.len());
            SessionError::InvalidSnapshot(errors.into_iter().map(|e| e.message).collect())
        })?;

        let is_admin = snapshot.admin.as_deref() == Some(self.user_id.as_str());
        self.event_id = Some(event_id.to_string());
        self.title = snapshot.short_description;
        self.store = store;
        self.modes = ModeController::new(is_admin);
        self.scroll = ScrollState::new();
        log::debug!("session on event {event_id} (admin: {is_admin})");
        Ok(())
    }

    /// Discards the current event and loads another.
    ///
    /// The old store is dropped even if the new event fails to load.
    pub fn switch_event(&mut self, event_id: &str) -> Result<(), SessionError> {
        self.event_id = None;
        self.title.clear();
        self.store = MatrixStore::new();
        self.modes = ModeController::new(false);
        self.scroll = ScrollState::new();
        self.load(event_id)
    }

    // ── Mode ────────────────────────────────────────

    pub fn enter_edit(&mut self) -> Result<(), SessionError> {
        self.modes.enter_edit()
    }

    pub fn enter_view(&mut self) {
        self.modes.enter_view();
    }

    /// Selects the volunteer at roster `position`, or nobody.
    pub fn select_volunteer(&mut self, position: Option<usize>) -> Result<(), SessionError> {
        if let Some(pos) = position {
            let len = self.store.volunteers().len();
            if pos >= len {
                return Err(fatal(MatrixError::out_of_bounds(Axis::Volunteer, pos, len)));
            }
        }
        self.modes.select_volunteer(position);
        Ok(())
    }

    // ── View ────────────────────────────────────────

    /// Current 1-based scroll step.
    pub fn step(&self) -> usize {
        self.scroll.step()
    }

    /// Scrolls to `step`, clamped. Returns the effective step.
    pub fn scroll_to(&mut self, step: usize) -> usize {
        self.scroll
            .scroll_to(&self.viewport, self.store.num_activities(), step)
    }

    /// Visible slice at the current step, `None` for an empty matrix.
    pub fn visible(&self) -> Option<VisibleSlice<'_>> {
        visible_slice(&self.store, &self.viewport, self.scroll.step())
    }

    /// Display state of a slot for the selected volunteer.
    pub fn status(&self, coord: SlotCoord) -> Result<SlotStatus, SessionError> {
        capacity::evaluate(&self.store, coord, self.modes.selected_volunteer()).map_err(fatal)
    }

    // ── Clicks and bookings ─────────────────────────

    /// Handles a click. In View mode a slot click books or releases it.
    pub fn click(&mut self, target: ClickTarget) -> Result<Interaction, SessionError> {
        let interaction = self.modes.interpret(target);
        if let Interaction::Book(coord) = interaction {
            self.book(coord)?;
        }
        Ok(interaction)
    }

    /// Books or releases `coord` for the selected volunteer.
    ///
    /// A confirmed volunteer's RSVP goes to the service first; an
    /// unconfirmed one is booked locally.
    pub fn book(&mut self, coord: SlotCoord) -> Result<BookingTransition, SessionError> {
        self.modes.require(Mode::View)?;
        let position = self
            .modes
            .selected_volunteer()
            .ok_or(SessionError::NoVolunteerSelected)?;
        let status = capacity::evaluate(&self.store, coord, Some(position)).map_err(fatal)?;
        let transition =
            capacity::plan_booking(&status).ok_or(SessionError::NotBookable { coord })?;

        if let Some(rsvp) = self.rsvp_key(position, coord) {
            let request = match transition {
                BookingTransition::Reserve => Request::CreateRsvp(rsvp),
                BookingTransition::Release => Request::DeleteRsvp(rsvp),
            };
            self.remote(request)?;
        }
        self.store
            .apply_booking(position, coord, transition)
            .map_err(fatal)?;
        Ok(transition)
    }

    // ── Activities ──────────────────────────────────

    /// Adds an activity column with one slot per window.
    ///
    /// The activity is created with a priority that loads it last.
    pub fn add_activity(
        &mut self,
        activity: Activity,
        slots_by_window: Vec<Slot>,
    ) -> Result<usize, SessionError> {
        self.modes.require(Mode::Edit)?;
        let (mut staged, index) = self.stage(|s| s.add_activity(activity, slots_by_window))?;
        let order = self.place(&mut staged, Axis::Activity, index)?;
        let changes = staged
            .activity(index)
            .map(ActivityChanges::full)
            .ok_or_else(|| {
                fatal(MatrixError::out_of_bounds(
                    Axis::Activity,
                    index,
                    staged.num_activities(),
                ))
            })?;
        self.send_priorities(&staged, Axis::Activity, &order, Some(index))?;
        self.confirm_created(
            &mut staged,
            Request::CreateActivity { changes },
            Axis::Activity,
            index,
        )?;
        self.commit(staged);
        Ok(index)
    }

    /// Moves an activity column. The service receives the priorities that
    /// load it at its new index.
    pub fn move_activity(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        let landed = landing(from, to);
        let (mut staged, _) = self.stage(|s| s.move_activity(from, to))?;
        if landed == from {
            return Ok(());
        }
        let order = self.place(&mut staged, Axis::Activity, landed)?;
        self.send_priorities(&staged, Axis::Activity, &order, None)?;
        self.commit(staged);
        Ok(())
    }

    pub fn remove_activity(&mut self, index: usize) -> Result<Activity, SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, (activity, _)) = self.stage(|s| s.remove_activity(index))?;
        if let Some(id) = activity.id.clone() {
            self.remote(Request::DeleteActivity { id })?;
        }
        self.commit(staged);
        Ok(activity)
    }

    pub fn update_activity(
        &mut self,
        index: usize,
        changes: ActivityChanges,
    ) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, id) = self.stage(|s| {
            s.update_activity(index, &changes)?;
            Ok(s.activity(index).and_then(|a| a.id.clone()))
        })?;
        if let Some(id) = id {
            self.remote(Request::UpdateActivity { id, changes })?;
        }
        self.commit(staged);
        Ok(())
    }

    // ── Windows ─────────────────────────────────────

    /// Adds a window row with one slot per activity.
    pub fn add_window(
        &mut self,
        window: Window,
        slots_by_activity: Vec<Slot>,
    ) -> Result<usize, SessionError> {
        self.modes.require(Mode::Edit)?;
        let request = Request::CreateWindow {
            changes: WindowChanges::full(&window),
        };
        let (mut staged, index) = self.stage(|s| s.add_window(window, slots_by_activity))?;
        self.confirm_created(&mut staged, request, Axis::Window, index)?;
        self.commit(staged);
        Ok(index)
    }

    /// Moves a window row. Local only; windows reorder by time on load.
    pub fn move_window(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        self.store.move_window(from, to).map_err(fatal)
    }

    pub fn remove_window(&mut self, index: usize) -> Result<Window, SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, (window, _)) = self.stage(|s| s.remove_window(index))?;
        if let Some(id) = window.id.clone() {
            self.remote(Request::DeleteWindow { id })?;
        }
        self.commit(staged);
        Ok(window)
    }

    pub fn update_window(&mut self, index: usize, changes: WindowChanges) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, id) = self.stage(|s| {
            s.update_window(index, &changes)?;
            Ok(s.window(index).and_then(|w| w.id.clone()))
        })?;
        if let Some(id) = id {
            self.remote(Request::UpdateWindow { id, changes })?;
        }
        self.commit(staged);
        Ok(())
    }

    // ── Slots ───────────────────────────────────────

    /// Enables, disables, or re-caps a slot.
    ///
    /// Disabling sends `UnsetSlot`; anything else sends `SetSlot` with the
    /// slot's resulting cap.
    pub fn set_slot(&mut self, coord: SlotCoord, changes: SlotChanges) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, cap) = self.stage(|s| {
            s.set_slot(coord, &changes)?;
            Ok(s.slot(coord).map(|slot| slot.volunteer_cap))
        })?;
        if let Some(slot) = slot_ref(&staged, coord) {
            let request = if changes.enabled == Some(false) {
                Request::UnsetSlot(slot)
            } else {
                Request::SetSlot {
                    slot,
                    changes: SlotChanges {
                        enabled: changes.enabled,
                        max_slot_volunteers: cap,
                    },
                }
            };
            self.remote(request)?;
        }
        self.commit(staged);
        Ok(())
    }

    // ── Details ─────────────────────────────────────

    pub fn add_detail(&mut self, detail: Detail) -> Result<usize, SessionError> {
        self.modes.require(Mode::Edit)?;
        let (mut staged, index) = self.stage(|s| Ok(s.add_detail(detail)))?;
        let order = self.place(&mut staged, Axis::Detail, index)?;
        let changes = staged
            .detail(index)
            .map(DetailChanges::full)
            .ok_or_else(|| {
                fatal(MatrixError::out_of_bounds(
                    Axis::Detail,
                    index,
                    staged.details().len(),
                ))
            })?;
        self.send_priorities(&staged, Axis::Detail, &order, Some(index))?;
        self.confirm_created(
            &mut staged,
            Request::CreateDetail { changes },
            Axis::Detail,
            index,
        )?;
        self.commit(staged);
        Ok(index)
    }

    /// Moves a detail, sending priorities as for activities.
    pub fn move_detail(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        let landed = landing(from, to);
        let (mut staged, _) = self.stage(|s| s.move_detail(from, to))?;
        if landed == from {
            return Ok(());
        }
        let order = self.place(&mut staged, Axis::Detail, landed)?;
        self.send_priorities(&staged, Axis::Detail, &order, None)?;
        self.commit(staged);
        Ok(())
    }

    pub fn remove_detail(&mut self, index: usize) -> Result<Detail, SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, detail) = self.stage(|s| s.remove_detail(index))?;
        if let Some(id) = detail.id.clone() {
            self.remote(Request::DeleteDetail { id })?;
        }
        self.commit(staged);
        Ok(detail)
    }

    pub fn update_detail(&mut self, index: usize, changes: DetailChanges) -> Result<(), SessionError> {
        self.modes.require(Mode::Edit)?;
        let (staged, id) = self.stage(|s| {
            s.update_detail(index, &changes)?;
            Ok(s.detail(index).and_then(|d| d.id.clone()))
        })?;
        if let Some(id) = id {
            self.remote(Request::UpdateDetail { id, changes })?;
        }
        self.commit(staged);
        Ok(())
    }

    // ── Volunteers ──────────────────────────────────

    /// Adds an unconfirmed volunteer. Nothing is sent until
    /// [`Self::save_volunteer`].
    pub fn add_volunteer(&mut self, volunteer: Volunteer) -> usize {
        self.store.add_volunteer(volunteer)
    }

    /// Sends a volunteer to the service: created with its current
    /// bookings if unconfirmed, updated otherwise.
    pub fn save_volunteer(&mut self, position: usize) -> Result<(), SessionError> {
        let volunteer = self
            .store
            .volunteer(position)
            .ok_or_else(|| {
                MatrixError::out_of_bounds(Axis::Volunteer, position, self.store.volunteers().len())
            })
            .map_err(fatal)?;
        let changes = VolunteerChanges::full(volunteer);

        if let Some(id) = volunteer.id.clone() {
            self.remote(Request::UpdateVolunteer { id, changes })?;
            return Ok(());
        }
        let rsvps = if self.is_draft() {
            Vec::new()
        } else {
            volunteer
                .rsvps
                .iter()
                .map(|&coord| {
                    slot_ref(&self.store, coord).ok_or(SessionError::UnconfirmedSlot { coord })
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        let mut staged = self.store.clone();
        self.confirm_created(
            &mut staged,
            Request::CreateVolunteer { changes, rsvps },
            Axis::Volunteer,
            position,
        )?;
        self.commit(staged);
        Ok(())
    }

    pub fn update_volunteer(
        &mut self,
        position: usize,
        changes: VolunteerChanges,
    ) -> Result<(), SessionError> {
        let (staged, id) = self.stage(|s| {
            s.update_volunteer(position, &changes)?;
            Ok(s.volunteer(position).and_then(|v| v.id.clone()))
        })?;
        if let Some(id) = id {
            self.remote(Request::UpdateVolunteer { id, changes })?;
        }
        self.commit(staged);
        Ok(())
    }

    /// Removes a volunteer and every booking it holds.
    pub fn remove_volunteer(&mut self, position: usize) -> Result<Volunteer, SessionError> {
        let (staged, volunteer) = self.stage(|s| s.remove_volunteer(position))?;
        if let Some(id) = volunteer.id.clone() {
            self.remote(Request::DeleteVolunteer { id })?;
        }
        self.commit(staged);
        self.modes.volunteer_removed(position);
        Ok(volunteer)
    }

    // ── Internals ───────────────────────────────────

    /// Applies `apply` to a copy of the store. The live store is untouched.
    fn stage<T>(
        &self,
        apply: impl FnOnce(&mut MatrixStore) -> Result<T, MatrixError>,
    ) -> Result<(MatrixStore, T), SessionError> {
        let mut staged = self.store.clone();
        let out = apply(&mut staged).map_err(fatal)?;
        Ok((staged, out))
    }

    fn commit(&mut self, staged: MatrixStore) {
        self.store = staged;
        self.scroll.sync(&self.viewport, self.store.num_activities());
    }

    /// Sends a request for a confirmed event. Draft events send nothing.
    fn remote(&mut self, request: Request) -> Result<Option<Ack>, SessionError> {
        let Some(event_id) = self.event_id.as_deref() else {
            return Ok(None);
        };
        match self.service.send(event_id, &request) {
            Ok(ack) => {
                log::debug!("{} acknowledged for event {event_id}", request.name());
                Ok(Some(ack))
            }
            Err(reason) => {
                log::warn!("{} rejected for event {event_id}: {reason}", request.name());
                Err(SessionError::RemoteRejected(reason))
            }
        }
    }

    /// Sends a create request and records the returned id in `staged`.
    ///
    /// An acknowledgement without an id fails the action, since later
    /// requests could not address the new entity.
    fn confirm_created(
        &mut self,
        staged: &mut MatrixStore,
        request: Request,
        axis: Axis,
        index: usize,
    ) -> Result<(), SessionError> {
        match self.remote(request)? {
            Some(Ack { id: Some(id) }) => staged.assign_id(axis, index, id).map_err(fatal),
            Some(Ack { id: None }) => {
                log::warn!("service created {axis} {index} without returning an id");
                Err(SessionError::MissingId { axis })
            }
            None => Ok(()),
        }
    }

    /// Sets in `staged` the priorities that keep `axis` entry `index` at
    /// its place on the next load, and returns them.
    ///
    /// A draft that runs out of priorities keeps its local order only.
    fn place(
        &self,
        staged: &mut MatrixStore,
        axis: Axis,
        index: usize,
    ) -> Result<Vec<(usize, i32)>, SessionError> {
        let order = plan_priorities(&staged.order_keys(axis), index);
        let Some(order) = order else {
            if self.is_draft() {
                return Ok(Vec::new());
            }
            log::warn!("no priority keeps {axis} {index} in place");
            return Err(SessionError::PriorityExhausted { axis });
        };
        for &(i, priority) in &order {
            staged.set_priority(axis, i, priority).map_err(fatal)?;
        }
        Ok(order)
    }

    /// Sends the priority changes of confirmed entries, except `skip`.
    fn send_priorities(
        &mut self,
        staged: &MatrixStore,
        axis: Axis,
        order: &[(usize, i32)],
        skip: Option<usize>,
    ) -> Result<(), SessionError> {
        for &(index, priority) in order.iter().filter(|(i, _)| Some(*i) != skip) {
            let request = match axis {
                Axis::Activity => staged.activity(index).and_then(|a| a.id.clone()).map(|id| {
                    Request::UpdateActivity {
                        id,
                        changes: ActivityChanges::priority(priority),
                    }
                }),
                Axis::Detail => staged.detail(index).and_then(|d| d.id.clone()).map(|id| {
                    Request::UpdateDetail {
                        id,
                        changes: DetailChanges::priority(priority),
                    }
                }),
                Axis::Window | Axis::Volunteer => None,
            };
            if let Some(request) = request {
                self.remote(request)?;
            }
        }
        Ok(())
    }

    fn rsvp_key(&self, position: usize, coord: SlotCoord) -> Option<RsvpKey> {
        let volunteer = self.store.volunteer(position)?.id.clone()?;
        let SlotRef { activity, window } = slot_ref(&self.store, coord)?;
        Some(RsvpKey {
            activity,
            window,
            volunteer,
        })
    }
}

fn slot_ref(store: &MatrixStore, coord: SlotCoord) -> Option<SlotRef> {
    Some(SlotRef {
        activity: store.activity(coord.activity_index)?.id.clone()?,
        window: store.window(coord.window_index)?.id.clone()?,
    })
}

fn fatal(err: MatrixError) -> SessionError {
    log::error!("{err}");
    SessionError::Matrix(err)
}
