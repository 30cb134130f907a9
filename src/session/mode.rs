//! View/Edit mode and click interpretation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SessionError;
use crate::models::SlotCoord;

/// Interaction mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Slot clicks book and release.
    #[default]
    View,
    /// Clicks open editors; bookings are off.
    Edit,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => f.write_str("view"),
            Self::Edit => f.write_str("edit"),
        }
    }
}

/// Something the user clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClickTarget {
    /// An activity column header.
    Activity(usize),
    /// A window row header.
    Window(usize),
    Slot(SlotCoord),
    /// A registration detail field.
    Detail(usize),
}

/// What a click means in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interaction {
    /// Book or release the slot for the selected volunteer.
    Book(SlotCoord),
    /// Open the editor for the target.
    OpenEditor(ClickTarget),
    /// Nothing happens.
    Ignore,
}

/// Maps a click to an interaction.
///
/// | Mode | Slot | Activity / Window / Detail |
/// |------|------|----------------------------|
/// | View | `Book` | `Ignore` |
/// | Edit | `OpenEditor` | `OpenEditor` |
pub fn interpret_click(mode: Mode, target: ClickTarget) -> Interaction {
    match (mode, target) {
        (Mode::Edit, target) => Interaction::OpenEditor(target),
        (Mode::View, ClickTarget::Slot(coord)) => Interaction::Book(coord),
        (Mode::View, _) => Interaction::Ignore,
    }
}

/// Tracks the mode, administrator rights, and the selected volunteer.
///
/// Starts in View. Edit is reachable only by the administrator. Leaving
/// Edit clears the selected volunteer; entering it does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
    is_admin: bool,
    selected: Option<usize>,
}

impl ModeController {
    /// Creates a controller in View mode.
    pub fn new(is_admin: bool) -> Self {
        Self {
            mode: Mode::View,
            is_admin,
            selected: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Roster position of the selected volunteer.
    pub fn selected_volunteer(&self) -> Option<usize> {
        self.selected
    }

    /// Switches to Edit.
    pub fn enter_edit(&mut self) -> Result<(), SessionError> {
        if !self.is_admin {
            return Err(SessionError::NotAdministrator);
        }
        self.mode = Mode::Edit;
        Ok(())
    }

    /// Switches to View, clearing the selected volunteer when leaving Edit.
    pub fn enter_view(&mut self) {
        if self.mode == Mode::Edit {
            self.selected = None;
        }
        self.mode = Mode::View;
    }

    pub fn select_volunteer(&mut self, position: Option<usize>) {
        self.selected = position;
    }

    /// Interprets a click in the current mode.
    pub fn interpret(&self, target: ClickTarget) -> Interaction {
        interpret_click(self.mode, target)
    }

    /// Fails unless the controller is in `required` mode.
    pub fn require(&self, required: Mode) -> Result<(), SessionError> {
        if self.mode == required {
            Ok(())
        } else {
            Err(SessionError::WrongMode { required })
        }
    }

    /// Keeps the selection pointing at the same volunteer after the one at
    /// `position` left the roster.
    pub(crate) fn volunteer_removed(&mut self, position: usize) {
        self.selected = match self.selected {
            Some(p) if p == position => None,
            Some(p) if p > position => Some(p - 1),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_view() {
        let c = ModeController::new(true);
        assert_eq!(c.mode(), Mode::View);
        assert_eq!(c.selected_volunteer(), None);
    }

    #[test]
    fn test_edit_requires_admin() {
        let mut c = ModeController::new(false);
        assert_eq!(c.enter_edit(), Err(SessionError::NotAdministrator));
        assert_eq!(c.mode(), Mode::View);

        let mut c = ModeController::new(true);
        c.enter_edit().unwrap();
        assert_eq!(c.mode(), Mode::Edit);
    }

    #[test]
    fn test_leaving_edit_clears_selection() {
        let mut c = ModeController::new(true);
        c.select_volunteer(Some(2));
        c.enter_edit().unwrap();
        assert_eq!(c.selected_volunteer(), Some(2));

        c.enter_view();
        assert_eq!(c.selected_volunteer(), None);

        // View -> View keeps it.
        c.select_volunteer(Some(1));
        c.enter_view();
        assert_eq!(c.selected_volunteer(), Some(1));
    }

    #[test]
    fn test_interpret_click() {
        let coord = SlotCoord::new(1, 2);
        assert_eq!(
            interpret_click(Mode::View, ClickTarget::Slot(coord)),
            Interaction::Book(coord)
        );
        assert_eq!(
            interpret_click(Mode::View, ClickTarget::Activity(0)),
            Interaction::Ignore
        );
        assert_eq!(
            interpret_click(Mode::Edit, ClickTarget::Slot(coord)),
            Interaction::OpenEditor(ClickTarget::Slot(coord))
        );
        assert_eq!(
            interpret_click(Mode::Edit, ClickTarget::Detail(3)),
            Interaction::OpenEditor(ClickTarget::Detail(3))
        );
    }

    #[test]
    fn test_require_mode() {
        let c = ModeController::new(true);
        assert!(c.require(Mode::View).is_ok());
        assert_eq!(
            c.require(Mode::Edit),
            Err(SessionError::WrongMode { required: Mode::Edit })
        );
        assert_eq!(
            SessionError::WrongMode { required: Mode::Edit }.to_string(),
            "action requires edit mode"
        );
    }

    #[test]
    fn test_selection_follows_removal() {
        let mut c = ModeController::new(false);
        c.select_volunteer(Some(3));
        c.volunteer_removed(1);
        assert_eq!(c.selected_volunteer(), Some(2));
        c.volunteer_removed(2);
        assert_eq!(c.selected_volunteer(), None);
    }
}
