//! Header controls: hamburger, mute toggle and the user control.

use fitsyn_types::SessionState;
use fitsyn_types::ui::Region;

/// What activating the user control does for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserControlAction {
    /// Guests go to the login page.
    NavigateToLogin,
    /// Authenticated users open or close the account dropdown.
    ToggleDropdown,
}

impl UserControlAction {
    #[must_use]
    pub fn for_session(session: &SessionState) -> Self {
        match session {
            SessionState::Guest => Self::NavigateToLogin,
            SessionState::Authenticated(_) => Self::ToggleDropdown,
        }
    }
}

/// Label rendered on the user control.
#[must_use]
pub fn user_control_label(session: &SessionState) -> &str {
    session.display_name().unwrap_or("Sign In")
}

/// The small account dropdown under the user control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountDropdown {
    open: bool,
}

impl AccountDropdown {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Close when a click lands outside both the dropdown and its trigger.
    /// Returns `true` if the click closed it.
    pub fn close_on_outside_click(
        &mut self,
        dropdown: Option<Region>,
        trigger: Option<Region>,
        column: u16,
        row: u16,
    ) -> bool {
        if !self.open {
            return false;
        }
        let inside = |region: Option<Region>| region.is_some_and(|r| r.contains(column, row));
        if inside(dropdown) || inside(trigger) {
            return false;
        }
        self.open = false;
        true
    }
}
