//! User intents the front end delivers to the app.

use fitsyn_types::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Hamburger control.
    ToggleMenu,
    /// Close control or backdrop.
    CloseMenu,
    ToggleMute,
    UserControl,
    DropdownSignOut,
    /// Dismiss whatever overlay is on top (menu, then dropdown).
    Dismiss,
    /// Move focus forward. With the menu open this moves the menu
    /// highlight instead.
    FocusNext,
    FocusPrev,
    /// Activate the focused control (or the highlighted menu entry).
    Activate,
    Insert(char),
    Paste(String),
    Backspace,
    ToggleShowPassword,
    Back,
    Home,
    Navigate(Route),
    Click { column: u16, row: u16 },
    DismissToast,
    Quit,
}
