//! Navigation menu contents as a pure function of the session.
//!
//! The menu has two sections. The primary section lists every module and
//! never changes. The secondary (account) section is selected by the session
//! variant, and an authenticated session also gets a profile card and a
//! sign-out entry. Nothing here is cached: callers rebuild the view from the
//! current session every time the menu renders.

use crate::module::MODULES;
use crate::route::Route;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Navigate to the route, closing the menu first.
    Navigate(Route),
    /// Sign out through the session observer, then close the menu.
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub description: Option<&'static str>,
    pub action: MenuAction,
}

impl MenuItem {
    fn navigate(label: &'static str, path: &str) -> Self {
        Self {
            label,
            description: None,
            action: MenuAction::Navigate(Route::resolve(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub display_name: String,
    pub email: String,
}

/// Everything the menu panel shows for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub primary: Vec<MenuItem>,
    pub secondary: Vec<MenuItem>,
    pub profile: Option<ProfileCard>,
    pub footer: String,
}

/// The ten module entries, in registry order.
#[must_use]
pub fn primary_items() -> Vec<MenuItem> {
    MODULES
        .iter()
        .map(|module| MenuItem {
            label: module.title,
            description: Some(module.tagline),
            action: MenuAction::Navigate(Route::Module(module)),
        })
        .collect()
}

/// Account entries for the given session.
#[must_use]
pub fn secondary_items(session: &SessionState) -> Vec<MenuItem> {
    match session {
        SessionState::Authenticated(_) => vec![
            MenuItem::navigate("Settings", "/settings"),
            MenuItem {
                label: "Sign Out",
                description: None,
                action: MenuAction::SignOut,
            },
        ],
        SessionState::Guest => vec![
            MenuItem::navigate("Login", "/login"),
            MenuItem::navigate("Sign Up", "/signup"),
            MenuItem::navigate("Continue as Guest", "/"),
            MenuItem::navigate("Settings", "/settings"),
        ],
    }
}

impl MenuView {
    #[must_use]
    pub fn build(session: &SessionState) -> Self {
        let (profile, footer) = match session {
            SessionState::Authenticated(s) => (
                Some(ProfileCard {
                    display_name: s.display_name().to_string(),
                    email: s.email().to_string(),
                }),
                format!("Logged in as {}", s.display_name()),
            ),
            SessionState::Guest => (
                None,
                "Login to sync your progress across devices".to_string(),
            ),
        };
        Self {
            primary: primary_items(),
            secondary: secondary_items(session),
            profile,
            footer,
        }
    }

    /// All selectable entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &MenuItem> {
        self.primary.iter().chain(self.secondary.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&MenuItem> {
        self.entries().nth(index)
    }
}
