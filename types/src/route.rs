//! Client-side route table.

use std::borrow::Cow;
use std::fmt;

use crate::module::{self, ModuleDescriptor};

pub(crate) const HOME_PATH: &str = "/";
pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const SIGNUP_PATH: &str = "/signup";
pub(crate) const SETTINGS_PATH: &str = "/settings";

/// Paths served by the shell itself rather than by an embedded module.
pub(crate) const FIRST_PARTY_PATHS: [&str; 4] = [HOME_PATH, LOGIN_PATH, SIGNUP_PATH, SETTINGS_PATH];

/// A resolved route. Resolution never fails: unknown paths become `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    SignUp,
    Settings,
    Module(&'static ModuleDescriptor),
    NotFound(String),
}

impl Route {
    /// Resolve a path. Query strings, fragments and a trailing slash are ignored.
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let normalized = normalize(path);
        match normalized.as_ref() {
            HOME_PATH => Self::Home,
            LOGIN_PATH => Self::Login,
            SIGNUP_PATH => Self::SignUp,
            SETTINGS_PATH => Self::Settings,
            other => match module::by_route(other) {
                Some(descriptor) => Self::Module(descriptor),
                None => Self::NotFound(path.to_string()),
            },
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Home => HOME_PATH,
            Self::Login => LOGIN_PATH,
            Self::SignUp => SIGNUP_PATH,
            Self::Settings => SETTINGS_PATH,
            Self::Module(descriptor) => descriptor.route,
            Self::NotFound(path) => path,
        }
    }

    #[must_use]
    pub fn module(&self) -> Option<&'static ModuleDescriptor> {
        match self {
            Self::Module(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Page title shown in the header breadcrumb.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Home => "Home",
            Self::Login => "Sign In",
            Self::SignUp => "Sign Up",
            Self::Settings => "Settings",
            Self::Module(descriptor) => descriptor.title,
            Self::NotFound(_) => "Not Found",
        }
    }

    /// Auth pages bounce an authenticated session back home.
    #[must_use]
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Self::Login | Self::SignUp)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn normalize(path: &str) -> Cow<'_, str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim();
    let trimmed = if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    };
    if trimmed.is_empty() {
        return Cow::Borrowed(HOME_PATH);
    }
    if trimmed.starts_with('/') {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Route;
    use crate::module::MODULES;

    #[test]
    fn resolves_first_party_pages() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve("/login"), Route::Login);
        assert_eq!(Route::resolve("/signup"), Route::SignUp);
        assert_eq!(Route::resolve("/settings"), Route::Settings);
    }

    #[test]
    fn resolves_every_module_route() {
        for module in &MODULES {
            let route = Route::resolve(module.route);
            assert_eq!(route.module(), Some(module));
            assert_eq!(route.path(), module.route);
        }
    }

    #[test]
    fn ignores_trailing_slash_query_and_fragment() {
        assert_eq!(Route::resolve("/tracker/").path(), "/tracker");
        assert_eq!(Route::resolve("/settings?tab=1").path(), "/settings");
        assert_eq!(Route::resolve("/login#top"), Route::Login);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(Route::resolve("yoga").path(), "/yoga");
    }

    #[test]
    fn unknown_paths_keep_the_requested_text() {
        assert_eq!(
            Route::resolve("/does-not-exist"),
            Route::NotFound("/does-not-exist".to_string())
        );
        assert_eq!(Route::resolve("/nope").title(), "Not Found");
    }

    #[test]
    fn auth_pages() {
        assert!(Route::Login.is_auth_page());
        assert!(Route::SignUp.is_auth_page());
        assert!(!Route::Settings.is_auth_page());
    }
}
