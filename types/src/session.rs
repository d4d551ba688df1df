//! Identity of the current user: a signed-in session or a guest.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated session as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: UserId,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
        }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The explicit display name, if the account has one.
    #[must_use]
    pub fn explicit_display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Name shown in the header and menu.
    ///
    /// Resolution order: explicit display name, then the email local-part,
    /// then the literal `"User"`. Blank values fall through.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.display_name.as_deref()
            && !name.trim().is_empty()
        {
            return name;
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local,
            _ => "User",
        }
    }
}

/// Two-variant session type consumed by every auth-conditional UI decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Guest,
    Authenticated(Session),
}

impl SessionState {
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Guest => None,
            Self::Authenticated(session) => Some(session),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Resolved display name; `None` for a guest.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.session().map(Session::display_name)
    }
}

impl From<Option<Session>> for SessionState {
    fn from(value: Option<Session>) -> Self {
        value.map_or(Self::Guest, Self::Authenticated)
    }
}
