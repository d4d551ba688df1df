//! Authentication failure taxonomy and its user-facing messages.

use thiserror::Error;

/// Which form an auth failure came from; selects the generic fallback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    SignUp,
}

impl AuthFlow {
    #[must_use]
    pub fn failure_title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In Failed",
            Self::SignUp => "Sign Up Failed",
        }
    }
}

/// Failure kinds the UI distinguishes when messaging the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    /// No identity backend credentials were supplied to this installation.
    Unconfigured,
    Unknown,
}

impl AuthErrorKind {
    /// Map a canonical `auth/<kind>` code. Anything unrecognised is `Unknown`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().trim_start_matches("auth/") {
            "user-not-found" => Self::UserNotFound,
            "wrong-password" => Self::WrongPassword,
            "invalid-email" => Self::InvalidEmail,
            "invalid-credential" => Self::InvalidCredential,
            "email-already-in-use" => Self::EmailAlreadyInUse,
            "weak-password" => Self::WeakPassword,
            "unconfigured" => Self::Unconfigured,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::InvalidEmail => "auth/invalid-email",
            Self::InvalidCredential => "auth/invalid-credential",
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::WeakPassword => "auth/weak-password",
            Self::Unconfigured => "auth/unconfigured",
            Self::Unknown => "auth/unknown",
        }
    }

    #[must_use]
    pub fn message(self, flow: AuthFlow) -> &'static str {
        match self {
            Self::UserNotFound => "No account found with this email.",
            Self::WrongPassword => "Incorrect password.",
            Self::InvalidEmail => "Invalid email address.",
            Self::InvalidCredential => "Invalid email or password.",
            Self::EmailAlreadyInUse => "An account with this email already exists.",
            Self::WeakPassword => "Password should be at least 6 characters.",
            Self::Unconfigured => "Sign-in is not configured for this installation.",
            Self::Unknown => match flow {
                AuthFlow::SignIn => "Failed to sign in. Please try again.",
                AuthFlow::SignUp => "Failed to create account. Please try again.",
            },
        }
    }
}

/// A classified failure from the identity backend.
///
/// `detail` carries backend diagnostics for logs; it is never shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} ({detail})", .kind.code())]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub detail: String,
}

impl AuthError {
    #[must_use]
    pub fn new(kind: AuthErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unknown, detail)
    }
}
