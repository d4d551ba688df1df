use fitsyn_types::{AuthError, AuthErrorKind, SecretString, Session};
use tokio::sync::watch;

use crate::{AuthFut, IdentityBackend, SessionCell, SignUpRequest};

/// Stand-in used when no identity credentials were supplied.
///
/// The shell stays fully usable as a guest. Sign-in and sign-up fail with a
/// dedicated kind so the user learns why instead of seeing a generic error.
#[derive(Debug, Default)]
pub struct UnconfiguredIdentity {
    cell: SessionCell,
}

impl UnconfiguredIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn refuse() -> AuthError {
        AuthError::new(
            AuthErrorKind::Unconfigured,
            "identity api_key/project_id/auth_domain not set",
        )
    }
}

impl IdentityBackend for UnconfiguredIdentity {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    fn sign_in<'a>(&'a self, _email: &'a str, _password: &'a SecretString) -> AuthFut<'a, Session> {
        Box::pin(async { Err(Self::refuse()) })
    }

    fn sign_up<'a>(&'a self, _request: &'a SignUpRequest) -> AuthFut<'a, Session> {
        Box::pin(async { Err(Self::refuse()) })
    }

    fn sign_out(&self) -> AuthFut<'_, ()> {
        self.cell.publish(None);
        Box::pin(async { Ok(()) })
    }

    fn restore(&self) -> AuthFut<'_, Option<Session>> {
        Box::pin(async { Ok(None) })
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.cell.subscribe()
    }
}
