//! Identity backends for the FitSyn shell.
//!
//! # Architecture
//!
//! The shell consumes identity through one object-safe trait,
//! [`IdentityBackend`]. Three implementations exist:
//!
//! - [`rest::RestIdentity`] - the hosted identity service over HTTPS
//! - [`memory::InMemoryIdentity`] - process-local accounts (tests, demos)
//! - [`unconfigured::UnconfiguredIdentity`] - no credentials were supplied;
//!   every sign-in attempt fails with [`AuthErrorKind::Unconfigured`]
//!
//! Every backend publishes the current session on a [`tokio::sync::watch`]
//! channel. The shell subscribes once for its whole lifetime and treats
//! `None` as a guest.
//!
//! # Timeouts
//!
//! None. Auth requests run until the backend answers or the connection
//! fails.

pub mod credential;
pub mod memory;
pub mod rest;
pub mod unconfigured;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;

pub use fitsyn_types::{AuthError, AuthErrorKind, SecretString, Session, UserId};

pub use memory::InMemoryIdentity;
pub use rest::RestIdentity;
pub use unconfigured::UnconfiguredIdentity;

/// Boxed future returned by [`IdentityBackend`] operations.
pub type AuthFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + Send + 'a>>;

/// Fields collected by the sign-up form.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub display_name: String,
    pub email: String,
    pub password: SecretString,
}

/// Minimal identity contract the shell depends on.
pub trait IdentityBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn sign_in<'a>(&'a self, email: &'a str, password: &'a SecretString) -> AuthFut<'a, Session>;

    fn sign_up<'a>(&'a self, request: &'a SignUpRequest) -> AuthFut<'a, Session>;

    fn sign_out(&self) -> AuthFut<'_, ()>;

    /// Re-establish a session that existed before this process started.
    fn restore(&self) -> AuthFut<'_, Option<Session>>;

    /// Observe the current session. Yields `None` for a guest.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// The sending half of a backend's session channel.
///
/// Backends own one of these and publish every change through it; nothing
/// else can mutate the observed session.
#[derive(Debug)]
pub struct SessionCell {
    tx: watch::Sender<Option<Session>>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionCell {
    #[must_use]
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn publish(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

/// Pick the backend for a resolved configuration.
///
/// Incomplete or absent credentials yield [`UnconfiguredIdentity`]; there is
/// no built-in fallback project.
#[must_use]
pub fn backend_from_config(
    config: Option<&fitsyn_config::IdentityConfig>,
) -> Arc<dyn IdentityBackend> {
    let Some(config) = config else {
        tracing::info!("Identity backend not configured; running guest-only");
        return Arc::new(UnconfiguredIdentity::new());
    };
    let credentials = credential::CredentialStore::default_location();
    match RestIdentity::new(config, credentials) {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            tracing::warn!("Failed to build identity client: {err}");
            Arc::new(UnconfiguredIdentity::new())
        }
    }
}
