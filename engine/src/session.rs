//! Session observation and auth operations.
//!
//! The observer subscribes once to the backend's session channel and mirrors
//! it into a [`SessionState`] that the rest of the shell reads. Auth
//! operations run as spawned tasks; their outcomes come back over a channel
//! drained by the app tick, so the UI thread never awaits the backend.

use std::sync::Arc;

use fitsyn_identity::{IdentityBackend, SignUpRequest};
use fitsyn_types::{AuthError, SecretString, Session, SessionState};
use tokio::sync::{mpsc, watch};

/// Which control asked for the sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOrigin {
    /// Menu sign-out stays on the current route.
    Menu,
    /// Header dropdown sign-out navigates home once complete.
    Header,
}

#[derive(Debug)]
pub enum AuthOutcome {
    SignedIn(Result<Session, AuthError>),
    SignedUp(Result<Session, AuthError>),
    SignedOut {
        origin: SignOutOrigin,
        result: Result<(), AuthError>,
    },
    Restored(Result<Option<Session>, AuthError>),
}

pub struct SessionObserver {
    backend: Arc<dyn IdentityBackend>,
    rx: watch::Receiver<Option<Session>>,
    state: SessionState,
    outcome_tx: mpsc::UnboundedSender<AuthOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<AuthOutcome>,
    in_flight: usize,
}

impl std::fmt::Debug for SessionObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionObserver")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl SessionObserver {
    #[must_use]
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        let mut rx = backend.subscribe();
        let state = SessionState::from(rx.borrow_and_update().clone());
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            rx,
            state,
            outcome_tx,
            outcome_rx,
            in_flight: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Whether any auth operation is still awaiting the backend.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Pick up the latest published session. Returns `true` on change.
    pub fn sync(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {}
            Ok(false) => return false,
            Err(_) => {
                tracing::debug!("Identity backend dropped its session channel");
                return false;
            }
        }
        let next = SessionState::from(self.rx.borrow_and_update().clone());
        if next == self.state {
            return false;
        }
        match &next {
            SessionState::Authenticated(session) => {
                tracing::info!(user = %session.id(), "Session established");
            }
            SessionState::Guest => tracing::info!("Session cleared"),
        }
        self.state = next;
        true
    }

    /// Next completed auth operation, if any.
    pub fn try_next_outcome(&mut self) -> Option<AuthOutcome> {
        let outcome = self.outcome_rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    fn spawn<F>(&mut self, op: &'static str, task: F)
    where
        F: FnOnce(Arc<dyn IdentityBackend>, mpsc::UnboundedSender<AuthOutcome>) -> BoxedTask,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        tracing::debug!(op, backend = self.backend.name(), "Auth request");
        self.in_flight += 1;
        tokio::spawn(task(backend, tx));
    }

    pub fn sign_in(&mut self, email: String, password: SecretString) {
        self.spawn("sign_in", move |backend, tx| {
            Box::pin(async move {
                let result = backend.sign_in(&email, &password).await;
                let _ = tx.send(AuthOutcome::SignedIn(result));
            })
        });
    }

    pub fn sign_up(&mut self, request: SignUpRequest) {
        self.spawn("sign_up", move |backend, tx| {
            Box::pin(async move {
                let result = backend.sign_up(&request).await;
                let _ = tx.send(AuthOutcome::SignedUp(result));
            })
        });
    }

    pub fn sign_out(&mut self, origin: SignOutOrigin) {
        self.spawn("sign_out", move |backend, tx| {
            Box::pin(async move {
                let result = backend.sign_out().await;
                let _ = tx.send(AuthOutcome::SignedOut { origin, result });
            })
        });
    }

    pub fn restore(&mut self) {
        self.spawn("restore", |backend, tx| {
            Box::pin(async move {
                let result = backend.restore().await;
                let _ = tx.send(AuthOutcome::Restored(result));
            })
        });
    }
}

type BoxedTask = std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'static>>;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fitsyn_identity::InMemoryIdentity;
    use fitsyn_types::{AuthErrorKind, SecretString};

    use super::{AuthOutcome, SessionObserver, SignOutOrigin};

    async fn next_outcome(observer: &mut SessionObserver) -> AuthOutcome {
        for _ in 0..100 {
            if let Some(outcome) = observer.try_next_outcome() {
                return outcome;
            }
            tokio::task::yield_now().await;
        }
        panic!("auth outcome never arrived");
    }

    #[tokio::test]
    async fn restored_session_is_visible_at_construction() {
        let backend = InMemoryIdentity::new()
            .with_account("ada@example.com", "engine1", Some("Ada"))
            .signed_in_as("ada@example.com");
        let observer = SessionObserver::new(Arc::new(backend));
        assert!(observer.state().is_authenticated());
    }

    #[tokio::test]
    async fn sign_in_then_out_updates_state() {
        let backend = InMemoryIdentity::new().with_account("ada@example.com", "engine1", None);
        let mut observer = SessionObserver::new(Arc::new(backend));
        assert!(!observer.state().is_authenticated());

        observer.sign_in("ada@example.com".into(), SecretString::new("engine1"));
        assert!(observer.is_busy());
        let outcome = next_outcome(&mut observer).await;
        assert!(matches!(outcome, AuthOutcome::SignedIn(Ok(_))));
        assert!(!observer.is_busy());
        assert!(observer.sync());
        assert_eq!(observer.state().display_name(), Some("ada"));

        observer.sign_out(SignOutOrigin::Menu);
        let outcome = next_outcome(&mut observer).await;
        assert!(matches!(
            outcome,
            AuthOutcome::SignedOut {
                origin: SignOutOrigin::Menu,
                result: Ok(())
            }
        ));
        assert!(observer.sync());
        assert!(!observer.state().is_authenticated());
    }

    #[tokio::test]
    async fn wrong_password_leaves_guest() {
        let backend = InMemoryIdentity::new().with_account("bad@x.com", "right1", None);
        let mut observer = SessionObserver::new(Arc::new(backend));
        observer.sign_in("bad@x.com".into(), SecretString::new("wrong"));
        match next_outcome(&mut observer).await {
            AuthOutcome::SignedIn(Err(err)) => assert_eq!(err.kind, AuthErrorKind::WrongPassword),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!observer.sync());
        assert!(!observer.state().is_authenticated());
    }
}
