//! Process-local identity backend.
//!
//! Mirrors the hosted service's failure kinds closely enough for the shell's
//! error messaging to be exercised without a network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use fitsyn_types::{AuthError, AuthErrorKind, SecretString, Session, UserId};
use tokio::sync::watch;

use crate::{AuthFut, IdentityBackend, SessionCell, SignUpRequest};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    password: SecretString,
    display_name: Option<String>,
}

impl Account {
    fn session(&self) -> Session {
        Session::new(
            self.id.clone(),
            self.email.clone(),
            self.display_name.clone(),
        )
    }
}

#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    next_id: AtomicU64,
    cell: SessionCell,
}

impl InMemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without signing in.
    pub fn with_account(
        self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Self {
        let account = Account {
            id: self.allocate_id(),
            email: email.to_string(),
            password: SecretString::new(password),
            display_name: display_name.map(str::to_string),
        };
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(normalize(email), account);
        }
        self
    }

    /// Start with a session already in place, as if restored.
    pub fn signed_in_as(self, email: &str) -> Self {
        let session = self
            .accounts
            .lock()
            .ok()
            .and_then(|accounts| accounts.get(&normalize(email)).map(Account::session));
        self.cell.publish(session);
        self
    }

    fn allocate_id(&self) -> UserId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        UserId::new(format!("local-{n}"))
    }

    fn authenticate(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        validate_email(email)?;
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthError::unknown("account table poisoned"))?;
        let account = accounts.get(&normalize(email)).ok_or_else(|| {
            AuthError::new(AuthErrorKind::UserNotFound, format!("no account for {email}"))
        })?;
        if account.password.expose_secret() != password.expose_secret() {
            return Err(AuthError::new(AuthErrorKind::WrongPassword, "password mismatch"));
        }
        Ok(account.session())
    }

    fn register(&self, request: &SignUpRequest) -> Result<Session, AuthError> {
        validate_email(&request.email)?;
        if request.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::new(
                AuthErrorKind::WeakPassword,
                "password shorter than 6 characters",
            ));
        }
        let key = normalize(&request.email);
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthError::unknown("account table poisoned"))?;
        if accounts.contains_key(&key) {
            return Err(AuthError::new(
                AuthErrorKind::EmailAlreadyInUse,
                format!("{} already registered", request.email),
            ));
        }
        let display_name = Some(request.display_name.trim().to_string()).filter(|n| !n.is_empty());
        let account = Account {
            id: self.allocate_id(),
            email: request.email.trim().to_string(),
            password: request.password.clone(),
            display_name,
        };
        let session = account.session();
        accounts.insert(key, account);
        Ok(session)
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(AuthError::new(
            AuthErrorKind::InvalidEmail,
            format!("malformed email {email:?}"),
        ))
    }
}

impl IdentityBackend for InMemoryIdentity {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn sign_in<'a>(&'a self, email: &'a str, password: &'a SecretString) -> AuthFut<'a, Session> {
        Box::pin(async move {
            let session = self.authenticate(email, password)?;
            self.cell.publish(Some(session.clone()));
            Ok(session)
        })
    }

    fn sign_up<'a>(&'a self, request: &'a SignUpRequest) -> AuthFut<'a, Session> {
        Box::pin(async move {
            let session = self.register(request)?;
            self.cell.publish(Some(session.clone()));
            Ok(session)
        })
    }

    fn sign_out(&self) -> AuthFut<'_, ()> {
        Box::pin(async move {
            self.cell.publish(None);
            Ok(())
        })
    }

    fn restore(&self) -> AuthFut<'_, Option<Session>> {
        Box::pin(async move { Ok(self.cell.current()) })
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.cell.subscribe()
    }
}
