//! Client for the hosted identity service (Identity Toolkit REST API).
//!
//! | Operation | Endpoint                                   |
//! |-----------|--------------------------------------------|
//! | sign in   | `v1/accounts:signInWithPassword`           |
//! | sign up   | `v1/accounts:signUp` + `v1/accounts:update`|
//! | restore   | secure token `v1/token` (refresh grant)    |
//!
//! Service error messages (`EMAIL_NOT_FOUND`, `WEAK_PASSWORD : ...`) are
//! mapped onto [`AuthErrorKind`]. The raw message is kept as the error
//! detail for logs.

use fitsyn_config::IdentityConfig;
use fitsyn_types::{AuthError, AuthErrorKind, SecretString, Session, UserId};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

use crate::credential::{CredentialStore, StoredCredential};
use crate::{AuthFut, IdentityBackend, SessionCell, SignUpRequest};

const IDENTITY_HOST: &str = "identitytoolkit.googleapis.com";
const SECURE_TOKEN_HOST: &str = "securetoken.googleapis.com";

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone)]
struct Endpoints {
    identity: String,
    secure_token: String,
}

impl Endpoints {
    fn hosted() -> Self {
        Self {
            identity: format!("https://{IDENTITY_HOST}"),
            secure_token: format!("https://{SECURE_TOKEN_HOST}"),
        }
    }

    /// Emulator layout: every service lives under one root, prefixed by host.
    fn under(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            identity: format!("{root}/{IDENTITY_HOST}"),
            secure_token: format!("{root}/{SECURE_TOKEN_HOST}"),
        }
    }
}

/// Failure before the response could be classified.
#[derive(Debug, Error)]
enum RequestError {
    /// Connection, TLS or decoding failure.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("{status}: {message}")]
    Rejected { status: u16, message: String },
}

impl From<RequestError> for AuthError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Transport(detail) => AuthError::unknown(detail),
            RequestError::Rejected { status, message } => {
                AuthError::new(kind_for_service_message(&message), format!("{status}: {message}"))
            }
        }
    }
}

/// Map a service error message onto a kind.
///
/// Messages may carry a suffix after `" : "`; only the leading code counts.
#[must_use]
pub fn kind_for_service_message(message: &str) -> AuthErrorKind {
    let code = message.split(" : ").next().unwrap_or_default().trim();
    match code {
        "EMAIL_NOT_FOUND" => AuthErrorKind::UserNotFound,
        "INVALID_PASSWORD" => AuthErrorKind::WrongPassword,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthErrorKind::InvalidEmail,
        "INVALID_LOGIN_CREDENTIALS" => AuthErrorKind::InvalidCredential,
        "EMAIL_EXISTS" => AuthErrorKind::EmailAlreadyInUse,
        "WEAK_PASSWORD" => AuthErrorKind::WeakPassword,
        _ => AuthErrorKind::Unknown,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

impl AccountResponse {
    fn session(&self) -> Session {
        let display_name = self
            .display_name
            .clone()
            .filter(|name| !name.trim().is_empty());
        Session::new(UserId::new(&self.local_id), &self.email, display_name)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    refresh_token: String,
    user_id: String,
}

pub struct RestIdentity {
    client: reqwest::Client,
    api_key: SecretString,
    project_id: String,
    auth_domain: String,
    endpoints: Endpoints,
    credentials: CredentialStore,
    cell: SessionCell,
}

impl std::fmt::Debug for RestIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestIdentity")
            .field("project_id", &self.project_id)
            .field("auth_domain", &self.auth_domain)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl RestIdentity {
    pub fn new(config: &IdentityConfig, credentials: CredentialStore) -> Result<Self, reqwest::Error> {
        let endpoints = config
            .endpoint
            .as_deref()
            .map_or_else(Endpoints::hosted, Endpoints::under);
        // No request timeout: auth calls wait for the service.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .https_only(config.endpoint.is_none())
            .build()?;
        tracing::info!(
            project = %config.project_id,
            domain = %config.auth_domain,
            "Identity backend ready"
        );
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            auth_domain: config.auth_domain.clone(),
            endpoints,
            credentials,
            cell: SessionCell::default(),
        })
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[must_use]
    pub fn auth_domain(&self) -> &str {
        &self.auth_domain
    }

    fn url(&self, base: &str, operation: &str) -> Result<Url, RequestError> {
        Url::parse_with_params(
            &format!("{base}/v1/{operation}"),
            &[("key", self.api_key.expose_secret())],
        )
        .map_err(|e| RequestError::Transport(format!("invalid endpoint: {e}")))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: serde_json::Value,
    ) -> Result<T, RequestError> {
        let url = self.url(&self.endpoints.identity, operation)?;
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RequestError::Transport(format!("{operation} request failed: {e}")))?;
        decode(operation, response).await
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, RequestError> {
        let url = self.url(&self.endpoints.secure_token, "token")?;
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token)
            .finish();
        let response = self
            .client
            .post(url)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| RequestError::Transport(format!("token request failed: {e}")))?;
        decode("token", response).await
    }

    fn establish(&self, session: Session, refresh_token: String) -> Session {
        if !refresh_token.is_empty() {
            self.credentials.save(&StoredCredential {
                refresh_token,
                session: session.clone(),
            });
        }
        self.cell.publish(Some(session.clone()));
        session
    }

    async fn do_sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signInWithPassword",
                json!({
                    "email": email.trim(),
                    "password": password.expose_secret(),
                    "returnSecureToken": true,
                }),
            )
            .await?;
        let session = account.session();
        tracing::info!(user = %session.id(), "Signed in");
        Ok(self.establish(session, account.refresh_token))
    }

    async fn do_sign_up(&self, request: &SignUpRequest) -> Result<Session, AuthError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signUp",
                json!({
                    "email": request.email.trim(),
                    "password": request.password.expose_secret(),
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let mut refresh_token = account.refresh_token.clone();
        let mut display_name = None;
        let requested = request.display_name.trim();
        if !requested.is_empty() {
            let update: Result<UpdateResponse, _> = self
                .post_json(
                    "accounts:update",
                    json!({
                        "idToken": account.id_token,
                        "displayName": requested,
                        "returnSecureToken": true,
                    }),
                )
                .await;
            match update {
                Ok(update) => {
                    display_name = update.display_name.or_else(|| Some(requested.to_string()));
                    if let Some(token) = update.refresh_token {
                        refresh_token = token;
                    }
                }
                // The account exists either way; only the name is missing.
                Err(err) => tracing::warn!("Failed to set display name: {:?}", AuthError::from(err)),
            }
        }

        let session = Session::new(UserId::new(&account.local_id), &account.email, display_name);
        tracing::info!(user = %session.id(), "Account created");
        Ok(self.establish(session, refresh_token))
    }

    async fn do_restore(&self) -> Option<Session> {
        let stored = self.credentials.load()?;
        match self.exchange_refresh_token(&stored.refresh_token).await {
            Ok(token) if token.user_id == stored.session.id().as_str() => {
                tracing::info!(user = %token.user_id, "Restored session");
                Some(self.establish(stored.session, token.refresh_token))
            }
            Ok(token) => {
                tracing::warn!(user = %token.user_id, "Refresh token belongs to another user");
                self.credentials.clear();
                None
            }
            Err(RequestError::Rejected { status, message }) => {
                tracing::info!(status, %message, "Stored session rejected; continuing as guest");
                self.credentials.clear();
                None
            }
            Err(RequestError::Transport(detail)) => {
                tracing::warn!(%detail, "Could not restore session; continuing as guest");
                None
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> Result<T, RequestError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| RequestError::Transport(format!("{operation} response invalid: {e}")));
    }
    let body = read_capped_error_body(response).await;
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    Err(RequestError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Read at most `MAX_ERROR_BODY_BYTES` of an error body; the rest is never
/// pulled off the connection.
async fn read_capped_error_body(mut response: reqwest::Response) -> String {
    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                if body.len() > MAX_ERROR_BODY_BYTES {
                    body.truncate(MAX_ERROR_BODY_BYTES);
                    let text = String::from_utf8_lossy(&body);
                    return format!("{text}...(truncated)");
                }
            }
            Ok(None) => break,
            Err(err) if body.is_empty() => return format!("<unreadable body: {err}>"),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

impl IdentityBackend for RestIdentity {
    fn name(&self) -> &'static str {
        "rest"
    }

    fn sign_in<'a>(&'a self, email: &'a str, password: &'a SecretString) -> AuthFut<'a, Session> {
        Box::pin(self.do_sign_in(email, password))
    }

    fn sign_up<'a>(&'a self, request: &'a SignUpRequest) -> AuthFut<'a, Session> {
        Box::pin(self.do_sign_up(request))
    }

    fn sign_out(&self) -> AuthFut<'_, ()> {
        Box::pin(async move {
            self.credentials.clear();
            self.cell.publish(None);
            tracing::info!("Signed out");
            Ok(())
        })
    }

    fn restore(&self) -> AuthFut<'_, Option<Session>> {
        Box::pin(async move { Ok(self.do_restore().await) })
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.cell.subscribe()
    }
}
