//! The shell wired to the hosted identity REST API, served by a mock server.

use fitsyn_engine::Command;
use fitsyn_engine::Route;
use fitsyn_identity::credential::{CredentialStore, StoredCredential};
use fitsyn_identity::{RestIdentity, UnconfiguredIdentity};
use fitsyn_types::{Session, UserId};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{ShellBuilder, identity_config, settle, settle_until, type_text};

const SIGN_IN: &str = "/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";
const TOKEN: &str = "/securetoken.googleapis.com/v1/token";

fn service_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": { "code": 400, "message": message, "errors": [] }
    }))
}

fn fill_login(app: &mut fitsyn_engine::App, email: &str, password: &str) {
    type_text(app, email);
    app.dispatch(Command::FocusNext);
    type_text(app, password);
    app.dispatch(Command::Activate);
}

#[tokio::test]
async fn login_page_signs_in_against_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "password": "analytical",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-ada",
            "email": "ada@example.com",
            "displayName": "Ada",
            "idToken": "id-token",
            "refreshToken": "refresh-1",
            "registered": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let credentials = CredentialStore::at(dir.path().join("identity.json"));
    let backend =
        RestIdentity::new(&identity_config(&server), credentials.clone()).expect("client");
    let mut shell = ShellBuilder::default()
        .identity(backend)
        .route("/login")
        .build_in_memory();

    fill_login(&mut shell.app, "ada@example.com", "analytical");
    assert!(shell.app.auth_in_flight());
    assert!(
        settle_until(&mut shell.app, |app| !app.auth_in_flight()).await,
        "sign-in never completed"
    );

    assert_eq!(shell.app.route(), &Route::Home);
    assert_eq!(shell.app.session().display_name(), Some("Ada"));
    let toast = shell.app.toasts().latest().expect("toast");
    assert_eq!(toast.title, "Welcome back!");
    assert_eq!(
        credentials.load().map(|c| c.refresh_token).as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn service_rejection_maps_to_friendly_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(service_error("EMAIL_NOT_FOUND"))
        .mount(&server)
        .await;

    let backend = RestIdentity::new(&identity_config(&server), CredentialStore::disabled())
        .expect("client");
    let mut shell = ShellBuilder::default()
        .identity(backend)
        .route("/login")
        .build_in_memory();

    fill_login(&mut shell.app, "nobody@example.com", "whatever");
    assert!(settle_until(&mut shell.app, |app| !app.auth_in_flight()).await);

    assert_eq!(shell.app.route(), &Route::Login);
    assert!(!shell.app.session().is_authenticated());
    let toast = shell.app.toasts().latest().expect("toast");
    assert_eq!(toast.title, "Sign In Failed");
    assert_eq!(toast.description, "No account found with this email.");
}

#[tokio::test]
async fn stored_credential_restores_session_at_startup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_token": "fresh-id",
            "refresh_token": "rotated-token",
            "user_id": "uid-ada",
            "expires_in": "3600"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let credentials = CredentialStore::at(dir.path().join("identity.json"));
    credentials.save(&StoredCredential {
        refresh_token: "stored-token".to_string(),
        session: Session::new(UserId::new("uid-ada"), "ada@example.com", Some("Ada".into())),
    });
    let backend =
        RestIdentity::new(&identity_config(&server), credentials.clone()).expect("client");
    let mut shell = ShellBuilder::default().identity(backend).build_in_memory();
    assert!(!shell.app.session().is_authenticated(), "guest until restored");

    assert!(
        settle_until(&mut shell.app, |app| app.session().is_authenticated()).await,
        "session never restored"
    );
    assert_eq!(shell.app.session().display_name(), Some("Ada"));
    assert_eq!(
        credentials.load().map(|c| c.refresh_token).as_deref(),
        Some("rotated-token")
    );

    // Sign-out forgets the stored credential.
    shell.app.dispatch(Command::UserControl);
    shell.app.dispatch(Command::DropdownSignOut);
    assert!(settle_until(&mut shell.app, |app| !app.session().is_authenticated()).await);
    assert!(credentials.load().is_none());
}

#[tokio::test]
async fn revoked_credential_leaves_a_guest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN))
        .respond_with(service_error("TOKEN_EXPIRED"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let credentials = CredentialStore::at(dir.path().join("identity.json"));
    credentials.save(&StoredCredential {
        refresh_token: "stale".to_string(),
        session: Session::new(UserId::new("uid-ada"), "ada@example.com", None),
    });
    let backend =
        RestIdentity::new(&identity_config(&server), credentials.clone()).expect("client");
    let mut shell = ShellBuilder::default().identity(backend).build_in_memory();

    assert!(settle_until(&mut shell.app, |app| !app.auth_in_flight()).await);
    assert!(!shell.app.session().is_authenticated());
    assert!(shell.app.toasts().is_empty(), "restore failures are silent");
}

#[tokio::test]
async fn unconfigured_backend_explains_itself() {
    let mut shell = ShellBuilder::default()
        .identity(UnconfiguredIdentity::new())
        .route("/login")
        .build_in_memory();

    fill_login(&mut shell.app, "ada@example.com", "analytical");
    settle(&mut shell.app).await;

    let toast = shell.app.toasts().latest().expect("toast");
    assert_eq!(
        toast.description,
        "Sign-in is not configured for this installation."
    );
    assert_eq!(shell.app.route(), &Route::Login);
}
