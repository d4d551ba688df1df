//! End-to-end shell flows: routing, the menu, module frames and the account
//! affordances, driven through `dispatch` and `tick` only.

use fitsyn_engine::notifications::ToastVariant;
use fitsyn_engine::{Command, FrameLifecycle, MODULES, MenuAction, NotFoundFocus, Route};

use crate::common::{ShellBuilder, StalledLoader, ada, ms, settle, type_text};

#[tokio::test]
async fn deep_link_mounts_module_and_reveals_after_delays() {
    let mut shell = ShellBuilder::default().route("/yoga").build_in_memory();
    settle(&mut shell.app).await;

    let yoga = Route::resolve("/yoga");
    assert_eq!(shell.app.route(), &yoga);
    assert_eq!(shell.loader.urls(), vec![yoga.module().expect("module").url]);

    let frame = shell.app.frame().expect("frame mounted");
    assert_eq!(frame.lifecycle(), FrameLifecycle::Loaded);
    assert_eq!(
        shell.app.loading_message().as_deref(),
        Some("Loading AI Yoga…")
    );

    shell.app.tick(ms(850));
    assert!(shell.app.loading_message().is_none());

    shell.app.tick(ms(600));
    let frame = shell.app.frame().expect("frame mounted");
    assert_eq!(frame.lifecycle(), FrameLifecycle::Revealed);
    assert!((frame.content_opacity() - 1.0).abs() < f32::EPSILON);
    assert_eq!(frame.document().map(|d| d.status), Some(200));

    assert!(shell.app.can_go_back(), "deep link keeps home behind it");
    shell.app.dispatch(Command::Back);
    assert_eq!(shell.app.route(), &Route::Home);
    assert!(shell.app.frame().is_none());
}

#[tokio::test]
async fn stalled_module_keeps_loading_screen() {
    let mut builder = ShellBuilder::default().route("/tracker");
    builder.frame_loader = Some(std::sync::Arc::new(StalledLoader));
    let mut shell = builder.build_in_memory();
    settle(&mut shell.app).await;

    shell.app.tick(ms(10_000));
    assert_eq!(
        shell.app.frame().map(|f| f.lifecycle()),
        Some(FrameLifecycle::Loading)
    );
    assert_eq!(
        shell.app.loading_message().as_deref(),
        Some("Loading Tracker…")
    );
}

#[tokio::test]
async fn menu_entry_navigates_and_closes_menu() {
    let mut shell = ShellBuilder::default().build_in_memory();
    shell.app.dispatch(Command::ToggleMenu);
    shell.app.tick(ms(400));
    assert!(shell.app.menu().is_open());

    shell.app.dispatch(Command::FocusNext);
    shell.app.dispatch(Command::FocusNext);
    shell.app.dispatch(Command::Activate);
    settle(&mut shell.app).await;

    assert_eq!(shell.app.route(), &Route::Module(&MODULES[2]));
    assert!(!shell.app.menu().is_open());
    assert_eq!(shell.loader.urls(), vec![MODULES[2].url]);

    // Switching modules reuses the mounted frame with a fresh load.
    shell.app.dispatch(Command::Navigate(Route::Module(&MODULES[4])));
    settle(&mut shell.app).await;
    assert_eq!(shell.loader.urls(), vec![MODULES[2].url, MODULES[4].url]);
    assert_eq!(
        shell.app.frame().map(|f| f.module().title),
        Some(MODULES[4].title)
    );
}

#[tokio::test]
async fn menu_account_section_follows_session() {
    let guest = ShellBuilder::default().build_in_memory();
    let labels: Vec<&str> = guest
        .app
        .menu_view()
        .secondary
        .iter()
        .map(|item| item.label)
        .collect();
    assert_eq!(labels, ["Login", "Sign Up", "Continue as Guest", "Settings"]);
    assert!(guest.app.menu_view().profile.is_none());

    let mut member = ShellBuilder::default()
        .identity(ada().signed_in_as("ada@example.com"))
        .build_in_memory();
    settle(&mut member.app).await;
    let view = member.app.menu_view();
    let labels: Vec<&str> = view.secondary.iter().map(|item| item.label).collect();
    assert_eq!(labels, ["Settings", "Sign Out"]);
    assert_eq!(view.footer, "Logged in as Ada");
    assert_eq!(
        view.secondary.last().map(|item| &item.action),
        Some(&MenuAction::SignOut)
    );
}

#[tokio::test]
async fn menu_sign_out_returns_to_guest_and_closes_menu() {
    let mut shell = ShellBuilder::default()
        .identity(ada().signed_in_as("ada@example.com"))
        .build_in_memory();
    settle(&mut shell.app).await;
    assert!(shell.app.session().is_authenticated());

    shell.app.dispatch(Command::ToggleMenu);
    shell.app.tick(ms(400));
    let sign_out = shell.app.menu_view().len() - 1;
    for _ in 0..sign_out {
        shell.app.dispatch(Command::FocusNext);
    }
    shell.app.dispatch(Command::Activate);
    settle(&mut shell.app).await;

    assert!(!shell.app.session().is_authenticated());
    assert!(!shell.app.menu().is_open());
    assert_eq!(shell.app.route(), &Route::Home);
}

#[tokio::test]
async fn header_dropdown_sign_out_goes_home() {
    let mut shell = ShellBuilder::default()
        .identity(ada().signed_in_as("ada@example.com"))
        .route("/settings")
        .build_in_memory();
    settle(&mut shell.app).await;

    shell.app.dispatch(Command::UserControl);
    assert!(shell.app.dropdown().is_open());
    shell.app.dispatch(Command::DropdownSignOut);
    settle(&mut shell.app).await;

    assert!(!shell.app.session().is_authenticated());
    assert!(!shell.app.dropdown().is_open());
    assert_eq!(shell.app.route(), &Route::Home);
}

#[tokio::test]
async fn guest_user_control_opens_login() {
    let mut shell = ShellBuilder::default().build_in_memory();
    shell.app.dispatch(Command::UserControl);
    assert_eq!(shell.app.route(), &Route::Login);
    assert!(!shell.app.dropdown().is_open());
}

#[tokio::test]
async fn sign_up_flow_creates_account_and_goes_home() {
    let mut shell = ShellBuilder::default().route("/signup").build_in_memory();
    type_text(&mut shell.app, "Grace");
    shell.app.dispatch(Command::FocusNext);
    type_text(&mut shell.app, "grace@example.com");
    shell.app.dispatch(Command::FocusNext);
    type_text(&mut shell.app, "compiler");
    shell.app.dispatch(Command::Activate);
    assert!(shell.app.auth_in_flight());
    settle(&mut shell.app).await;

    assert_eq!(shell.app.route(), &Route::Home);
    assert_eq!(shell.app.session().display_name(), Some("Grace"));
    let toast = shell.app.toasts().latest().expect("toast");
    assert_eq!(toast.title, "Account created!");
    assert_eq!(toast.variant, ToastVariant::Default);
}

#[tokio::test]
async fn wrong_password_shows_error_and_stays_on_login() {
    let mut shell = ShellBuilder::default()
        .identity(ada())
        .route("/login")
        .build_in_memory();
    type_text(&mut shell.app, "ada@example.com");
    shell.app.dispatch(Command::FocusNext);
    type_text(&mut shell.app, "not-it");
    shell.app.dispatch(Command::Activate);
    settle(&mut shell.app).await;

    assert_eq!(shell.app.route(), &Route::Login);
    assert!(!shell.app.session().is_authenticated());
    assert!(!shell.app.login_form().is_busy());
    let toast = shell.app.toasts().latest().expect("toast");
    assert_eq!(toast.title, "Sign In Failed");
    assert_eq!(toast.description, "Incorrect password.");
    assert_eq!(toast.variant, ToastVariant::Destructive);
}

#[tokio::test]
async fn empty_login_asks_for_every_field() {
    let mut shell = ShellBuilder::default().route("/login").build_in_memory();
    shell.app.dispatch(Command::FocusNext);
    shell.app.dispatch(Command::Activate);
    settle(&mut shell.app).await;

    assert!(!shell.app.auth_in_flight());
    let toast = shell.app.toasts().latest().expect("toast");
    assert_eq!(toast.variant, ToastVariant::Destructive);
    assert_eq!(shell.app.route(), &Route::Login);
}

#[tokio::test]
async fn signed_in_user_is_bounced_from_auth_pages() {
    let mut shell = ShellBuilder::default()
        .identity(ada().signed_in_as("ada@example.com"))
        .build_in_memory();
    settle(&mut shell.app).await;

    shell.app.dispatch(Command::Navigate(Route::Login));
    assert_eq!(shell.app.route(), &Route::Home);
    shell.app.dispatch(Command::Navigate(Route::SignUp));
    assert_eq!(shell.app.route(), &Route::Home);
}

#[tokio::test]
async fn unknown_path_offers_home_and_back() {
    let mut shell = ShellBuilder::default()
        .route("/does-not-exist")
        .build_in_memory();
    assert_eq!(
        shell.app.route(),
        &Route::NotFound("/does-not-exist".to_string())
    );
    assert_eq!(shell.app.not_found_focus(), NotFoundFocus::Home);

    shell.app.dispatch(Command::FocusNext);
    assert_eq!(shell.app.not_found_focus(), NotFoundFocus::Back);
    shell.app.dispatch(Command::Activate);
    assert_eq!(shell.app.route(), &Route::Home);
}

#[tokio::test]
async fn muted_shell_plays_no_cues() {
    let mut shell = ShellBuilder::default().build_in_memory();
    shell.app.dispatch(Command::ToggleMenu);
    shell.app.tick(ms(200));
    let audible = shell.audio.count();
    assert!(audible >= 2, "click and swoosh");

    shell.app.dispatch(Command::ToggleMute);
    assert!(shell.app.is_muted());
    shell.app.dispatch(Command::ToggleMenu);
    shell.app.tick(ms(200));
    assert_eq!(shell.audio.count(), audible);
}

#[tokio::test]
async fn splash_blocks_input_until_it_completes() {
    let mut shell = ShellBuilder::default().with_splash().build_in_memory();
    assert!(shell.app.show_splash());
    shell.app.dispatch(Command::ToggleMenu);
    assert!(!shell.app.menu().is_open());

    shell.app.tick(ms(3000));
    assert!(!shell.app.show_splash());
    shell.app.dispatch(Command::ToggleMenu);
    assert!(shell.app.menu().is_open());
}
