//! Shell rendering through a vt100 virtual terminal.

mod common;
mod vt100_backend;

use fitsyn_engine::hit::ClickTarget;
use fitsyn_engine::{App, Command, Route};
use insta::assert_snapshot;
use ratatui::Terminal;

use common::{ShellBuilder, ms, settle, type_text};
use vt100_backend::VT100Backend;

const WIDTH: u16 = 100;
const HEIGHT: u16 = 40;

fn terminal() -> Terminal<VT100Backend> {
    Terminal::new(VT100Backend::new(WIDTH, HEIGHT)).expect("failed to create terminal")
}

fn render(terminal: &mut Terminal<VT100Backend>, app: &mut App) {
    terminal
        .draw(|frame| fitsyn_tui::draw(frame, app))
        .expect("failed to draw");
}

#[tokio::test]
async fn splash_covers_the_first_frame() {
    let mut shell = ShellBuilder::default().with_splash().build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    let screen = terminal.backend().contents();
    assert!(screen.contains("FitSyn"));
    assert!(screen.contains("AI-Powered Fitness"));
    assert!(!screen.contains("Explore Modules"));

    shell.app.tick(ms(3000));
    render(&mut terminal, &mut shell.app);
    assert!(terminal.backend().contents().contains("Explore Modules"));
}

#[tokio::test]
async fn guest_home_page() {
    let mut shell = ShellBuilder::default().build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    let screen = terminal.backend().contents();
    assert!(screen.contains("FitSyn › Home"));
    assert!(screen.contains("Start Training"));
    assert!(screen.contains("Quick Start"));
    assert!(screen.contains("Explore Modules"));

    assert_snapshot!(terminal.backend().row(HEIGHT - 1).trim(), @"Ctrl+N menu  Ctrl+S sound  Ctrl+U account  Tab focus  Enter select  Ctrl+C quit");
}

#[tokio::test]
async fn back_hint_appears_once_there_is_history() {
    let mut shell = ShellBuilder::default().route("/settings").build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    assert_snapshot!(terminal.backend().row(HEIGHT - 1).trim(), @"Ctrl+N menu  Ctrl+S sound  Ctrl+U account  Tab focus  Enter select  Ctrl+B back  Ctrl+C quit");
    let screen = terminal.backend().contents();
    assert!(screen.contains("Customize your FitSyn experience"));
}

#[tokio::test]
async fn login_page_masks_password() {
    let mut shell = ShellBuilder::default().route("/login").build_in_memory();
    type_text(&mut shell.app, "ada@example.com");
    shell.app.dispatch(Command::FocusNext);
    type_text(&mut shell.app, "hunter22");

    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);
    let screen = terminal.backend().contents();
    assert!(screen.contains("Welcome Back"));
    assert!(screen.contains("ada@example.com"));
    assert!(!screen.contains("hunter22"));
    assert!(screen.contains("Continue as Guest"));

    shell.app.dispatch(Command::ToggleShowPassword);
    render(&mut terminal, &mut shell.app);
    assert!(terminal.backend().contents().contains("hunter22"));
}

#[tokio::test]
async fn hamburger_click_opens_menu() {
    let mut shell = ShellBuilder::default().build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    let hamburger = shell
        .app
        .hits_mut()
        .region_of(ClickTarget::Hamburger)
        .expect("hamburger drawn");
    shell.app.dispatch(Command::Click {
        column: hamburger.x,
        row: hamburger.y,
    });
    shell.app.tick(ms(400));
    assert!(shell.app.menu().is_open());

    render(&mut terminal, &mut shell.app);
    let screen = terminal.backend().contents();
    assert!(screen.contains("MODULES"));
    assert!(screen.contains("AI Workout Generator"));
    assert!(screen.contains("ACCOUNT"));

    // A click on the dimmed backdrop closes it again.
    shell.app.dispatch(Command::Click {
        column: WIDTH - 2,
        row: HEIGHT / 2,
    });
    assert!(!shell.app.menu().is_open());
}

#[tokio::test]
async fn clicking_rendered_sign_in_opens_login() {
    let mut shell = ShellBuilder::default().build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    let (column, row) = terminal.backend().find("Sign In").expect("sign in shown");
    shell.app.dispatch(Command::Click { column, row });
    assert_eq!(shell.app.route(), &Route::Login);
}

#[tokio::test]
async fn module_page_shows_loader_then_frame() {
    let mut shell = ShellBuilder::default().route("/yoga").build_in_memory();
    settle(&mut shell.app).await;
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);
    assert!(terminal.backend().contents().contains("Loading AI Yoga…"));

    shell.app.tick(ms(2000));
    render(&mut terminal, &mut shell.app);
    let screen = terminal.backend().contents();
    let url = shell.app.route().module().expect("module").url;
    assert!(!screen.contains("Loading AI Yoga…"));
    assert!(screen.contains(url));
    assert!(screen.contains("Sandbox"));
}

#[tokio::test]
async fn unknown_route_renders_not_found() {
    let mut shell = ShellBuilder::default().route("/nope").build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    let screen = terminal.backend().contents();
    assert!(screen.contains("404"));
    assert!(screen.contains("Oops! This workout doesn't exist."));
    assert!(screen.contains("/nope"));
    assert!(screen.contains("Go Home"));
}

#[tokio::test]
async fn error_toast_is_drawn() {
    let mut shell = ShellBuilder::default().route("/login").build_in_memory();
    shell.app.dispatch(Command::FocusNext);
    shell.app.dispatch(Command::Activate);

    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);
    let toast = shell.app.toasts().latest().expect("toast");
    assert!(terminal.backend().to_string().contains(&toast.title));
}

#[tokio::test]
async fn escape_sequences_in_path_are_not_replayed() {
    let mut shell = ShellBuilder::default()
        .route("/evil\x1b[2J\x1b]0;pwned\x07")
        .build_in_memory();
    let mut terminal = terminal();
    render(&mut terminal, &mut shell.app);

    let screen = terminal.backend().contents();
    assert!(screen.contains("/evil"));
    assert!(!screen.contains("pwned"));
    assert!(terminal.backend().row(0).contains("FitSyn"));
}
