//! The shell composition root.
//!
//! `App` owns every shell state machine and is driven from a single thread:
//! the front end calls [`App::dispatch`] for user input and [`App::tick`] with
//! the elapsed time. Async work (auth requests, module loads) runs on spawned
//! Tokio tasks whose results come back through channels drained by `tick`,
//! so every state transition happens inside one of those two calls.

mod actions;
mod commands;
mod init;

use std::sync::Arc;
use std::time::Duration;

use fitsyn_config::Timings;
use fitsyn_types::ui::UiOptions;
use fitsyn_types::{MODULE_FRAME_POLICY, MenuView, ModuleDescriptor, Route, SessionState, Theme};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::forms::{LoginForm, SignUpForm};
use crate::frame::{
    FrameDocument, FrameLoadError, FrameLoader, FrameRequest, ModuleFrame, RevealTimings,
};
use crate::header::AccountDropdown;
use crate::hit::HitMap;
use crate::home::{HomeAction, QuickStart, home_actions};
use crate::menu::NavigationMenu;
use crate::notifications::ToastQueue;
use crate::router::Router;
use crate::session::SessionObserver;
use crate::settings::SettingsPage;
use crate::sound::SoundCue;
use crate::splash::SplashGate;
use crate::storage::KeyValueStore;
use crate::theme::ThemePreference;

pub use commands::Command;
pub use init::AppParts;

/// Focus on the not-found page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundFocus {
    Home,
    Back,
}

#[derive(Debug)]
struct FrameOutcome {
    generation: u64,
    result: Result<FrameDocument, FrameLoadError>,
}

pub struct App {
    ui: UiOptions,
    timings: Timings,
    durable: Box<dyn KeyValueStore>,
    session_store: Box<dyn KeyValueStore>,
    splash: SplashGate,
    router: Router,
    frame: Option<ModuleFrame>,
    frame_loader: Arc<dyn FrameLoader>,
    frame_task: Option<JoinHandle<()>>,
    frame_tx: mpsc::UnboundedSender<FrameOutcome>,
    frame_rx: mpsc::UnboundedReceiver<FrameOutcome>,
    menu: NavigationMenu,
    dropdown: AccountDropdown,
    session: SessionObserver,
    theme: ThemePreference,
    sound: SoundCue,
    toasts: ToastQueue,
    login: LoginForm,
    signup: SignUpForm,
    settings: SettingsPage,
    home_focus: usize,
    not_found_focus: NotFoundFocus,
    quick_start: QuickStart,
    hits: HitMap,
    should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("route", self.router.current())
            .field("splash", &self.splash)
            .field("frame", &self.frame)
            .field("menu", &self.menu)
            .field("session", &self.session)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Advance every timer-driven state machine by `delta` and apply any
    /// completed async work.
    pub fn tick(&mut self, delta: Duration) {
        if self.splash.advance(delta, self.session_store.as_ref()) {
            tracing::debug!("Splash dismissed");
        }
        if let Some(frame) = &mut self.frame {
            frame.advance(delta);
        }
        // A load delivered on this tick starts its reveal delay at zero.
        self.drain_frame_loads();
        self.menu.advance(delta);
        self.theme.advance(delta);
        self.sound.advance(delta);
        self.toasts.advance(delta);
        self.drain_auth();
    }

    fn drain_frame_loads(&mut self) {
        while let Ok(outcome) = self.frame_rx.try_recv() {
            if let Some(frame) = &mut self.frame {
                frame.on_load(outcome.generation, outcome.result);
            }
        }
    }

    fn drain_auth(&mut self) {
        if self.session.sync() {
            self.session_changed();
        }
        while let Some(outcome) = self.session.try_next_outcome() {
            if self.session.sync() {
                self.session_changed();
            }
            self.apply_auth_outcome(outcome);
        }
    }

    fn session_changed(&mut self) {
        if !self.session.state().is_authenticated() {
            self.dropdown.close();
        } else if self.router.current().is_auth_page() {
            self.router.replace(Route::Home);
            self.route_changed();
        }
    }

    /// Go to `route`. Auth pages redirect home for a signed-in user.
    pub(crate) fn navigate(&mut self, route: Route) {
        let route = if route.is_auth_page() && self.session.state().is_authenticated() {
            Route::Home
        } else {
            route
        };
        if self.router.navigate(route) {
            self.route_changed();
        }
    }

    pub(crate) fn go_back(&mut self) {
        self.router.back();
        if self.router.current().is_auth_page() && self.session.state().is_authenticated() {
            self.router.replace(Route::Home);
        }
        self.route_changed();
    }

    fn route_changed(&mut self) {
        self.dropdown.close();
        match self.router.current().clone() {
            Route::Module(module) => self.mount_frame(module),
            other => {
                self.unmount_frame();
                match other {
                    Route::Home => self.home_focus = 0,
                    Route::Login => self.login = LoginForm::default(),
                    Route::SignUp => self.signup = SignUpForm::default(),
                    Route::Settings => self.settings.select(crate::settings::SettingsRow::Theme),
                    Route::NotFound(_) => self.not_found_focus = NotFoundFocus::Home,
                    Route::Module(_) => {}
                }
            }
        }
    }

    fn mount_frame(&mut self, module: &'static ModuleDescriptor) {
        let request = match &mut self.frame {
            Some(frame) => frame.set_module(module),
            None => {
                let mut frame = ModuleFrame::new(module, RevealTimings::from(&self.timings));
                let request = frame.start();
                self.frame = Some(frame);
                Some(request)
            }
        };
        if let Some(request) = request {
            self.spawn_frame_load(request);
        }
    }

    fn unmount_frame(&mut self) {
        if let Some(task) = self.frame_task.take() {
            task.abort();
        }
        if let Some(frame) = &mut self.frame {
            frame.unmount();
        }
    }

    fn spawn_frame_load(&mut self, request: FrameRequest) {
        if let Some(task) = self.frame_task.take() {
            task.abort();
        }
        let load = self.frame_loader.load(request.url, &MODULE_FRAME_POLICY);
        let tx = self.frame_tx.clone();
        let generation = request.generation;
        self.frame_task = Some(tokio::spawn(async move {
            let result = load.await;
            let _ = tx.send(FrameOutcome { generation, result });
        }));
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui
    }

    #[must_use]
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    #[must_use]
    pub fn splash(&self) -> &SplashGate {
        &self.splash
    }

    /// The splash covers everything and input is ignored until it completes.
    #[must_use]
    pub fn show_splash(&self) -> bool {
        self.splash.show_splash()
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        self.router.current()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.router.can_go_back()
    }

    /// The mounted module frame, when the current route is a module page.
    #[must_use]
    pub fn frame(&self) -> Option<&ModuleFrame> {
        self.router.current().module()?;
        self.frame.as_ref()
    }

    /// "Loading <title>…" while the module's loading screen is up.
    #[must_use]
    pub fn loading_message(&self) -> Option<String> {
        let frame = self.frame()?;
        frame
            .shows_loader()
            .then(|| frame.module().loading_message())
    }

    #[must_use]
    pub fn menu(&self) -> &NavigationMenu {
        &self.menu
    }

    /// Menu contents for the current session, rebuilt on every call.
    #[must_use]
    pub fn menu_view(&self) -> MenuView {
        MenuView::build(self.session.state())
    }

    #[must_use]
    pub fn dropdown(&self) -> &AccountDropdown {
        &self.dropdown
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    /// Whether an auth request is still awaiting the backend.
    #[must_use]
    pub fn auth_in_flight(&self) -> bool {
        self.session.is_busy()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    #[must_use]
    pub fn theme_preference(&self) -> &ThemePreference {
        &self.theme
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.sound.is_muted()
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    #[must_use]
    pub fn login_form(&self) -> &LoginForm {
        &self.login
    }

    #[must_use]
    pub fn signup_form(&self) -> &SignUpForm {
        &self.signup
    }

    #[must_use]
    pub fn settings_page(&self) -> &SettingsPage {
        &self.settings
    }

    #[must_use]
    pub fn quick_start(&self) -> &QuickStart {
        &self.quick_start
    }

    #[must_use]
    pub fn home_actions(&self) -> Vec<HomeAction> {
        home_actions(self.session.state())
    }

    #[must_use]
    pub fn home_focus(&self) -> Option<HomeAction> {
        let actions = self.home_actions();
        actions
            .get(self.home_focus.min(actions.len().saturating_sub(1)))
            .copied()
    }

    #[must_use]
    pub fn not_found_focus(&self) -> NotFoundFocus {
        self.not_found_focus
    }

    /// Hit regions; the renderer clears and refills this every frame.
    pub fn hits_mut(&mut self) -> &mut HitMap {
        &mut self.hits
    }
}
