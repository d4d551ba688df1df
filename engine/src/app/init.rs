//! Application construction.

use std::sync::Arc;

use fitsyn_config::ShellConfig;
use fitsyn_identity::IdentityBackend;
use fitsyn_types::Route;
use tokio::sync::mpsc;

use super::{App, NotFoundFocus};
use crate::forms::{LoginForm, SignUpForm};
use crate::frame::{FrameLoader, HttpFrameLoader, UnavailableLoader};
use crate::header::AccountDropdown;
use crate::hit::HitMap;
use crate::home::QuickStart;
use crate::menu::NavigationMenu;
use crate::notifications::ToastQueue;
use crate::router::Router;
use crate::session::SessionObserver;
use crate::settings::SettingsPage;
use crate::sound::{AudioOutput, SoundCue, default_output};
use crate::splash::SplashGate;
use crate::storage::{FileStore, KeyValueStore, UnavailableStore};
use crate::theme::ThemePreference;

/// Everything the app needs from the outside world.
pub struct AppParts {
    pub config: ShellConfig,
    /// Survives restarts (theme).
    pub durable: Box<dyn KeyValueStore>,
    /// Cleared when the terminal session ends (splash marker).
    pub session_store: Box<dyn KeyValueStore>,
    pub identity: Arc<dyn IdentityBackend>,
    pub frame_loader: Arc<dyn FrameLoader>,
    pub audio: Box<dyn AudioOutput>,
    pub initial_route: Route,
    pub quick_start: QuickStart,
}

impl AppParts {
    /// Production wiring: file-backed stores, the configured identity
    /// backend, HTTP module loads and the platform audio output.
    #[must_use]
    pub fn from_config(config: ShellConfig) -> Self {
        let durable: Box<dyn KeyValueStore> = match FileStore::durable() {
            Some(store) => Box::new(store),
            None => {
                tracing::warn!("No home directory; preferences will not persist");
                Box::new(UnavailableStore::new("no home directory"))
            }
        };
        let frame_loader: Arc<dyn FrameLoader> = match HttpFrameLoader::new() {
            Ok(loader) => Arc::new(loader),
            Err(err) => {
                tracing::warn!("Failed to build HTTP client for module frames: {err}");
                Arc::new(UnavailableLoader::new(err.to_string()))
            }
        };
        let identity = fitsyn_identity::backend_from_config(config.identity.as_ref());
        Self {
            config,
            durable,
            session_store: Box::new(FileStore::session_scoped()),
            identity,
            frame_loader,
            audio: default_output(),
            initial_route: Route::Home,
            quick_start: QuickStart::today(),
        }
    }
}

impl App {
    /// Build the shell and start background work (session restore and, for a
    /// module start route, the first frame load). Must be called from within
    /// a Tokio runtime.
    #[must_use]
    pub fn new(parts: AppParts) -> Self {
        let AppParts {
            config,
            durable,
            session_store,
            identity,
            frame_loader,
            audio,
            initial_route,
            quick_start,
        } = parts;
        let timings = config.timings;

        let splash = SplashGate::mount(
            session_store.as_ref(),
            timings.splash_min_duration,
            timings.splash_settle,
        );
        let theme = ThemePreference::load(durable.as_ref(), timings.theme_transition);
        let session = SessionObserver::new(identity);
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();

        tracing::info!(
            backend = session.backend_name(),
            theme = %theme.theme(),
            splash = splash.show_splash(),
            "Shell starting"
        );

        let mut app = Self {
            ui: config.ui,
            timings,
            durable,
            session_store,
            splash,
            router: Router::new(Route::Home),
            frame: None,
            frame_loader,
            frame_task: None,
            frame_tx,
            frame_rx,
            menu: NavigationMenu::new(timings.menu_slide),
            dropdown: AccountDropdown::default(),
            session,
            theme,
            sound: SoundCue::new(audio, config.start_muted),
            toasts: ToastQueue::new(timings.toast_lifetime),
            login: LoginForm::default(),
            signup: SignUpForm::default(),
            settings: SettingsPage::default(),
            home_focus: 0,
            not_found_focus: NotFoundFocus::Home,
            quick_start,
            hits: HitMap::default(),
            should_quit: false,
        };
        app.session.restore();
        if initial_route != Route::Home {
            app.navigate(initial_route);
        }
        app
    }
}
