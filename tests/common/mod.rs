//! Shared test utilities and fixtures
//!
//! Builds a fully wired [`App`] from in-memory parts so integration tests can
//! drive it through `dispatch` and `tick` the way the front end does.

#![allow(dead_code)]

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fitsyn_config::IdentityConfig;
use fitsyn_engine::frame::{FrameDocument, FrameLoader, LoadFut};
use fitsyn_engine::home::QuickStart;
use fitsyn_engine::sound::{AudioError, AudioOutput, Tone};
use fitsyn_engine::splash::SPLASH_MARKER_KEY;
use fitsyn_engine::storage::{KeyValueStore, MemoryStore};
use fitsyn_engine::{App, AppParts, Command, Route, ShellConfig};
use fitsyn_identity::{IdentityBackend, InMemoryIdentity};
use fitsyn_types::{FramePolicy, SecretString};
use wiremock::MockServer;

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Counts tones instead of playing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    tones: Arc<Mutex<Vec<Tone>>>,
}

impl RecordingAudio {
    pub fn count(&self) -> usize {
        self.tones.lock().map(|t| t.len()).unwrap_or_default()
    }
}

impl AudioOutput for RecordingAudio {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
        if let Ok(mut tones) = self.tones.lock() {
            tones.push(tone);
        }
        Ok(())
    }
}

/// Resolves every module load at once and remembers the URLs.
#[derive(Debug, Clone, Default)]
pub struct InstantLoader {
    urls: Arc<Mutex<Vec<String>>>,
}

impl InstantLoader {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl FrameLoader for InstantLoader {
    fn load(&self, url: &str, _policy: &FramePolicy) -> LoadFut {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        Box::pin(async {
            Ok(FrameDocument {
                status: 200,
                content_length: 2048,
                content_type: Some("text/html; charset=utf-8".to_string()),
            })
        })
    }
}

/// Never resolves.
#[derive(Debug, Clone, Default)]
pub struct StalledLoader;

impl FrameLoader for StalledLoader {
    fn load(&self, _url: &str, _policy: &FramePolicy) -> LoadFut {
        Box::pin(std::future::pending())
    }
}

pub struct Shell {
    pub app: App,
    pub audio: RecordingAudio,
    pub loader: InstantLoader,
    pub durable: MemoryStore,
    pub session_store: MemoryStore,
}

/// Knobs for one shell instance. Defaults skip the splash.
pub struct ShellBuilder {
    pub config: ShellConfig,
    pub identity: Arc<dyn IdentityBackend>,
    pub durable: Box<dyn KeyValueStore>,
    pub session_store: Box<dyn KeyValueStore>,
    pub frame_loader: Option<Arc<dyn FrameLoader>>,
    pub route: Route,
    pub skip_splash: bool,
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self {
            config: ShellConfig::default(),
            identity: Arc::new(InMemoryIdentity::new()),
            durable: Box::new(MemoryStore::new()),
            session_store: Box::new(MemoryStore::new()),
            frame_loader: None,
            route: Route::Home,
            skip_splash: true,
        }
    }
}

impl ShellBuilder {
    pub fn identity(mut self, identity: impl IdentityBackend + 'static) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn route(mut self, path: &str) -> Self {
        self.route = Route::resolve(path);
        self
    }

    pub fn with_splash(mut self) -> Self {
        self.skip_splash = false;
        self
    }

    /// Build with caller-supplied stores; the returned memory stores are
    /// unused placeholders.
    pub fn build(self) -> Shell {
        if self.skip_splash {
            self.session_store
                .set(SPLASH_MARKER_KEY, "true")
                .expect("seed splash marker");
        }
        let audio = RecordingAudio::default();
        let loader = InstantLoader::default();
        let frame_loader = self
            .frame_loader
            .unwrap_or_else(|| Arc::new(loader.clone()) as Arc<dyn FrameLoader>);
        let app = App::new(AppParts {
            config: self.config,
            durable: self.durable,
            session_store: self.session_store,
            identity: self.identity,
            frame_loader,
            audio: Box::new(audio.clone()),
            initial_route: self.route,
            quick_start: QuickStart::for_weekday(chrono::Weekday::Mon),
        });
        Shell {
            app,
            audio,
            loader,
            durable: MemoryStore::new(),
            session_store: MemoryStore::new(),
        }
    }

    /// Build with shared memory stores the test can inspect afterwards.
    pub fn build_in_memory(mut self) -> Shell {
        let durable = MemoryStore::new();
        let session_store = MemoryStore::new();
        self.durable = Box::new(durable.clone());
        self.session_store = Box::new(session_store.clone());
        let mut shell = self.build();
        shell.durable = durable;
        shell.session_store = session_store;
        shell
    }
}

/// Let spawned in-process tasks finish and apply their results.
pub async fn settle(app: &mut App) {
    for _ in 0..50 {
        tokio::task::yield_now().await;
        app.tick(Duration::ZERO);
    }
}

/// Tick until `done` holds. Real HTTP round trips need wall-clock time, so
/// this sleeps between ticks and gives up after five seconds.
pub async fn settle_until(app: &mut App, done: impl Fn(&App) -> bool) -> bool {
    for _ in 0..500 {
        app.tick(Duration::ZERO);
        if done(app) {
            return true;
        }
        tokio::time::sleep(ms(10)).await;
    }
    false
}

pub fn type_text(app: &mut App, text: &str) {
    app.dispatch(Command::Paste(text.to_string()));
}

pub fn ada() -> InMemoryIdentity {
    InMemoryIdentity::new().with_account("ada@example.com", "engine1", Some("Ada"))
}

/// Identity settings pointing the REST backend at a mock server.
pub fn identity_config(server: &MockServer) -> IdentityConfig {
    IdentityConfig {
        api_key: SecretString::new("test-key"),
        project_id: "fitsyn-test".to_string(),
        auth_domain: "fitsyn-test.example".to_string(),
        endpoint: Some(server.uri()),
    }
}

/// Run `f` with a bounded wait so a hung backend fails the test instead of
/// stalling the suite.
pub async fn within<T>(f: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("timed out")
}
