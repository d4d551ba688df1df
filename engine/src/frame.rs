//! Embedded module frame lifecycle.
//!
//! ```text
//! Idle ──start──▶ Loading ──load signal──▶ Loaded(Masking) ──reveal_delay──▶ Loaded(Settling)
//!                    ▲                                                          │
//!                    │ module change (any state)                          fade_delay
//!                    │                                                          ▼
//!                    └──────────────────────────────────────────────── Revealed(fade)
//! ```
//!
//! Every pending delay lives inside the state it belongs to, and every load
//! request carries the generation it was issued for. Changing the module
//! replaces the state (dropping its timers) and bumps the generation, so a
//! late load signal for the previous module is ignored.
//!
//! There is no load timeout: a module whose document never arrives stays in
//! `Loading`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use fitsyn_types::ui::EffectTimer;
use fitsyn_types::{FrameLifecycle, FramePolicy, MODULE_FRAME_POLICY, ModuleDescriptor};
use thiserror::Error;

/// What the module's document looked like when it finished loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDocument {
    pub status: u16,
    pub content_length: u64,
    pub content_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum FrameLoadError {
    #[error("invalid module url {url}: {detail}")]
    InvalidUrl { url: String, detail: String },
    #[error("loading {url} failed: {detail}")]
    Request { url: String, detail: String },
}

pub type LoadFut = Pin<Box<dyn Future<Output = Result<FrameDocument, FrameLoadError>> + Send>>;

/// Fetches a module document; completion is the frame's load signal.
pub trait FrameLoader: Send + Sync {
    fn load(&self, url: &str, policy: &FramePolicy) -> LoadFut;
}

/// Loads module documents over HTTP(S). No request timeout.
#[derive(Debug, Clone)]
pub struct HttpFrameLoader {
    client: reqwest::Client,
}

impl HttpFrameLoader {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fitsyn/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl FrameLoader for HttpFrameLoader {
    fn load(&self, url: &str, policy: &FramePolicy) -> LoadFut {
        let client = self.client.clone();
        let url = url.to_string();
        let allow = policy.allow_attribute();
        Box::pin(async move {
            let parsed = url::Url::parse(&url).map_err(|e| FrameLoadError::InvalidUrl {
                url: url.clone(),
                detail: e.to_string(),
            })?;
            let response = client
                .get(parsed)
                .header("Sec-Fetch-Dest", "iframe")
                .header("Permissions-Policy", allow)
                .send()
                .await
                .map_err(|e| FrameLoadError::Request {
                    url: url.clone(),
                    detail: e.to_string(),
                })?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            // The load event fires once the whole document has arrived.
            let body = response.bytes().await.map_err(|e| FrameLoadError::Request {
                url: url.clone(),
                detail: e.to_string(),
            })?;
            Ok(FrameDocument {
                status,
                content_length: body.len() as u64,
                content_type,
            })
        })
    }
}

/// Stand-in when no HTTP client could be built. Every load fails, so module
/// frames stay on their loading screen.
#[derive(Debug, Clone)]
pub struct UnavailableLoader {
    reason: String,
}

impl UnavailableLoader {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FrameLoader for UnavailableLoader {
    fn load(&self, url: &str, _policy: &FramePolicy) -> LoadFut {
        let err = FrameLoadError::Request {
            url: url.to_string(),
            detail: self.reason.clone(),
        };
        Box::pin(async move { Err(err) })
    }
}

/// Delays between the load signal and full visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimings {
    pub reveal_delay: Duration,
    pub fade_delay: Duration,
    pub fade: Duration,
}

impl From<&fitsyn_config::Timings> for RevealTimings {
    fn from(t: &fitsyn_config::Timings) -> Self {
        Self {
            reveal_delay: t.frame_reveal_delay,
            fade_delay: t.frame_fade_delay,
            fade: t.frame_fade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStage {
    /// Document loaded; the loading screen still covers it.
    Masking(EffectTimer),
    /// Loading screen gone; content still transparent.
    Settling(EffectTimer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Loading,
    Loaded {
        document: FrameDocument,
        stage: RevealStage,
    },
    Revealed {
        document: FrameDocument,
        fade: EffectTimer,
    },
}

/// A load the caller must start. Deliver the outcome with
/// [`ModuleFrame::on_load`] and the same generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    pub generation: u64,
    pub url: &'static str,
}

#[derive(Debug, Clone)]
pub struct ModuleFrame {
    module: &'static ModuleDescriptor,
    generation: u64,
    state: FrameState,
    timings: RevealTimings,
}

impl ModuleFrame {
    #[must_use]
    pub fn new(module: &'static ModuleDescriptor, timings: RevealTimings) -> Self {
        Self {
            module,
            generation: 0,
            state: FrameState::Idle,
            timings,
        }
    }

    /// Mount: enter `Loading` and request the document.
    pub fn start(&mut self) -> FrameRequest {
        self.generation = self.generation.wrapping_add(1);
        self.state = FrameState::Loading;
        tracing::debug!(
            module = self.module.title,
            generation = self.generation,
            "Frame loading"
        );
        FrameRequest {
            generation: self.generation,
            url: self.module.url,
        }
    }

    /// Point the frame at another module. Always restarts from `Loading`,
    /// discarding any loaded or revealed state and its pending timers.
    pub fn set_module(&mut self, module: &'static ModuleDescriptor) -> Option<FrameRequest> {
        if std::ptr::eq(self.module, module) && self.state != FrameState::Idle {
            return None;
        }
        self.module = module;
        Some(self.start())
    }

    /// Leave the module page. Drops the document and pending timers; a load
    /// signal still in flight is ignored when it lands.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = FrameState::Idle;
    }

    /// Apply a load outcome. Stale generations and failures leave the state
    /// untouched. Returns `true` if the signal was accepted.
    pub fn on_load(
        &mut self,
        generation: u64,
        outcome: Result<FrameDocument, FrameLoadError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                module = self.module.title,
                stale = generation,
                current = self.generation,
                "Ignoring stale frame load"
            );
            return false;
        }
        if self.state != FrameState::Loading {
            return false;
        }
        match outcome {
            Ok(document) => {
                tracing::debug!(
                    module = self.module.title,
                    status = document.status,
                    "Frame loaded"
                );
                self.state = FrameState::Loaded {
                    document,
                    stage: RevealStage::Masking(EffectTimer::new(self.timings.reveal_delay)),
                };
                true
            }
            Err(err) => {
                tracing::warn!(module = self.module.title, "Module never loaded: {err}");
                false
            }
        }
    }

    /// Advance reveal timers. Returns `true` on the tick that reveals.
    pub fn advance(&mut self, delta: Duration) -> bool {
        let timings = self.timings;
        match &mut self.state {
            FrameState::Idle | FrameState::Loading => false,
            FrameState::Revealed { fade, .. } => {
                fade.advance(delta);
                false
            }
            FrameState::Loaded { document, stage } => match &mut *stage {
                RevealStage::Masking(timer) => {
                    timer.advance(delta);
                    if !timer.is_finished() {
                        return false;
                    }
                    let carry = timer.overshoot();
                    *stage = RevealStage::Settling(EffectTimer::new(timings.fade_delay));
                    self.advance(carry)
                }
                RevealStage::Settling(timer) => {
                    timer.advance(delta);
                    if !timer.is_finished() {
                        return false;
                    }
                    let mut fade = EffectTimer::new(timings.fade);
                    fade.advance(timer.overshoot());
                    let document = document.clone();
                    self.state = FrameState::Revealed { document, fade };
                    tracing::debug!(module = self.module.title, "Frame revealed");
                    true
                }
            },
        }
    }

    #[must_use]
    pub fn module(&self) -> &'static ModuleDescriptor {
        self.module
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> &FrameState {
        &self.state
    }

    #[must_use]
    pub fn policy(&self) -> &'static FramePolicy {
        &MODULE_FRAME_POLICY
    }

    #[must_use]
    pub fn lifecycle(&self) -> FrameLifecycle {
        match self.state {
            FrameState::Idle => FrameLifecycle::Idle,
            FrameState::Loading => FrameLifecycle::Loading,
            FrameState::Loaded { .. } => FrameLifecycle::Loaded,
            FrameState::Revealed { .. } => FrameLifecycle::Revealed,
        }
    }

    /// Whether the full-screen "Loading <title>…" presentation is up.
    #[must_use]
    pub fn shows_loader(&self) -> bool {
        matches!(
            self.state,
            FrameState::Idle
                | FrameState::Loading
                | FrameState::Loaded {
                    stage: RevealStage::Masking(_),
                    ..
                }
        )
    }

    /// Content opacity in `[0, 1]`.
    #[must_use]
    pub fn content_opacity(&self) -> f32 {
        match &self.state {
            FrameState::Revealed { fade, .. } => fade.progress(),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn document(&self) -> Option<&FrameDocument> {
        match &self.state {
            FrameState::Loaded { document, .. } | FrameState::Revealed { document, .. } => {
                Some(document)
            }
            FrameState::Idle | FrameState::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{FrameDocument, FrameLoadError, FrameState, ModuleFrame, RevealTimings};
    use fitsyn_types::{FrameLifecycle, MODULES, ModuleDescriptor, Route};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn timings() -> RevealTimings {
        RevealTimings {
            reveal_delay: ms(800),
            fade_delay: ms(100),
            fade: ms(400),
        }
    }

    fn module(path: &str) -> &'static ModuleDescriptor {
        Route::resolve(path).module().expect("module route")
    }

    fn doc() -> FrameDocument {
        FrameDocument {
            status: 200,
            content_length: 512,
            content_type: Some("text/html".to_string()),
        }
    }

    #[test]
    fn full_reveal_sequence() {
        let mut frame = ModuleFrame::new(module("/tracker"), timings());
        assert_eq!(frame.lifecycle(), FrameLifecycle::Idle);

        let request = frame.start();
        assert_eq!(request.url, module("/tracker").url);
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loading);
        assert!(frame.shows_loader());

        // Timers do nothing before the load signal.
        assert!(!frame.advance(ms(5000)));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loading);

        assert!(frame.on_load(request.generation, Ok(doc())));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loaded);
        assert!(!frame.advance(ms(799)));
        assert!(frame.shows_loader());
        assert!(!frame.advance(ms(1)));
        assert!(!frame.shows_loader());
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loaded);
        assert!(frame.content_opacity().abs() < f32::EPSILON);

        assert!(frame.advance(ms(100)));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Revealed);
        assert!(frame.content_opacity() < 0.01);
        frame.advance(ms(400));
        assert!((frame.content_opacity() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reveal_is_ordered_after_load_even_with_one_big_tick() {
        let mut frame = ModuleFrame::new(module("/yoga"), timings());
        let request = frame.start();
        frame.on_load(request.generation, Ok(doc()));
        assert!(frame.advance(ms(10_000)));
        assert!(matches!(frame.state(), FrameState::Revealed { .. }));
        assert!((frame.content_opacity() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn module_change_resets_to_loading_and_drops_timers() {
        let mut frame = ModuleFrame::new(module("/tracker"), timings());
        let first = frame.start();
        frame.on_load(first.generation, Ok(doc()));
        frame.advance(ms(850));

        let second = frame.set_module(module("/yoga")).expect("new request");
        assert_ne!(first.generation, second.generation);
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loading);

        // Late signal from the tracker load is ignored.
        assert!(!frame.on_load(first.generation, Ok(doc())));
        assert!(!frame.advance(ms(10_000)));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loading);
        assert!(frame.document().is_none());
    }

    #[test]
    fn revealed_module_does_not_leak_into_next() {
        let mut frame = ModuleFrame::new(module("/tracker"), timings());
        let first = frame.start();
        frame.on_load(first.generation, Ok(doc()));
        frame.advance(ms(2000));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Revealed);

        frame.set_module(module("/fitmap"));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loading);
        assert!(frame.content_opacity().abs() < f32::EPSILON);
    }

    #[test]
    fn unmount_rejects_in_flight_load() {
        let mut frame = ModuleFrame::new(module("/tracker"), timings());
        let request = frame.start();
        frame.unmount();
        assert_eq!(frame.lifecycle(), FrameLifecycle::Idle);
        assert!(!frame.on_load(request.generation, Ok(doc())));

        let again = frame.set_module(module("/tracker")).expect("restart after unmount");
        assert!(frame.on_load(again.generation, Ok(doc())));
    }

    #[test]
    fn same_module_does_not_restart() {
        let mut frame = ModuleFrame::new(module("/tracker"), timings());
        frame.start();
        assert!(frame.set_module(module("/tracker")).is_none());
    }

    #[test]
    fn load_failure_leaves_frame_loading_forever() {
        let mut frame = ModuleFrame::new(module("/nutrition"), timings());
        let request = frame.start();
        let failed = frame.on_load(
            request.generation,
            Err(FrameLoadError::Request {
                url: request.url.to_string(),
                detail: "connection refused".to_string(),
            }),
        );
        assert!(!failed);
        frame.advance(ms(60_000));
        assert_eq!(frame.lifecycle(), FrameLifecycle::Loading);
        assert!(frame.shows_loader());
    }

    #[test]
    fn every_module_uses_the_shared_policy() {
        for module in &MODULES {
            let frame = ModuleFrame::new(module, timings());
            assert_eq!(
                frame.policy().allow_attribute(),
                "accelerometer; camera; geolocation; microphone"
            );
        }
    }

    #[tokio::test]
    async fn http_loader_reports_document_metadata() {
        use super::{FrameLoader, HttpFrameLoader};
        use fitsyn_types::MODULE_FRAME_POLICY;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workouts"))
            .and(header("Sec-Fetch-Dest", "iframe"))
            .and(header(
                "Permissions-Policy",
                "accelerometer; camera; geolocation; microphone",
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let loader = HttpFrameLoader::new().expect("client");
        let url = format!("{}/workouts", server.uri());
        let document = loader
            .load(&url, &MODULE_FRAME_POLICY)
            .await
            .expect("document");
        assert_eq!(document.status, 200);
        assert_eq!(document.content_length, 15);
        assert_eq!(document.content_type.as_deref(), Some("text/html"));
    }

    #[tokio::test]
    async fn http_loader_rejects_unparseable_url() {
        use super::{FrameLoader, HttpFrameLoader};
        use fitsyn_types::MODULE_FRAME_POLICY;

        let loader = HttpFrameLoader::new().expect("client");
        let err = loader
            .load("not a url", &MODULE_FRAME_POLICY)
            .await
            .expect_err("invalid");
        assert!(matches!(err, FrameLoadError::InvalidUrl { .. }));
    }
}
