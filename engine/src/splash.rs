//! First-run splash, shown at most once per terminal session.
//!
//! ```text
//! mount ──marker present──────────────────────────────▶ Hidden (has_shown)
//!   │
//!   └─marker absent / storage error─▶ Showing ──min──▶ Exiting ──settle──▶ Hidden
//!                                                                  │
//!                                                         marker written
//! ```
//!
//! Once the marker is written, a later mount in the same session goes
//! straight to `Hidden`. When storage is unavailable the marker can neither
//! be read nor written, so every mount shows the splash once.

use std::time::Duration;

use fitsyn_types::ui::EffectTimer;

use crate::storage::KeyValueStore;

pub const SPLASH_MARKER_KEY: &str = "fitsyn-splash-shown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplashPhase {
    Hidden,
    /// Fully visible for the minimum duration.
    Showing(EffectTimer),
    /// Exit transition; completion fires when it ends.
    Exiting(EffectTimer),
}

#[derive(Debug, Clone)]
pub struct SplashGate {
    phase: SplashPhase,
    has_shown: bool,
    settle: Duration,
}

impl SplashGate {
    /// Decide initial visibility from the session-scoped marker.
    pub fn mount(store: &dyn KeyValueStore, min_duration: Duration, settle: Duration) -> Self {
        let marker_present = match store.get(SPLASH_MARKER_KEY) {
            Ok(value) => value.is_some(),
            Err(err) => {
                tracing::warn!("Splash marker unreadable, showing splash: {err}");
                false
            }
        };

        if marker_present {
            tracing::debug!("Splash already shown this session");
            Self {
                phase: SplashPhase::Hidden,
                has_shown: true,
                settle,
            }
        } else {
            Self {
                phase: SplashPhase::Showing(EffectTimer::new(min_duration)),
                has_shown: false,
                settle,
            }
        }
    }

    /// Advance the splash clock. Returns `true` on the tick that completes it.
    pub fn advance(&mut self, delta: Duration, store: &dyn KeyValueStore) -> bool {
        match &mut self.phase {
            SplashPhase::Hidden => false,
            SplashPhase::Showing(timer) => {
                timer.advance(delta);
                if !timer.is_finished() {
                    return false;
                }
                let carry = timer.overshoot();
                self.phase = SplashPhase::Exiting(EffectTimer::new(self.settle));
                self.advance(carry, store)
            }
            SplashPhase::Exiting(timer) => {
                timer.advance(delta);
                if !timer.is_finished() {
                    return false;
                }
                self.complete(store);
                true
            }
        }
    }

    fn complete(&mut self, store: &dyn KeyValueStore) {
        self.phase = SplashPhase::Hidden;
        self.has_shown = true;
        if let Err(err) = store.set(SPLASH_MARKER_KEY, "true") {
            tracing::warn!("Failed to persist splash marker: {err}");
        }
        tracing::debug!("Splash complete");
    }

    #[must_use]
    pub fn show_splash(&self) -> bool {
        !matches!(self.phase, SplashPhase::Hidden)
    }

    #[must_use]
    pub fn has_shown_splash(&self) -> bool {
        self.has_shown
    }

    #[must_use]
    pub fn phase(&self) -> &SplashPhase {
        &self.phase
    }

    /// 0.0 while fully visible, rising to 1.0 across the exit transition.
    #[must_use]
    pub fn exit_progress(&self) -> f32 {
        match &self.phase {
            SplashPhase::Hidden => 1.0,
            SplashPhase::Showing(_) => 0.0,
            SplashPhase::Exiting(timer) => timer.progress(),
        }
    }

    /// Progress through the minimum display window, for the splash's loader bar.
    #[must_use]
    pub fn display_progress(&self) -> f32 {
        match &self.phase {
            SplashPhase::Showing(timer) => timer.progress(),
            SplashPhase::Exiting(_) | SplashPhase::Hidden => 1.0,
        }
    }
}
