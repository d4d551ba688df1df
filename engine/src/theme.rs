//! Persisted dark/light preference.
//!
//! A change persists immediately and opens a short transition window during
//! which the renderer blends from the previous palette. The preference read
//! at start-up is applied without a transition.

use std::time::Duration;

use fitsyn_types::Theme;
use fitsyn_types::ui::EffectTimer;

use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "fitsyn-theme";

#[derive(Debug, Clone)]
struct ThemeTransition {
    from: Theme,
    timer: EffectTimer,
}

#[derive(Debug, Clone)]
pub struct ThemePreference {
    theme: Theme,
    transition: Option<ThemeTransition>,
    window: Duration,
}

impl ThemePreference {
    /// Read the saved theme. Missing, unreadable or unrecognised values give
    /// the dark default.
    pub fn load(store: &dyn KeyValueStore, window: Duration) -> Self {
        let theme = match store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!("Ignoring saved theme: {err}");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                tracing::warn!("Theme preference unreadable, using default: {err}");
                Theme::default()
            }
        };
        Self {
            theme,
            transition: None,
            window,
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, value: Theme, store: &dyn KeyValueStore) {
        if value == self.theme {
            return;
        }
        if let Err(err) = store.set(THEME_KEY, value.as_str()) {
            tracing::warn!("Failed to persist theme: {err}");
        }
        self.transition = Some(ThemeTransition {
            from: self.theme,
            timer: EffectTimer::new(self.window),
        });
        self.theme = value;
        tracing::info!(theme = %value, "Theme changed");
    }

    pub fn toggle(&mut self, store: &dyn KeyValueStore) {
        self.set_theme(self.theme.toggled(), store);
    }

    pub fn advance(&mut self, delta: Duration) {
        if let Some(transition) = &mut self.transition {
            transition.timer.advance(delta);
            if transition.timer.is_finished() {
                self.transition = None;
            }
        }
    }

    #[must_use]
    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Previous theme and blend progress while the transition window is open.
    #[must_use]
    pub fn transition(&self) -> Option<(Theme, f32)> {
        self.transition
            .as_ref()
            .map(|t| (t.from, t.timer.progress()))
    }
}
