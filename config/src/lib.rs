//! Configuration for the FitSyn shell.
//!
//! Raw TOML structs (all `Option`, all defaulted) stay private to this crate.
//! [`ShellConfig::resolve`] turns them into fully validated values: durations
//! for every choreography delay, UI options, and an identity configuration
//! that either has every credential or does not exist.
//!
//! ```toml
//! [app]
//! reduced_motion = false
//! start_muted = false
//!
//! [timings]
//! splash_min_duration = 2500
//! frame_reveal_delay = 800
//!
//! [identity]
//! api_key = "${FITSYN_IDENTITY_API_KEY}"
//! project_id = "my-project"
//! auth_domain = "my-project.firebaseapp.com"
//! ```
//!
//! There are no built-in credentials. Missing identity values leave the
//! shell with an unconfigured backend.

use std::{env, fmt, fs, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use fitsyn_types::SecretString;
use fitsyn_types::ui::UiOptions;

pub const CONFIG_PATH_ENV: &str = "FITSYN_CONFIG";
pub const API_KEY_ENV: &str = "FITSYN_IDENTITY_API_KEY";
pub const PROJECT_ID_ENV: &str = "FITSYN_IDENTITY_PROJECT_ID";
pub const AUTH_DOMAIN_ENV: &str = "FITSYN_IDENTITY_AUTH_DOMAIN";
pub const ENDPOINT_ENV: &str = "FITSYN_IDENTITY_ENDPOINT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

// ============================================================================
// Raw file layout
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    app: RawAppConfig,
    #[serde(default)]
    timings: RawTimings,
    #[serde(default)]
    identity: RawIdentity,
}

#[derive(Debug, Default, Deserialize)]
struct RawAppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    high_contrast: bool,
    /// Disable slide and fade motion.
    #[serde(default)]
    reduced_motion: bool,
    /// Start the session with sound cues muted.
    #[serde(default)]
    start_muted: bool,
}

/// All values in milliseconds.
#[derive(Debug, Default, Deserialize)]
struct RawTimings {
    splash_min_duration: Option<u64>,
    splash_settle: Option<u64>,
    frame_reveal_delay: Option<u64>,
    frame_fade_delay: Option<u64>,
    frame_fade: Option<u64>,
    theme_transition: Option<u64>,
    menu_slide: Option<u64>,
    toast_lifetime: Option<u64>,
}

#[derive(Default, Deserialize)]
struct RawIdentity {
    api_key: Option<String>,
    project_id: Option<String>,
    auth_domain: Option<String>,
    endpoint: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl fmt::Debug for RawIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawIdentity")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("project_id", &self.project_id)
            .field("auth_domain", &self.auth_domain)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Choreography delays. Cosmetic, but every one is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Minimum time the splash stays fully visible.
    pub splash_min_duration: Duration,
    /// Exit transition after the minimum; completion fires at its end.
    pub splash_settle: Duration,
    /// Mask applied after a frame signals load, before the loader hides.
    pub frame_reveal_delay: Duration,
    /// Gap between hiding the loader and starting the content fade.
    pub frame_fade_delay: Duration,
    /// Content fade-in length.
    pub frame_fade: Duration,
    /// Palette blend window after a theme change.
    pub theme_transition: Duration,
    /// Menu panel slide length (open and close).
    pub menu_slide: Duration,
    /// How long a toast stays on screen.
    pub toast_lifetime: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            splash_min_duration: Duration::from_millis(2500),
            splash_settle: Duration::from_millis(500),
            frame_reveal_delay: Duration::from_millis(800),
            frame_fade_delay: Duration::from_millis(100),
            frame_fade: Duration::from_millis(400),
            theme_transition: Duration::from_millis(300),
            menu_slide: Duration::from_millis(400),
            toast_lifetime: Duration::from_millis(4000),
        }
    }
}

impl Timings {
    /// Reduced motion drops decorative motion. The reveal delays stay: they
    /// mask incomplete module content rather than animate anything.
    #[must_use]
    pub fn with_reduced_motion(self) -> Self {
        Self {
            frame_fade: Duration::ZERO,
            menu_slide: Duration::ZERO,
            theme_transition: Duration::ZERO,
            ..self
        }
    }
}

/// Credentials for the hosted identity service. Every field is present.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: SecretString,
    pub project_id: String,
    pub auth_domain: String,
    /// Base URL override for the REST API (tests, emulators).
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    pub ui: UiOptions,
    pub start_muted: bool,
    pub timings: Timings,
    pub identity: Option<IdentityConfig>,
}

impl ShellConfig {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(Self::resolve(RawConfig::default(), &process_env));
        };
        Self::load_from(path)
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::resolve(RawConfig::default(), &process_env));
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };
        Self::parse_with_env(&content, &process_env)
            .map_err(|source| ConfigError::Parse { path, source })
    }

    /// Parse TOML text, resolving `${VAR}` references and env overrides
    /// through `lookup`.
    pub fn parse_with_env(
        content: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, toml::de::Error> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::resolve(raw, lookup))
    }

    fn resolve(raw: RawConfig, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let ui = UiOptions {
            ascii_only: raw.app.ascii_only,
            high_contrast: raw.app.high_contrast,
            reduced_motion: raw.app.reduced_motion,
        };
        let timings = resolve_timings(&raw.timings);
        let timings = if ui.reduced_motion {
            timings.with_reduced_motion()
        } else {
            timings
        };
        Self {
            ui,
            start_muted: raw.app.start_muted,
            timings,
            identity: resolve_identity(raw.identity, lookup),
        }
    }
}

fn resolve_timings(raw: &RawTimings) -> Timings {
    let defaults = Timings::default();
    let pick = |value: Option<u64>, default: Duration| value.map_or(default, Duration::from_millis);
    Timings {
        splash_min_duration: pick(raw.splash_min_duration, defaults.splash_min_duration),
        splash_settle: pick(raw.splash_settle, defaults.splash_settle),
        frame_reveal_delay: pick(raw.frame_reveal_delay, defaults.frame_reveal_delay),
        frame_fade_delay: pick(raw.frame_fade_delay, defaults.frame_fade_delay),
        frame_fade: pick(raw.frame_fade, defaults.frame_fade),
        theme_transition: pick(raw.theme_transition, defaults.theme_transition),
        menu_slide: pick(raw.menu_slide, defaults.menu_slide),
        toast_lifetime: pick(raw.toast_lifetime, defaults.toast_lifetime),
    }
}

fn resolve_identity(
    raw: RawIdentity,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Option<IdentityConfig> {
    // Environment wins over the file; file values may reference ${VARS}.
    let field = |env_name: &str, file_value: Option<String>| -> Option<String> {
        lookup(env_name)
            .or_else(|| file_value.map(|v| expand_env_vars(&v, lookup)))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let api_key = field(API_KEY_ENV, raw.api_key);
    let project_id = field(PROJECT_ID_ENV, raw.project_id);
    let auth_domain = field(AUTH_DOMAIN_ENV, raw.auth_domain);
    let endpoint = field(ENDPOINT_ENV, raw.endpoint);

    match (api_key, project_id, auth_domain) {
        (Some(api_key), Some(project_id), Some(auth_domain)) => Some(IdentityConfig {
            api_key: SecretString::new(api_key),
            project_id,
            auth_domain,
            endpoint,
        }),
        (None, None, None) => None,
        (api_key, project_id, auth_domain) => {
            let missing: Vec<&str> = [
                (API_KEY_ENV, api_key.is_none()),
                (PROJECT_ID_ENV, project_id.is_none()),
                (AUTH_DOMAIN_ENV, auth_domain.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            tracing::warn!(
                missing = ?missing,
                "Identity configuration incomplete; sign-in disabled"
            );
            None
        }
    }
}

/// Expand `${VAR}` references. Unknown variables expand to nothing.
#[must_use]
pub fn expand_env_vars(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }
    out.push_str(rest);
    out
}

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// `$FITSYN_CONFIG`, else `~/.fitsyn/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    data_dir().map(|dir| dir.join("config.toml"))
}

/// `~/.fitsyn`, home of config, durable state and logs.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fitsyn"))
}
