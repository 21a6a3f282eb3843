//! # Tally Configuration
//!
//! Configuration management for the cart client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_SERVER_URL=http://localhost:3000                             │
//! │     TALLY_CHANGE_POLICY=either                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cart/tally.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.tally.cart/tally.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     public bookstore endpoint, policy "both", generated session id     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tally.toml
//! [server]
//! url = "https://cpen400a-bookstore.herokuapp.com"
//! products_path = "/products"
//! request_timeout_ms = 2000
//! max_attempts = 3
//!
//! [sync]
//! change_policy = "both"   # both | either
//! poll_interval_secs = 0   # 0 disables the background poller
//!
//! [session]
//! idle_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use tally_core::ChangePolicy;

use crate::error::{SyncError, SyncResult};

/// Public inventory server used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "https://cpen400a-bookstore.herokuapp.com";

// =============================================================================
// Server Settings
// =============================================================================

/// Where and how the catalog is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the inventory server.
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Path of the catalog endpoint, joined onto `url`.
    #[serde(default = "default_products_path")]
    pub products_path: String,

    /// Per-request timeout (milliseconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Attempts per fetch before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First delay between attempts (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound for the delay between attempts (milliseconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}
fn default_products_path() -> String {
    "/products".to_string()
}
fn default_request_timeout() -> u64 {
    2000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    250
}
fn default_max_backoff() -> u64 {
    2000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            url: default_server_url(),
            products_path: default_products_path(),
            request_timeout_ms: default_request_timeout(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

impl ServerSettings {
    /// Full URL of the catalog endpoint.
    ///
    /// ```rust
    /// use tally_sync::config::ServerSettings;
    ///
    /// let mut server = ServerSettings::default();
    /// server.url = "http://localhost:3000/".into();
    /// assert_eq!(server.products_url().unwrap().as_str(), "http://localhost:3000/products");
    /// ```
    pub fn products_url(&self) -> SyncResult<Url> {
        let base = Url::parse(self.url.trim_end_matches('/'))?;
        let mut joined = base.clone();
        let path = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            self.products_path.trim_start_matches('/')
        );
        joined.set_path(&path);
        Ok(joined)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

// =============================================================================
// Sync Settings
// =============================================================================

/// How server snapshots are merged and how often they are pulled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Which deltas count as a change.
    #[serde(default)]
    pub change_policy: ChangePolicy,

    /// Background poll interval (seconds). 0 disables polling.
    #[serde(default)]
    pub poll_interval_secs: u64,
}

impl SyncSettings {
    /// Poll interval, or `None` when polling is disabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Session identifier (UUID v4), sent with every catalog request.
    /// Generated when missing.
    #[serde(default = "default_session_id")]
    pub id: String,

    /// Seconds of inactivity before the idle reminder fires.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_session_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_idle_timeout() -> u64 {
    30
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            id: default_session_id(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl TallyConfig {
    /// Creates a new config with defaults and a generated session ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (tally.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        let url = Url::parse(&self.server.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SyncError::InvalidUrl(format!(
                "Server URL must start with http:// or https://, got: {}",
                self.server.url
            )));
        }

        if self.server.max_attempts == 0 {
            return Err(SyncError::InvalidConfig(
                "max_attempts must be greater than 0".into(),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(SyncError::InvalidConfig(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.session.id.trim().is_empty() {
            return Err(SyncError::InvalidConfig("session id must not be empty".into()));
        }

        if self.session.idle_timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "idle_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TALLY_SERVER_URL") {
            debug!(url = %url, "Overriding server URL from environment");
            self.server.url = url;
        }

        if let Ok(policy) = std::env::var("TALLY_CHANGE_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding change policy from environment");
                    self.sync.change_policy = parsed;
                }
                Err(e) => warn!(policy = %policy, error = %e, "Ignoring change policy"),
            }
        }

        if let Ok(interval) = std::env::var("TALLY_POLL_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse::<u64>() {
                self.sync.poll_interval_secs = secs;
            }
        }

        if let Ok(attempts) = std::env::var("TALLY_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse::<u32>() {
                self.server.max_attempts = n;
            }
        }

        if let Ok(idle) = std::env::var("TALLY_IDLE_TIMEOUT_SECS") {
            if let Ok(secs) = idle.parse::<u64>() {
                self.session.idle_timeout_secs = secs;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "cart")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    pub fn change_policy(&self) -> ChangePolicy {
        self.sync.change_policy
    }

    pub fn server_url(&self) -> &str {
        &self.server.url
    }
}
