//! # Catalog Source
//!
//! Fetches the full catalog from the inventory server.
//!
//! ## Fetch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One fetch_catalog() call                             │
//! │                                                                         │
//! │  ┌────────────┐   GET /products   ┌────────────┐                       │
//! │  │  Attempt n │ ────────────────► │  Response  │                       │
//! │  └────────────┘   (timeout 2s)    └─────┬──────┘                       │
//! │        ▲                                │                               │
//! │        │                     2xx + JSON │  error / 5xx / timeout        │
//! │        │                        ┌───────┴───────┐                      │
//! │        │                        ▼               ▼                       │
//! │        │               ┌──────────────┐  ┌────────────┐                │
//! │        │               │ CatalogSnap- │  │  Backoff   │                │
//! │        │               │ shot (done)  │  └─────┬──────┘                │
//! │        │               └──────────────┘        │                        │
//! │        └──────────── n < max_attempts ─────────┤                        │
//! │                                                │ n == max_attempts      │
//! │                                                ▼                        │
//! │                                   SyncError::RetriesExhausted          │
//! │                                                                         │
//! │  BACKOFF STRATEGY (Exponential)                                        │
//! │  ──────────────────────────────                                        │
//! │  After attempt 1: 250ms                                                 │
//! │  After attempt 2: 500ms                                                 │
//! │  Max: 2s                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use tally_core::CatalogSnapshot;

use crate::config::TallyConfig;
use crate::error::{SyncError, SyncResult};

/// Header carrying the session identifier on every catalog request.
pub const SESSION_HEADER: &str = "X-Tally-Session";

// =============================================================================
// Catalog Source Trait
// =============================================================================

/// Anything that can produce a full catalog snapshot.
///
/// The store only talks to this trait; tests plug in scripted sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the current catalog. Retries, if any, happen inside.
    async fn fetch_catalog(&self) -> SyncResult<CatalogSnapshot>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String {
        "catalog source".to_string()
    }
}

// =============================================================================
// HTTP Source Configuration
// =============================================================================

/// Configuration for the HTTP catalog source.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Full URL of the catalog endpoint.
    pub products_url: Url,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Attempts per fetch (at least 1).
    pub max_attempts: u32,

    /// Initial backoff duration.
    pub initial_backoff: Duration,

    /// Maximum backoff duration.
    pub max_backoff: Duration,

    /// Value of the session header.
    pub session_id: String,
}

impl HttpSourceConfig {
    /// Builds the source configuration from the client config.
    pub fn from_config(config: &TallyConfig) -> SyncResult<Self> {
        Ok(HttpSourceConfig {
            products_url: config.server.products_url()?,
            request_timeout: config.server.request_timeout(),
            max_attempts: config.server.max_attempts.max(1),
            initial_backoff: config.server.initial_backoff(),
            max_backoff: config.server.max_backoff(),
            session_id: config.session.id.clone(),
        })
    }
}

// =============================================================================
// HTTP Catalog Source
// =============================================================================

/// Catalog source backed by `GET {server}/products`.
///
/// ## Usage
/// ```rust,ignore
/// let config = TallyConfig::load_or_default(None);
/// let source = HttpCatalogSource::from_config(&config)?;
/// let catalog = source.fetch_catalog().await?;
/// println!("{} products", catalog.len());
/// ```
pub struct HttpCatalogSource {
    config: HttpSourceConfig,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    /// Creates a source with its own HTTP client.
    pub fn new(config: HttpSourceConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(HttpCatalogSource { config, client })
    }

    /// Creates a source from the client configuration.
    pub fn from_config(config: &TallyConfig) -> SyncResult<Self> {
        Self::new(HttpSourceConfig::from_config(config)?)
    }

    pub fn products_url(&self) -> &Url {
        &self.config.products_url
    }

    /// One GET, no retries.
    async fn fetch_once(&self) -> SyncResult<CatalogSnapshot> {
        let response = self
            .client
            .get(self.config.products_url.clone())
            .header(SESSION_HEADER, &self.config.session_id)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Http(format!("Server returned status {}", status)));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let catalog: CatalogSnapshot = serde_json::from_slice(&body)?;
        Ok(catalog)
    }

    fn classify(&self, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout(self.config.request_timeout.as_millis() as u64)
        } else {
            SyncError::from(err)
        }
    }

    /// Creates the exponential backoff configuration.
    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.config.initial_backoff,
            max_interval: self.config.max_backoff,
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> SyncResult<CatalogSnapshot> {
        let mut backoff = self.create_backoff();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let last_error = match self.fetch_once().await {
                Ok(catalog) => {
                    debug!(attempt, products = catalog.len(), "Catalog fetched");
                    return Ok(catalog);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            if attempt >= self.config.max_attempts {
                warn!(
                    attempts = attempt,
                    error = %last_error,
                    url = %self.config.products_url,
                    "Catalog fetch gave up"
                );
                return Err(SyncError::RetriesExhausted {
                    attempts: attempt,
                    last_error: last_error.to_string(),
                });
            }

            let delay = backoff.next_backoff().unwrap_or(self.config.max_backoff);
            info!(attempt, ?delay, error = %last_error, "Catalog fetch failed, retrying");
            tokio::time::sleep(delay).await;
        }
    }

    fn describe(&self) -> String {
        self.config.products_url.to_string()
    }
}
