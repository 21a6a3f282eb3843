//! # Sync Error Types
//!
//! Error types for catalog sync and store operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Snapshot            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Deserialization        │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  InvalidSnapshot        │ │
//! │  │  ConfigLoad/Save│  │  RetriesExhausted│ │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │     Store       │   Cart rule violations from tally-core pass       │
//! │  │                 │   through unchanged as CoreError.                 │
//! │  │  ChannelError   │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering all possible sync failures.
///
/// Store state is never partially updated when one of these is returned.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid server URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request failed or the server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A single request exceeded the per-request timeout.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Every attempt of the retry budget failed.
    #[error("Catalog fetch failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    // =========================================================================
    // Snapshot Errors
    // =========================================================================
    /// Response body was not a catalog.
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Catalog parsed but was rejected before being applied.
    #[error("Invalid catalog snapshot: {0}")]
    InvalidSnapshot(ValidationError),

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Deserialization(err.to_string())
        } else {
            SyncError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Deserialization(err.to_string())
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

/// Reconciliation only fails on validation; cart rule errors never reach
/// the sync path.
impl From<CoreError> for SyncError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(validation) => SyncError::InvalidSnapshot(validation),
            other => SyncError::InvalidSnapshot(ValidationError::InvalidFormat {
                field: "catalog".to_string(),
                reason: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl SyncError {
    /// Returns true if another attempt of the same request may succeed.
    ///
    /// ## Retryable Errors
    /// - HTTP failures (connection refused, 5xx)
    /// - Timeouts
    /// - Malformed bodies (a half-written response from a restarting server)
    ///
    /// ## Non-Retryable Errors
    /// - Configuration errors
    /// - Rejected snapshots
    /// - Exhausted retry budget
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Http(_) | SyncError::Timeout(_) | SyncError::Deserialization(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }
}
