//! # tally-sync: Catalog Sync Layer for Tally
//!
//! This crate connects the pure cart logic in `tally-core` to the inventory
//! server and hands the view layer a single `Store` handle.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sync Layer Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Store (shared handle)                       │  │
//! │  │                                                                  │  │
//! │  │  add / remove / queries        sync_with_server / check_out      │  │
//! │  │  (inventory lock)              (single-flight gate)             │  │
//! │  └───────────┬───────────────────────────────┬──────────────────────┘  │
//! │              │                               │                          │
//! │              ▼                               ▼                          │
//! │  ┌────────────────────┐         ┌──────────────────────────┐           │
//! │  │  StoreObserver     │         │  CatalogSource           │           │
//! │  │                    │         │                          │           │
//! │  │  on_update         │         │  HttpCatalogSource:      │           │
//! │  │  on_activity       │         │  GET /products, timeout, │           │
//! │  │  on_sync(_error)   │         │  attempt budget, backoff │           │
//! │  │  on_checkout_...   │         │                          │           │
//! │  └────────────────────┘         └──────────────────────────┘           │
//! │                                                                         │
//! │  ┌────────────────────┐         ┌──────────────────────────┐           │
//! │  │  Poller            │         │  TallyConfig             │           │
//! │  │  periodic sync     │         │  TOML + env overrides    │           │
//! │  └────────────────────┘         └──────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Client configuration (server, sync policy, session)
//! - [`error`] - Sync error types
//! - [`observer`] - View-layer notification hooks
//! - [`source`] - Catalog sources and the HTTP implementation
//! - [`store`] - The shared `Store` handle
//! - [`poller`] - Background periodic sync
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally_sync::{NoOpObserver, Store, TallyConfig};
//!
//! let config = TallyConfig::load_or_default(None);
//! let store = Store::from_config(&config, Arc::new(NoOpObserver))?;
//!
//! store.sync_with_server().await?;
//! store.add_item_to_cart("Box1")?;
//!
//! println!("{}", store.check_out().await?);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod observer;
pub mod poller;
pub mod source;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ServerSettings, SessionSettings, SyncSettings, TallyConfig};
pub use error::{SyncError, SyncResult};
pub use observer::{NoOpObserver, StoreObserver};
pub use poller::{Poller, PollerHandle};
pub use source::{CatalogSource, HttpCatalogSource, HttpSourceConfig};
pub use store::{Store, StoreStatus};
