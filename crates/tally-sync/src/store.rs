//! # Store
//!
//! Shared handle over one shopping session: the inventory, the catalog
//! source it syncs from, and the observer that renders it.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Store (Clone = Arc)                            │
//! │                                                                         │
//! │  sync_gate: tokio::Mutex<()>     inventory: std::Mutex<Inventory>       │
//! │  ────────────────────────────    ─────────────────────────────────      │
//! │  held for a whole sync pass      held only for short, sync sections    │
//! │  (fetch + apply), and by         (add, remove, queries, the apply      │
//! │  check_out for its sync          phase of a sync)                       │
//! │                                                                         │
//! │  sync A:  [gate ──── fetch ──── apply(lock) ────]                       │
//! │  sync B:                                        [gate ── fetch ── ...]  │
//! │  add:            [lock]      [lock]                                     │
//! │                                                                         │
//! │  • at most one sync in flight; a waiting sync fetches its own snapshot │
//! │  • the inventory lock is never held across an .await                   │
//! │  • observers are notified after the inventory lock is released         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tally_core::checkout::{self, CheckoutOutcome};
use tally_core::reconcile::{reconcile, ReconcileOutcome};
use tally_core::{CartLine, ChangePolicy, CoreResult, DeltaList, Inventory, Money};

use crate::config::TallyConfig;
use crate::error::SyncResult;
use crate::observer::{NoOpObserver, StoreObserver};
use crate::source::{CatalogSource, HttpCatalogSource};

// =============================================================================
// Store Status
// =============================================================================

/// Sync bookkeeping for status displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    /// When the last successful sync was applied.
    pub last_synced_at: Option<DateTime<Utc>>,

    /// Number of successful syncs.
    pub sync_count: u64,

    /// Number of failed syncs.
    pub failed_syncs: u64,

    /// Products changed by the last successful sync.
    pub last_changed: usize,

    /// Message of the most recent failure, cleared on success.
    pub last_error: Option<String>,
}

impl StoreStatus {
    /// True once at least one sync has been applied.
    pub fn has_synced(&self) -> bool {
        self.sync_count > 0
    }
}

// =============================================================================
// Store
// =============================================================================

struct StoreInner {
    inventory: Mutex<Inventory>,
    source: Arc<dyn CatalogSource>,
    observer: Arc<dyn StoreObserver>,
    policy: ChangePolicy,
    sync_gate: tokio::sync::Mutex<()>,
    status: RwLock<StoreStatus>,
}

/// The cart store. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates a store without an observer.
    pub fn new(source: Arc<dyn CatalogSource>, policy: ChangePolicy) -> Self {
        Self::with_observer(source, Arc::new(NoOpObserver), policy)
    }

    /// Creates a store that reports changes to `observer`.
    pub fn with_observer(
        source: Arc<dyn CatalogSource>,
        observer: Arc<dyn StoreObserver>,
        policy: ChangePolicy,
    ) -> Self {
        Store {
            inner: Arc::new(StoreInner {
                inventory: Mutex::new(Inventory::new()),
                source,
                observer,
                policy,
                sync_gate: tokio::sync::Mutex::new(()),
                status: RwLock::new(StoreStatus::default()),
            }),
        }
    }

    /// Creates a store backed by the HTTP catalog source described in `config`.
    pub fn from_config(config: &TallyConfig, observer: Arc<dyn StoreObserver>) -> SyncResult<Self> {
        config.validate()?;
        let source = HttpCatalogSource::from_config(config)?;
        info!(
            url = %source.products_url(),
            policy = %config.change_policy(),
            session = %config.session_id(),
            "Store created"
        );
        Ok(Self::with_observer(
            Arc::new(source),
            observer,
            config.change_policy(),
        ))
    }

    pub fn policy(&self) -> ChangePolicy {
        self.inner.policy
    }

    fn inventory(&self) -> MutexGuard<'_, Inventory> {
        self.inner
            .inventory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Cart Mutations
    // =========================================================================

    /// Moves one unit of `key` into the cart.
    ///
    /// ## Errors
    /// `ItemNotFound` or `OutOfStock`; nothing changes and no update is
    /// emitted, but the attempt still counts as user activity.
    pub fn add_item_to_cart(&self, key: &str) -> CoreResult<()> {
        let result = self.inventory().add_item(key);

        match &result {
            Ok(()) => {
                debug!(item = %key, "Added to cart");
                self.inner.observer.on_update(Some(key));
            }
            Err(e) => debug!(item = %key, error = %e, "Add to cart rejected"),
        }
        self.inner.observer.on_activity();

        result
    }

    /// Moves one unit of `key` back to stock.
    ///
    /// Removing a product that is not in the cart changes nothing; observers
    /// are notified either way. Returns whether a unit was moved.
    pub fn remove_item_from_cart(&self, key: &str) -> bool {
        let removed = self.inventory().remove_item(key);

        if removed {
            debug!(item = %key, "Removed from cart");
        } else {
            debug!(item = %key, "Remove ignored, item not in cart");
        }
        self.inner.observer.on_update(Some(key));
        self.inner.observer.on_activity();

        removed
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn item_in_cart(&self, key: &str) -> bool {
        self.inventory().item_in_cart(key)
    }

    /// Units of `key` left in stock.
    pub fn get_item_quantity(&self, key: &str) -> CoreResult<i64> {
        self.inventory().stock_quantity(key)
    }

    /// Units of `key` in the cart (0 when absent).
    pub fn cart_quantity(&self, key: &str) -> i64 {
        self.inventory().cart_quantity(key)
    }

    /// Consistent copy of the whole inventory, for rendering.
    pub fn snapshot(&self) -> Inventory {
        self.inventory().clone()
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.inventory().cart_lines()
    }

    pub fn cart_total(&self) -> Money {
        self.inventory().cart_total()
    }

    pub async fn status(&self) -> StoreStatus {
        self.inner.status.read().await.clone()
    }

    // =========================================================================
    // Sync & Checkout
    // =========================================================================

    /// Fetches the catalog and merges it into the inventory.
    ///
    /// Returns the changed products. On failure nothing is applied.
    pub async fn sync_with_server(&self) -> SyncResult<DeltaList> {
        let (deltas, ()) = self.run_sync(|_, _| ()).await?;
        Ok(deltas)
    }

    /// Syncs, then either reports drift or the amount due.
    ///
    /// `on_checkout_finished` is emitted in every case, including sync
    /// failures, so the caller can re-enable its checkout control.
    pub async fn check_out(&self) -> SyncResult<CheckoutOutcome> {
        let result = self
            .run_sync(checkout::evaluate)
            .await
            .map(|(_, outcome)| outcome);

        match &result {
            Ok(CheckoutOutcome::Ready { total }) => info!(%total, "Checkout ready"),
            Ok(CheckoutOutcome::Drift(report)) => {
                info!(changes = report.len(), "Checkout blocked by catalog changes")
            }
            Err(e) => warn!(error = %e, "Checkout failed"),
        }
        self.inner.observer.on_checkout_finished();

        result
    }

    /// One gated sync pass. `after` runs under the inventory lock right
    /// after the snapshot is applied.
    async fn run_sync<T, F>(&self, after: F) -> SyncResult<(DeltaList, T)>
    where
        F: FnOnce(&Inventory, &ReconcileOutcome) -> T,
    {
        let _gate = self.inner.sync_gate.lock().await;
        debug!(source = %self.inner.source.describe(), "Sync started");

        let result = self
            .inner
            .source
            .fetch_catalog()
            .await
            .and_then(|catalog| {
                let mut inventory = self.inventory();
                let outcome = reconcile(&mut inventory, &catalog, self.inner.policy)?;
                let extra = after(&inventory, &outcome);
                Ok((outcome.deltas, extra))
            });

        match &result {
            Ok((deltas, _)) => {
                {
                    let mut status = self.inner.status.write().await;
                    status.last_synced_at = Some(Utc::now());
                    status.sync_count += 1;
                    status.last_changed = deltas.len();
                    status.last_error = None;
                }
                info!(changed = deltas.len(), "Sync applied");
                self.inner.observer.on_update(None);
                self.inner.observer.on_sync(deltas);
            }
            Err(e) => {
                {
                    let mut status = self.inner.status.write().await;
                    status.failed_syncs += 1;
                    status.last_error = Some(e.to_string());
                }
                warn!(error = %e, "Sync failed, inventory unchanged");
                self.inner.observer.on_sync_error(e);
            }
        }

        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
