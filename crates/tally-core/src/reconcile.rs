//! # Inventory Reconciler
//!
//! Merges a server catalog snapshot into local stock without losing cart
//! reservations.
//!
//! ## One Sync Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogSnapshot                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. validate_snapshot ──── invalid ──► Err, inventory untouched        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. unknown keys get a placeholder entry (price 0, quantity 0)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. delta = server - local stock          (per product)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. ChangePolicy picks the changed products                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. new total = stock + quantity delta                                 │
//! │       ├── cart <= total: stock = total - cart                          │
//! │       └── cart >  total: cart = total, stock = 0                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. price += price delta                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReconcileOutcome { deltas, previous }                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything after validation is infallible, so a snapshot is either
//! applied in full or not at all.

use std::collections::BTreeMap;

use crate::error::CoreResult;
use crate::inventory::Inventory;
use crate::types::{
    CatalogSnapshot, ChangePolicy, DeltaList, ItemDelta, ItemState, ProductKey, ProductSnapshot,
    StockEntry,
};
use crate::validation::validate_snapshot;

// =============================================================================
// Outcome
// =============================================================================

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Changed products and their deltas.
    pub deltas: DeltaList,
    /// State of each changed product before the pass was applied.
    pub previous: BTreeMap<ProductKey, ItemState>,
}

impl ReconcileOutcome {
    /// True when the pass changed nothing.
    pub fn is_unchanged(&self) -> bool {
        self.deltas.is_empty()
    }
}

// =============================================================================
// Change Detection
// =============================================================================

/// Raw difference between a server product and the local stock entry.
pub fn compute_delta(local: &StockEntry, server: &ProductSnapshot) -> ItemDelta {
    ItemDelta {
        price_delta: server.price - local.price,
        quantity_delta: server.quantity - local.quantity,
    }
}

impl ChangePolicy {
    /// Decides whether `delta` counts as a change.
    ///
    /// `reserved` is the cart reservation of the product. Under `Either`
    /// the quantity side compares the server quantity against stock plus
    /// cart, which is the same as `quantity_delta != reserved`.
    pub fn is_change(&self, delta: &ItemDelta, reserved: i64) -> bool {
        let price_changed = !delta.price_delta.is_zero();
        match self {
            ChangePolicy::Both => price_changed && delta.quantity_delta != 0,
            ChangePolicy::Either => price_changed || delta.quantity_delta != reserved,
        }
    }
}

// =============================================================================
// Reconcile
// =============================================================================

/// Applies `snapshot` to `inventory` under `policy`.
///
/// ## Errors
/// `CoreError::Validation` when the snapshot is malformed. The inventory is
/// not modified in that case.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::inventory::Inventory;
/// use tally_core::reconcile::reconcile;
/// use tally_core::types::{CatalogSnapshot, ChangePolicy, ProductSnapshot};
///
/// let mut inventory = Inventory::new();
/// let mut catalog = CatalogSnapshot::new();
/// catalog.insert("A".into(), ProductSnapshot::new("Apple", Money::from_major(10), 5));
///
/// let outcome = reconcile(&mut inventory, &catalog, ChangePolicy::Both).unwrap();
/// assert_eq!(outcome.deltas["A"].quantity_delta, 5);
/// assert_eq!(inventory.stock_quantity("A").unwrap(), 5);
///
/// // Same snapshot again: nothing changes.
/// let outcome = reconcile(&mut inventory, &catalog, ChangePolicy::Both).unwrap();
/// assert!(outcome.is_unchanged());
/// ```
pub fn reconcile(
    inventory: &mut Inventory,
    snapshot: &CatalogSnapshot,
    policy: ChangePolicy,
) -> CoreResult<ReconcileOutcome> {
    validate_snapshot(snapshot)?;

    for (key, product) in snapshot {
        if !inventory.stock.contains_key(key) {
            inventory
                .stock
                .insert(key.clone(), StockEntry::placeholder(product));
        }
    }

    let mut outcome = ReconcileOutcome::default();

    for (key, product) in snapshot {
        let reserved = inventory.cart_quantity(key);
        let Some(entry) = inventory.stock.get_mut(key) else {
            continue;
        };

        let delta = compute_delta(entry, product);
        if !policy.is_change(&delta, reserved) {
            continue;
        }

        outcome.previous.insert(
            key.clone(),
            ItemState {
                price: entry.price,
                stock: entry.quantity,
                reserved,
            },
        );

        let new_total = entry.quantity + delta.quantity_delta;
        let clamped = if reserved <= new_total {
            entry.quantity = new_total - reserved;
            None
        } else {
            entry.quantity = 0;
            Some(new_total)
        };
        entry.price += delta.price_delta;

        if let Some(reservation) = clamped {
            inventory.set_reservation(key, reservation);
        }

        outcome.deltas.insert(key.clone(), delta);
    }

    Ok(outcome)
}

// =============================================================================
// Unit Tests
// =============================================================================
