//! # tally-core: Pure Cart Logic for Tally
//!
//! This crate is the **heart** of Tally. It owns the stock/cart bookkeeping,
//! the reconciler that merges server snapshots, and the checkout validator.
//! Everything here is a pure function over plain data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View Layer (tally-cli)                       │   │
//! │  │    catalog ──► add / remove ──► cart ──► checkout               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Store handle                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-sync                                   │   │
//! │  │    HTTP catalog source, single-flight sync, observer hooks     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │ reconcile │  │ checkout  │  │ validation│  │   │
//! │  │   │ stock +   │  │  deltas   │  │  report / │  │  snapshot │  │   │
//! │  │   │   cart    │  │  policy   │  │   total   │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire and local domain types (ProductSnapshot, StockEntry, ItemDelta)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Snapshot validation
//! - [`inventory`] - Stock and cart maps
//! - [`reconcile`] - Sync pass: deltas, change policy, apply
//! - [`checkout`] - Change report or amount due
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{checkout, reconcile, ChangePolicy, Inventory, Money, ProductSnapshot};
//! use tally_core::CatalogSnapshot;
//!
//! let mut catalog = CatalogSnapshot::new();
//! catalog.insert("A".into(), ProductSnapshot::new("Apple", Money::from_major(10), 5));
//!
//! let mut inventory = Inventory::new();
//! reconcile::reconcile(&mut inventory, &catalog, ChangePolicy::Both).unwrap();
//! inventory.add_item("A").unwrap();
//! inventory.add_item("A").unwrap();
//!
//! let outcome = reconcile::reconcile(&mut inventory, &catalog, ChangePolicy::Both).unwrap();
//! let result = checkout::evaluate(&inventory, &outcome);
//! assert_eq!(result.to_string(), "The total price is $20.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod inventory;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{ChangeLine, ChangeReport, CheckoutOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{CartLine, Inventory};
pub use money::Money;
pub use reconcile::ReconcileOutcome;
pub use types::*;
