//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  WIRE (server → client)          LOCAL (owned by Inventory)            │
//! │  ┌─────────────────┐             ┌─────────────────┐                   │
//! │  │ ProductSnapshot │ ──sync────► │   StockEntry    │                   │
//! │  │  label          │             │  label          │                   │
//! │  │  imageUrl       │             │  image_url      │                   │
//! │  │  price (major)  │             │  price (cents)  │                   │
//! │  │  quantity       │             │  quantity       │                   │
//! │  └─────────────────┘             └─────────────────┘                   │
//! │                                                                         │
//! │  TRANSIENT (one sync pass)       POLICY                                │
//! │  ┌─────────────────┐             ┌─────────────────┐                   │
//! │  │   ItemDelta     │             │  ChangePolicy   │                   │
//! │  │  price_delta    │             │  Both (default) │                   │
//! │  │  quantity_delta │             │  Either         │                   │
//! │  └─────────────────┘             └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Maps are `BTreeMap` so that iteration (reports, renders) is ordered by key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{self, Money};

/// Server-assigned product identifier (the key of the catalog map).
pub type ProductKey = String;

// =============================================================================
// Wire Types
// =============================================================================

/// One product as reported by the inventory endpoint.
///
/// ```json
/// { "label": "Box of Pens", "imageUrl": "images/pens.png", "price": 5, "quantity": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub label: String,

    #[serde(default)]
    pub image_url: String,

    /// Price in major units on the wire, cents in memory.
    #[serde(
        serialize_with = "money::serialize_major_units",
        deserialize_with = "money::deserialize_major_units"
    )]
    pub price: Money,

    pub quantity: i64,
}

impl ProductSnapshot {
    /// Convenience constructor used by tests and fake catalog sources.
    pub fn new(label: impl Into<String>, price: Money, quantity: i64) -> Self {
        ProductSnapshot {
            label: label.into(),
            image_url: String::new(),
            price,
            quantity,
        }
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

/// The full catalog returned by one fetch. No pagination, no partial responses.
pub type CatalogSnapshot = BTreeMap<ProductKey, ProductSnapshot>;

// =============================================================================
// Stock Entry
// =============================================================================

/// Locally known state of one product.
///
/// Created on the first sync that mentions the product (with zero price and
/// quantity, so that the first delta carries the full server values) and
/// never removed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub label: String,
    pub image_url: String,
    pub price: Money,
    /// Units still available to add. Excludes units already reserved in the cart.
    pub quantity: i64,
}

impl StockEntry {
    /// Placeholder entry for a product seen for the first time.
    pub fn placeholder(snapshot: &ProductSnapshot) -> Self {
        StockEntry {
            label: snapshot.label.clone(),
            image_url: snapshot.image_url.clone(),
            price: Money::zero(),
            quantity: 0,
        }
    }

    /// Checks if at least one unit can be added to the cart.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Deltas
// =============================================================================

/// Difference between the server snapshot and local stock for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemDelta {
    /// `server price - local price`.
    pub price_delta: Money,
    /// `server quantity - local stock quantity` (cart reservations excluded).
    pub quantity_delta: i64,
}

/// Changed products of one sync pass, keyed by product.
pub type DeltaList = BTreeMap<ProductKey, ItemDelta>;

/// Pre-sync state of a product that the reconciler changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemState {
    pub price: Money,
    pub stock: i64,
    pub reserved: i64,
}

impl ItemState {
    /// Stock plus cart reservation.
    #[inline]
    pub fn total(&self) -> i64 {
        self.stock + self.reserved
    }
}

// =============================================================================
// Change Policy
// =============================================================================

/// Decides which computed deltas count as a "change".
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  BOTH (default)                     │  EITHER                           │
/// │  ──────────────                     │  ──────                           │
/// │  price AND quantity must differ     │  price OR total quantity differs  │
/// │  price-only / quantity-only moves   │  any drift is recorded            │
/// │  are ignored until both move        │                                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChangePolicy {
    /// Both the price and the quantity delta must be non-zero.
    #[default]
    Both,
    /// A price change or a change of the total (stock + cart) is enough.
    Either,
}

impl std::fmt::Display for ChangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangePolicy::Both => write!(f, "both"),
            ChangePolicy::Either => write!(f, "either"),
        }
    }
}

impl std::str::FromStr for ChangePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "both" | "and" | "conjunction" => Ok(ChangePolicy::Both),
            "either" | "or" | "disjunction" => Ok(ChangePolicy::Either),
            other => Err(ValidationError::InvalidFormat {
                field: "change_policy".to_string(),
                reason: format!("unknown policy '{}', expected both or either", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
