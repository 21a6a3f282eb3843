//! # Inventory State
//!
//! The stock and cart maps of one shopping session.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock / Cart Bookkeeping                             │
//! │                                                                         │
//! │   stock[p].quantity + cart[p]  ==  total available for p               │
//! │                                                                         │
//! │   add(p)     stock[p] -1 ──────► cart[p] +1                            │
//! │   remove(p)  stock[p] +1 ◄────── cart[p] -1   (entry deleted at 0)     │
//! │                                                                         │
//! │   • stock[p].quantity >= 0, cart[p] > 0 whenever p is in the cart      │
//! │   • stock entries are never deleted once created                      │
//! │   • only the reconciler changes the total available                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Inventory` is plain data. Callers that share it across tasks wrap it in
//! a mutex (see `tally_sync::Store`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductKey, StockEntry};

// =============================================================================
// Cart Line
// =============================================================================

/// One row of the rendered cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub key: ProductKey,
    pub label: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

// =============================================================================
// Inventory
// =============================================================================

/// Local stock and cart reservations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub(crate) stock: BTreeMap<ProductKey, StockEntry>,
    pub(crate) cart: BTreeMap<ProductKey, i64>,
}

impl Inventory {
    /// Creates an empty inventory. Products appear on the first sync.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Moves one unit of `key` from stock into the cart.
    ///
    /// ## Errors
    /// - `ItemNotFound` if the product was never synced
    /// - `OutOfStock` if no unit is left
    ///
    /// Nothing is mutated when an error is returned.
    pub fn add_item(&mut self, key: &str) -> CoreResult<()> {
        let entry = self
            .stock
            .get_mut(key)
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))?;

        if !entry.in_stock() {
            return Err(CoreError::OutOfStock(key.to_string()));
        }

        entry.quantity -= 1;
        *self.cart.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    /// Moves one unit of `key` from the cart back into stock.
    ///
    /// Removing a product that is not in the cart is a no-op and returns
    /// `false`.
    pub fn remove_item(&mut self, key: &str) -> bool {
        let Some(reserved) = self.cart.get_mut(key) else {
            return false;
        };

        *reserved -= 1;
        if *reserved <= 0 {
            self.cart.remove(key);
        }

        if let Some(entry) = self.stock.get_mut(key) {
            entry.quantity += 1;
        }
        true
    }

    /// Sets the reservation for `key`, deleting the entry when it drops to 0.
    pub(crate) fn set_reservation(&mut self, key: &str, quantity: i64) {
        if quantity > 0 {
            self.cart.insert(key.to_string(), quantity);
        } else {
            self.cart.remove(key);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Checks if at least one unit of `key` is reserved.
    pub fn item_in_cart(&self, key: &str) -> bool {
        self.cart.contains_key(key)
    }

    /// Units of `key` still available to add.
    pub fn stock_quantity(&self, key: &str) -> CoreResult<i64> {
        self.stock
            .get(key)
            .map(|entry| entry.quantity)
            .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))
    }

    /// Units of `key` reserved in the cart (0 when absent).
    pub fn cart_quantity(&self, key: &str) -> i64 {
        self.cart.get(key).copied().unwrap_or(0)
    }

    /// Stock plus reservation for `key`.
    pub fn total_available(&self, key: &str) -> CoreResult<i64> {
        Ok(self.stock_quantity(key)? + self.cart_quantity(key))
    }

    /// Looks up the stock entry of a product.
    pub fn entry(&self, key: &str) -> Option<&StockEntry> {
        self.stock.get(key)
    }

    /// Iterates over every known product, ordered by key.
    pub fn stock(&self) -> impl Iterator<Item = (&ProductKey, &StockEntry)> {
        self.stock.iter()
    }

    /// Iterates over cart reservations, ordered by key.
    pub fn cart(&self) -> impl Iterator<Item = (&ProductKey, i64)> {
        self.cart.iter().map(|(key, qty)| (key, *qty))
    }

    /// Number of known products.
    pub fn product_count(&self) -> usize {
        self.stock.len()
    }

    /// Number of distinct products in the cart.
    pub fn cart_item_count(&self) -> usize {
        self.cart.len()
    }

    /// Total units reserved across the cart.
    pub fn cart_units(&self) -> i64 {
        self.cart.values().sum()
    }

    pub fn is_cart_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// `Σ cart[p] × stock[p].price` over the cart.
    pub fn cart_total(&self) -> Money {
        self.cart_lines().iter().map(|line| line.line_total).sum()
    }

    /// The cart as renderable rows, ordered by key.
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart
            .iter()
            .filter_map(|(key, &quantity)| {
                let entry = self.stock.get(key)?;
                Some(CartLine {
                    key: key.clone(),
                    label: entry.label.clone(),
                    quantity,
                    unit_price: entry.price,
                    line_total: entry.price.multiply_quantity(quantity),
                })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
