//! # Checkout Validator
//!
//! Turns the outcome of the pre-checkout sync into either a change report or
//! the amount due.
//!
//! ## Decision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sync_with_server() ──► ReconcileOutcome                                │
//! │                              │                                          │
//! │              deltas empty? ──┴── deltas non-empty?                      │
//! │                   │                     │                               │
//! │                   ▼                     ▼                               │
//! │   Ready { total = Σ cart × price }   Drift(ChangeReport)                │
//! │   "The total price is $20.00"        "Price of A changed from ..."      │
//! │                                      (no purchase is committed)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::Inventory;
use crate::money::Money;
use crate::reconcile::ReconcileOutcome;
use crate::types::ProductKey;

// =============================================================================
// Change Report
// =============================================================================

/// One line of a change report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChangeLine {
    Price {
        key: ProductKey,
        from: Money,
        to: Money,
    },
    Quantity {
        key: ProductKey,
        from: i64,
        to: i64,
    },
}

impl fmt::Display for ChangeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeLine::Price { key, from, to } => {
                write!(f, "Price of {} changed from {} to {}", key, from, to)
            }
            ChangeLine::Quantity { key, from, to } => {
                write!(f, "Quantity of {} changed from {} to {}", key, from, to)
            }
        }
    }
}

/// Changes that affected products in the cart.
///
/// An empty report still means checkout was blocked: something in the
/// catalog changed, just nothing the cart holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub lines: Vec<ChangeLine>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// One line per change, each newline-terminated.
impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// =============================================================================
// Checkout Outcome
// =============================================================================

/// What the view layer shows after a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CheckoutOutcome {
    /// Nothing changed; the cart can be paid for.
    Ready { total: Money },
    /// The catalog drifted; checkout is blocked.
    Drift(ChangeReport),
}

impl CheckoutOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, CheckoutOutcome::Ready { .. })
    }
}

impl fmt::Display for CheckoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutOutcome::Ready { total } => write!(f, "The total price is {}", total),
            CheckoutOutcome::Drift(report) => write!(f, "{}", report),
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Builds the checkout outcome from a finished sync.
///
/// `inventory` must be the state right after `outcome` was applied.
pub fn evaluate(inventory: &Inventory, outcome: &ReconcileOutcome) -> CheckoutOutcome {
    if outcome.deltas.is_empty() {
        return CheckoutOutcome::Ready {
            total: inventory.cart_total(),
        };
    }

    CheckoutOutcome::Drift(change_report(inventory, outcome))
}

/// Lists price and total-quantity changes for products that were in the cart
/// before the sync.
pub fn change_report(inventory: &Inventory, outcome: &ReconcileOutcome) -> ChangeReport {
    let mut report = ChangeReport::default();

    for (key, delta) in &outcome.deltas {
        let Some(before) = outcome.previous.get(key) else {
            continue;
        };
        if before.reserved <= 0 {
            continue;
        }

        if !delta.price_delta.is_zero() {
            report.lines.push(ChangeLine::Price {
                key: key.clone(),
                from: before.price,
                to: before.price + delta.price_delta,
            });
        }

        let after = inventory.total_available(key).unwrap_or(0);
        if after != before.total() {
            report.lines.push(ChangeLine::Quantity {
                key: key.clone(),
                from: before.total(),
                to: after,
            });
        }
    }

    report
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::types::{CatalogSnapshot, ChangePolicy, ProductSnapshot};

    fn catalog(items: &[(&str, i64, i64)]) -> CatalogSnapshot {
        items
            .iter()
            .map(|(key, price, quantity)| {
                (
                    key.to_string(),
                    ProductSnapshot::new(*key, Money::from_major(*price), *quantity),
                )
            })
            .collect()
    }

    fn shop(items: &[(&str, i64, i64)], adds: &[&str]) -> Inventory {
        let mut inventory = Inventory::new();
        reconcile(&mut inventory, &catalog(items), ChangePolicy::Both).unwrap();
        for key in adds {
            inventory.add_item(key).unwrap();
        }
        inventory
    }

    #[test]
    fn test_ready_reports_total_due() {
        // cart {A: 2} at price 10, nothing changed on the server
        let mut inventory = shop(&[("A", 10, 5)], &["A", "A"]);
        let outcome = reconcile(&mut inventory, &catalog(&[("A", 10, 5)]), ChangePolicy::Both).unwrap();

        let result = evaluate(&inventory, &outcome);
        assert_eq!(
            result,
            CheckoutOutcome::Ready {
                total: Money::from_major(20)
            }
        );
        assert_eq!(result.to_string(), "The total price is $20.00");
    }

    #[test]
    fn test_drift_reports_price_and_quantity() {
        let mut inventory = shop(&[("A", 10, 4)], &["A", "A", "A", "A"]);
        let outcome = reconcile(&mut inventory, &catalog(&[("A", 12, 1)]), ChangePolicy::Both).unwrap();

        let result = evaluate(&inventory, &outcome);
        assert!(!result.is_ready());
        assert_eq!(
            result.to_string(),
            "Price of A changed from $10.00 to $12.00\nQuantity of A changed from 4 to 1\n"
        );
    }

    #[test]
    fn test_reservation_cleared_by_sold_out_item_is_reported() {
        let mut inventory = shop(&[("A", 10, 3)], &["A", "A", "A"]);
        let outcome = reconcile(&mut inventory, &catalog(&[("A", 12, 0)]), ChangePolicy::Both).unwrap();

        assert!(!inventory.item_in_cart("A"));
        assert_eq!(
            change_report(&inventory, &outcome).to_string(),
            "Price of A changed from $10.00 to $12.00\nQuantity of A changed from 3 to 0\n"
        );
    }

    #[test]
    fn test_drift_outside_cart_gives_empty_report() {
        let mut inventory = shop(&[("A", 10, 4), ("B", 5, 5)], &["A"]);
        let outcome = reconcile(
            &mut inventory,
            &catalog(&[("A", 10, 4), ("B", 6, 7)]),
            ChangePolicy::Both,
        )
        .unwrap();

        match evaluate(&inventory, &outcome) {
            CheckoutOutcome::Drift(report) => {
                assert!(report.is_empty());
                assert_eq!(report.to_string(), "");
            }
            other => panic!("expected drift, got {:?}", other),
        }
    }

    #[test]
    fn test_price_only_line_when_total_unchanged() {
        let mut inventory = shop(&[("A", 10, 5)], &["A"]);
        let outcome = reconcile(&mut inventory, &catalog(&[("A", 8, 5)]), ChangePolicy::Either).unwrap();

        let report = change_report(&inventory, &outcome);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.lines[0],
            ChangeLine::Price {
                key: "A".to_string(),
                from: Money::from_major(10),
                to: Money::from_major(8),
            }
        );
    }

    #[test]
    fn test_empty_cart_is_ready_with_zero_total() {
        let mut inventory = shop(&[("A", 10, 5)], &[]);
        let outcome = reconcile(&mut inventory, &catalog(&[("A", 10, 5)]), ChangePolicy::Both).unwrap();

        assert_eq!(
            evaluate(&inventory, &outcome).to_string(),
            "The total price is $0.00"
        );
    }
}
