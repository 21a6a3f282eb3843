//! # Text View
//!
//! Renders store state as plain-text tables.
//!
//! ```text
//! KEY        PRODUCT                       PRICE   STOCK  IN CART
//! Box1       Box of Pens                   $5.00       7        2
//! Tent       Camping Tent                 $49.99       0        1
//! ```

use std::fmt::Write;

use tally_core::{CheckoutOutcome, DeltaList, Inventory};
use tally_sync::StoreStatus;

/// Product list: one row per known product.
pub fn render_catalog(inventory: &Inventory) -> String {
    if inventory.product_count() == 0 {
        return "No products loaded. Try `sync`.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<24} {:>10} {:>7} {:>8}",
        "KEY", "PRODUCT", "PRICE", "STOCK", "IN CART"
    );
    for (key, entry) in inventory.stock() {
        let _ = writeln!(
            out,
            "{:<10} {:<24} {:>10} {:>7} {:>8}",
            key,
            truncate(&entry.label, 24),
            entry.price.to_string(),
            entry.quantity,
            inventory.cart_quantity(key)
        );
    }
    out
}

/// Cart contents with line totals and the amount due.
pub fn render_cart(inventory: &Inventory) -> String {
    if inventory.is_cart_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<24} {:>5} {:>10} {:>10}",
        "KEY", "PRODUCT", "QTY", "EACH", "TOTAL"
    );
    for line in inventory.cart_lines() {
        let _ = writeln!(
            out,
            "{:<10} {:<24} {:>5} {:>10} {:>10}",
            line.key,
            truncate(&line.label, 24),
            line.quantity,
            line.unit_price.to_string(),
            line.line_total.to_string()
        );
    }
    let summary = format!(
        "{} units, total: {}",
        inventory.cart_units(),
        inventory.cart_total()
    );
    let _ = writeln!(out, "{:>63}", summary);
    out
}

/// Checkout result as shown to the shopper.
pub fn render_outcome(outcome: &CheckoutOutcome) -> String {
    match outcome {
        CheckoutOutcome::Ready { .. } => format!("{}\n", outcome),
        CheckoutOutcome::Drift(report) if report.is_empty() => {
            "The catalog changed while you were shopping. Please review and check out again.\n"
                .to_string()
        }
        CheckoutOutcome::Drift(report) => {
            format!("{}Please review your cart and check out again.\n", report)
        }
    }
}

/// Sync bookkeeping for the `status` command.
pub fn render_status(status: &StoreStatus) -> String {
    if !status.has_synced() && status.failed_syncs == 0 {
        return "Not synced yet.\n".to_string();
    }

    let mut out = String::new();
    match status.last_synced_at {
        Some(at) => {
            let _ = writeln!(
                out,
                "Last sync: {} ({} products changed)",
                at.format("%H:%M:%S"),
                status.last_changed
            );
        }
        None => out.push_str("Last sync: never succeeded\n"),
    }
    let _ = writeln!(
        out,
        "Syncs: {} ok, {} failed",
        status.sync_count, status.failed_syncs
    );
    if let Some(error) = &status.last_error {
        let _ = writeln!(out, "Last error: {}", error);
    }
    out
}

/// One-line summary of a sync.
pub fn render_sync(deltas: &DeltaList) -> String {
    match deltas.len() {
        0 => "Catalog is up to date.".to_string(),
        1 => "Catalog refreshed: 1 product changed.".to_string(),
        n => format!("Catalog refreshed: {} products changed.", n),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::reconcile::reconcile;
    use tally_core::{
        CatalogSnapshot, ChangeLine, ChangePolicy, ChangeReport, ItemDelta, Money,
        ProductSnapshot,
    };

    fn shop() -> Inventory {
        let mut inventory = Inventory::new();
        let catalog: CatalogSnapshot = [
            ("Box1", "Box of Pens", 500, 7),
            ("Tent", "Camping Tent", 4999, 2),
        ]
        .into_iter()
        .map(|(key, label, cents, qty)| {
            (
                key.to_string(),
                ProductSnapshot::new(label, Money::from_cents(cents), qty),
            )
        })
        .collect();
        reconcile(&mut inventory, &catalog, ChangePolicy::Both).unwrap();
        inventory
    }

    #[test]
    fn test_catalog_rows() {
        let mut inventory = shop();
        inventory.add_item("Box1").unwrap();

        let text = render_catalog(&inventory);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("KEY"));
        assert!(rows[1].starts_with("Box1"));
        assert!(rows[1].contains("$5.00"));
        assert!(rows[1].trim_end().ends_with('1'));
        assert!(rows[2].contains("$49.99"));
    }

    #[test]
    fn test_empty_catalog_hint() {
        assert_eq!(
            render_catalog(&Inventory::new()),
            "No products loaded. Try `sync`.\n"
        );
    }

    #[test]
    fn test_cart_lists_lines_and_total() {
        let mut inventory = shop();
        inventory.add_item("Box1").unwrap();
        inventory.add_item("Box1").unwrap();

        let text = render_cart(&inventory);
        assert!(text.contains("$10.00"));
        assert!(text.trim_end().ends_with("2 units, total: $10.00"));
        assert_eq!(render_cart(&shop()), "Your cart is empty.\n");
    }

    #[test]
    fn test_outcome_wording() {
        let ready = CheckoutOutcome::Ready {
            total: Money::from_major(20),
        };
        assert_eq!(render_outcome(&ready), "The total price is $20.00\n");

        let drift = CheckoutOutcome::Drift(ChangeReport {
            lines: vec![ChangeLine::Quantity {
                key: "A".to_string(),
                from: 5,
                to: 3,
            }],
        });
        assert_eq!(
            render_outcome(&drift),
            "Quantity of A changed from 5 to 3\nPlease review your cart and check out again.\n"
        );

        let silent = CheckoutOutcome::Drift(ChangeReport::default());
        assert!(render_outcome(&silent).starts_with("The catalog changed"));
    }

    #[test]
    fn test_sync_summary() {
        let mut deltas = DeltaList::new();
        assert_eq!(render_sync(&deltas), "Catalog is up to date.");
        deltas.insert(
            "A".to_string(),
            ItemDelta {
                price_delta: Money::zero(),
                quantity_delta: 1,
            },
        );
        assert_eq!(render_sync(&deltas), "Catalog refreshed: 1 product changed.");
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(render_status(&StoreStatus::default()), "Not synced yet.\n");

        let failed = StoreStatus {
            failed_syncs: 2,
            last_error: Some("HTTP error: 500".to_string()),
            ..StoreStatus::default()
        };
        assert_eq!(
            render_status(&failed),
            "Last sync: never succeeded\nSyncs: 0 ok, 2 failed\nLast error: HTTP error: 500\n"
        );
    }

    #[test]
    fn test_truncate_long_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd~");
    }
}
