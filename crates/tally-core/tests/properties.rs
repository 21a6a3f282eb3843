//! Property tests for the stock/cart bookkeeping and the reconciler.

use proptest::prelude::*;

use tally_core::reconcile::reconcile;
use tally_core::{CatalogSnapshot, ChangePolicy, CoreError, Inventory, Money, ProductSnapshot};

#[derive(Debug, Clone, Copy)]
enum CartOp {
    Add,
    Remove,
}

fn arb_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![Just(CartOp::Add), Just(CartOp::Remove)]
}

fn arb_policy() -> impl Strategy<Value = ChangePolicy> {
    prop_oneof![Just(ChangePolicy::Both), Just(ChangePolicy::Either)]
}

fn arb_catalog() -> impl Strategy<Value = CatalogSnapshot> {
    prop::collection::btree_map(
        "[A-E]",
        (0i64..5_000, 0i64..20).prop_map(|(cents, quantity)| {
            ProductSnapshot::new("item", Money::from_cents(cents), quantity)
        }),
        1..5,
    )
}

fn single(price_cents: i64, quantity: i64) -> CatalogSnapshot {
    let mut catalog = CatalogSnapshot::new();
    catalog.insert(
        "A".to_string(),
        ProductSnapshot::new("Apple", Money::from_cents(price_cents), quantity),
    );
    catalog
}

/// Applies a cart op, ignoring the expected OutOfStock.
fn apply(inventory: &mut Inventory, key: &str, op: CartOp) {
    match op {
        CartOp::Add => match inventory.add_item(key) {
            Ok(()) | Err(CoreError::OutOfStock(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        },
        CartOp::Remove => {
            inventory.remove_item(key);
        }
    }
}

proptest! {
    /// Add/remove never changes stock + cart for a product.
    #[test]
    fn prop_add_remove_preserves_total(
        price in 1i64..10_000,
        quantity in 0i64..30,
        ops in prop::collection::vec(arb_op(), 0..60),
    ) {
        let mut inventory = Inventory::new();
        reconcile(&mut inventory, &single(price, quantity), ChangePolicy::Both).unwrap();
        let total = inventory.total_available("A").unwrap();

        for op in ops {
            apply(&mut inventory, "A", op);
            prop_assert_eq!(inventory.total_available("A").unwrap(), total);
            prop_assert!(inventory.stock_quantity("A").unwrap() >= 0);
            prop_assert!(inventory.cart_quantity("A") >= 0);
        }
    }

    /// Adding with no stock left reports OutOfStock and changes nothing.
    #[test]
    fn prop_add_never_goes_negative(price in 1i64..10_000, quantity in 0i64..10) {
        let mut inventory = Inventory::new();
        reconcile(&mut inventory, &single(price, quantity), ChangePolicy::Both).unwrap();

        for _ in 0..quantity {
            inventory.add_item("A").unwrap();
        }
        prop_assert_eq!(inventory.stock_quantity("A").unwrap(), 0);

        let before = inventory.clone();
        prop_assert_eq!(
            inventory.add_item("A"),
            Err(CoreError::OutOfStock("A".to_string()))
        );
        prop_assert_eq!(inventory, before);
    }

    /// Removing the last reserved unit deletes the entry and restocks one unit.
    #[test]
    fn prop_remove_last_unit(price in 1i64..10_000, quantity in 1i64..30) {
        let mut inventory = Inventory::new();
        reconcile(&mut inventory, &single(price, quantity), ChangePolicy::Both).unwrap();
        inventory.add_item("A").unwrap();
        let stock = inventory.stock_quantity("A").unwrap();

        prop_assert!(inventory.remove_item("A"));
        prop_assert!(!inventory.item_in_cart("A"));
        prop_assert_eq!(inventory.stock_quantity("A").unwrap(), stock + 1);
    }

    /// Re-applying the last snapshot changes nothing, whatever the cart holds.
    #[test]
    fn prop_reconcile_idempotent(
        catalog in arb_catalog(),
        policy in arb_policy(),
        ops in prop::collection::vec(("[A-E]", arb_op()), 0..40),
    ) {
        let mut inventory = Inventory::new();
        reconcile(&mut inventory, &catalog, policy).unwrap();
        for (key, op) in &ops {
            if inventory.entry(key).is_some() {
                apply(&mut inventory, key, *op);
            }
        }

        let before = inventory.clone();
        let outcome = reconcile(&mut inventory, &catalog, policy).unwrap();

        prop_assert!(outcome.deltas.is_empty());
        prop_assert_eq!(inventory, before);
    }

    /// Reconciling any valid snapshot keeps every quantity non-negative and
    /// never leaves a zero reservation behind.
    #[test]
    fn prop_reconcile_keeps_quantities_valid(
        first in arb_catalog(),
        second in arb_catalog(),
        policy in arb_policy(),
        adds in prop::collection::vec("[A-E]", 0..40),
    ) {
        let mut inventory = Inventory::new();
        reconcile(&mut inventory, &first, policy).unwrap();
        for key in &adds {
            if inventory.entry(key).is_some() {
                apply(&mut inventory, key, CartOp::Add);
            }
        }

        reconcile(&mut inventory, &second, policy).unwrap();

        for (key, entry) in inventory.stock() {
            prop_assert!(entry.quantity >= 0, "negative stock for {}", key);
        }
        for (key, reserved) in inventory.cart() {
            prop_assert!(reserved > 0, "dangling cart entry for {}", key);
        }
    }
}
