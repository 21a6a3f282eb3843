use anyhow::Context;
use tally_sync::{Store, TallyConfig};
use tracing::warn;

use crate::view;

/// Syncs, adds one unit per listed key, then checks out.
pub async fn run(config: &TallyConfig, items: &[String]) -> anyhow::Result<()> {
    let store = super::quiet_store(config)?;

    store
        .sync_with_server()
        .await
        .with_context(|| format!("Could not load the catalog from {}", config.server_url()))?;

    let skipped = fill_cart(&store, items);
    if skipped > 0 {
        warn!(skipped, "Some items could not be added");
    }

    print!("{}", view::render_cart(&store.snapshot()));

    let outcome = store.check_out().await.context("Checkout failed")?;
    print!("{}", view::render_outcome(&outcome));
    Ok(())
}

/// Adds each key once, reporting the ones that fail. Returns how many failed.
fn fill_cart(store: &Store, items: &[String]) -> usize {
    let mut skipped = 0;
    for key in items {
        if let Err(e) = store.add_item_to_cart(key) {
            eprintln!("Skipping {}: {}", key, e);
            skipped += 1;
        }
    }
    skipped
}
