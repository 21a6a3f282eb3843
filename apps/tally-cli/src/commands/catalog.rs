use anyhow::Context;
use tally_sync::TallyConfig;
use tracing::info;

use crate::view;

/// Syncs once and prints the product list.
pub async fn run(config: &TallyConfig) -> anyhow::Result<()> {
    let store = super::quiet_store(config)?;

    let deltas = store
        .sync_with_server()
        .await
        .with_context(|| format!("Could not load the catalog from {}", config.server_url()))?;
    info!(products = deltas.len(), "Catalog loaded");

    print!("{}", view::render_catalog(&store.snapshot()));
    Ok(())
}
