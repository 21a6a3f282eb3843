//! # CLI Commands
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here
//! ├── catalog.rs   ◄─── sync once, print the product list
//! ├── checkout.rs  ◄─── sync, fill the cart, check out
//! └── shop.rs      ◄─── interactive session (poller + idle reminder)
//! ```

pub mod catalog;
pub mod checkout;
pub mod shop;

use std::sync::Arc;

use tally_sync::{NoOpObserver, Store, TallyConfig};

/// Store for one-shot commands that print their own results.
fn quiet_store(config: &TallyConfig) -> anyhow::Result<Store> {
    Ok(Store::from_config(config, Arc::new(NoOpObserver))?)
}
