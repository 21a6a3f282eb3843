//! Terminal observer: keeps the idle reminder fed and reports background
//! syncs that the shopper did not ask for.

use std::sync::atomic::{AtomicBool, Ordering};

use tally_core::DeltaList;
use tally_sync::{StoreObserver, SyncError};
use tracing::{debug, warn};

use crate::idle::IdleHandle;
use crate::view;

pub struct CliObserver {
    idle: IdleHandle,
    /// Set while a command the shopper typed is running, so its own
    /// sync result is not announced twice.
    foreground: AtomicBool,
}

impl CliObserver {
    pub fn new(idle: IdleHandle) -> Self {
        CliObserver {
            idle,
            foreground: AtomicBool::new(false),
        }
    }

    /// Marks whether the store is being driven by a typed command.
    pub fn set_foreground(&self, foreground: bool) {
        self.foreground.store(foreground, Ordering::SeqCst);
    }

    fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }
}

impl StoreObserver for CliObserver {
    fn on_update(&self, item: Option<&str>) {
        debug!(item = item.unwrap_or("*"), "Store updated");
    }

    fn on_activity(&self) {
        self.idle.reset();
    }

    fn on_sync(&self, deltas: &DeltaList) {
        if !self.is_foreground() && !deltas.is_empty() {
            println!("\n{}", view::render_sync(deltas));
        }
    }

    fn on_sync_error(&self, error: &SyncError) {
        if !self.is_foreground() {
            warn!(error = %error, "Background sync failed");
        }
    }

    fn on_checkout_finished(&self) {
        debug!("Checkout finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreground_flag() {
        let observer = CliObserver::new(IdleHandle::default());
        assert!(!observer.is_foreground());
        observer.set_foreground(true);
        assert!(observer.is_foreground());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_resets_idle() {
        use crate::idle::IdleReminder;
        use std::sync::atomic::AtomicUsize;
        use std::sync::Arc;
        use std::time::Duration;

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let reminder = IdleReminder::spawn(Duration::from_secs(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let observer = CliObserver::new(reminder.handle());

        tokio::time::sleep(Duration::from_secs(8)).await;
        observer.on_activity();
        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
