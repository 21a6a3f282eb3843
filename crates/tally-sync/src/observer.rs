//! # Store Observer
//!
//! Notification hooks the view layer implements to follow store changes.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store method              Observer calls (in order)                    │
//! │  ────────────              ─────────────────────────                    │
//! │  add_item_to_cart(k)   ──► on_update(Some(k)), on_activity()            │
//! │      (failure)         ──► on_activity()                                │
//! │  remove_item_from_cart ──► on_update(Some(k)), on_activity()            │
//! │  sync_with_server()    ──► on_update(None), on_sync(&deltas)            │
//! │      (failure)         ──► on_sync_error(&err)                          │
//! │  check_out()           ──► ...sync events..., on_checkout_finished()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hooks run synchronously on the calling task, after the inventory lock is
//! released, so an observer may call back into the store.

use tally_core::DeltaList;

use crate::error::SyncError;

/// Receives store notifications.
///
/// Every method has an empty default so implementors only override what
/// they render.
pub trait StoreObserver: Send + Sync {
    /// State changed. `None` means everything should be re-rendered.
    fn on_update(&self, _item: Option<&str>) {}

    /// The user interacted with the cart. Used to reset idle timers.
    fn on_activity(&self) {}

    /// A sync finished and applied `deltas`.
    fn on_sync(&self, _deltas: &DeltaList) {}

    /// A sync failed; nothing was applied.
    fn on_sync_error(&self, _error: &SyncError) {}

    /// A checkout attempt finished, whatever its result.
    fn on_checkout_finished(&self) {}
}

/// Observer that ignores every notification.
pub struct NoOpObserver;

impl StoreObserver for NoOpObserver {}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::sync::Mutex;

    /// Observer event as recorded by [`RecordingObserver`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Update(Option<String>),
        Activity,
        Sync(usize),
        SyncError,
        CheckoutFinished,
    }

    /// Test observer that records every call.
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.events.lock().unwrap().clear();
        }

        fn push(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl StoreObserver for RecordingObserver {
        fn on_update(&self, item: Option<&str>) {
            self.push(Event::Update(item.map(str::to_string)));
        }

        fn on_activity(&self) {
            self.push(Event::Activity);
        }

        fn on_sync(&self, deltas: &DeltaList) {
            self.push(Event::Sync(deltas.len()));
        }

        fn on_sync_error(&self, _error: &SyncError) {
            self.push(Event::SyncError);
        }

        fn on_checkout_finished(&self) {
            self.push(Event::CheckoutFinished);
        }
    }
}
