//! # Idle Reminder
//!
//! Nudges a shopper who has gone quiet.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   activity ──► reset()                                                  │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │   ┌──────────── wait idle_timeout ─────────────┐                        │
//! │   │                                            │                        │
//! │   │ reset() arrives first        timeout fires │                        │
//! │   ▼                                            ▼                        │
//! │  start over                     on_idle() then start over               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

pub const IDLE_MESSAGE: &str = "Hey there! Are you still planning to buy something?";

/// Cheap handle used to report activity to a running reminder.
#[derive(Clone, Default)]
pub struct IdleHandle {
    activity: Arc<Notify>,
}

impl IdleHandle {
    /// Restarts the countdown.
    pub fn reset(&self) {
        self.activity.notify_one();
    }
}

/// Background countdown. Stops when dropped.
pub struct IdleReminder {
    handle: IdleHandle,
    task: JoinHandle<()>,
}

impl IdleReminder {
    /// Starts the countdown; `on_idle` runs every time `timeout` passes
    /// without a reset.
    pub fn spawn<F>(timeout: Duration, on_idle: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let handle = IdleHandle::default();
        let activity = handle.activity.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(timeout) => {
                        debug!(?timeout, "Shopper idle");
                        on_idle();
                    }
                    _ = activity.notified() => {}
                }
            }
        });

        IdleReminder { handle, task }
    }

    pub fn handle(&self) -> IdleHandle {
        self.handle.clone()
    }
}

impl Drop for IdleReminder {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_reminder(timeout_secs: u64) -> (IdleReminder, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let reminder = IdleReminder::spawn(Duration::from_secs(timeout_secs), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (reminder, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_timeout_and_repeats() {
        let (_reminder, fired) = counting_reminder(30);

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_restarts_countdown() {
        let (reminder, fired) = counting_reminder(30);
        let handle = reminder.handle();

        tokio::time::sleep(Duration::from_secs(20)).await;
        handle.reset();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_stops_reminder() {
        let (reminder, fired) = counting_reminder(5);
        drop(reminder);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
