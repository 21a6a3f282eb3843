//! # Catalog Poller
//!
//! Background task that keeps the store in step with the server.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   t=0          t=N           t=2N          t=3N                         │
//! │   spawn ─────► sync ───────► sync ───────► sync ──► ... ──► shutdown   │
//! │                  │             │                                        │
//! │                  └── failure is logged, the next tick tries again      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Polls go through `Store::sync_with_server`, so they queue behind any
//! sync or checkout already in flight.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::store::Store;

/// Handle for stopping a running poller.
#[derive(Clone)]
pub struct PollerHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl PollerHandle {
    /// Triggers graceful shutdown.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelError("Poller already stopped".into()))
    }
}

/// Periodic sync driver.
pub struct Poller {
    store: Store,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Poller {
    /// Spawns the poller. The first poll happens one interval from now.
    pub fn spawn(store: Store, interval: Duration) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let poller = Poller {
            store,
            interval,
            shutdown_rx,
        };
        tokio::spawn(poller.run());

        PollerHandle { shutdown_tx }
    }

    async fn run(mut self) {
        info!(interval = ?self.interval, "Poller starting");

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.store.sync_with_server().await {
                        Ok(deltas) => debug!(changed = deltas.len(), "Poll applied"),
                        Err(e) => warn!(error = %e, "Poll failed"),
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Poller shutting down");
                    break;
                }
            }
        }

        info!("Poller stopped");
    }
}
