//! Snapshot scheduler
//!
//! Timer-driven trigger that periodically asks the store actor to snapshot.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{tick, unbounded, Sender};
use crossbeam::select;

use crate::actor::StoreHandle;
use crate::error::{EpochError, Result};

/// Periodic snapshot trigger
///
/// Fires a snapshot request at the store actor on a fixed period. Never
/// waits for a snapshot to complete before the next tick: ticks arriving
/// while a prior write is still in flight are honored, and the actor's
/// dirty-flag check makes redundant requests cheap no-ops.
pub struct SnapshotScheduler {
    store: StoreHandle,
    interval: Duration,
}

impl SnapshotScheduler {
    pub fn new(store: StoreHandle, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Start the periodic loop on its own thread
    pub fn start(self) -> Result<RunningScheduler> {
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let interval = self.interval;

        let join = thread::Builder::new()
            .name("epochkv-scheduler".to_string())
            .spawn(move || {
                tracing::info!(interval_secs = interval.as_secs(), "Snapshot scheduler running");
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(shutdown_rx) -> _ => {
                            tracing::info!("Snapshot scheduler shutting down");
                            return;
                        }
                        recv(ticker) -> _ => {
                            tracing::debug!("Sending snapshot request");
                            if self.store.request_snapshot().is_err() {
                                // Actor stopped; nothing left to schedule for.
                                tracing::warn!("Store actor gone, stopping scheduler");
                                return;
                            }
                        }
                    }
                }
            })?;

        Ok(RunningScheduler {
            shutdown: shutdown_tx,
            join,
        })
    }
}

/// The scheduler in its running state
pub struct RunningScheduler {
    shutdown: Sender<()>,
    join: JoinHandle<()>,
}

impl RunningScheduler {
    /// Stop the periodic loop and wait for it to exit
    ///
    /// The loop exits at the next select after the signal and issues no
    /// further snapshot requests once this returns.
    pub fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.join
            .join()
            .map_err(|_| EpochError::StoreUnavailable("scheduler thread panicked".to_string()))
    }
}
