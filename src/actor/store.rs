//! Store actor implementation
//!
//! The message loop that owns the versioned index for the process lifetime.

use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam::channel::{unbounded, Receiver, Sender};
use crossbeam::select;

use crate::error::{EpochError, Result};
use crate::index::{VersionedEntry, VersionedIndex};
use crate::snapshot::SnapshotStore;

use super::message::{Message, StoreHandle};

/// The store actor before it starts serving
///
/// ## State Machine
///
/// `Created → (Restored) → Running → Stopped`, encoded in ownership:
/// - `StoreActor` is the Created/Restored state; `restore` is only
///   reachable here, before any message can be served.
/// - `start(self)` consumes the actor and moves it onto its own thread,
///   returning the Running state as a `RunningStore`.
/// - `RunningStore::stop(self)` consumes the running state; there is no way
///   back, so Stopped is terminal. Handles that outlive the actor get
///   `StoreUnavailable` on send.
pub struct StoreActor {
    index: VersionedIndex,
    snapshots: SnapshotStore,
    dirty: bool,
}

impl StoreActor {
    /// Create an actor with an empty index
    pub fn new(snapshots: SnapshotStore) -> Self {
        Self {
            index: VersionedIndex::new(),
            snapshots,
            dirty: false,
        }
    }

    /// Replace the index wholesale (startup-only, before `start`)
    ///
    /// Used to hand the actor the result of `SnapshotStore::read_latest`.
    pub fn restore(&mut self, index: VersionedIndex) {
        tracing::info!(entries = index.len(), "Restored index from snapshot");
        self.index = index;
    }

    /// Start the serialized message loop on its own thread
    ///
    /// Returns the request-bus handle and the running actor. `get_timeout`
    /// bounds how long a `get` caller waits for its reply.
    pub fn start(self, get_timeout: Duration) -> Result<(StoreHandle, RunningStore)> {
        let (inbox_tx, inbox_rx) = unbounded::<Message>();
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();

        let join = thread::Builder::new()
            .name("epochkv-store".to_string())
            .spawn(move || self.run(inbox_rx, shutdown_rx))?;

        let handle = StoreHandle::new(inbox_tx, get_timeout);
        let running = RunningStore {
            handle: handle.clone(),
            shutdown: shutdown_tx,
            join,
        };

        Ok((handle, running))
    }

    /// The serialized message loop
    ///
    /// Processes one message at a time, in receipt order. On shutdown,
    /// drains every message already accepted before exiting, so nothing
    /// handed to the inbox is dropped.
    fn run(mut self, inbox: Receiver<Message>, shutdown: Receiver<()>) {
        tracing::info!("Store actor running");
        loop {
            select! {
                recv(shutdown) -> _ => {
                    self.drain(&inbox);
                    // Second pass for sends that raced the first one. A send
                    // completing after this is accepted but never processed;
                    // callers sequence sends before stop() to avoid that.
                    self.drain(&inbox);
                    tracing::info!("Store actor shutting down");
                    return;
                }
                recv(inbox) -> message => match message {
                    Ok(message) => self.handle(message),
                    // All handles dropped; nothing can arrive anymore.
                    Err(_) => {
                        tracing::info!("Store actor inbox closed, exiting");
                        return;
                    }
                },
            }
        }
    }

    /// Process every message already sitting in the inbox
    fn drain(&mut self, inbox: &Receiver<Message>) {
        while let Ok(message) = inbox.try_recv() {
            self.handle(message);
        }
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Get { key, version, reply } => {
                tracing::debug!(%key, version, "Getting");
                let value = self.index.lookup(&key, version).map(|entry| entry.value);
                // Caller may have timed out and dropped its receiver.
                let _ = reply.send(value);
            }
            Message::Put { key, value, version } => {
                tracing::debug!(%key, %value, version, "Inserting");
                self.index.upsert(VersionedEntry { key, value, version });
                self.dirty = true;
            }
            Message::Snapshot => self.snapshot_if_dirty(),
        }
    }

    /// Snapshot hand-off, gated by the dirty flag
    ///
    /// The copy and the flag clear both happen inside this serialized turn,
    /// before the asynchronous write completes, so a put arriving right
    /// after re-dirties the index even while the write is still in flight.
    fn snapshot_if_dirty(&mut self) {
        if !self.dirty {
            tracing::debug!("Skipping snapshot, index not dirty");
            return;
        }

        let copy = self.index.snapshot_copy();
        let tag = wall_clock_tag();
        let _ = self.snapshots.spawn_write(copy.into_entries(), tag);
        self.dirty = false;
    }
}

/// The store actor in its Running state
///
/// Owns the shutdown signal and the actor thread. Stopping consumes this
/// value; afterwards every outstanding `StoreHandle` fails with
/// `StoreUnavailable`.
pub struct RunningStore {
    handle: StoreHandle,
    shutdown: Sender<()>,
    join: JoinHandle<()>,
}

impl RunningStore {
    /// Get a request-bus handle to this actor
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Request orderly termination and wait for the loop to exit
    ///
    /// Every message whose send returned before this call is still
    /// processed during the shutdown drain; no message is accepted once
    /// this returns. A send racing with the drain itself may be accepted
    /// but never processed, so callers that need a message handled must
    /// sequence it before calling stop.
    pub fn stop(self) -> Result<()> {
        // Loop may already be gone if every sender was dropped.
        let _ = self.shutdown.send(());
        self.join
            .join()
            .map_err(|_| EpochError::StoreUnavailable("store actor thread panicked".to_string()))
    }
}

/// Current wall-clock Unix second, used as the snapshot tag
fn wall_clock_tag() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(_) => {
            // A tag of 0 loses latest-selection to every existing snapshot.
            tracing::warn!("System clock is before the Unix epoch, tagging snapshot 0");
            0
        }
    }
}
