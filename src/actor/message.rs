//! Message definitions and the request bus
//!
//! The typed protocol between the request layer and the store actor.

use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};

use crate::error::{EpochError, Result};

/// A message delivered to the store actor's inbox
///
/// All three operations travel through one FIFO channel, so they are
/// processed strictly in the order they were accepted.
#[derive(Debug)]
pub enum Message {
    /// Point lookup; answered on `reply` before the next message is
    /// processed. `None` means not-found, which is a normal outcome,
    /// never a fault.
    Get {
        key: String,
        version: i64,
        reply: Sender<Option<String>>,
    },

    /// Store a value under `(key, version)`. Fire-and-forget.
    Put {
        key: String,
        value: String,
        version: i64,
    },

    /// Ask the actor to snapshot if it has unsaved writes. Fire-and-forget.
    Snapshot,
}

/// Client side of the store actor's inbox
///
/// Cheap to clone; every clone feeds the same FIFO inbox. Once the actor
/// has stopped, all operations fail with `StoreUnavailable`.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inbox: Sender<Message>,
    get_timeout: Duration,
}

impl StoreHandle {
    pub(crate) fn new(inbox: Sender<Message>, get_timeout: Duration) -> Self {
        Self { inbox, get_timeout }
    }

    /// Look up the entry for `key` with the smallest stored version >= `version`
    ///
    /// Synchronous request/response: blocks until the actor answers on a
    /// per-call reply channel, bounded by the caller-side timeout. Returns
    /// `Ok(None)` on not-found.
    pub fn get(&self, key: impl Into<String>, version: i64) -> Result<Option<String>> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(Message::Get {
            key: key.into(),
            version,
            reply: reply_tx,
        })?;

        reply_rx.recv_timeout(self.get_timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => EpochError::ResponseTimeout,
            // Actor dropped the reply sender without answering (stopped mid-flight).
            RecvTimeoutError::Disconnected => {
                EpochError::StoreUnavailable("store actor dropped the reply".to_string())
            }
        })
    }

    /// Store `value` under `(key, version)`
    ///
    /// Fire-and-forget: success is implied by the send being accepted. The
    /// actor performs no I/O on this path and cannot fail once it has the
    /// message.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>, version: i64) -> Result<()> {
        self.send(Message::Put {
            key: key.into(),
            value: value.into(),
            version,
        })
    }

    /// Ask the actor to snapshot its index if dirty. Fire-and-forget.
    pub fn request_snapshot(&self) -> Result<()> {
        self.send(Message::Snapshot)
    }

    fn send(&self, message: Message) -> Result<()> {
        self.inbox
            .send(message)
            .map_err(|_| EpochError::StoreUnavailable("store actor inbox closed".to_string()))
    }
}
