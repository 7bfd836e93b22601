//! Ownership-based liveness signal.
//!
//! The decision side holds the [`CancelHandle`]; the driver side polls the
//! [`CancelToken`]. Dropping the handle (or calling [`CancelHandle::cancel`])
//! disconnects the underlying channel, which every token observes on its next
//! check. Nothing is ever sent over the channel.

use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Creates a connected handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    (CancelHandle { _tx: tx }, CancelToken { rx })
}

/// Keeps the session alive for as long as it is held.
#[derive(Debug)]
pub struct CancelHandle {
    _tx: Sender<()>,
}

impl CancelHandle {
    /// Signals cancellation to every token.
    pub fn cancel(self) {
        drop(self);
    }
}

/// Cheap, cloneable view of the handle's liveness.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: Receiver<()>,
}

impl CancelToken {
    /// True once the paired handle has been cancelled or dropped.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleeps until `deadline`, returning early with `true` if cancelled.
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        matches!(
            self.rx.recv_deadline(deadline),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}
