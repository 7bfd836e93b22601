//! Error handling helpers for the transport crate.
//!
//! Slots never fail on their own: the only error paths are an explicit close
//! (session abort) and a bounded wait that expired before the slot changed.

use thiserror::Error;

/// Convenience result alias for fallible transport operations.
pub type TransportResult<T, E = TransportError> = Result<T, E>;

/// Errors surfaced by the slot primitives.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The slot was closed; no further values will be exchanged.
    #[error("slot closed")]
    Closed,
    /// A bounded send did not find the slot free before its deadline.
    #[error("slot still occupied at deadline")]
    SendTimedOut,
}
