use thiserror::Error;

use crate::ticket::Ticket;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The driver broke the one-result-per-decision discipline.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    /// The session was torn down after a protocol violation.
    #[error("bridge aborted")]
    Aborted,

    /// The supervising wait expired; the decision (if sent) is abandoned.
    #[error("step request {ticket} timed out")]
    TimedOut { ticket: Ticket },
}
