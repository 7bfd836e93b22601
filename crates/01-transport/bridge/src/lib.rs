//! Call/return bridge between a decision thread and a clock-driven driver thread.
//!
//! [`bridge`] builds two single-slot channels (decisions one way, results the
//! other) and hands back one role-typed end per thread. The decision side gets
//! RPC semantics from [`DecisionEnd::request_step`]; the driver side polls with
//! [`DriverEnd::poll_decision`] and answers with [`DriverEnd::post_result`].
//!
//! Neither end is `Clone`, so exactly one producer and one consumer can ever
//! touch the slots.

mod endpoint;
mod error;
mod ticket;

pub use endpoint::{bridge, BridgeMetrics, DecisionEnd, DriverEnd};
pub use error::{BridgeError, BridgeResult};
pub use ticket::{Ticket, Ticketed};
