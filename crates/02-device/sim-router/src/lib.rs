#![allow(missing_docs)]

//! Cycle-level reference model of a four-port router input buffer.
//!
//! Each rising edge first retires one buffered flit if `yumi_i` is high, then
//! enqueues one flit per asserted `req_i` bit in port order (N, S, E, W) until
//! the buffer is full; requests arriving at a full buffer are dropped.
//! `busy_o` is high while the buffer is saturated.

mod router;

pub use device_abi::DEFAULT_CAPACITY;
pub use router::{Flit, Port, RouterConfig, RouterConfigError, SimRouter, MAX_CAPACITY};
