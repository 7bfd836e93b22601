#![allow(missing_docs)]

//! Clock-driven driver loop bridging agent decisions onto a simulated device.
//!
//! Every iteration starts in [`DriverState::AwaitingDecision`], takes exactly
//! one clock edge, and returns to `AwaitingDecision`. A polled decision is
//! driven onto the device, clocked, sampled, scored, and answered through the
//! bridge before the next poll; without a decision the device idles one edge.

mod clock;
mod config;
mod driver;
mod error;
mod state;

pub use clock::ClockPacer;
pub use config::{ClockConfig, DriverConfig, ResetConfig};
pub use driver::{DriverBridge, DriverExit, DriverLoop, DriverReport, DriverStats};
pub use error::{DriverError, DriverResult};
pub use state::DriverState;
