//! Core transport primitives shared by the decision and driver threads.
//!
//! This crate exposes the leaf pieces the bridge is assembled from:
//! * [`rendezvous`] – single-slot blocking channel with capacity exactly one.
//! * [`cancel_pair`] – ownership-based liveness signal used to stop the driver.
//! * [`TransportError`] – lightweight error surface for closed or expired waits.

mod cancel;
mod error;
mod slot;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use error::{TransportError, TransportResult};
pub use slot::{rendezvous, SlotMetricsSnapshot, SlotReceiver, SlotSender};
