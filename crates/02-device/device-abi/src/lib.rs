//! Signal-level interface to a cycle-stepped simulated device.
//!
//! The driver loop only ever talks to the device through [`Device`]: it holds
//! the reset line, drives the writable control signals, produces one rising
//! clock edge per loop iteration, and samples the readable status signals.
//! Status reads may be [`Signal::Undefined`] (X/Z) for a while after an edge;
//! callers are expected to default such values rather than fail.

pub mod mock;

use serde::{Deserialize, Serialize};

/// Buffer depth of the reference router design.
pub const DEFAULT_CAPACITY: u32 = 64;

/// Value sampled from a device output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal<T> {
    Defined(T),
    /// The output is not resolvable to a number at sample time.
    Undefined,
}

impl<T> Signal<T> {
    pub fn defined(self) -> Option<T> {
        match self {
            Signal::Defined(value) => Some(value),
            Signal::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Signal::Undefined)
    }
}

/// Writable inputs of the router, latched on the next clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSignals {
    /// One request bit per input port (N, S, E, W in bits 0..=3).
    pub req_i: u8,
    /// Drain acknowledge: pops one buffered entry per edge while high.
    pub yumi_i: bool,
    /// Payload words carried by each port; functionally ignored by the
    /// occupancy logic but must be driven.
    pub data_n_i: u32,
    pub data_s_i: u32,
    pub data_e_i: u32,
    pub data_w_i: u32,
}

impl ControlSignals {
    pub fn data(&self) -> [u32; 4] {
        [self.data_n_i, self.data_s_i, self.data_e_i, self.data_w_i]
    }
}

/// Readable outputs of the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSignals {
    /// Number of entries currently buffered.
    pub count: Signal<u32>,
    /// High while the buffer is saturated.
    pub busy_o: Signal<u32>,
}

impl StatusSignals {
    pub fn has_undefined(&self) -> bool {
        self.count.is_undefined() || self.busy_o.is_undefined()
    }
}

/// A clocked device model owned by the driver thread.
pub trait Device: Send {
    /// Drives the active-high reset line.
    fn set_reset(&mut self, asserted: bool);

    /// Applies control inputs; they take effect on the next edge.
    fn drive(&mut self, signals: &ControlSignals);

    /// Advances the model by exactly one rising clock edge.
    fn clock_edge(&mut self);

    /// Samples the status outputs as of the last edge.
    fn sample(&self) -> StatusSignals;

    /// Buffer depth, the upper bound for `count`.
    fn capacity(&self) -> u32;
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn set_reset(&mut self, asserted: bool) {
        (**self).set_reset(asserted)
    }

    fn drive(&mut self, signals: &ControlSignals) {
        (**self).drive(signals)
    }

    fn clock_edge(&mut self) {
        (**self).clock_edge()
    }

    fn sample(&self) -> StatusSignals {
        (**self).sample()
    }

    fn capacity(&self) -> u32 {
        (**self).capacity()
    }
}
