use std::collections::VecDeque;

use device_abi::{ControlSignals, Device, Signal, StatusSignals, DEFAULT_CAPACITY};
use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deepest buffer the model accepts.
pub const MAX_CAPACITY: u32 = 1 << 16;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RouterConfigError {
    #[error("router capacity must be at least 1")]
    ZeroCapacity,
    #[error("router capacity {0} exceeds {max}", max = MAX_CAPACITY)]
    CapacityTooLarge(u32),
}

/// Router input ports in request-bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    North,
    South,
    East,
    West,
}

impl Port {
    pub const ALL: [Port; 4] = [Port::North, Port::South, Port::East, Port::West];

    pub fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// One buffered transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flit {
    pub port: Port,
    pub data: u32,
}

/// Model configuration shared by the CLI and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Maximum number of buffered flits.
    pub capacity: u32,
    /// When non-zero, every Nth edge leaves the outputs unresolved (X) until
    /// the following edge.
    pub glitch_every: u32,
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), RouterConfigError> {
        match self.capacity {
            0 => Err(RouterConfigError::ZeroCapacity),
            capacity if capacity > MAX_CAPACITY => {
                Err(RouterConfigError::CapacityTooLarge(capacity))
            }
            _ => Ok(()),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            glitch_every: 0,
        }
    }
}

/// Reference router model implementing [`Device`].
///
/// Outputs power on unresolved and only become defined once an edge has been
/// taken with reset held.
pub struct SimRouter {
    config: RouterConfig,
    buffer: VecDeque<Flit>,
    inputs: ControlSignals,
    in_reset: bool,
    outputs_valid: bool,
    cycle: u64,
    dropped: u64,
}

impl SimRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            buffer: VecDeque::new(),
            inputs: ControlSignals::default(),
            in_reset: false,
            outputs_valid: false,
            cycle: 0,
            dropped: 0,
        }
    }

    /// Edges taken since construction, reset edges included.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Requests refused because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn occupancy(&self) -> u32 {
        self.buffer.len() as u32
    }

    pub fn front(&self) -> Option<Flit> {
        self.buffer.front().copied()
    }

    fn busy(&self) -> bool {
        self.occupancy() >= self.config.capacity
    }

    fn glitching(&self) -> bool {
        self.config.glitch_every != 0 && self.cycle % u64::from(self.config.glitch_every) == 0
    }

    fn step_datapath(&mut self) {
        if self.inputs.yumi_i {
            self.buffer.pop_front();
        }
        let data = self.inputs.data();
        for (port, word) in Port::ALL.into_iter().zip(data) {
            if self.inputs.req_i & port.bit() == 0 {
                continue;
            }
            if self.busy() {
                self.dropped += 1;
                continue;
            }
            self.buffer.push_back(Flit { port, data: word });
        }
    }
}

impl Default for SimRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl Device for SimRouter {
    fn set_reset(&mut self, asserted: bool) {
        self.in_reset = asserted;
    }

    fn drive(&mut self, signals: &ControlSignals) {
        self.inputs = *signals;
    }

    fn clock_edge(&mut self) {
        self.cycle += 1;
        if self.in_reset {
            self.buffer.clear();
            self.inputs = ControlSignals::default();
            self.dropped = 0;
            self.outputs_valid = true;
            return;
        }
        self.step_datapath();
        trace!(
            "sim-router: cycle={} req={:04b} yumi={} count={}",
            self.cycle,
            self.inputs.req_i,
            self.inputs.yumi_i as u8,
            self.buffer.len()
        );
    }

    fn sample(&self) -> StatusSignals {
        if !self.outputs_valid || (!self.in_reset && self.glitching()) {
            return StatusSignals {
                count: Signal::Undefined,
                busy_o: Signal::Undefined,
            };
        }
        StatusSignals {
            count: Signal::Defined(self.occupancy()),
            busy_o: Signal::Defined(self.busy() as u32),
        }
    }

    fn capacity(&self) -> u32 {
        self.config.capacity
    }
}
