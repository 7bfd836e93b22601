//! Scripted device used by driver and end-to-end tests.
//!
//! Status outputs are replayed from a queue (falling back to a fixed value)
//! and every interaction is counted through a shared [`DeviceProbe`], so a
//! test can keep inspecting the device after moving it into a driver thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{ControlSignals, Device, Signal, StatusSignals};

/// Shared counters observed by tests.
#[derive(Debug, Default)]
pub struct DeviceProbe {
    edges: AtomicU64,
    reset_edges: AtomicU64,
    drives: AtomicU64,
    resets_asserted: AtomicU64,
    driven: Mutex<Vec<ControlSignals>>,
}

impl DeviceProbe {
    /// Edges taken with reset released.
    pub fn edges(&self) -> u64 {
        self.edges.load(Ordering::SeqCst)
    }

    /// Edges taken while reset was held.
    pub fn reset_edges(&self) -> u64 {
        self.reset_edges.load(Ordering::SeqCst)
    }

    pub fn drives(&self) -> u64 {
        self.drives.load(Ordering::SeqCst)
    }

    pub fn resets_asserted(&self) -> u64 {
        self.resets_asserted.load(Ordering::SeqCst)
    }

    /// Every control word driven so far, in order.
    pub fn driven(&self) -> Vec<ControlSignals> {
        self.driven.lock().clone()
    }
}

pub struct ScriptedDevice {
    capacity: u32,
    script: VecDeque<StatusSignals>,
    fallback: StatusSignals,
    current: StatusSignals,
    in_reset: bool,
    probe: Arc<DeviceProbe>,
}

impl ScriptedDevice {
    /// Device that always reports `count`/`busy` after every edge.
    pub fn constant(capacity: u32, count: u32, busy: u32) -> Self {
        let status = StatusSignals {
            count: Signal::Defined(count),
            busy_o: Signal::Defined(busy),
        };
        Self {
            capacity,
            script: VecDeque::new(),
            fallback: status,
            current: status,
            in_reset: false,
            probe: Arc::new(DeviceProbe::default()),
        }
    }

    /// Queues a status to be reported after the next unscripted edge.
    pub fn then(mut self, status: StatusSignals) -> Self {
        self.script.push_back(status);
        self
    }

    pub fn probe(&self) -> Arc<DeviceProbe> {
        Arc::clone(&self.probe)
    }
}

impl Device for ScriptedDevice {
    fn set_reset(&mut self, asserted: bool) {
        if asserted {
            self.probe.resets_asserted.fetch_add(1, Ordering::SeqCst);
        }
        self.in_reset = asserted;
    }

    fn drive(&mut self, signals: &ControlSignals) {
        self.probe.drives.fetch_add(1, Ordering::SeqCst);
        self.probe.driven.lock().push(*signals);
    }

    fn clock_edge(&mut self) {
        if self.in_reset {
            self.probe.reset_edges.fetch_add(1, Ordering::SeqCst);
            return;
        }
        self.probe.edges.fetch_add(1, Ordering::SeqCst);
        self.current = self.script.pop_front().unwrap_or(self.fallback);
    }

    fn sample(&self) -> StatusSignals {
        self.current
    }

    fn capacity(&self) -> u32 {
        self.capacity
    }
}
