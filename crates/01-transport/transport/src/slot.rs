//! Single-slot rendezvous channel.
//!
//! The slot holds at most one value. A sender parks until the slot is empty,
//! deposits its value and returns; the receiver either parks until a value is
//! present or polls without blocking. Dropping an end does not close the slot:
//! a peer that stops draining leaves the other side parked, and only an
//! explicit [`SlotSender::close`] / [`SlotReceiver::close`] wakes waiters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::{TransportError, TransportResult};

struct SlotState<T> {
    value: Option<T>,
    closed: bool,
}

struct SharedSlot<T> {
    state: Mutex<SlotState<T>>,
    /// Signalled when a value lands in the slot or the slot closes.
    filled: Condvar,
    /// Signalled when the value is taken or the slot closes.
    drained: Condvar,
    metrics: SlotMetrics,
}

impl<T> SharedSlot<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                closed: false,
            }),
            filled: Condvar::new(),
            drained: Condvar::new(),
            metrics: SlotMetrics::default(),
        }
    }

    fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.value = None;
        drop(state);
        self.filled.notify_all();
        self.drained.notify_all();
    }

    fn take(&self, state: &mut SlotState<T>) -> Option<T> {
        let value = state.value.take()?;
        self.metrics.received.fetch_add(1, Ordering::Relaxed);
        self.drained.notify_one();
        Some(value)
    }
}

/// Creates a connected sender/receiver pair over one empty slot.
pub fn rendezvous<T: Send>() -> (SlotSender<T>, SlotReceiver<T>) {
    let shared = Arc::new(SharedSlot::new());
    (
        SlotSender {
            inner: Arc::clone(&shared),
        },
        SlotReceiver { inner: shared },
    )
}

/// Write end of a rendezvous slot.
pub struct SlotSender<T> {
    inner: Arc<SharedSlot<T>>,
}

impl<T: Send> SlotSender<T> {
    /// Deposits `value`, parking while a previous value is still undrained.
    pub fn send(&self, value: T) -> TransportResult<()> {
        let mut state = self.inner.state.lock();
        loop {
            if state.closed {
                return Err(TransportError::Closed);
            }
            if state.value.is_none() {
                break;
            }
            self.inner.drained.wait(&mut state);
        }
        self.deposit(&mut state, value);
        Ok(())
    }

    /// Like [`send`](Self::send) but gives up once `deadline` passes.
    ///
    /// On [`TransportError::SendTimedOut`] the value is dropped and the slot
    /// keeps its previous occupant.
    pub fn send_until(&self, value: T, deadline: Instant) -> TransportResult<()> {
        let mut state = self.inner.state.lock();
        loop {
            if state.closed {
                return Err(TransportError::Closed);
            }
            if state.value.is_none() {
                break;
            }
            if self
                .inner
                .drained
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                if state.closed {
                    return Err(TransportError::Closed);
                }
                if state.value.is_some() {
                    return Err(TransportError::SendTimedOut);
                }
                break;
            }
        }
        self.deposit(&mut state, value);
        Ok(())
    }

    /// Closes the slot, waking every parked sender and receiver.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn metrics(&self) -> SlotMetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    fn deposit(&self, state: &mut SlotState<T>, value: T) {
        state.value = Some(value);
        self.inner.metrics.sent.fetch_add(1, Ordering::Relaxed);
        self.inner.filled.notify_one();
    }
}

/// Read end of a rendezvous slot.
pub struct SlotReceiver<T> {
    inner: Arc<SharedSlot<T>>,
}

impl<T: Send> SlotReceiver<T> {
    /// Parks until a value is present, then removes and returns it.
    pub fn receive(&self) -> TransportResult<T> {
        let mut state = self.inner.state.lock();
        loop {
            if state.closed {
                return Err(TransportError::Closed);
            }
            if let Some(value) = self.inner.take(&mut state) {
                return Ok(value);
            }
            self.inner.filled.wait(&mut state);
        }
    }

    /// Returns the pending value or `None` without ever parking.
    pub fn try_receive(&self) -> TransportResult<Option<T>> {
        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        let value = self.inner.take(&mut state);
        if value.is_none() {
            self.inner.metrics.empty_polls.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    /// Parks until a value arrives or `deadline` passes, whichever is first.
    pub fn receive_until(&self, deadline: Instant) -> TransportResult<Option<T>> {
        let mut state = self.inner.state.lock();
        loop {
            if state.closed {
                return Err(TransportError::Closed);
            }
            if let Some(value) = self.inner.take(&mut state) {
                return Ok(Some(value));
            }
            if self
                .inner
                .filled
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                if state.closed {
                    return Err(TransportError::Closed);
                }
                let value = self.inner.take(&mut state);
                if value.is_none() {
                    self.inner.metrics.empty_polls.fetch_add(1, Ordering::Relaxed);
                }
                return Ok(value);
            }
        }
    }

    /// Closes the slot, waking every parked sender and receiver.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn metrics(&self) -> SlotMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

#[derive(Default)]
struct SlotMetrics {
    sent: AtomicU64,
    received: AtomicU64,
    empty_polls: AtomicU64,
}

impl SlotMetrics {
    fn snapshot(&self) -> SlotMetricsSnapshot {
        SlotMetricsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            empty_polls: self.empty_polls.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a slot's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotMetricsSnapshot {
    pub sent: u64,
    pub received: u64,
    pub empty_polls: u64,
}
