use bridge::DriverEnd;
use device_abi::{ControlSignals, Device};
use log::{debug, info, trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use router_codec::{control_signals, encode, encode_action, reward, Decision, StepResult};
use transport::CancelToken;

use crate::clock::ClockPacer;
use crate::config::DriverConfig;
use crate::error::DriverResult;
use crate::state::DriverState;

/// Driver-side bridge end specialised to router decisions.
pub type DriverBridge = DriverEnd<Decision, StepResult>;

/// Counters accumulated over a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub iterations: u64,
    /// Edges taken with reset released.
    pub clock_edges: u64,
    pub reset_edges: u64,
    pub decisions: u64,
    pub idle_ticks: u64,
    pub rewards_evaluated: u64,
    /// Samples with at least one unresolved status signal.
    pub unresolved_samples: u64,
}

/// Why [`DriverLoop::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverExit {
    /// The decision side cancelled or went away.
    Cancelled,
    /// `max_iterations` was reached.
    IterationCap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverReport {
    pub exit: DriverExit,
    pub stats: DriverStats,
}

/// Time-stepped loop owning the device and the driver end of the bridge.
pub struct DriverLoop<D: Device> {
    bridge: DriverBridge,
    device: D,
    cancel: CancelToken,
    config: DriverConfig,
    clock: ClockPacer,
    rng: SmallRng,
    state: DriverState,
    stats: DriverStats,
}

impl<D: Device> DriverLoop<D> {
    pub fn new(bridge: DriverBridge, device: D, cancel: CancelToken, config: DriverConfig) -> Self {
        Self {
            bridge,
            device,
            cancel,
            clock: ClockPacer::new(config.clock.period()),
            rng: SmallRng::seed_from_u64(config.payload_seed),
            config,
            state: DriverState::AwaitingDecision,
            stats: DriverStats::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Holds reset for the configured number of edges, then releases it.
    pub fn reset_device(&mut self) {
        self.device.set_reset(true);
        for _ in 0..self.config.reset.hold_edges {
            self.device.clock_edge();
            self.stats.reset_edges += 1;
        }
        self.device.set_reset(false);
        info!(
            "driver: reset released after {} edge(s)",
            self.config.reset.hold_edges
        );
    }

    /// Resets the device, then iterates until cancelled or capped.
    ///
    /// Cancellation is checked once per iteration; a decision still waiting
    /// in the bridge at that point is abandoned.
    pub fn run(&mut self) -> DriverResult<DriverReport> {
        self.reset_device();
        info!(
            "driver: waiting for decisions ({})",
            if self.clock.is_free_running() {
                "free-running clock"
            } else {
                "paced clock"
            }
        );
        let exit = loop {
            if self.cancel.is_cancelled() {
                break DriverExit::Cancelled;
            }
            if let Some(cap) = self.config.max_iterations {
                if self.stats.iterations >= cap {
                    break DriverExit::IterationCap;
                }
            }
            self.iterate()?;
        };
        info!(
            "driver: finished ({exit:?}) after {} iteration(s), {} decision(s)",
            self.stats.iterations, self.stats.decisions
        );
        Ok(DriverReport {
            exit,
            stats: self.stats,
        })
    }

    /// Runs one iteration: from `AwaitingDecision` back to `AwaitingDecision`,
    /// taking exactly one clock edge.
    pub fn iterate(&mut self) -> DriverResult<()> {
        self.stats.iterations += 1;
        loop {
            let current = std::mem::replace(&mut self.state, DriverState::AwaitingDecision);
            let from = current.name();
            let next = self.transition(current)?;
            trace!("driver: {from} -> {}", next.name());
            self.state = next;
            if next == DriverState::AwaitingDecision {
                return Ok(());
            }
        }
    }

    fn transition(&mut self, state: DriverState) -> DriverResult<DriverState> {
        match state {
            DriverState::AwaitingDecision => {
                let polled = match self.clock.next_edge() {
                    Some(deadline) => self.bridge.poll_decision_until(deadline)?,
                    None => self.bridge.poll_decision()?,
                };
                Ok(match polled {
                    Some(decision) => {
                        let signals = self.control_for(&decision);
                        self.device.drive(&signals);
                        DriverState::Acting(decision)
                    }
                    None => DriverState::IdleTick,
                })
            }
            DriverState::Acting(decision) => {
                self.edge();
                let result = self.complete(&decision);
                self.bridge.post_result(result)?;
                Ok(DriverState::AwaitingDecision)
            }
            DriverState::IdleTick => {
                self.edge();
                self.stats.idle_ticks += 1;
                trace!("driver: idle edge {}", self.stats.clock_edges);
                Ok(DriverState::AwaitingDecision)
            }
        }
    }

    fn control_for(&mut self, decision: &Decision) -> ControlSignals {
        let payload: [u32; 4] = self.rng.gen();
        control_signals(decision, payload)
    }

    fn edge(&mut self) {
        self.clock.wait_edge(&self.cancel);
        self.device.clock_edge();
        self.stats.clock_edges += 1;
    }

    fn complete(&mut self, decision: &Decision) -> StepResult {
        let status = self.device.sample();
        let unresolved = status.has_undefined();
        if unresolved {
            self.stats.unresolved_samples += 1;
            warn!(
                "driver: unresolved status at edge {}; defaulting",
                self.stats.clock_edges
            );
        }
        let observation = encode(&status, self.device.capacity());
        let value = reward(decision, &observation, &self.config.reward);
        self.stats.rewards_evaluated += 1;

        let step = self.stats.decisions;
        self.stats.decisions += 1;
        debug!(
            "driver: step {step} req={:04b} drain={} -> obs={:?} reward={value}",
            decision.request.bits(),
            decision.drain as u8,
            observation.to_vector()
        );
        if self.config.log_every != 0 && step % self.config.log_every == 0 {
            info!(
                "cycle {step}: action={} (req={}, drain={}) | reward={value} | buffer={}",
                encode_action(*decision),
                decision.request.bits(),
                decision.drain as u8,
                observation.occupancy
            );
        }

        StepResult {
            observation,
            reward: value,
            terminated: false,
            ..StepResult::default()
        }
        .with_meta("step", step)
        .with_meta("cycle", self.stats.clock_edges)
        .with_meta("unresolved_sample", unresolved)
    }
}
