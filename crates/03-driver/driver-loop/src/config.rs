use std::time::Duration;

use router_codec::RewardWeights;
use serde::{Deserialize, Serialize};

/// Clock pacing for the simulated device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Wall-clock time between edges in microseconds; `None` free-runs.
    pub period_us: Option<u64>,
}

impl ClockConfig {
    pub fn period(&self) -> Option<Duration> {
        self.period_us
            .filter(|us| *us > 0)
            .map(Duration::from_micros)
    }
}

/// Reset sequencing applied before the first iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    /// Edges taken with reset asserted.
    pub hold_edges: u32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self { hold_edges: 2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub clock: ClockConfig,
    pub reset: ResetConfig,
    pub reward: RewardWeights,
    /// Emit a progress line every N acted steps; 0 disables.
    pub log_every: u64,
    /// Stop after this many iterations even if the decision side is alive.
    pub max_iterations: Option<u64>,
    /// Seed for the payload words driven alongside each decision.
    pub payload_seed: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            reset: ResetConfig::default(),
            reward: RewardWeights::default(),
            log_every: 100,
            max_iterations: None,
            payload_seed: 0,
        }
    }
}
