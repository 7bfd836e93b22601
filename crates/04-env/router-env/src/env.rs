use std::time::Duration;

use bridge::{BridgeMetrics, DecisionEnd};
use device_abi::DEFAULT_CAPACITY;
use log::{debug, info};
use router_codec::{decode, Action, Decision, MetaValue, Metadata, StepResult, ACTION_COUNT, OBSERVATION_LEN};
use serde::{Deserialize, Serialize};

use crate::error::EnvResult;
use crate::space::{BoxSpace, DiscreteSpace};

/// Decision-side bridge end specialised to router decisions.
pub type DecisionBridge = DecisionEnd<Decision, StepResult>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Buffer depth of the driven device; sizes the observation bound.
    pub capacity: u32,
    /// Steps after which an episode reports `truncated`.
    pub max_episode_steps: Option<u64>,
    /// Give up on a step after this long instead of blocking forever.
    pub step_timeout_ms: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_episode_steps: None,
            step_timeout_ms: None,
        }
    }
}

/// One `step` as the agent sees it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub observation: [f32; OBSERVATION_LEN],
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Metadata,
}

pub struct RouterEnv {
    bridge: DecisionBridge,
    config: EnvConfig,
    episode: u64,
    episode_steps: u64,
    total_steps: u64,
}

impl RouterEnv {
    pub fn new(bridge: DecisionBridge, config: EnvConfig) -> Self {
        Self {
            bridge,
            config,
            episode: 0,
            episode_steps: 0,
            total_steps: 0,
        }
    }

    pub fn action_space(&self) -> DiscreteSpace {
        DiscreteSpace { n: ACTION_COUNT }
    }

    /// Occupancy in `0..=capacity` plus one bit for busy.
    pub fn observation_space(&self) -> BoxSpace {
        BoxSpace {
            low: 0.0,
            high: self.config.capacity as f32 + 1.0,
            len: OBSERVATION_LEN,
        }
    }

    /// Starts a new episode at the device's post-reset observation.
    ///
    /// The driver is not consulted; the buffer is assumed empty and idle.
    pub fn reset(&mut self) -> ([f32; OBSERVATION_LEN], Metadata) {
        self.episode += 1;
        self.episode_steps = 0;
        debug!("env: episode {} begins", self.episode);
        let mut info = Metadata::new();
        info.insert("episode".to_owned(), MetaValue::from(self.episode));
        ([0.0; OBSERVATION_LEN], info)
    }

    /// Validates `action`, then blocks until the driver has acted on it.
    pub fn step(&mut self, action: i64) -> EnvResult<StepOutcome> {
        let decision = decode(Action::new(action)?);
        let result = match self.config.step_timeout_ms {
            Some(ms) => self
                .bridge
                .request_step_timeout(decision, Duration::from_millis(ms))?,
            None => self.bridge.request_step(decision)?,
        };
        self.episode_steps += 1;
        self.total_steps += 1;

        let truncated = self
            .config
            .max_episode_steps
            .is_some_and(|limit| self.episode_steps >= limit);
        if truncated {
            info!(
                "env: episode {} truncated after {} step(s)",
                self.episode, self.episode_steps
            );
        }

        let StepResult {
            observation,
            reward,
            terminated,
            mut metadata,
        } = result;
        metadata.insert("episode".to_owned(), MetaValue::from(self.episode));
        metadata.insert("episode_step".to_owned(), MetaValue::from(self.episode_steps));
        Ok(StepOutcome {
            observation: observation.to_vector(),
            reward,
            terminated,
            truncated,
            info: metadata,
        })
    }

    pub fn episode_steps(&self) -> u64 {
        self.episode_steps
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn bridge_metrics(&self) -> BridgeMetrics {
        self.bridge.metrics()
    }
}
