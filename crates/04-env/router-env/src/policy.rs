use rand::rngs::SmallRng;
use rand::SeedableRng;
use router_codec::{ACTION_COUNT, OBSERVATION_LEN};
use serde::{Deserialize, Serialize};

use crate::env::StepOutcome;
use crate::space::DiscreteSpace;

/// Decision algorithm driving a [`RouterEnv`](crate::RouterEnv).
pub trait Policy {
    fn name(&self) -> &'static str;

    /// Picks the wire action for the current observation.
    fn act(&mut self, observation: &[f32; OBSERVATION_LEN]) -> i64;

    /// Feedback for the action most recently returned by [`Policy::act`].
    fn observe(&mut self, _outcome: &StepOutcome) {}
}

/// Uniform over the whole action space.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: SmallRng,
    space: DiscreteSpace,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            space: DiscreteSpace { n: ACTION_COUNT },
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn act(&mut self, _observation: &[f32; OBSERVATION_LEN]) -> i64 {
        self.space.sample(&mut self.rng)
    }
}

/// Repeats one action forever.
#[derive(Clone, Copy, Debug)]
pub struct FixedPolicy {
    pub action: i64,
}

impl Policy for FixedPolicy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn act(&mut self, _observation: &[f32; OBSERVATION_LEN]) -> i64 {
        self.action
    }
}

/// Serializable choice of baseline policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyKind {
    Random { seed: u64 },
    Fixed { action: i64 },
}

impl Default for PolicyKind {
    fn default() -> Self {
        PolicyKind::Random { seed: 0 }
    }
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn Policy + Send> {
        match self {
            PolicyKind::Random { seed } => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Fixed { action } => Box::new(FixedPolicy { action }),
        }
    }
}
