use serde::{Deserialize, Serialize};

use crate::action::Decision;
use crate::observation::Observation;

/// Shaping weights; defaults favour sustained occupancy and saturation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Paid per requesting port.
    pub per_request: f64,
    /// Paid per buffered entry after the step.
    pub per_entry: f64,
    /// Paid once when the buffer reports busy.
    pub busy_bonus: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            per_request: 10.0,
            per_entry: 5.0,
            busy_bonus: 500.0,
        }
    }
}

/// Deterministic reward for one acted step.
pub fn reward(decision: &Decision, observation: &Observation, weights: &RewardWeights) -> f64 {
    let mut total = f64::from(decision.request.count()) * weights.per_request;
    total += f64::from(observation.occupancy) * weights.per_entry;
    if observation.busy {
        total += weights.busy_bonus;
    }
    total
}
