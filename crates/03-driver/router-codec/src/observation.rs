use device_abi::{ControlSignals, Signal, StatusSignals};
use serde::{Deserialize, Serialize};

use crate::action::Decision;

/// Number of entries in the observation vector.
pub const OBSERVATION_LEN: usize = 2;

/// Router state as seen by the agent after one step.
///
/// `occupancy` is always within `[0, capacity]`; `busy` is a single bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub occupancy: u32,
    pub busy: bool,
}

impl Observation {
    /// Vector layout handed to the agent: `[occupancy, busy]`.
    pub fn to_vector(self) -> [f32; OBSERVATION_LEN] {
        [self.occupancy as f32, if self.busy { 1.0 } else { 0.0 }]
    }
}

/// Maps sampled status signals to an observation.
///
/// Unresolved signals read as 0 and occupancy is clamped to `capacity`, so a
/// sample taken mid-transition never yields an out-of-range value.
pub fn encode(status: &StatusSignals, capacity: u32) -> Observation {
    let occupancy = match status.count {
        Signal::Defined(count) => count.min(capacity),
        Signal::Undefined => 0,
    };
    let busy = match status.busy_o {
        Signal::Defined(bit) => bit != 0,
        Signal::Undefined => false,
    };
    Observation { occupancy, busy }
}

/// Control inputs for one acted step; `payload` fills the four data ports.
pub fn control_signals(decision: &Decision, payload: [u32; 4]) -> ControlSignals {
    let [data_n_i, data_s_i, data_e_i, data_w_i] = payload;
    ControlSignals {
        req_i: decision.request.bits(),
        yumi_i: decision.drain,
        data_n_i,
        data_s_i,
        data_e_i,
        data_w_i,
    }
}
