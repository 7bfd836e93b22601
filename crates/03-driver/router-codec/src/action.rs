use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Width of the wire-level action integer.
pub const ACTION_BITS: u32 = 5;
/// Size of the discrete action space.
pub const ACTION_COUNT: u32 = 1 << ACTION_BITS;

const REQUEST_MASK: u8 = 0x0F;
const DRAIN_SHIFT: u8 = 4;
const DRAIN_MASK: u8 = 0x01;

/// 5-bit action as produced by the agent: bits [0:3] request, bit 4 drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Action(u8);

impl Action {
    /// Validates a raw agent action; anything outside `0..32` is rejected.
    pub fn new(raw: i64) -> CodecResult<Self> {
        if (0..i64::from(ACTION_COUNT)).contains(&raw) {
            Ok(Action(raw as u8))
        } else {
            Err(CodecError::ActionOutOfRange(raw))
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Action {
    type Error = CodecError;

    fn try_from(raw: i64) -> CodecResult<Self> {
        Action::new(raw)
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> i64 {
        i64::from(action.0)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four request bits, one per router input port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestVector(u8);

impl RequestVector {
    /// Keeps the low four bits of `bits`.
    pub fn new(bits: u8) -> Self {
        RequestVector(bits & REQUEST_MASK)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Number of ports requesting this step.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Typed decision carried from the agent to the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub request: RequestVector,
    pub drain: bool,
}

impl Decision {
    pub fn new(request: u8, drain: bool) -> Self {
        Self {
            request: RequestVector::new(request),
            drain,
        }
    }
}

impl From<Action> for Decision {
    fn from(action: Action) -> Self {
        decode(action)
    }
}

impl From<Decision> for Action {
    fn from(decision: Decision) -> Self {
        encode_action(decision)
    }
}

/// Splits an action into its fields by fixed mask and shift.
pub fn decode(action: Action) -> Decision {
    Decision {
        request: RequestVector(action.0 & REQUEST_MASK),
        drain: (action.0 >> DRAIN_SHIFT) & DRAIN_MASK == 1,
    }
}

/// Packs a decision back into its wire action.
pub fn encode_action(decision: Decision) -> Action {
    Action(decision.request.bits() | (u8::from(decision.drain) << DRAIN_SHIFT))
}
