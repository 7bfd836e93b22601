//! Pure mapping between agent decisions, router signals, and observations.
//!
//! * [`Action`] – 5-bit wire integer accepted at the agent boundary.
//! * [`Decision`] – typed view (`request` vector + `drain` flag) carried
//!   through the bridge.
//! * [`control_signals`] / [`encode`] / [`reward`] – stateless translation
//!   between decisions, device signals, and the training signal.

mod action;
mod error;
mod observation;
mod reward;
mod step;

pub use action::{decode, encode_action, Action, Decision, RequestVector, ACTION_BITS, ACTION_COUNT};
pub use error::{CodecError, CodecResult};
pub use observation::{control_signals, encode, Observation, OBSERVATION_LEN};
pub use reward::{reward, RewardWeights};
pub use step::{MetaValue, Metadata, StepResult};
