//! Synchronous step/reset adapter for a learning agent.
//!
//! [`RouterEnv`] owns the decision end of the bridge. Each [`RouterEnv::step`]
//! validates the wire action, blocks for exactly one acted driver step, and
//! reshapes the result into the usual `(observation, reward, terminated,
//! truncated, info)` outcome. [`run_episodes`] drives an env with a
//! [`Policy`] for a fixed number of timesteps.

mod env;
mod error;
mod policy;
mod runner;
mod space;

pub use env::{DecisionBridge, EnvConfig, RouterEnv, StepOutcome};
pub use error::{EnvError, EnvResult};
pub use policy::{FixedPolicy, Policy, PolicyKind, RandomPolicy};
pub use runner::{run_episodes, TrainingSummary};
pub use space::{BoxSpace, DiscreteSpace};
