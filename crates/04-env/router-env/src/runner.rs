use log::{debug, info};
use serde::Serialize;

use crate::env::RouterEnv;
use crate::error::EnvResult;
use crate::policy::Policy;

/// Totals for a [`run_episodes`] session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub timesteps: u64,
    /// Episodes that ended by termination or truncation.
    pub completed_episodes: u64,
    pub total_reward: f64,
    pub best_episode_reward: Option<f64>,
}

impl TrainingSummary {
    pub fn mean_step_reward(&self) -> f64 {
        if self.timesteps == 0 {
            0.0
        } else {
            self.total_reward / self.timesteps as f64
        }
    }
}

/// Steps `env` with `policy` for `total_timesteps` steps, resetting at
/// episode boundaries.
pub fn run_episodes(
    env: &mut RouterEnv,
    policy: &mut dyn Policy,
    total_timesteps: u64,
) -> EnvResult<TrainingSummary> {
    info!(
        "env: running {} policy for {total_timesteps} timestep(s)",
        policy.name()
    );
    let mut summary = TrainingSummary::default();
    let (mut observation, _) = env.reset();
    let mut episode_reward = 0.0;

    while summary.timesteps < total_timesteps {
        let action = policy.act(&observation);
        let outcome = env.step(action)?;
        policy.observe(&outcome);

        summary.timesteps += 1;
        summary.total_reward += outcome.reward;
        episode_reward += outcome.reward;

        if outcome.terminated || outcome.truncated {
            summary.completed_episodes += 1;
            summary.best_episode_reward = Some(
                summary
                    .best_episode_reward
                    .map_or(episode_reward, |best| best.max(episode_reward)),
            );
            debug!("env: episode reward {episode_reward}");
            episode_reward = 0.0;
            observation = env.reset().0;
        } else {
            observation = outcome.observation;
        }
    }

    info!(
        "env: done after {} timestep(s), {} episode(s), mean reward {:.2}",
        summary.timesteps,
        summary.completed_episodes,
        summary.mean_step_reward()
    );
    Ok(summary)
}
