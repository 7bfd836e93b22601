//! Two-thread session wiring: a policy on the decision thread, the reference
//! router on the driver thread, one bridge between them.

use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use bridge::bridge;
use driver_loop::{DriverConfig, DriverLoop, DriverReport};
use log::info;
use router_codec::{Decision, StepResult};
use router_env::{run_episodes, EnvConfig, PolicyKind, RouterEnv, TrainingSummary};
use serde::{Deserialize, Serialize};
use sim_router::{RouterConfig, SimRouter};
use transport::cancel_pair;

pub const DEFAULT_TIMESTEPS: u64 = 200_000;

/// Everything needed to run one session; loadable from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub router: RouterConfig,
    pub driver: DriverConfig,
    pub env: EnvConfig,
    pub policy: PolicyKind,
    pub timesteps: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            driver: DriverConfig::default(),
            env: EnvConfig::default(),
            policy: PolicyKind::default(),
            timesteps: DEFAULT_TIMESTEPS,
        }
    }
}

impl SessionConfig {
    /// Rejects settings the two threads cannot run to completion with.
    ///
    /// A capped driver stops answering, so the decision side needs a step
    /// timeout to notice instead of parking forever.
    pub fn validate(&self) -> Result<()> {
        self.router.validate().context("invalid router config")?;
        if let Some(cap) = self.driver.max_iterations {
            if self.env.step_timeout_ms.is_none() {
                bail!("driver.max_iterations = {cap} requires env.step_timeout_ms");
            }
        }
        Ok(())
    }

    /// Env settings with the observation bound taken from the router depth.
    pub fn effective_env(&self) -> EnvConfig {
        EnvConfig {
            capacity: self.router.capacity,
            ..self.env
        }
    }
}

#[derive(Debug)]
pub struct SessionReport {
    pub summary: TrainingSummary,
    pub driver: DriverReport,
    pub router_cycles: u64,
    pub dropped_requests: u64,
}

/// Runs the decision and driver threads to completion.
///
/// The decision thread owns the cancel handle, so the driver stops on its
/// next iteration once the policy has used up its timesteps or failed.
pub fn run_session(config: &SessionConfig) -> Result<SessionReport> {
    config.validate()?;
    let (decisions, driver_end) = bridge::<Decision, StepResult>();
    let (cancel, token) = cancel_pair();

    let router_config = config.router;
    let driver_config = config.driver;
    let driver = thread::Builder::new()
        .name("driver".into())
        .spawn(move || {
            let mut driver = DriverLoop::new(
                driver_end,
                SimRouter::new(router_config),
                token,
                driver_config,
            );
            let report = driver.run()?;
            let router = driver.into_device();
            Ok::<_, driver_loop::DriverError>((report, router.cycle(), router.dropped()))
        })
        .context("spawning driver thread")?;

    let env_config = config.effective_env();
    let policy = config.policy;
    let timesteps = config.timesteps;
    let decision = thread::Builder::new()
        .name("decision".into())
        .spawn(move || {
            let _cancel = cancel;
            let mut env = RouterEnv::new(decisions, env_config);
            let mut policy = policy.build();
            run_episodes(&mut env, policy.as_mut(), timesteps)
        })
        .context("spawning decision thread")?;

    let summary = decision
        .join()
        .map_err(|_| anyhow!("decision thread panicked"))?;
    let (driver, router_cycles, dropped_requests) = driver
        .join()
        .map_err(|_| anyhow!("driver thread panicked"))?
        .context("driver loop failed")?;
    let summary = summary.context("decision loop failed")?;

    info!(
        "session: {} timestep(s) over {router_cycles} router cycle(s), {dropped_requests} request(s) dropped",
        summary.timesteps
    );
    Ok(SessionReport {
        summary,
        driver,
        router_cycles,
        dropped_requests,
    })
}
