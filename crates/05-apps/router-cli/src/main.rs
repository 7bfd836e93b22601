//! Runs a policy against the reference router through the decision/driver bridge.

mod session;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use router_env::PolicyKind;

use crate::session::{run_session, SessionConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the router model from a policy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a policy for a fixed number of timesteps.
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// JSON session file; flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the effective session config as JSON and exit.
    #[arg(long)]
    print_config: bool,
    /// Total decision steps to take.
    #[arg(long)]
    timesteps: Option<u64>,
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Action used by the fixed policy (0..32).
    #[arg(long)]
    fixed_action: Option<i64>,
    /// Seed for the random policy and the payload generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Wall-clock microseconds per device edge; 0 free-runs.
    #[arg(long)]
    clock_period_us: Option<u64>,
    /// Router buffer depth.
    #[arg(long)]
    capacity: Option<u32>,
    /// Make every Nth edge read back unresolved.
    #[arg(long)]
    glitch_every: Option<u32>,
    /// Progress line every N acted steps; 0 disables.
    #[arg(long)]
    log_every: Option<u64>,
    /// Truncate episodes after N steps.
    #[arg(long)]
    episode_steps: Option<u64>,
    /// Fail a step that takes longer than this.
    #[arg(long)]
    step_timeout_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Random,
    Fixed,
}

impl RunArgs {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => SessionConfig::default(),
        };
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut SessionConfig) -> Result<()> {
        if let Some(timesteps) = self.timesteps {
            config.timesteps = timesteps;
        }
        if let Some(period) = self.clock_period_us {
            config.driver.clock.period_us = Some(period);
        }
        if let Some(capacity) = self.capacity {
            config.router.capacity = capacity;
        }
        if let Some(every) = self.glitch_every {
            config.router.glitch_every = every;
        }
        if let Some(every) = self.log_every {
            config.driver.log_every = every;
        }
        if let Some(steps) = self.episode_steps {
            config.env.max_episode_steps = Some(steps);
        }
        if let Some(ms) = self.step_timeout_ms {
            config.env.step_timeout_ms = Some(ms);
        }
        if let Some(seed) = self.seed {
            config.driver.payload_seed = seed;
            if let PolicyKind::Random { seed: current } = &mut config.policy {
                *current = seed;
            }
        }
        config.policy = match (self.policy, self.fixed_action) {
            (Some(PolicyArg::Random), _) => match config.policy {
                PolicyKind::Random { seed } => PolicyKind::Random { seed },
                PolicyKind::Fixed { .. } => PolicyKind::Random {
                    seed: self.seed.unwrap_or(0),
                },
            },
            (Some(PolicyArg::Fixed), None) => match config.policy {
                PolicyKind::Fixed { action } => PolicyKind::Fixed { action },
                PolicyKind::Random { .. } => bail!("--policy fixed needs --fixed-action"),
            },
            (Some(PolicyArg::Fixed), Some(action)) | (None, Some(action)) => {
                PolicyKind::Fixed { action }
            }
            (None, None) => config.policy,
        };
        if let PolicyKind::Fixed { action } = config.policy {
            router_codec::Action::new(action)
                .with_context(|| format!("fixed action {action}"))?;
        }
        config.validate()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let config = args.session_config()?;
            if args.print_config {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            let report = run_session(&config)?;
            let summary = &report.summary;
            println!(
                "timesteps={} episodes={} total_reward={} mean_reward={:.3}",
                summary.timesteps,
                summary.completed_episodes,
                summary.total_reward,
                summary.mean_step_reward()
            );
            let stats = report.driver.stats;
            println!(
                "driver: exit={:?} iterations={} idle_ticks={} unresolved_samples={} router_cycles={} dropped_requests={}",
                report.driver.exit,
                stats.iterations,
                stats.idle_ticks,
                stats.unresolved_samples,
                report.router_cycles,
                report.dropped_requests
            );
        }
    }
    Ok(())
}
