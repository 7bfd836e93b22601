use std::thread::{self, JoinHandle};

use bridge::bridge;
use driver_loop::{DriverConfig, DriverExit, DriverLoop, DriverReport};
use pretty_assertions::assert_eq;
use router_codec::{Decision, MetaValue, StepResult};
use router_env::{run_episodes, EnvConfig, FixedPolicy, Policy, RandomPolicy, RouterEnv};
use sim_router::{RouterConfig, SimRouter};
use transport::{cancel_pair, CancelHandle};

use crate::init_logging;

struct Session {
    env: RouterEnv,
    cancel: CancelHandle,
    driver: JoinHandle<(DriverReport, SimRouter)>,
}

impl Session {
    fn start(router: RouterConfig, env: EnvConfig) -> Self {
        let (decisions, driver_end) = bridge::<Decision, StepResult>();
        let (cancel, token) = cancel_pair();
        let driver = thread::spawn(move || {
            let mut driver =
                DriverLoop::new(driver_end, SimRouter::new(router), token, DriverConfig::default());
            let report = driver.run().expect("driver run");
            (report, driver.into_device())
        });
        let env = RouterEnv::new(
            decisions,
            EnvConfig {
                capacity: router.capacity,
                ..env
            },
        );
        Self { env, cancel, driver }
    }

    fn finish(self) -> (RouterEnv, DriverReport, SimRouter) {
        self.cancel.cancel();
        let (report, router) = self.driver.join().expect("driver thread");
        (self.env, report, router)
    }
}

#[test]
fn random_policy_session_against_router_model() {
    init_logging();
    let mut session = Session::start(RouterConfig::default(), EnvConfig::default());
    let space = session.env.observation_space();
    let mut policy = RandomPolicy::new(3);

    let (mut observation, _) = session.env.reset();
    for n in 0..1_000i64 {
        let outcome = session.env.step(policy.act(&observation)).expect("step");
        assert!(space.contains(&outcome.observation));
        assert!(outcome.reward >= 0.0);
        assert_eq!(outcome.info["step"], MetaValue::Int(n));
        observation = outcome.observation;
    }

    let (env, report, router) = session.finish();
    assert_eq!(report.exit, DriverExit::Cancelled);
    assert_eq!(report.stats.decisions, 1_000);
    assert_eq!(report.stats.unresolved_samples, 0);
    assert_eq!(env.bridge_metrics().discarded_results, 0);
    assert_eq!(
        router.cycle(),
        report.stats.clock_edges + report.stats.reset_edges
    );
}

#[test]
fn flooding_without_drain_saturates_the_buffer() {
    init_logging();
    let mut session = Session::start(RouterConfig::default(), EnvConfig::default());
    session.env.reset();
    let outcomes: Vec<_> = (0..20)
        .map(|_| session.env.step(0b01111).expect("step"))
        .collect();
    let (_, _, router) = session.finish();

    let last = outcomes.last().expect("outcomes");
    assert_eq!(last.observation, [64.0, 1.0]);
    assert_eq!(last.reward, 4.0 * 10.0 + 64.0 * 5.0 + 500.0);
    assert!(outcomes.iter().all(|o| o.observation[0] <= 64.0));
    assert_eq!(router.occupancy(), 64);
    assert!(router.dropped() > 0);
}

#[test]
fn draining_only_keeps_buffer_empty() {
    init_logging();
    let mut session = Session::start(
        RouterConfig::default(),
        EnvConfig {
            max_episode_steps: Some(50),
            ..EnvConfig::default()
        },
    );
    let mut policy = FixedPolicy { action: 0b10000 };
    let summary = run_episodes(&mut session.env, &mut policy, 150).expect("session");
    session.finish();

    assert_eq!(summary.completed_episodes, 3);
    assert_eq!(summary.total_reward, 0.0);
}

#[test]
fn glitching_router_reads_default_instead_of_failing() {
    init_logging();
    let router = RouterConfig {
        glitch_every: 3,
        ..RouterConfig::default()
    };
    let mut session = Session::start(router, EnvConfig::default());
    let space = session.env.observation_space();
    session.env.reset();

    let mut unresolved = 0;
    for _ in 0..300 {
        let outcome = session.env.step(0b10001).expect("step");
        assert!(space.contains(&outcome.observation));
        assert!(outcome.reward.is_finite());
        if outcome.info["unresolved_sample"] == MetaValue::Bool(true) {
            unresolved += 1;
            assert_eq!(outcome.observation, [0.0, 0.0]);
            assert_eq!(outcome.reward, 10.0);
        }
    }
    let (_, report, _) = session.finish();

    assert!(unresolved > 0);
    assert_eq!(report.stats.unresolved_samples, unresolved);
}
