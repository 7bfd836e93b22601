use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use bridge::{bridge, BridgeError, Ticket};
use device_abi::mock::ScriptedDevice;
use driver_loop::{DriverConfig, DriverExit, DriverLoop};
use pretty_assertions::assert_eq;
use router_codec::{decode, Action, Decision, MetaValue, StepResult};
use router_env::{EnvConfig, EnvError, RouterEnv};
use sim_router::SimRouter;
use transport::cancel_pair;

use crate::init_logging;

fn decision(raw: i64) -> Decision {
    decode(Action::new(raw).expect("valid action"))
}

fn capped(iterations: u64) -> DriverConfig {
    DriverConfig {
        max_iterations: Some(iterations),
        ..DriverConfig::default()
    }
}

#[test]
fn idle_router_advances_one_edge_per_iteration() {
    init_logging();
    const K: u64 = 128;
    let (_decisions, driver_end) = bridge::<Decision, StepResult>();
    let (_cancel, token) = cancel_pair();
    let mut driver = DriverLoop::new(driver_end, SimRouter::default(), token, capped(K));
    let report = driver.run().expect("driver run");
    let router = driver.into_device();

    assert_eq!(report.exit, DriverExit::IterationCap);
    assert_eq!(report.stats.clock_edges, K);
    assert_eq!(report.stats.rewards_evaluated, 0);
    assert_eq!(router.cycle(), K + 2);
    assert_eq!(router.occupancy(), 0);
}

#[test]
fn request_after_driver_exit_never_completes() {
    init_logging();
    let (mut decisions, driver_end) = bridge::<Decision, StepResult>();
    let (_cancel, token) = cancel_pair();
    let report = DriverLoop::new(driver_end, SimRouter::default(), token, capped(10))
        .run()
        .expect("driver run");
    assert_eq!(report.exit, DriverExit::IterationCap);

    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        let result = decisions.request_step(decision(1));
        let _ = done_tx.send(result);
    });
    assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn supervised_env_reports_stalled_driver() {
    init_logging();
    let (decisions, driver_end) = bridge::<Decision, StepResult>();
    let (_cancel, token) = cancel_pair();
    DriverLoop::new(driver_end, ScriptedDevice::constant(64, 0, 0), token, capped(3))
        .run()
        .expect("driver run");

    let mut env = RouterEnv::new(
        decisions,
        EnvConfig {
            step_timeout_ms: Some(50),
            ..EnvConfig::default()
        },
    );
    env.reset();
    assert_eq!(
        env.step(1),
        Err(EnvError::Bridge(BridgeError::TimedOut { ticket: Ticket(0) }))
    );
}

#[test]
fn late_result_for_abandoned_step_is_dropped() {
    init_logging();
    let (mut decisions, driver_end) = bridge::<Decision, StepResult>();
    let (cancel, token) = cancel_pair();

    let abandoned = decisions.request_step_timeout(decision(0b00001), Duration::from_millis(10));
    assert_eq!(abandoned, Err(BridgeError::TimedOut { ticket: Ticket(0) }));

    let driver = thread::spawn(move || {
        DriverLoop::new(
            driver_end,
            ScriptedDevice::constant(64, 1, 0),
            token,
            DriverConfig::default(),
        )
        .run()
        .expect("driver run")
    });

    let result = decisions.request_step(decision(0b00011)).expect("step");
    cancel.cancel();
    let report = driver.join().expect("driver thread");

    assert_eq!(result.metadata["step"], MetaValue::Int(1));
    assert_eq!(result.reward, 2.0 * 10.0 + 5.0);
    assert_eq!(decisions.metrics().discarded_results, 1);
    assert_eq!(report.stats.decisions, 2);
}
