//! Decision-to-reward scenarios for the router codec.

use device_abi::{Signal, StatusSignals};
use pretty_assertions::assert_eq;
use router_codec::{
    decode, encode, encode_action, reward, Action, Decision, MetaValue, Observation,
    RewardWeights, StepResult, ACTION_COUNT,
};

fn sampled(count: u32, busy: u32) -> StatusSignals {
    StatusSignals {
        count: Signal::Defined(count),
        busy_o: Signal::Defined(busy),
    }
}

#[test]
fn request_and_drain_with_light_load() {
    let decision = decode(Action::new(0b10011).expect("valid action"));
    assert_eq!(decision, Decision::new(0b0011, true));

    let observation = encode(&sampled(2, 0), 64);
    assert_eq!(observation.to_vector(), [2.0, 0.0]);
    assert_eq!(reward(&decision, &observation, &RewardWeights::default()), 30.0);
}

#[test]
fn idle_decision_with_saturated_buffer() {
    let decision = decode(Action::new(0).expect("valid action"));
    let observation = encode(&sampled(64, 1), 64);
    assert_eq!(
        reward(&decision, &observation, &RewardWeights::default()),
        820.0
    );
}

#[test]
fn reward_ignores_undefined_samples() {
    let decision = Decision::new(0b1111, false);
    let observation = encode(
        &StatusSignals {
            count: Signal::Undefined,
            busy_o: Signal::Undefined,
        },
        64,
    );
    assert_eq!(observation, Observation::default());
    assert_eq!(
        reward(&decision, &observation, &RewardWeights::default()),
        40.0
    );
}

#[test]
fn custom_weights_apply_per_term() {
    let weights = RewardWeights {
        per_request: 1.0,
        per_entry: 0.5,
        busy_bonus: 2.0,
    };
    let observation = Observation {
        occupancy: 4,
        busy: true,
    };
    assert_eq!(
        reward(&Decision::new(0b0110, false), &observation, &weights),
        2.0 + 2.0 + 2.0
    );
}

#[test]
fn decode_inverts_encode_for_whole_action_space() {
    for request in 0..16u8 {
        for drain in [false, true] {
            let decision = Decision::new(request, drain);
            let action = encode_action(decision);
            assert!(u32::from(action.bits()) < ACTION_COUNT);
            assert_eq!(decode(action), decision);
        }
    }
}

#[test]
fn step_result_serializes_metadata_untagged() {
    let result = StepResult {
        observation: Observation {
            occupancy: 2,
            busy: false,
        },
        reward: 30.0,
        terminated: false,
        ..StepResult::default()
    }
    .with_meta("cycle", 7u64)
    .with_meta("phase", "acting");

    assert_eq!(result.metadata["cycle"], MetaValue::Int(7));
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["metadata"]["cycle"], 7);
    assert_eq!(json["metadata"]["phase"], "acting");
    assert_eq!(json["observation"]["occupancy"], 2);
}

#[test]
fn action_deserialization_rejects_out_of_range() {
    let ok: Action = serde_json::from_str("17").expect("valid action");
    assert_eq!(ok.bits(), 17);
    assert!(serde_json::from_str::<Action>("40").is_err());
}

mod prop {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Only `0..32` is accepted, and accepted actions survive decode/encode.
        #[test]
        fn actions_validate_and_round_trip(raw in prop_oneof![any::<i64>(), -64i64..64]) {
            match Action::new(raw) {
                Ok(action) => {
                    prop_assert!((0..i64::from(ACTION_COUNT)).contains(&raw));
                    prop_assert_eq!(i64::from(action), raw);
                    prop_assert_eq!(encode_action(decode(action)), action);
                }
                Err(_) => prop_assert!(!(0..i64::from(ACTION_COUNT)).contains(&raw)),
            }
        }

        /// Undefined or oversized samples never escape `[0, capacity]`.
        #[test]
        fn encoded_occupancy_is_bounded(
            count in any::<u32>(),
            busy in any::<u32>(),
            capacity in 1u32..1024
        ) {
            let observation = encode(&sampled(count, busy), capacity);
            prop_assert!(observation.occupancy <= capacity);
            prop_assert_eq!(observation.busy, busy != 0);
        }
    }
}
