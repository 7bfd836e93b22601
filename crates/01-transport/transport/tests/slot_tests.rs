//! Rendezvous slot semantics across threads.
//! Covers capacity-one backpressure, FIFO-of-one delivery, close wakeups,
//! and a property check against a one-element reference model.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use transport::{rendezvous, TransportError};

/// A second send must park until the receiver drains the first value.
#[test]
fn second_send_parks_until_drained() {
    let (tx, rx) = rendezvous::<u32>();
    tx.send(1).expect("first send");

    let landed = Arc::new(AtomicBool::new(false));
    let landed_writer = Arc::clone(&landed);
    let writer = thread::spawn(move || {
        tx.send(2).expect("second send");
        landed_writer.store(true, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(50));
    assert!(
        !landed.load(Ordering::SeqCst),
        "send must not complete while the slot is occupied"
    );

    assert_eq!(rx.receive(), Ok(1));
    writer.join().unwrap();
    assert!(landed.load(Ordering::SeqCst));
    assert_eq!(rx.receive(), Ok(2));
}

/// Values cross the slot in submission order even when the consumer is slow.
#[test]
fn values_arrive_in_send_order() {
    const COUNT: u32 = 2_000;
    let (tx, rx) = rendezvous::<u32>();

    let writer = thread::spawn(move || {
        for x in 0..COUNT {
            tx.send(x).expect("send");
        }
    });

    let mut seen = Vec::with_capacity(COUNT as usize);
    while seen.len() < COUNT as usize {
        match rx.try_receive().expect("slot open") {
            Some(v) => seen.push(v),
            None => thread::yield_now(),
        }
    }
    writer.join().unwrap();

    assert_eq!(seen, (0..COUNT).collect::<Vec<_>>());
    let metrics = rx.metrics();
    assert_eq!(metrics.sent, u64::from(COUNT));
    assert_eq!(metrics.received, u64::from(COUNT));
}

/// Closing the slot wakes a receiver parked on an empty slot.
#[test]
fn close_wakes_parked_receiver() {
    let (tx, rx) = rendezvous::<u32>();
    let reader = thread::spawn(move || rx.receive());

    thread::sleep(Duration::from_millis(20));
    tx.close();
    assert_eq!(reader.join().unwrap(), Err(TransportError::Closed));
}

/// Closing the slot wakes a sender parked on an occupied slot.
#[test]
fn close_wakes_parked_sender() {
    let (tx, rx) = rendezvous::<u32>();
    tx.send(1).expect("send");
    let writer = thread::spawn(move || tx.send(2));

    thread::sleep(Duration::from_millis(20));
    rx.close();
    assert_eq!(writer.join().unwrap(), Err(TransportError::Closed));
}

/// Dropping the sender leaves a parked receiver parked; only close wakes it.
#[test]
fn dropped_sender_does_not_wake_receiver() {
    let (tx, rx) = rendezvous::<u32>();
    drop(tx);
    let deadline = Instant::now() + Duration::from_millis(30);
    assert_eq!(rx.receive_until(deadline), Ok(None));
}

/// A bounded receive returns as soon as the value lands.
#[test]
fn receive_until_wakes_on_send() {
    let (tx, rx) = rendezvous::<u32>();
    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        tx.send(42).expect("send");
    });
    let start = Instant::now();
    let got = rx
        .receive_until(start + Duration::from_secs(5))
        .expect("slot open");
    assert_eq!(got, Some(42));
    assert!(start.elapsed() < Duration::from_secs(5));
    writer.join().unwrap();
}

mod prop {
    use super::*;
    use proptest::collection;
    use proptest::prelude::*;
    use transport::SlotReceiver;

    #[derive(Clone, Debug)]
    enum Op {
        Send(u32),
        Poll,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![any::<u32>().prop_map(Op::Send), Just(Op::Poll)]
    }

    fn poll(rx: &SlotReceiver<u32>) -> Option<u32> {
        rx.try_receive().expect("slot open")
    }

    proptest! {
        /// Single-threaded op sequences must match a one-element reference slot.
        /// Sends that would park are skipped by the model and the harness alike.
        #[test]
        fn slot_matches_single_cell_model(ops in collection::vec(op(), 1..200)) {
            let (tx, rx) = rendezvous::<u32>();
            let mut model: Option<u32> = None;

            for op in ops {
                match op {
                    Op::Send(x) => {
                        if model.is_none() {
                            tx.send(x).expect("send into empty slot");
                            model = Some(x);
                        }
                    }
                    Op::Poll => {
                        prop_assert_eq!(poll(&rx), model.take());
                    }
                }
            }
            prop_assert_eq!(poll(&rx), model.take());
            prop_assert_eq!(poll(&rx), None);
        }
    }
}
