use std::time::{Duration, Instant};

use log::{error, trace, warn};
use transport::{rendezvous, SlotMetricsSnapshot, SlotReceiver, SlotSender, TransportError};

use crate::error::{BridgeError, BridgeResult};
use crate::ticket::{Ticket, Ticketed};

/// Creates the slot pair for one session and splits it into role ends.
pub fn bridge<D: Send, R: Send>() -> (DecisionEnd<D, R>, DriverEnd<D, R>) {
    let (decision_tx, decision_rx) = rendezvous();
    let (result_tx, result_rx) = rendezvous();
    (
        DecisionEnd {
            decisions: decision_tx,
            results: result_rx,
            next_ticket: Ticket(0),
            discarded: 0,
        },
        DriverEnd {
            decisions: decision_rx,
            results: result_tx,
            outstanding: None,
            last_answered: None,
        },
    )
}

/// Decision-thread end: submits decisions and parks for their results.
pub struct DecisionEnd<D, R> {
    decisions: SlotSender<Ticketed<D>>,
    results: SlotReceiver<Ticketed<R>>,
    next_ticket: Ticket,
    discarded: u64,
}

impl<D: Send, R: Send> DecisionEnd<D, R> {
    /// Sends `decision` and parks until the matching result is posted.
    ///
    /// There is no timeout: if the driver stops draining, this never returns.
    pub fn request_step(&mut self, decision: D) -> BridgeResult<R> {
        let ticket = self.issue_ticket();
        self.decisions
            .send(Ticketed {
                ticket,
                payload: decision,
            })
            .map_err(abort)?;
        loop {
            let result = self.results.receive().map_err(abort)?;
            if let Some(payload) = self.accept(ticket, result) {
                return Ok(payload);
            }
        }
    }

    /// Supervised variant of [`request_step`](Self::request_step).
    ///
    /// On expiry the decision is abandoned; a late result for it is discarded
    /// by the next request.
    pub fn request_step_timeout(&mut self, decision: D, timeout: Duration) -> BridgeResult<R> {
        let deadline = Instant::now() + timeout;
        let ticket = self.issue_ticket();
        match self.decisions.send_until(
            Ticketed {
                ticket,
                payload: decision,
            },
            deadline,
        ) {
            Ok(()) => {}
            Err(TransportError::SendTimedOut) => {
                warn!("bridge: decision {ticket} not accepted before deadline");
                return Err(BridgeError::TimedOut { ticket });
            }
            Err(TransportError::Closed) => return Err(BridgeError::Aborted),
        }
        loop {
            match self.results.receive_until(deadline).map_err(abort)? {
                Some(result) => {
                    if let Some(payload) = self.accept(ticket, result) {
                        return Ok(payload);
                    }
                }
                None => {
                    warn!("bridge: decision {ticket} abandoned after {timeout:?}");
                    return Err(BridgeError::TimedOut { ticket });
                }
            }
        }
    }

    pub fn metrics(&self) -> BridgeMetrics {
        BridgeMetrics {
            decisions: self.decisions.metrics(),
            results: self.results.metrics(),
            discarded_results: self.discarded,
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        ticket
    }

    fn accept(&mut self, expected: Ticket, result: Ticketed<R>) -> Option<R> {
        if result.ticket == expected {
            trace!("bridge: result {expected} delivered");
            return Some(result.payload);
        }
        self.discarded += 1;
        warn!(
            "bridge: discarding result {} for abandoned decision (awaiting {expected})",
            result.ticket
        );
        None
    }
}

/// Driver-thread end: polls for decisions and posts exactly one result each.
pub struct DriverEnd<D, R> {
    decisions: SlotReceiver<Ticketed<D>>,
    results: SlotSender<Ticketed<R>>,
    outstanding: Option<Ticket>,
    last_answered: Option<Ticket>,
}

impl<D: Send, R: Send> DriverEnd<D, R> {
    /// Takes the pending decision if any, never parking.
    pub fn poll_decision(&mut self) -> BridgeResult<Option<D>> {
        self.ensure_idle()?;
        let polled = self.decisions.try_receive().map_err(abort)?;
        Ok(self.track(polled))
    }

    /// Waits for a decision until `deadline`, e.g. the next clock edge.
    pub fn poll_decision_until(&mut self, deadline: Instant) -> BridgeResult<Option<D>> {
        self.ensure_idle()?;
        let polled = self.decisions.receive_until(deadline).map_err(abort)?;
        Ok(self.track(polled))
    }

    /// Answers the decision taken by the last successful poll.
    pub fn post_result(&mut self, result: R) -> BridgeResult<()> {
        let Some(ticket) = self.outstanding.take() else {
            let reason = if self.last_answered.is_some() {
                "result posted twice for one decision"
            } else {
                "result posted with no pending decision"
            };
            return Err(self.violation(reason));
        };
        self.results
            .send(Ticketed {
                ticket,
                payload: result,
            })
            .map_err(abort)?;
        self.last_answered = Some(ticket);
        Ok(())
    }

    /// Ticket of the decision currently being acted on.
    pub fn outstanding(&self) -> Option<Ticket> {
        self.outstanding
    }

    pub fn metrics(&self) -> BridgeMetrics {
        BridgeMetrics {
            decisions: self.decisions.metrics(),
            results: self.results.metrics(),
            discarded_results: 0,
        }
    }

    fn ensure_idle(&mut self) -> BridgeResult<()> {
        match self.outstanding {
            Some(_) => Err(self.violation("decision polled before previous result was posted")),
            None => Ok(()),
        }
    }

    fn track(&mut self, polled: Option<Ticketed<D>>) -> Option<D> {
        let polled = polled?;
        trace!("bridge: decision {} taken", polled.ticket);
        self.outstanding = Some(polled.ticket);
        Some(polled.payload)
    }

    fn violation(&mut self, reason: &'static str) -> BridgeError {
        error!("bridge: {reason}; aborting session");
        self.decisions.close();
        self.results.close();
        BridgeError::ProtocolViolation(reason)
    }
}

fn abort(err: TransportError) -> BridgeError {
    match err {
        TransportError::Closed | TransportError::SendTimedOut => BridgeError::Aborted,
    }
}

/// Combined counters for both slots of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeMetrics {
    pub decisions: SlotMetricsSnapshot,
    pub results: SlotMetricsSnapshot,
    pub discarded_results: u64,
}
