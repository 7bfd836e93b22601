use std::time::{Duration, Instant};

use transport::CancelToken;

/// Tracks wall-clock edge deadlines for a paced device clock.
///
/// A free-running pacer has no deadlines and never sleeps.
#[derive(Debug)]
pub struct ClockPacer {
    period: Option<Duration>,
    next_edge: Option<Instant>,
}

impl ClockPacer {
    pub fn new(period: Option<Duration>) -> Self {
        Self {
            period,
            next_edge: None,
        }
    }

    pub fn is_free_running(&self) -> bool {
        self.period.is_none()
    }

    /// Deadline of the upcoming edge, armed on first use.
    pub fn next_edge(&mut self) -> Option<Instant> {
        let period = self.period?;
        Some(*self.next_edge.get_or_insert_with(|| Instant::now() + period))
    }

    /// Sleeps until the upcoming edge and schedules the one after it.
    ///
    /// The sleep ends early once `cancel` fires. A pacer that has fallen more
    /// than a period behind restarts from now instead of bursting to catch up.
    pub fn wait_edge(&mut self, cancel: &CancelToken) {
        let (Some(period), Some(deadline)) = (self.period, self.next_edge()) else {
            return;
        };
        if deadline > Instant::now() && cancel.sleep_until(deadline) {
            self.next_edge = Some(Instant::now() + period);
            return;
        }
        let after = deadline + period;
        let now = Instant::now();
        self.next_edge = Some(if after < now { now + period } else { after });
    }
}
