//! Run timing
//!
//! Output refresh and sample logging run on independent periods measured
//! from the same millisecond counter.

/// Fixed-period gate
///
/// Fires on the first poll, then once per period on a grid anchored at
/// that first poll, so late polls do not shift later slots. After a stall
/// of two periods or more it fires once and restarts the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_ms: u32,
    /// Grid slot of the last firing
    last_ms: Option<u32>,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: None,
        }
    }

    /// Check whether the next slot has been reached, and advance if so
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return true;
        };

        let since = now_ms.wrapping_sub(last);
        if since < self.period_ms {
            return false;
        }

        let next = if since >= self.period_ms.saturating_mul(2) {
            now_ms
        } else {
            last.wrapping_add(self.period_ms)
        };
        self.last_ms = Some(next);
        true
    }
}

/// Timing state of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunTimer {
    start_ms: u32,
    update: Interval,
    log: Interval,
}

impl RunTimer {
    /// Start timing a run at `now_ms`
    pub fn start(now_ms: u32, update_interval_ms: u32, log_interval_ms: u32) -> Self {
        Self {
            start_ms: now_ms,
            update: Interval::new(update_interval_ms),
            log: Interval::new(log_interval_ms),
        }
    }

    /// Milliseconds since the run started
    pub fn elapsed_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.start_ms)
    }

    /// Check whether the outputs are due for a refresh
    pub fn update_due(&mut self, now_ms: u32) -> bool {
        self.update.poll(now_ms)
    }

    /// Check whether a sample is due
    pub fn log_due(&mut self, now_ms: u32) -> bool {
        self.log.poll(now_ms)
    }
}
