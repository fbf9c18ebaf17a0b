//! Adapter-driven scheduling primitives.
//!
//! Neither type owns a timer. The caller passes a monotonic `now_ms` and asks whether the
//! callback is due, which keeps the engines deterministic and trivially cancellable.

/// Leading-edge rate limiter: fires at most once per `interval_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Throttle {
    interval_ms: u64,
    last_fired_ms: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    /// Returns `true` (and records `now_ms`) when the window since the last firing has elapsed.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_fired_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_fired_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }
}

/// Trailing-edge delay: fires once, `delay_ms` after the most recent `schedule` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Debounce {
    delay_ms: u64,
    deadline_ms: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline_ms: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    /// (Re)starts the countdown from `now_ms`.
    pub fn schedule(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Returns `true` exactly once when the deadline has been reached.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }
}
