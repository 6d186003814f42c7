//! Pacing and bounding of polling loops.
//!
//! Gate motion and water level are observed by polling the hardware. A
//! [`PollPolicy`] sets the delay between polls and an optional upper bound;
//! a [`Poller`] applies it to one loop.

use std::time::Duration;

use crate::error::{ControlError, ControlResult};

/// Poll configuration shared by every loop of a chamber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollPolicy {
    /// Delay between consecutive polls. Zero polls back to back.
    pub interval: Duration,
    /// Maximum polls per loop. `None` polls until done or paused.
    pub max_polls: Option<u64>,
}

impl PollPolicy {
    /// Create a new poll policy.
    ///
    /// # Arguments
    ///
    /// * `interval` - Delay between polls
    /// * `max_polls` - Upper bound on polls per loop, if any
    pub fn new(interval: Duration, max_polls: Option<u64>) -> Self {
        Self {
            interval,
            max_polls,
        }
    }

    /// Back-to-back polling with no bound.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Same policy with a bound on polls per loop.
    pub fn with_max_polls(mut self, max_polls: u64) -> Self {
        self.max_polls = Some(max_polls);
        self
    }
}

/// Poll counter for a single loop.
#[derive(Debug, Clone)]
pub struct Poller {
    policy: PollPolicy,
    what: &'static str,
    polls: u64,
}

impl Poller {
    /// Start counting for a loop described by `what` (used in errors).
    pub fn new(policy: PollPolicy, what: &'static str) -> Self {
        Self {
            policy,
            what,
            polls: 0,
        }
    }

    /// Account for one more poll, waiting out the interval first.
    ///
    /// Fails with [`ControlError::PollLimitExceeded`] once the bound is used up.
    pub fn tick(&mut self) -> ControlResult {
        if let Some(max) = self.policy.max_polls {
            if self.polls >= max {
                return Err(ControlError::PollLimitExceeded {
                    what: self.what,
                    polls: self.polls,
                });
            }
        }
        self.polls += 1;
        if !self.policy.interval.is_zero() {
            std::thread::sleep(self.policy.interval);
        }
        Ok(())
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}
