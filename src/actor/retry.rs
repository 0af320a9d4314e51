use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::layout_engine::LayoutError;

/// How long to wait for the host to catch up before giving up on an action.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicy {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_attempts() -> u32 { 15 }

fn default_interval_ms() -> u64 { 100 }

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: default_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl RetryPolicy {
    pub fn interval(&self) -> Duration { Duration::from_millis(self.interval_ms) }

    /// Checks `ready` up to `attempts` times, calling `wait` between checks.
    /// Returns how many checks it took.
    pub fn poll<T: ?Sized>(
        &self,
        subject: &mut T,
        mut ready: impl FnMut(&mut T) -> bool,
        mut wait: impl FnMut(&mut T, Duration),
    ) -> Result<u32, LayoutError> {
        for attempt in 1..=self.attempts {
            if ready(subject) {
                trace!(attempt, "ready");
                return Ok(attempt);
            }
            if attempt < self.attempts {
                wait(subject, self.interval());
            }
        }
        error!(attempts = self.attempts, "timed out waiting for the layout to settle");
        Err(LayoutError::Timeout { attempts: self.attempts })
    }
}
