use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::WaitError;

/// Fixed interval between two state lookups.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(30);
/// Floor applied to the interval.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(30);

/// What to wait for and for how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// States that keep the poll going. Empty means "anything but target".
    pub pending: BTreeSet<String>,
    /// States that end the poll successfully
    pub target: BTreeSet<String>,
    /// Total wall-clock budget, measured from the start of the poll
    pub timeout: Duration,
    pub delay: Duration,
    pub min_interval: Duration,
    /// Wait before the first lookup
    pub initial_delay: Duration,
    /// Fail on states outside `pending` and `target` instead of polling on
    pub strict: bool,
}

impl PollConfig {
    pub fn new<P, T>(pending: P, target: T, timeout: Duration) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            pending: pending.into_iter().map(Into::into).collect(),
            target: target.into_iter().map(Into::into).collect(),
            timeout,
            delay: DEFAULT_DELAY,
            min_interval: DEFAULT_MIN_INTERVAL,
            initial_delay: Duration::ZERO,
            strict: false,
        }
    }

    /// Wait for `target` with no pending set.
    pub fn target_only<T>(target: T, timeout: Duration) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self::new(Vec::<String>::new(), target, timeout)
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Sleep between two lookups.
    pub fn interval(&self) -> Duration {
        self.delay.max(self.min_interval)
    }

    pub fn is_target(&self, state: &str) -> bool {
        self.target.contains(state)
    }

    /// A state neither pending nor target. Never true when `pending` is empty.
    pub fn is_unexpected(&self, state: &str) -> bool {
        !self.pending.is_empty() && !self.pending.contains(state) && !self.target.contains(state)
    }

    pub fn validate(&self) -> Result<(), WaitError> {
        if self.target.is_empty() {
            return Err(WaitError::InvalidConfig(
                "target state set is empty".to_string(),
            ));
        }
        let overlap: Vec<&str> = self
            .pending
            .intersection(&self.target)
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            return Err(WaitError::InvalidConfig(format!(
                "states both pending and target: {}",
                overlap.join(", ")
            )));
        }
        if self.interval().is_zero() {
            return Err(WaitError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
