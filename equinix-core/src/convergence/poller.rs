//! Poll-until-converged loop

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::WaitError;

use super::config::PollConfig;
use super::deletion::DeletionConvergence;
use super::fetcher::StateFetcher;

/// Repeatedly fetches one resource until its state lands in the target set.
///
/// The poller holds nothing but the operation's cancellation token, so one
/// instance can drive any number of concurrent polls.
///
/// Termination:
/// - a target state: `Ok(resource)`
/// - a failed lookup: [`WaitError::FetchFailed`], no retry
/// - budget exhausted: [`WaitError::Timeout`], never before `cfg.timeout`
/// - token cancelled: [`WaitError::Cancelled`], also mid-sleep and mid-lookup
///
/// States outside both sets are logged and polled through unless the config
/// is [`strict`](PollConfig::strict).
#[derive(Debug, Clone, Default)]
pub struct ConvergencePoller {
    cancel: CancellationToken,
}

impl ConvergencePoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn poll<F>(
        &self,
        handle: &str,
        fetcher: &F,
        cfg: &PollConfig,
    ) -> Result<F::Resource, WaitError>
    where
        F: StateFetcher + ?Sized,
    {
        cfg.validate()?;
        if handle.trim().is_empty() {
            return Err(WaitError::InvalidConfig(
                "resource handle is empty".to_string(),
            ));
        }
        // A budget already used up by the mutating call
        if cfg.timeout.is_zero() {
            log::warn!("[poll] {handle}: no time left in budget, not polling");
            return Err(WaitError::Timeout {
                timeout: cfg.timeout,
                attempts: 0,
                last_state: None,
            });
        }

        let start = Instant::now();
        let deadline = start + cfg.timeout;
        let interval = cfg.interval();

        if !cfg.initial_delay.is_zero() {
            self.sleep_until((start + cfg.initial_delay).min(deadline))
                .await?;
        }

        let mut attempts = 0_u32;

        loop {
            attempts += 1;
            let fetched = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                result = fetcher.fetch(handle) => Some(result),
            };
            let Some(fetched) = fetched else {
                log::debug!("[poll] {handle}: cancelled during lookup");
                return Err(WaitError::Cancelled);
            };
            let resource = fetched.map_err(|e| {
                log::warn!("[poll] {handle}: lookup {attempts} failed: {e}");
                WaitError::FetchFailed(e)
            })?;

            let state = fetcher.extract_state(&resource);
            log::debug!(
                "[poll] {handle}: attempt {attempts} observed '{state}' after {:.0}s",
                start.elapsed().as_secs_f64()
            );

            if cfg.is_target(&state) {
                return Ok(resource);
            }
            if cfg.is_unexpected(&state) {
                if cfg.strict {
                    return Err(WaitError::UnexpectedState {
                        state,
                        expected: cfg.pending.iter().chain(&cfg.target).cloned().collect(),
                    });
                }
                log::warn!("[poll] {handle}: unexpected state '{state}', still polling");
            }

            let now = Instant::now();
            if now >= deadline {
                log::debug!("[poll] {handle}: budget of {:?} exhausted", cfg.timeout);
                return Err(WaitError::Timeout {
                    timeout: cfg.timeout,
                    attempts,
                    last_state: Some(state),
                });
            }
            self.sleep_until((now + interval).min(deadline)).await?;
        }
    }

    /// Poll a delete: a 4xx lookup counts as `deleted_state`.
    ///
    /// Returns `None` when the resource disappeared, or the last fetched
    /// resource when it reported `deleted_state` itself.
    pub async fn poll_deletion<F>(
        &self,
        handle: &str,
        fetcher: F,
        deleted_state: &str,
        cfg: &PollConfig,
    ) -> Result<Option<F::Resource>, WaitError>
    where
        F: StateFetcher,
    {
        if !cfg.is_target(deleted_state) {
            return Err(WaitError::InvalidConfig(format!(
                "deleted state '{deleted_state}' is not a target state"
            )));
        }
        let fetcher = DeletionConvergence::new(fetcher, deleted_state);
        self.poll(handle, &fetcher, cfg).await
    }

    async fn sleep_until(&self, wake: Instant) -> Result<(), WaitError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(WaitError::Cancelled),
            () = tokio::time::sleep_until(wake) => Ok(()),
        }
    }
}
