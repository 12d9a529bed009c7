//! Status poller - waits for an export task to finish
//!
//! The poller queries the task status, sleeps, and queries again until the
//! platform reports something other than `Accepted` / `InProgress`. With the
//! default policy this means a fixed 5 second delay and no attempt limit.

use crate::adapters::platform::ComplianceExportApi;
use crate::config::ExportConfig;
use crate::domain::{ExportTask, Result, TaskId};
use std::time::Duration;
use tokio::sync::watch;

/// How often, and how many times, to poll
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay after the first poll
    pub interval: Duration,

    /// Stop after this many polls (`None` = poll until the task finishes)
    pub max_attempts: Option<u32>,

    /// Delay multiplier applied after each poll (1.0 = fixed interval)
    pub backoff_multiplier: f64,

    /// Upper bound for the delay
    pub max_interval: Duration,
}

impl PollPolicy {
    /// Fixed interval, unbounded attempts
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            backoff_multiplier: 1.0,
            max_interval: interval,
        }
    }

    /// Policy from the `[export]` section
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_seconds),
            max_attempts: (config.max_poll_attempts > 0).then_some(config.max_poll_attempts),
            backoff_multiplier: config.backoff_multiplier,
            max_interval: Duration::from_secs(config.max_poll_interval_seconds),
        }
    }

    /// Limit the number of polls
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Grow the delay by `multiplier` after each poll, up to `max_interval`
    pub fn with_backoff(mut self, multiplier: f64, max_interval: Duration) -> Self {
        self.backoff_multiplier = multiplier;
        self.max_interval = max_interval;
        self
    }

    /// Delay to wait after the `attempt`-th poll (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.backoff_multiplier <= 1.0 {
            return self.interval;
        }

        let exponent = attempt.saturating_sub(1) as f64;
        let secs = self.interval.as_secs_f64() * self.backoff_multiplier.powf(exponent);
        let max = self.max_interval.max(self.interval);
        if !secs.is_finite() || secs >= max.as_secs_f64() {
            max
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    fn attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(5))
    }
}

/// How polling ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Task completed; datasets are ready
    Completed { task: ExportTask, attempts: u32 },

    /// Task reached a status other than running or completed
    Stopped { task: ExportTask, attempts: u32 },

    /// Attempt limit reached while the task was still running
    Exhausted { task: ExportTask, attempts: u32 },

    /// Shutdown was requested between polls
    Interrupted {
        last: Option<ExportTask>,
        attempts: u32,
    },
}

impl PollOutcome {
    /// Number of status queries made
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Completed { attempts, .. }
            | PollOutcome::Stopped { attempts, .. }
            | PollOutcome::Exhausted { attempts, .. }
            | PollOutcome::Interrupted { attempts, .. } => *attempts,
        }
    }

    /// Last task snapshot seen, if any
    pub fn task(&self) -> Option<&ExportTask> {
        match self {
            PollOutcome::Completed { task, .. }
            | PollOutcome::Stopped { task, .. }
            | PollOutcome::Exhausted { task, .. } => Some(task),
            PollOutcome::Interrupted { last, .. } => last.as_ref(),
        }
    }
}

/// Polls an export task until it is no longer running
#[derive(Debug, Clone, Default)]
pub struct StatusPoller {
    policy: PollPolicy,
}

impl StatusPoller {
    /// Create a poller with the given policy
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// The active policy
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Poll `task_id` until it leaves the running states
    ///
    /// A non-completed terminal status is reported as
    /// [`PollOutcome::Stopped`], not as an error.
    ///
    /// # Errors
    ///
    /// Any failed status query aborts polling and is returned as is.
    pub async fn poll(
        &self,
        api: &dyn ComplianceExportApi,
        task_id: &TaskId,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<PollOutcome> {
        let mut attempts: u32 = 0;
        let mut last: Option<ExportTask> = None;

        loop {
            if *shutdown.borrow() {
                tracing::info!(task_id = %task_id, attempts, "Polling interrupted by shutdown");
                return Ok(PollOutcome::Interrupted { last, attempts });
            }

            attempts += 1;
            let task = api.get_export_task(task_id).await?;
            crate::log_poll_attempt!(task_id, attempts, task.status);

            if task.status.is_completed() {
                tracing::info!(
                    task_id = %task_id,
                    attempts,
                    datasets = task.datasets.len(),
                    "Export task completed"
                );
                return Ok(PollOutcome::Completed { task, attempts });
            }

            if !task.status.is_running() {
                tracing::warn!(
                    task_id = %task_id,
                    status = %task.status,
                    attempts,
                    "Export task ended without completing, nothing to download"
                );
                return Ok(PollOutcome::Stopped { task, attempts });
            }

            if self.policy.attempts_exhausted(attempts) {
                tracing::warn!(
                    task_id = %task_id,
                    status = %task.status,
                    attempts,
                    "Giving up: export task still running after the maximum number of polls"
                );
                return Ok(PollOutcome::Exhausted { task, attempts });
            }

            let delay = self.policy.delay_after(attempts);
            tracing::debug!(
                task_id = %task_id,
                delay_ms = delay.as_millis() as u64,
                "Export task still running, waiting before next poll"
            );
            last = Some(task);

            if wait_or_shutdown(delay, shutdown).await {
                tracing::info!(task_id = %task_id, attempts, "Polling interrupted by shutdown");
                return Ok(PollOutcome::Interrupted { last, attempts });
            }
        }
    }
}

/// Sleep for `delay`; returns `true` if shutdown was requested meanwhile
async fn wait_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow() => return true,
                Ok(()) => continue,
                // Sender gone: nobody can request shutdown any more
                Err(_) => {
                    (&mut sleep).await;
                    return false;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::testing::ScriptedApi;
    use crate::domain::TaskStatus;
    use tokio::time::Instant;

    fn task_id() -> TaskId {
        TaskId::new("task-1").unwrap()
    }

    #[test]
    fn test_default_policy_is_fixed_five_seconds_unbounded() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.delay_after(1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(100), Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_delays_are_capped() {
        let policy = PollPolicy::fixed(Duration::from_secs(5))
            .with_backoff(2.0, Duration::from_secs(30));
        assert_eq!(policy.delay_after(1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(2), Duration::from_secs(10));
        assert_eq!(policy.delay_after(3), Duration::from_secs(20));
        assert_eq!(policy.delay_after(4), Duration::from_secs(30));
        assert_eq!(policy.delay_after(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_policy_from_config() {
        let config = ExportConfig {
            poll_interval_seconds: 2,
            max_poll_attempts: 0,
            ..Default::default()
        };
        assert_eq!(PollPolicy::from_config(&config).max_attempts, None);

        let config = ExportConfig {
            max_poll_attempts: 7,
            ..config
        };
        let policy = PollPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, Some(7));
        assert_eq!(policy.interval, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_completed_waits_between_attempts() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z")
            .then_status("Accepted")
            .then_status("InProgress")
            .then_completed(&["/media/a.zip", "/media/b.zip"]);
        let (_tx, mut rx) = watch::channel(false);

        let start = Instant::now();
        let outcome = StatusPoller::default()
            .poll(&api, &task_id(), &mut rx)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_secs(10));
        match outcome {
            PollOutcome::Completed { task, attempts } => {
                assert_eq!(attempts, 3);
                assert_eq!(task.datasets.len(), 2);
            }
            other => panic!("Expected Completed, got {other:?}"),
        }
        assert_eq!(api.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_stops_without_error() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z")
            .then_status("Accepted")
            .then_status("Failed");
        let (_tx, mut rx) = watch::channel(false);

        let outcome = StatusPoller::default()
            .poll(&api, &task_id(), &mut rx)
            .await
            .unwrap();

        match outcome {
            PollOutcome::Stopped { task, attempts } => {
                assert_eq!(task.status, TaskStatus::Failed);
                assert_eq!(attempts, 2);
            }
            other => panic!("Expected Stopped, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts_exhausted() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z")
            .then_status("InProgress")
            .then_status("InProgress")
            .then_status("InProgress");
        let (_tx, mut rx) = watch::channel(false);

        let poller = StatusPoller::new(PollPolicy::default().with_max_attempts(2));
        let outcome = poller.poll(&api, &task_id(), &mut rx).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Exhausted { attempts: 2, .. }));
        assert_eq!(api.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_poll() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z").then_status("Accepted");
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();

        let outcome = StatusPoller::default()
            .poll(&api, &task_id(), &mut rx)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Interrupted {
                last: None,
                attempts: 0
            }
        );
        assert_eq!(api.status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_wait() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z")
            .then_status("InProgress")
            .then_status("Completed");
        let (tx, mut rx) = watch::channel(false);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let _ = tx.send(true);
        });

        let outcome = StatusPoller::default()
            .poll(&api, &task_id(), &mut rx)
            .await
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Interrupted { attempts: 1, .. }));
        assert_eq!(outcome.task().map(|t| t.status.clone()), Some(TaskStatus::InProgress));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_shutdown_sender_keeps_polling() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z")
            .then_status("Accepted")
            .then_completed(&[]);
        let (tx, mut rx) = watch::channel(false);
        drop(tx);

        let outcome = StatusPoller::default()
            .poll(&api, &task_id(), &mut rx)
            .await
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Completed { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn test_status_error_aborts() {
        let api = ScriptedApi::new("task-1", "2019-08-01T10:00:00.000Z");
        let (_tx, mut rx) = watch::channel(false);

        let result = StatusPoller::default().poll(&api, &task_id(), &mut rx).await;
        assert!(result.is_err());
    }
}
