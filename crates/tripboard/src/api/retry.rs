//! Retry policy and per-lookup state machine.
//!
//! Only the transient statuses 429, 500 and 503 are retried, with exponential
//! backoff starting at one second. Every other non-200 status ends the lookup
//! on the spot. Transport failures are never retried.
//!
//! [`LookupMachine`] holds no timers and does no I/O: the caller reports what
//! happened and the machine answers with the next [`Step`]. Lifecycle:
//!
//! ```text
//! Idle ──start──▶ Requesting{1} ──200──▶ Succeeded
//!                      │
//!                      ├──429/500/503, attempts left──▶ Requesting{n+1}
//!                      └──anything else──────────────▶ Failed
//! ```

use std::time::Duration;

/// Statuses that indicate a transient upstream failure.
pub const RETRYABLE_STATUSES: [u16; 3] = [429, 500, 503];

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Wait before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
    /// Backoff multiplier applied after every retry.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a config with the given number of total attempts.
    pub fn with_attempts(attempts: u32) -> Self {
        Self {
            max_attempts: attempts,
            ..Default::default()
        }
    }

    /// Delay before retry number `retry` (0-indexed), capped at `max_delay`.
    ///
    /// A nonsensical multiplier never panics: a negative product waits zero,
    /// an infinite or NaN one waits `max_delay`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(Duration::ZERO)
    }

    fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Whether an HTTP status is worth retrying.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Where a lookup currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPhase {
    Idle,
    /// Attempt `attempt` (1-based) is in flight.
    Requesting {
        attempt: u32,
    },
    Succeeded,
    Failed,
}

/// What the caller should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// HTTP 200: parse the payload.
    Accept,
    /// Wait `delay`, then send attempt `next_attempt`.
    Backoff { delay: Duration, next_attempt: u32 },
    /// Stop without a result.
    GiveUp(GiveUpReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    /// A status that is never retried.
    Status(u16),
    /// A retryable status on the final attempt.
    Exhausted { status: u16 },
    /// The request never produced a status.
    Transport,
    /// The lookup already ended; nothing more to do.
    Finished,
}

/// Per-call retry state machine.
#[derive(Debug, Clone)]
pub struct LookupMachine {
    config: RetryConfig,
    phase: LookupPhase,
}

impl LookupMachine {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            phase: LookupPhase::Idle,
        }
    }

    pub fn phase(&self) -> LookupPhase {
        self.phase
    }

    /// `Idle -> Requesting{1}`. Returns the attempt number to send.
    pub fn start(&mut self) -> u32 {
        self.phase = LookupPhase::Requesting { attempt: 1 };
        1
    }

    /// Feed the status of the attempt in flight.
    pub fn on_status(&mut self, status: u16) -> Step {
        let LookupPhase::Requesting { attempt } = self.phase else {
            return Step::GiveUp(GiveUpReason::Finished);
        };

        if status == 200 {
            self.phase = LookupPhase::Succeeded;
            return Step::Accept;
        }

        if !is_retryable_status(status) {
            self.phase = LookupPhase::Failed;
            return Step::GiveUp(GiveUpReason::Status(status));
        }

        if attempt >= self.config.attempt_limit() {
            self.phase = LookupPhase::Failed;
            return Step::GiveUp(GiveUpReason::Exhausted { status });
        }

        let next_attempt = attempt + 1;
        self.phase = LookupPhase::Requesting {
            attempt: next_attempt,
        };
        Step::Backoff {
            delay: self.config.delay_for_retry(attempt - 1),
            next_attempt,
        }
    }

    /// The attempt in flight failed before any status arrived.
    pub fn on_transport_error(&mut self) -> Step {
        if matches!(self.phase, LookupPhase::Requesting { .. }) {
            self.phase = LookupPhase::Failed;
            Step::GiveUp(GiveUpReason::Transport)
        } else {
            Step::GiveUp(GiveUpReason::Finished)
        }
    }

    /// An accepted payload turned out to be unusable.
    pub fn fail(&mut self) {
        self.phase = LookupPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_three_attempts_from_one_second() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.delay_for_retry(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_retry(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_retry(2), Duration::from_secs(4));
    }

    #[test]
    fn delay_is_capped_for_late_retries() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_retry(5), Duration::from_secs(30));
        assert_eq!(config.delay_for_retry(1500), Duration::from_secs(30));
        assert_eq!(config.delay_for_retry(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn odd_multipliers_do_not_panic() {
        let negative = RetryConfig {
            multiplier: -2.0,
            ..RetryConfig::default()
        };
        assert_eq!(negative.delay_for_retry(1), Duration::ZERO);
        assert_eq!(negative.delay_for_retry(2), Duration::from_secs(4));

        let nan = RetryConfig {
            multiplier: f64::NAN,
            ..RetryConfig::default()
        };
        assert_eq!(nan.delay_for_retry(1), Duration::from_secs(30));

        let infinite = RetryConfig {
            multiplier: f64::INFINITY,
            ..RetryConfig::default()
        };
        assert_eq!(infinite.delay_for_retry(1), Duration::from_secs(30));
    }

    #[test]
    fn long_retry_chains_stay_bounded() {
        let mut machine = LookupMachine::new(RetryConfig::with_attempts(2000));
        machine.start();
        for _ in 0..1999 {
            match machine.on_status(503) {
                Step::Backoff { delay, .. } => assert!(delay <= Duration::from_secs(30)),
                other => panic!("expected backoff, got {other:?}"),
            }
        }
        assert!(matches!(machine.on_status(503), Step::GiveUp(_)));
    }

    #[test]
    fn with_attempts_sets_count() {
        assert_eq!(RetryConfig::with_attempts(5).max_attempts, 5);
    }

    #[test]
    fn retryable_statuses() {
        for status in [429, 500, 503] {
            assert!(is_retryable_status(status), "{status}");
        }
        for status in [200, 400, 401, 403, 404, 502, 504] {
            assert!(!is_retryable_status(status), "{status}");
        }
    }

    #[test]
    fn starts_idle() {
        let machine = LookupMachine::new(RetryConfig::default());
        assert_eq!(machine.phase(), LookupPhase::Idle);
    }

    #[test]
    fn success_on_first_attempt() {
        let mut machine = LookupMachine::new(RetryConfig::default());
        assert_eq!(machine.start(), 1);
        assert_eq!(machine.on_status(200), Step::Accept);
        assert_eq!(machine.phase(), LookupPhase::Succeeded);
    }

    #[test]
    fn backs_off_one_then_two_seconds() {
        let mut machine = LookupMachine::new(RetryConfig::default());
        machine.start();

        assert_eq!(
            machine.on_status(503),
            Step::Backoff {
                delay: Duration::from_secs(1),
                next_attempt: 2
            }
        );
        assert_eq!(
            machine.on_status(429),
            Step::Backoff {
                delay: Duration::from_secs(2),
                next_attempt: 3
            }
        );
        assert_eq!(machine.phase(), LookupPhase::Requesting { attempt: 3 });
        assert_eq!(machine.on_status(200), Step::Accept);
    }

    #[test]
    fn exhausts_after_three_attempts() {
        let mut machine = LookupMachine::new(RetryConfig::default());
        machine.start();
        assert!(matches!(machine.on_status(503), Step::Backoff { .. }));
        assert!(matches!(machine.on_status(500), Step::Backoff { .. }));
        assert_eq!(
            machine.on_status(503),
            Step::GiveUp(GiveUpReason::Exhausted { status: 503 })
        );
        assert_eq!(machine.phase(), LookupPhase::Failed);
        assert_eq!(
            machine.on_status(503),
            Step::GiveUp(GiveUpReason::Finished)
        );
    }

    #[test]
    fn permanent_status_stops_immediately() {
        let mut machine = LookupMachine::new(RetryConfig::default());
        machine.start();
        assert_eq!(
            machine.on_status(400),
            Step::GiveUp(GiveUpReason::Status(400))
        );
        assert_eq!(machine.phase(), LookupPhase::Failed);
    }

    #[test]
    fn transport_error_is_not_retried() {
        let mut machine = LookupMachine::new(RetryConfig::default());
        machine.start();
        assert_eq!(
            machine.on_transport_error(),
            Step::GiveUp(GiveUpReason::Transport)
        );
        assert_eq!(machine.phase(), LookupPhase::Failed);
    }

    #[test]
    fn single_attempt_config_never_backs_off() {
        let mut machine = LookupMachine::new(RetryConfig::with_attempts(0));
        machine.start();
        assert_eq!(
            machine.on_status(429),
            Step::GiveUp(GiveUpReason::Exhausted { status: 429 })
        );
    }

    #[test]
    fn fail_after_accept_marks_failed() {
        let mut machine = LookupMachine::new(RetryConfig::default());
        machine.start();
        machine.on_status(200);
        machine.fail();
        assert_eq!(machine.phase(), LookupPhase::Failed);
    }
}
