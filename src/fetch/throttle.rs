//! Inter-request pacing for the fetch loop.
//!
//! After every iteration the loop sleeps for a delay picked from the
//! iteration's outcome. Failures back off by category; ordinary iterations
//! wait a short baseline, and every [`BATCH_SIZE`]th cumulative success waits
//! a little longer, growing by one step per completed batch up to a cap.
//!
//! ```
//! use std::time::Duration;
//! use apigrab_core::fetch::{AttemptOutcome, Throttle};
//!
//! let throttle = Throttle::default();
//! let saved = AttemptOutcome::Saved { filename: "data_x.txt".into() };
//! assert_eq!(throttle.delay_after(&saved, 3), Duration::from_millis(300));
//! assert_eq!(throttle.delay_after(&saved, 20), Duration::from_millis(700));
//! ```

use std::time::Duration;

use super::constants::{
    BASELINE_DELAY, BATCH_BASE_DELAY, BATCH_MAX_DELAY, BATCH_SIZE, BATCH_STEP_DELAY,
    CONNECT_DELAY, HTTP_STATUS_DELAY, NETWORK_DELAY, TIMEOUT_DELAY, UNEXPECTED_DELAY,
};
use super::engine::AttemptOutcome;
use super::error::FailureKind;

/// Delay schedule applied between iterations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throttle {
    baseline: Duration,
    batch_size: usize,
    batch_base: Duration,
    batch_step: Duration,
    batch_max: Duration,
    http_status: Duration,
    timeout: Duration,
    connect: Duration,
    network: Duration,
    unexpected: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            baseline: BASELINE_DELAY,
            batch_size: BATCH_SIZE,
            batch_base: BATCH_BASE_DELAY,
            batch_step: BATCH_STEP_DELAY,
            batch_max: BATCH_MAX_DELAY,
            http_status: HTTP_STATUS_DELAY,
            timeout: TIMEOUT_DELAY,
            connect: CONNECT_DELAY,
            network: NETWORK_DELAY,
            unexpected: UNEXPECTED_DELAY,
        }
    }
}

impl Throttle {
    /// A schedule with every delay set to zero.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            baseline: Duration::ZERO,
            batch_size: BATCH_SIZE,
            batch_base: Duration::ZERO,
            batch_step: Duration::ZERO,
            batch_max: Duration::ZERO,
            http_status: Duration::ZERO,
            timeout: Duration::ZERO,
            connect: Duration::ZERO,
            network: Duration::ZERO,
            unexpected: Duration::ZERO,
        }
    }

    /// Delay to apply after `outcome`, where `successes` is the cumulative
    /// success count including this iteration.
    #[must_use]
    pub fn delay_after(&self, outcome: &AttemptOutcome, successes: usize) -> Duration {
        match outcome {
            AttemptOutcome::Saved { .. } if self.completes_batch(successes) => {
                self.batch_delay(successes)
            }
            AttemptOutcome::Saved { .. } | AttemptOutcome::SaveFailed { .. } => self.baseline,
            AttemptOutcome::HttpStatus { .. } => self.http_status,
            AttemptOutcome::Failed { kind, .. } => self.failure_delay(*kind),
        }
    }

    /// Backoff for a failed request.
    #[must_use]
    pub fn failure_delay(&self, kind: FailureKind) -> Duration {
        match kind {
            FailureKind::Timeout => self.timeout,
            FailureKind::Connect => self.connect,
            FailureKind::Network => self.network,
            FailureKind::Unexpected => self.unexpected,
        }
    }

    fn completes_batch(&self, successes: usize) -> bool {
        successes > 0 && self.batch_size > 0 && successes % self.batch_size == 0
    }

    fn batch_delay(&self, successes: usize) -> Duration {
        let batches = u32::try_from(successes / self.batch_size).unwrap_or(u32::MAX);
        self.batch_base
            .saturating_add(self.batch_step.saturating_mul(batches))
            .min(self.batch_max)
    }
}
