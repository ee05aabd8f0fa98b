//! Constants for the fetch module (timeouts, pacing delays, run limits).

use std::time::Duration;

/// Default whole-request timeout (30 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Smallest accepted request count for one run.
pub const MIN_REQUEST_COUNT: u16 = 1;

/// Largest accepted request count for one run.
pub const MAX_REQUEST_COUNT: u16 = 1000;

/// Delay after an ordinary iteration.
pub const BASELINE_DELAY: Duration = Duration::from_millis(300);

/// Every `BATCH_SIZE`th cumulative success triggers the longer batch delay.
pub const BATCH_SIZE: usize = 10;

/// Starting point of the batch delay before the per-batch increment.
pub const BATCH_BASE_DELAY: Duration = Duration::from_millis(500);

/// Added to the batch delay for each completed batch.
pub const BATCH_STEP_DELAY: Duration = Duration::from_millis(100);

/// Upper bound of the batch delay.
pub const BATCH_MAX_DELAY: Duration = Duration::from_secs(2);

/// Delay after a non-200 response.
pub const HTTP_STATUS_DELAY: Duration = Duration::from_secs(2);

/// Delay after a request timeout.
pub const TIMEOUT_DELAY: Duration = Duration::from_secs(3);

/// Delay after a connection failure.
pub const CONNECT_DELAY: Duration = Duration::from_secs(5);

/// Delay after any other network-layer failure.
pub const NETWORK_DELAY: Duration = Duration::from_secs(2);

/// Delay after an unexpected failure.
pub const UNEXPECTED_DELAY: Duration = Duration::from_secs(1);
