//! The fetch loop: request, classify, name, save, pace, repeat.
//!
//! # Overview
//!
//! [`FetchEngine::run`] performs `count` sequential GETs against one URL with
//! a single [`HttpClient`] that lives exactly as long as the run. Each
//! iteration ends in one [`AttemptOutcome`]; every failure is counted and
//! answered with a backoff from the [`Throttle`], never propagated. The run
//! always completes all iterations.
//!
//! # Example
//!
//! ```no_run
//! use apigrab_core::fetch::{FetchEngine, NoopObserver};
//! use apigrab_core::session::RunConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::new("https://example.com/api/random", 5, "jpg", "./downloads")?;
//! let engine = FetchEngine::default();
//! let report = engine.run(&config, &mut NoopObserver).await?;
//! println!("ok: {}, failed: {}", report.successes(), report.failures());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::classify::classify;
use super::client::HttpClient;
use super::constants::REQUEST_TIMEOUT_SECS;
use super::error::FailureKind;
use super::filename::FilenameGenerator;
use super::saver::save_content;
use super::throttle::Throttle;
use crate::session::RunConfig;

/// Errors that prevent a run from starting.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The HTTP session could not be created.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The save directory could not be created.
    #[error("failed to create save directory {path}: {source}")]
    SaveDir {
        /// Directory that could not be created.
        path: std::path::PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// How one iteration ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 200 response written to disk.
    Saved {
        /// Name of the file written inside the save directory.
        filename: String,
    },
    /// 200 response that could not be written.
    SaveFailed {
        /// Description of the write failure.
        message: String,
    },
    /// Response with a status other than 200.
    HttpStatus {
        /// The status code received.
        status: u16,
    },
    /// The request itself failed.
    Failed {
        /// Failure category.
        kind: FailureKind,
        /// Description of the failure.
        message: String,
    },
}

impl AttemptOutcome {
    /// Whether the iteration counts as a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Outcome counts and written filenames for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    successes: usize,
    failures: usize,
    files: Vec<String>,
}

impl RunReport {
    /// Number of iterations that saved a file.
    #[must_use]
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Number of iterations that did not.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Filenames written, in the order they were saved.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    fn record(&mut self, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Saved { filename } => {
                self.successes += 1;
                self.files.push(filename.clone());
            }
            _ => self.failures += 1,
        }
    }
}

/// Progress hooks invoked by the loop. All methods default to no-ops.
pub trait RunObserver {
    /// Called once before the first request.
    fn on_run_start(&mut self, _config: &RunConfig) {}

    /// Called before iteration `index` (1-based) of `total`.
    fn on_attempt_start(&mut self, _index: usize, _total: usize) {}

    /// Called after iteration `index` with its outcome.
    fn on_attempt_finish(&mut self, _index: usize, _total: usize, _outcome: &AttemptOutcome) {}

    /// Called before the loop waits `delay` after iteration `index`.
    fn on_pause(&mut self, _index: usize, _delay: Duration) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Waits out one pacing delay.
pub type SleepFn = fn(Duration) -> tokio::time::Sleep;

/// Runs the fetch loop for a [`RunConfig`].
#[derive(Debug, Clone)]
pub struct FetchEngine {
    timeout: Duration,
    throttle: Throttle,
    sleep: SleepFn,
}

impl Default for FetchEngine {
    fn default() -> Self {
        Self::new(Duration::from_secs(REQUEST_TIMEOUT_SECS), Throttle::default())
    }
}

impl FetchEngine {
    /// Creates an engine with an explicit request timeout and pacing schedule.
    #[must_use]
    pub fn new(timeout: Duration, throttle: Throttle) -> Self {
        Self {
            timeout,
            throttle,
            sleep: tokio::time::sleep,
        }
    }

    /// Replaces how pacing delays are waited out. Observers still see every
    /// delay through [`RunObserver::on_pause`].
    #[must_use]
    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    /// Executes one run.
    ///
    /// # Errors
    ///
    /// Only start-up failures are returned: the save directory cannot be
    /// created or the HTTP client cannot be built. Per-iteration failures are
    /// counted in the [`RunReport`].
    #[instrument(skip(self, config, observer), fields(url = %config.url(), count = config.count()))]
    pub async fn run(
        &self,
        config: &RunConfig,
        observer: &mut dyn RunObserver,
    ) -> Result<RunReport, EngineError> {
        tokio::fs::create_dir_all(config.save_dir())
            .await
            .map_err(|source| EngineError::SaveDir {
                path: config.save_dir().to_path_buf(),
                source,
            })?;

        let client = HttpClient::with_timeout(self.timeout)?;
        let mut names = FilenameGenerator::new();
        let mut report = RunReport::default();
        let total = usize::from(config.count());

        info!(save_dir = %config.save_dir().display(), "run starting");
        observer.on_run_start(config);

        for index in 1..=total {
            observer.on_attempt_start(index, total);
            let outcome = self.attempt(&client, config, &mut names).await;
            report.record(&outcome);
            observer.on_attempt_finish(index, total, &outcome);

            if index < total {
                let delay = self.throttle.delay_after(&outcome, report.successes());
                if !delay.is_zero() {
                    debug!(delay_ms = delay.as_millis(), "pacing");
                    observer.on_pause(index, delay);
                    (self.sleep)(delay).await;
                }
            }
        }

        info!(
            successes = report.successes(),
            failures = report.failures(),
            "run complete"
        );
        Ok(report)
    }

    async fn attempt(
        &self,
        client: &HttpClient,
        config: &RunConfig,
        names: &mut FilenameGenerator,
    ) -> AttemptOutcome {
        let response = match client.fetch(config.url()).await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "request failed");
                return AttemptOutcome::Failed {
                    kind: error.kind(),
                    message: error.to_string(),
                };
            }
        };

        if !response.is_ok() {
            let status = response.status.as_u16();
            warn!(status, "unexpected HTTP status");
            return AttemptOutcome::HttpStatus { status };
        }

        let category = classify(&response.headers, &response.body);
        let filename = names.next_name(category, config.media_hint());
        debug!(%category, %filename, bytes = response.body.len(), "classified response");

        match save_content(&response.body, category, config.save_dir(), &filename).await {
            Ok(path) => AttemptOutcome::Saved {
                filename: path
                    .file_name()
                    .map_or(filename, |name| name.to_string_lossy().into_owned()),
            },
            Err(error) => {
                warn!(error = %error, "save failed");
                AttemptOutcome::SaveFailed {
                    message: error.to_string(),
                }
            }
        }
    }
}
