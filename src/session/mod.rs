//! Run configuration and where it comes from.
//!
//! A [`RunConfig`] is everything the fetch loop needs for one run. It is
//! produced by a [`ConfigSource`]: the interactive [`Prompter`] asks the
//! operator on a terminal, while [`FixedConfig`] hands over a configuration
//! built up front (command-line flags, tests). [`SessionState`] carries what
//! survives between runs of one session.

mod directory;
mod prompt;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::fetch::constants::{MAX_REQUEST_COUNT, MIN_REQUEST_COUNT};
use crate::validate::parse_target_url;

pub use directory::{APP_DIR_NAME, DefaultDirs, resolve_custom_directory};
pub use prompt::Prompter;

/// Errors building a [`RunConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target is not a URL with a scheme and host.
    #[error("invalid URL: {input}")]
    InvalidUrl {
        /// The rejected input.
        input: String,
    },

    /// The request count is outside the accepted range.
    #[error("request count {value} out of range ({MIN_REQUEST_COUNT}..={MAX_REQUEST_COUNT})")]
    CountOutOfRange {
        /// The rejected value.
        value: i64,
    },

    /// The media type hint is empty.
    #[error("media type must not be empty")]
    EmptyMediaHint,
}

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    url: Url,
    count: u16,
    media_hint: String,
    save_dir: PathBuf,
}

impl RunConfig {
    /// Validates and assembles a run configuration.
    ///
    /// The media hint is trimmed and lowercased. The save directory is not
    /// touched here; the fetch loop creates it before the first write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid URL, a count outside
    /// `1..=1000`, or an empty media hint.
    pub fn new(
        url: &str,
        count: impl Into<i64>,
        media_hint: &str,
        save_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let url = parse_target_url(url).ok_or_else(|| ConfigError::InvalidUrl {
            input: url.to_string(),
        })?;
        let count = validate_count(count.into())?;
        let media_hint = media_hint.trim().to_ascii_lowercase();
        if media_hint.is_empty() {
            return Err(ConfigError::EmptyMediaHint);
        }
        Ok(Self {
            url,
            count,
            media_hint,
            save_dir: save_dir.into(),
        })
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of requests to issue.
    #[must_use]
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Operator's declared media type, e.g. `jpg` or `mp3`.
    #[must_use]
    pub fn media_hint(&self) -> &str {
        &self.media_hint
    }

    /// Directory receiving the files.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }
}

/// Checks a request count against the accepted range.
///
/// # Errors
///
/// Returns [`ConfigError::CountOutOfRange`] outside `1..=1000`.
pub fn validate_count(value: i64) -> Result<u16, ConfigError> {
    u16::try_from(value)
        .ok()
        .filter(|count| (MIN_REQUEST_COUNT..=MAX_REQUEST_COUNT).contains(count))
        .ok_or(ConfigError::CountOutOfRange { value })
}

/// State kept across runs of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    last_save_dir: Option<PathBuf>,
}

impl SessionState {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory used by the previous run, if any.
    #[must_use]
    pub fn last_save_dir(&self) -> Option<&Path> {
        self.last_save_dir.as_deref()
    }

    /// Remembers the directory of a finished run.
    pub fn remember_save_dir(&mut self, dir: impl Into<PathBuf>) {
        self.last_save_dir = Some(dir.into());
    }
}

/// Produces run configurations for a session.
pub trait ConfigSource {
    /// Configuration for the next run, or `None` when no more input is available.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the underlying input or output.
    fn next_run(&mut self, state: &SessionState) -> io::Result<Option<RunConfig>>;

    /// Whether another run should follow the one that just finished.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the underlying input or output.
    fn run_again(&mut self) -> io::Result<bool>;
}

/// A source that yields one pre-built configuration and then stops.
#[derive(Debug, Clone)]
pub struct FixedConfig {
    config: Option<RunConfig>,
}

impl FixedConfig {
    /// Wraps a configuration for a single headless run.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl ConfigSource for FixedConfig {
    fn next_run(&mut self, _state: &SessionState) -> io::Result<Option<RunConfig>> {
        Ok(self.config.take())
    }

    fn run_again(&mut self) -> io::Result<bool> {
        Ok(self.config.is_some())
    }
}
