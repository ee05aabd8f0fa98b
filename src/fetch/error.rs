//! Error types for the fetch module.
//!
//! Every variant carries the context needed for an operator-facing message;
//! none of them aborts a run. The loop maps each [`FetchError`] to a
//! [`FailureKind`] to pick the backoff delay.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while issuing one request and reading its body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The connection could not be established (DNS, refused, TLS handshake).
    #[error("connection failed for {url}: {source}")]
    Connect {
        /// The URL that could not be reached.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Any other network-layer error (redirect loop, body read, decoding).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Failure outside the network layer, e.g. a request that could not be built.
    #[error("unexpected error fetching {url}: {message}")]
    Unexpected {
        /// The URL being fetched.
        url: String,
        /// Description of what went wrong.
        message: String,
    },
}

impl FetchError {
    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a connection error.
    pub fn connect(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Connect {
            url: url.into(),
            source,
        }
    }

    /// Creates a generic network error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an unexpected error.
    pub fn unexpected(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unexpected {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Sorts a client error into the category that decides the backoff.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else if source.is_connect() {
            Self::connect(url, source)
        } else if source.is_builder() {
            Self::unexpected(url, source.to_string())
        } else {
            Self::network(url, source)
        }
    }

    /// Returns the failure category for delay selection.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Connect { .. } => FailureKind::Connect,
            Self::Network { .. } => FailureKind::Network,
            Self::Unexpected { .. } => FailureKind::Unexpected,
        }
    }
}

/// Failure categories with distinct backoff delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request timed out.
    Timeout,
    /// Connection could not be established.
    Connect,
    /// Other network-layer failure.
    Network,
    /// Anything else.
    Unexpected,
}

/// Errors writing a response body to disk.
#[derive(Debug, Error)]
pub enum SaveError {
    /// File system error while creating or writing the file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SaveError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
