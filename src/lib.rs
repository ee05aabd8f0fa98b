//! apigrab core library
//!
//! Repeatedly fetches one HTTP endpoint, sniffs what each response contains
//! and saves it under a unique, timestamped name, pacing requests with a
//! small adaptive delay policy.
//!
//! # Architecture
//!
//! - [`fetch`] - HTTP session, content classification, naming, saving, pacing
//!   and the fetch loop itself
//! - [`session`] - run configuration, session state and the interactive prompter
//! - [`validate`] - target URL validation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fetch;
pub mod session;
mod user_agent;
pub mod validate;

// Re-export commonly used types
pub use fetch::{
    AttemptOutcome, ContentCategory, EngineError, FailureKind, FetchEngine, FetchError,
    HttpClient, NoopObserver, RunObserver, RunReport, Throttle, classify,
};
pub use session::{ConfigError, ConfigSource, FixedConfig, Prompter, RunConfig, SessionState};
pub use user_agent::BROWSER_USER_AGENT;
pub use validate::is_valid_url;
