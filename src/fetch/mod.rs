//! Repeated fetching of one endpoint with content sniffing and pacing.
//!
//! # Features
//!
//! - One HTTP session reused across all requests of a run
//! - Content category detection from headers, then leading bytes
//! - Timestamped, collision-free filenames per run
//! - Text transcoded to UTF-8 from its declared charset, everything else byte-for-byte
//! - Per-failure backoff and a batch-based adaptive delay
//!
//! # Example
//!
//! ```no_run
//! use apigrab_core::fetch::HttpClient;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let response = client.fetch(&Url::parse("https://example.com/api")?).await?;
//! println!("status: {}", response.status);
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
mod saver;
mod throttle;

pub use classify::{ContentCategory, classify, classify_content, declared_category};
pub use client::{FetchResponse, HttpClient};
pub use engine::{
    AttemptOutcome, EngineError, FetchEngine, NoopObserver, RunObserver, RunReport, SleepFn,
};
pub use error::{FailureKind, FetchError, SaveError};
pub use filename::{
    AUDIO_EXTENSIONS, FilenameGenerator, IMAGE_EXTENSIONS, TEXT_EXTENSIONS, VIDEO_EXTENSIONS,
    extension_for, format_filename, normalize_media_hint,
};
pub use saver::save_content;
pub use throttle::Throttle;
