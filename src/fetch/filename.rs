//! Filename generation and path resolution for saved responses.
//!
//! Names follow `<prefix>_<YYYYmmdd_HHMMSS_mmm>.<ext>`. The prefix comes from
//! the content category, the extension from the operator's media hint when
//! it fits the category.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use super::classify::ContentCategory;

/// Extensions recognized for text payloads.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "json", "xml", "html", "csv"];
/// Extensions recognized for image payloads.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];
/// Extensions recognized for video payloads.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "mkv"];
/// Extensions recognized for audio payloads.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "m4a"];

const BINARY_FALLBACK_EXTENSION: &str = "bin";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

impl ContentCategory {
    /// Filename prefix for this category.
    #[must_use]
    pub fn filename_prefix(self) -> &'static str {
        match self {
            Self::Text => "data",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Binary => "file",
        }
    }

    /// Extensions accepted from the media hint. Binary accepts any hint.
    #[must_use]
    pub fn recognized_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Text => TEXT_EXTENSIONS,
            Self::Image => IMAGE_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
            Self::Audio => AUDIO_EXTENSIONS,
            Self::Binary => &[],
        }
    }

    fn default_extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Image => "jpg",
            Self::Video => "mp4",
            Self::Audio => "mp3",
            Self::Binary => BINARY_FALLBACK_EXTENSION,
        }
    }
}

/// Picks the extension for a category given the operator's media hint.
#[must_use]
pub fn extension_for(category: ContentCategory, media_hint: &str) -> String {
    let hint = normalize_media_hint(media_hint);
    match category {
        ContentCategory::Binary if hint.is_empty() => BINARY_FALLBACK_EXTENSION.to_string(),
        ContentCategory::Binary => hint,
        _ if category.recognized_extensions().contains(&hint.as_str()) => hint,
        _ => category.default_extension().to_string(),
    }
}

/// Lowercases a media hint and strips everything but ASCII alphanumerics,
/// so a hint can never introduce path separators into a filename.
#[must_use]
pub fn normalize_media_hint(media_hint: &str) -> String {
    media_hint
        .trim()
        .trim_start_matches('.')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Builds a filename from its parts.
#[must_use]
pub fn format_filename<Tz>(category: ContentCategory, media_hint: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}.{}",
        category.filename_prefix(),
        at.format(TIMESTAMP_FORMAT),
        extension_for(category, media_hint)
    )
}

/// Per-run filename source.
///
/// Timestamps are strictly increasing at millisecond resolution: a call that
/// lands in the same millisecond as the previous one is pushed one
/// millisecond forward, so names never repeat within a run.
#[derive(Debug, Default)]
pub struct FilenameGenerator {
    last_millis: Option<i64>,
}

impl FilenameGenerator {
    /// Creates a generator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next filename for `category`.
    pub fn next_name(&mut self, category: ContentCategory, media_hint: &str) -> String {
        let at = self.next_timestamp(Local::now());
        format_filename(category, media_hint, &at)
    }

    fn next_timestamp(&mut self, now: DateTime<Local>) -> DateTime<Local> {
        let now_millis = now.timestamp_millis();
        let millis = match self.last_millis {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last_millis = Some(millis);
        Local.timestamp_millis_opt(millis).single().unwrap_or(now)
    }
}

/// Resolves a path that does not exist yet, adding a numeric suffix on conflict.
///
/// `file.png`, then `file_1.png`, `file_2.png`, ...
pub(crate) fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let base_path = dir.join(filename);
    if !base_path.exists() {
        return base_path;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) => (&filename[..pos], &filename[pos..]),
        None => (filename, ""),
    };

    for i in 1..1000 {
        let candidate = dir.join(format!("{stem}_{i}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    let nanos = Local::now().timestamp_subsec_nanos();
    dir.join(format!("{stem}_{nanos}{ext}"))
}
