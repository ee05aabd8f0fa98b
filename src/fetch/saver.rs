//! Writes fetched payloads to disk.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use super::classify::ContentCategory;
use super::error::SaveError;
use super::filename::resolve_unique_path;

/// Writes `body` to `dir/filename` and returns the path actually used.
///
/// Text payloads are written as UTF-8: the client has already transcoded
/// bodies with a declared charset, and sniffed text without one has invalid
/// sequences replaced. Every other category is written byte-for-byte. An existing file
/// with the same name is never overwritten; a numeric suffix is added instead.
///
/// # Errors
///
/// Returns [`SaveError::Io`] if the file cannot be created or written.
#[instrument(level = "debug", skip(body), fields(bytes = body.len()))]
pub async fn save_content(
    body: &[u8],
    category: ContentCategory,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, SaveError> {
    let path = resolve_unique_path(dir, filename);
    let file = File::create(&path)
        .await
        .map_err(|e| SaveError::io(path.clone(), e))?;
    let mut writer = BufWriter::new(file);

    let write_result = if category.is_text() {
        let text = String::from_utf8_lossy(body);
        writer.write_all(text.as_bytes()).await
    } else {
        writer.write_all(body).await
    };
    write_result.map_err(|e| SaveError::io(path.clone(), e))?;

    writer
        .flush()
        .await
        .map_err(|e| SaveError::io(path.clone(), e))?;

    debug!(path = %path.display(), "content saved");
    Ok(path)
}
