//! Default save locations and custom-directory shortcuts.

use std::path::{Path, PathBuf};

/// Folder created under Downloads/Desktop for saved files.
pub const APP_DIR_NAME: &str = "apigrab";

/// Save locations offered by the directory menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultDirs {
    downloads: PathBuf,
    desktop: PathBuf,
    current: PathBuf,
}

impl DefaultDirs {
    /// Builds the defaults from explicit paths.
    #[must_use]
    pub fn new(downloads: PathBuf, desktop: PathBuf, current: PathBuf) -> Self {
        Self {
            downloads,
            desktop,
            current,
        }
    }

    /// `~/Downloads/apigrab`, `~/Desktop/apigrab` and `./downloads`.
    ///
    /// Without a known home directory, the current directory stands in for it.
    #[must_use]
    pub fn detect() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let home = dirs::home_dir().unwrap_or_else(|| cwd.clone());
        Self::from_home(&home, &cwd)
    }

    /// Defaults rooted at an explicit home and working directory.
    #[must_use]
    pub fn from_home(home: &Path, cwd: &Path) -> Self {
        Self {
            downloads: home.join("Downloads").join(APP_DIR_NAME),
            desktop: home.join("Desktop").join(APP_DIR_NAME),
            current: cwd.join("downloads"),
        }
    }

    /// Replaces the downloads default, e.g. with a configured output directory.
    #[must_use]
    pub fn with_downloads(mut self, downloads: PathBuf) -> Self {
        self.downloads = downloads;
        self
    }

    /// Downloads-folder default.
    #[must_use]
    pub fn downloads(&self) -> &Path {
        &self.downloads
    }

    /// Desktop-folder default.
    #[must_use]
    pub fn desktop(&self) -> &Path {
        &self.desktop
    }

    /// `downloads` under the working directory.
    #[must_use]
    pub fn current(&self) -> &Path {
        &self.current
    }
}

/// Resolves a typed directory, expanding the `desktop` and `downloads`
/// shortcuts (case-insensitive). Returns `None` for blank input.
#[must_use]
pub fn resolve_custom_directory(input: &str, defaults: &DefaultDirs) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let resolved = if input.eq_ignore_ascii_case("desktop") {
        defaults.desktop().to_path_buf()
    } else if input.eq_ignore_ascii_case("downloads") {
        defaults.downloads().to_path_buf()
    } else {
        PathBuf::from(input)
    };
    Some(resolved)
}
