use anyhow::Result;
use std::path::{Path, PathBuf};

/// A file-dialog filter: label plus extensions without the dot.
pub type FileFilter<'a> = (&'a str, &'a [&'a str]);

/// All OS / environment specific behavior belongs here.
///
/// Native builds use system dialogs and the per-user data directory.
pub trait Platform: Send + Sync {
    // ---------------------------
    // File dialogs
    // ---------------------------

    /// Pick an existing file (e.g., a .docx to import or an image to insert).
    fn pick_file(&self, title: &str, filter: FileFilter<'_>) -> Option<PathBuf>;

    /// Choose where to write an export.
    fn save_file(&self, title: &str, default_name: &str, filter: FileFilter<'_>) -> Option<PathBuf>;

    // ---------------------------
    // App data paths
    // ---------------------------

    /// Returns an app-specific appdata dir, e.g.:
    /// - Windows: %APPDATA%/<org>/<app>
    /// - macOS: ~/Library/Application Support/<app>
    /// - Linux: ~/.local/share/<app>
    fn app_data_dir(&self, app_name: &str) -> Result<PathBuf>;

    /// Hand a written file to the OS default viewer.
    fn reveal(&self, path: &Path) -> Result<()>;
}

pub mod native;
