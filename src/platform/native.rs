use anyhow::{Context, Result};
use directories::ProjectDirs;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

use super::{FileFilter, Platform};

#[derive(Clone, Debug, Default)]
pub struct NativePlatform;

impl NativePlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for NativePlatform {
    fn pick_file(&self, title: &str, (label, exts): FileFilter<'_>) -> Option<PathBuf> {
        FileDialog::new()
            .set_title(title)
            .add_filter(label, exts)
            .pick_file()
    }

    fn save_file(&self, title: &str, default_name: &str, (label, exts): FileFilter<'_>) -> Option<PathBuf> {
        FileDialog::new()
            .set_title(title)
            .set_file_name(default_name)
            .add_filter(label, exts)
            .save_file()
    }

    fn app_data_dir(&self, app_name: &str) -> Result<PathBuf> {
        // org/qualifier can be anything stable for your app. Keep it constant.
        let pd = ProjectDirs::from("com", "WordApp", app_name)
            .context("Failed to resolve platform app data directory (ProjectDirs::from)")?;
        Ok(pd.data_dir().to_path_buf())
    }

    fn reveal(&self, path: &Path) -> Result<()> {
        open::that(path).with_context(|| format!("Failed to open {}", path.display()))
    }
}
