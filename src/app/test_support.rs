use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::platform::{FileFilter, Platform};

use super::settings::EditorSettings;
use super::state::AppState;

/// Platform with no dialogs; every picker is "cancelled".
pub struct NullPlatform {
    data_dir: PathBuf,
}

impl Platform for NullPlatform {
    fn pick_file(&self, _title: &str, _filter: FileFilter<'_>) -> Option<PathBuf> {
        None
    }

    fn save_file(&self, _title: &str, _default_name: &str, _filter: FileFilter<'_>) -> Option<PathBuf> {
        None
    }

    fn app_data_dir(&self, _app_name: &str) -> Result<PathBuf> {
        Ok(self.data_dir.clone())
    }

    fn reveal(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

pub fn app_state() -> AppState {
    let data_dir = std::env::temp_dir().join(format!("wordapp-test-{}", uuid::Uuid::new_v4()));
    AppState::new(Arc::new(NullPlatform { data_dir }), EditorSettings::default())
}
