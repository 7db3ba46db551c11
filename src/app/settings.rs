// src/app/settings.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::pagination::PageFormat;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_AUTHOR: &str = "Current User";

const ENV_PAGE_FORMAT: &str = "WORD_EDITOR_PAGE_FORMAT";
const ENV_AUTHOR: &str = "WORD_EDITOR_AUTHOR";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub page_format: PageFormat,
    pub show_comments: bool,
    pub show_versions: bool,
    pub author: String,
    pub dark_mode: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            page_format: PageFormat::PortraitA4,
            show_comments: false,
            show_versions: false,
            author: DEFAULT_AUTHOR.to_string(),
            dark_mode: false,
        }
    }
}

impl EditorSettings {
    /// Read `settings.json` from `dir`; a missing or unreadable file yields defaults.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(_) => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }
        }
    }

    /// Environment wins over the file. `.env` must already be loaded.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_PAGE_FORMAT).ok(),
            std::env::var(ENV_AUTHOR).ok(),
        );
    }

    fn apply_overrides(&mut self, page_format: Option<String>, author: Option<String>) {
        if let Some(raw) = page_format {
            match PageFormat::parse(&raw) {
                Some(f) => self.page_format = f,
                None => warn!(value = %raw, "unknown {ENV_PAGE_FORMAT}, ignoring"),
            }
        }
        if let Some(a) = author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) {
            self.author = a;
        }
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(SETTINGS_FILE);
        let text = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        atomic_write(&path, &text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "settings saved");
        Ok(path)
    }
}

/// Write through a temp file so a crash never leaves a half-written file.
pub fn atomic_write(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, text)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
