// src/app/state.rs
use std::ops::Range;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use eframe::egui;
use tracing::warn;

use crate::convert::docx::Imported;
use crate::convert::picture::ImageData;
use crate::engine::markup::CollapsedMarkup;
use crate::engine::{HtmlDocument, RichTextEngine};
use crate::pagination::PageCursor;
use crate::platform::Platform;
use crate::search::FindReplaceState;

use super::editor_store::EditorStore;
use super::interaction::ImageInteraction;
use super::settings::EditorSettings;

pub const APP_NAME: &str = "wordApp";

pub const WELCOME_DOCUMENT: &str = "<h1>Untitled document</h1>\n<p>Start typing here.</p>";

/// Which panels and popups are showing.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub find_open: bool,
    pub show_replace: bool,
    pub comments_open: bool,
    pub versions_open: bool,
    pub link_prompt_open: bool,
    pub table_picker_open: bool,
    pub image_resizer_open: bool,
    pub text_color_open: bool,
    pub highlight_color_open: bool,

    /// Set for one frame to move keyboard focus into the find field.
    pub focus_find: bool,
    /// Page the document view should scroll to on the next frame.
    pub scroll_to_page: Option<usize>,
    /// Cursor the document view reported last frame. The engine selection is
    /// only overwritten when this moves, so command-set selections survive.
    pub view_cursor: Option<Range<usize>>,
    /// Editor buffer with data URLs collapsed, for the engine revision it was built from.
    pub collapsed: Option<(u64, CollapsedMarkup)>,
}

/// Scratch text fields owned by the panels.
#[derive(Clone, Debug)]
pub struct Drafts {
    pub find_input: String,
    pub link_url: String,
    pub comment: String,
    pub version_name: String,
    pub custom_color: String,
    /// Last hovered cell in the table picker (0-based row, col).
    pub table_hover: (usize, usize),
    pub font_family: String,
    pub font_size: u32,
}

impl Default for Drafts {
    fn default() -> Self {
        Self {
            find_input: String::new(),
            link_url: "https://".to_string(),
            comment: String::new(),
            version_name: String::new(),
            custom_color: "#000000".to_string(),
            table_hover: (0, 0),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 16,
        }
    }
}

/// Blocking message shown over the editor until dismissed.
#[derive(Clone, Debug)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub is_error: bool,
}

pub enum TaskOutput {
    Imported(Imported),
    Image { data: ImageData, alt: String },
    Exported(PathBuf),
}

/// Texture of the image shown in the resizer, keyed by its source so edits
/// elsewhere in the document do not decode it again.
pub struct ImagePreview {
    pub index: usize,
    pub revision: u64,
    pub source_hash: u64,
    /// `None` when the source could not be decoded.
    pub texture: Option<egui::TextureHandle>,
}

/// Work running on a background thread; polled once per frame.
pub struct PendingTask {
    pub label: &'static str,
    pub rx: Receiver<Result<TaskOutput, String>>,
}

pub struct AppState {
    pub platform: Arc<dyn Platform>,
    pub settings: EditorSettings,

    pub engine: Box<dyn RichTextEngine>,
    pub store: EditorStore,
    pub find: FindReplaceState,

    pub view: ViewState,
    pub drafts: Drafts,
    pub pages: PageCursor,

    pub image: ImageInteraction,
    pub selected_image: Option<usize>,
    pub preview: Option<ImagePreview>,

    pub pending: Vec<PendingTask>,
    pub notification: Option<Notification>,
    pub status: Option<String>,
    pub last_export: Option<PathBuf>,

    /// Engine revision last mirrored into the store.
    pub last_revision: u64,
    pub last_window_title: Option<String>,
}

impl AppState {
    pub fn new(platform: Arc<dyn Platform>, settings: EditorSettings) -> Self {
        let engine: Box<dyn RichTextEngine> = Box::new(HtmlDocument::new(WELCOME_DOCUMENT));
        let mut store = EditorStore::new();
        store.set_content(engine.markup());

        let view = ViewState {
            comments_open: settings.show_comments,
            versions_open: settings.show_versions,
            ..ViewState::default()
        };

        Self {
            platform,
            settings,
            last_revision: engine.revision(),
            engine,
            store,
            find: FindReplaceState::new(),
            view,
            drafts: Drafts::default(),
            pages: PageCursor::default(),
            image: ImageInteraction::default(),
            selected_image: None,
            preview: None,
            pending: Vec::new(),
            notification: None,
            status: None,
            last_export: None,
            last_window_title: None,
        }
    }

    pub fn notify_error(&mut self, title: &str, body: impl Into<String>) {
        self.notification = Some(Notification {
            title: title.to_string(),
            body: body.into(),
            is_error: true,
        });
    }

    pub fn notify_info(&mut self, title: &str, body: impl Into<String>) {
        self.notification = Some(Notification {
            title: title.to_string(),
            body: body.into(),
            is_error: false,
        });
    }

    pub fn persist_settings(&mut self) {
        let dir = match self.platform.app_data_dir(APP_NAME) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "no app data dir; settings not saved");
                return;
            }
        };
        if let Err(e) = self.settings.save(&dir) {
            warn!(error = %format!("{:#}", e), "settings not saved");
        }
    }
}
