use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::{Block, Mark};
use crate::model::{CommentId, VersionId};
use crate::pagination::PageFormat;

use super::interaction::Commit;

/// Side panels and popups that can be toggled from the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    FindReplace,
    Comments,
    Versions,
    LinkPrompt,
    TablePicker,
    ImageResizer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Html,
}

#[derive(Clone, Debug)]
pub enum Action {
    // Document formatting
    ApplyMark(Mark),
    ClearMarks,
    ToggleBlock(Block),
    Undo,
    Redo,

    // Insertions
    InsertLink(String),
    InsertTable {
        rows: usize,
        cols: usize,
    },
    PickImage,
    InsertImageFile(PathBuf),
    InsertImageBytes {
        name: String,
        bytes: Arc<[u8]>,
    },

    // Find / replace
    OpenFind {
        with_replace: bool,
    },
    RunFind(String),
    FindNext,
    FindPrevious,
    ReplaceAll,
    CloseFind,

    // Comments
    AddComment(String),
    ResolveComment {
        id: CommentId,
        resolved: bool,
    },
    DeleteComment(CommentId),

    // Versions
    SaveVersion(String),
    RestoreVersion(VersionId),

    // Import / export
    ImportWord,
    Export(ExportKind),
    RevealExport,

    // Layout
    SetPageFormat(PageFormat),
    PreviousPage,
    NextPage,
    TogglePanel(Panel),
    ClosePanel(Panel),
    ToggleDarkMode,

    // Image resizer
    SelectImage(usize),
    ImageGesture(Commit),

    DismissNotification,
}
