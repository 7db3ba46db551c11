// src/app/editor_store.rs
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::model::{
    Comment, CommentDraft, CommentId, CommentPatch, EditorState, Version, VersionId,
};

/// Session store for the mirrored document, its named versions and comments.
///
/// Lookups by id never fail loudly: an unknown id leaves the state untouched.
#[derive(Clone, Debug, Default)]
pub struct EditorStore {
    state: EditorState,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.state.content
    }

    pub fn versions(&self) -> &[Version] {
        &self.state.versions
    }

    pub fn comments(&self) -> &[Comment] {
        &self.state.comments
    }

    pub fn current_version(&self) -> Option<VersionId> {
        self.state.current_version
    }

    pub fn version(&self, id: VersionId) -> Option<&Version> {
        self.state.versions.iter().find(|v| v.id == id)
    }

    pub fn set_content(&mut self, content: &str) {
        if self.state.content != content {
            self.state.content = content.to_string();
        }
    }

    /// Append a version. The author is passed per call so versions and
    /// comments always read the same, current author.
    pub fn save_version(&mut self, name: &str, content: &str, author: Option<String>) -> VersionId {
        let id = VersionId::new();
        self.state.versions.push(Version {
            id,
            name: name.to_string(),
            content: content.to_string(),
            timestamp: OffsetDateTime::now_utc(),
            author,
        });
        self.state.current_version = Some(id);
        info!(%id, name, "saved version");
        id
    }

    /// Restore a version's content. Returns the content so the caller can push
    /// it into the document engine.
    pub fn load_version(&mut self, id: VersionId) -> Option<String> {
        let Some(v) = self.version(id) else {
            debug!(%id, "load_version: unknown id");
            return None;
        };
        let content = v.content.clone();
        self.state.content = content.clone();
        self.state.current_version = Some(id);
        info!(%id, "restored version");
        Some(content)
    }

    pub fn add_comment(&mut self, draft: CommentDraft) -> CommentId {
        let id = CommentId::new();
        self.state.comments.push(Comment {
            id,
            content: draft.content,
            author: draft.author,
            timestamp: OffsetDateTime::now_utc(),
            position: draft.position,
            resolved: false,
        });
        debug!(%id, position = draft.position, "added comment");
        id
    }

    pub fn update_comment(&mut self, id: CommentId, patch: CommentPatch) {
        let Some(c) = self.state.comments.iter_mut().find(|c| c.id == id) else {
            debug!(%id, "update_comment: unknown id");
            return;
        };
        if let Some(content) = patch.content {
            c.content = content;
        }
        if let Some(resolved) = patch.resolved {
            c.resolved = resolved;
        }
    }

    pub fn delete_comment(&mut self, id: CommentId) {
        let before = self.state.comments.len();
        self.state.comments.retain(|c| c.id != id);
        if self.state.comments.len() == before {
            debug!(%id, "delete_comment: unknown id");
        }
    }
}
