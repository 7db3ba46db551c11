use std::fmt;

use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VersionId(Uuid);

impl VersionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommentId(Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Named snapshot of the serialized document. Never mutated after creation.
#[derive(Clone, Debug)]
pub struct Version {
    pub id: VersionId,
    pub name: String,
    pub content: String,
    pub timestamp: OffsetDateTime,
    pub author: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: String,
    pub timestamp: OffsetDateTime,
    // stored only; not tracked against later edits
    pub position: usize,
    pub resolved: bool,
}

/// Fields the caller supplies when creating a comment.
#[derive(Clone, Debug)]
pub struct CommentDraft {
    pub content: String,
    pub author: String,
    pub position: usize,
}

/// Partial update for a comment. `None` leaves the field alone.
#[derive(Clone, Debug, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
    pub resolved: Option<bool>,
}

impl CommentPatch {
    pub fn resolved(resolved: bool) -> Self {
        Self {
            resolved: Some(resolved),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EditorState {
    pub content: String,
    pub versions: Vec<Version>,
    pub comments: Vec<Comment>,
    pub current_version: Option<VersionId>,
}
