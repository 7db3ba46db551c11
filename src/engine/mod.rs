//! Seam between the UI and the rich-text document engine.
//!
//! The UI never touches document structure directly; it goes through
//! [`RichTextEngine`]. [`HtmlDocument`] is the binding used by the app.

use std::ops::Range;

pub mod html;
pub mod markup;

pub use html::HtmlDocument;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    pub fn from_css(s: &str) -> Option<Self> {
        match s {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

/// Inline formatting applied to the selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Highlight(Option<String>),
    Color(String),
    FontFamily(String),
    FontSize(u32),
    Subscript,
    Superscript,
    Link(String),
}

/// Block-level formatting applied to the line holding the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph,
    Heading(u8),
    BulletList,
    OrderedList,
    TaskList,
    Align(TextAlign),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Table {
        rows: usize,
        cols: usize,
        header_row: bool,
    },
    Image {
        src: String,
        alt: String,
        width: u32,
        height: u32,
    },
}

/// An `<img>` found in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageNode {
    pub index: usize,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub trait RichTextEngine {
    /// Text with all markup removed; what find/replace works against.
    fn plain_text(&self) -> String;

    /// Serialized document.
    fn markup(&self) -> &str;

    /// Replace the whole document (import, version restore, replace-all).
    fn set_content(&mut self, markup: &str);

    /// Typed edit from the document view. Consecutive edits share one undo step.
    fn edit(&mut self, markup: String);

    /// Selection as a char range into `markup()`.
    fn selection(&self) -> Range<usize>;
    fn set_selection(&mut self, range: Range<usize>);

    fn apply_mark(&mut self, mark: Mark);
    fn clear_marks(&mut self);
    fn toggle_block(&mut self, block: Block);
    fn insert_node(&mut self, node: Node);

    fn images(&self) -> Vec<ImageNode>;
    /// `src` of the image at `index`, entities decoded.
    fn image_src(&self, index: usize) -> Option<String>;
    fn set_image_size(&mut self, index: usize, width: u32, height: u32) -> bool;

    fn undo(&mut self) -> bool;
    fn redo(&mut self) -> bool;
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;

    /// Bumped on every content mutation.
    fn revision(&self) -> u64;
}
