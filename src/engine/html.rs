use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::markup::{self, cc_len, cc_to_bc, escape_html};
use super::{Block, ImageNode, Mark, Node, RichTextEngine, TextAlign};

const UNDO_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
struct Snapshot {
    text: String,
    selection: Range<usize>,
}

/// Document held as serialized HTML, one block element per line.
#[derive(Clone, Debug)]
pub struct HtmlDocument {
    text: String,
    selection: Range<usize>,
    revision: u64,

    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    // true while consecutive typed edits are folded into one undo step
    typing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Paragraph,
    Heading(u8),
    Bullet,
    Ordered,
    Task,
}

struct ParsedBlock {
    shape: Shape,
    align: Option<TextAlign>,
    inner: String,
}

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^<(p|h[1-6])(?: style="text-align: (left|center|right|justify)")?>(.*)</(?:p|h[1-6])>$"#,
        )
        .expect("static regex")
    })
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^<(ul|ol)( data-type="taskList")?><li(?: data-type="taskItem" data-checked="(?:true|false)")?(?: style="text-align: (left|center|right|justify)")?>(.*)</li></(?:ul|ol)>$"#,
        )
        .expect("static regex")
    })
}

fn img_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").expect("static regex"))
}

fn size_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\s+(?:width|height)\s*=\s*"[^"]*""#).expect("static regex"))
}

fn inline_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)</?(?:strong|b|em|i|u|s|strike|mark|span|sub|sup|a)(?:\s[^>]*)?>")
            .expect("static regex")
    })
}

fn parse_block(line: &str) -> ParsedBlock {
    let trimmed = line.trim();

    if let Some(c) = block_re().captures(trimmed) {
        let shape = match &c[1] {
            "p" => Shape::Paragraph,
            h => Shape::Heading(h[1..].parse().unwrap_or(1)),
        };
        return ParsedBlock {
            shape,
            align: c.get(2).and_then(|m| TextAlign::from_css(m.as_str())),
            inner: c[3].to_string(),
        };
    }

    if let Some(c) = list_re().captures(trimmed) {
        let shape = match (&c[1], c.get(2).is_some()) {
            ("ul", true) => Shape::Task,
            ("ul", false) => Shape::Bullet,
            _ => Shape::Ordered,
        };
        return ParsedBlock {
            shape,
            align: c.get(3).and_then(|m| TextAlign::from_css(m.as_str())),
            inner: c[4].to_string(),
        };
    }

    // bare text becomes a paragraph
    ParsedBlock {
        shape: Shape::Paragraph,
        align: None,
        inner: trimmed.to_string(),
    }
}

fn render_block(b: &ParsedBlock) -> String {
    let style = match b.align {
        Some(a) if a != TextAlign::Left => format!(r#" style="text-align: {}""#, a.css()),
        _ => String::new(),
    };
    match b.shape {
        Shape::Paragraph => format!("<p{}>{}</p>", style, b.inner),
        Shape::Heading(n) => format!("<h{n}{}>{}</h{n}>", style, b.inner),
        Shape::Bullet => format!("<ul><li{}>{}</li></ul>", style, b.inner),
        Shape::Ordered => format!("<ol><li{}>{}</li></ol>", style, b.inner),
        Shape::Task => format!(
            r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="false"{}>{}</li></ul>"#,
            style, b.inner
        ),
    }
}

fn mark_tags(mark: &Mark) -> (String, String) {
    let simple = |t: &str| (format!("<{t}>"), format!("</{t}>"));
    match mark {
        Mark::Bold => simple("strong"),
        Mark::Italic => simple("em"),
        Mark::Underline => simple("u"),
        Mark::Strike => simple("s"),
        Mark::Subscript => simple("sub"),
        Mark::Superscript => simple("sup"),
        Mark::Highlight(None) => simple("mark"),
        Mark::Highlight(Some(color)) => {
            let c = escape_html(color);
            (
                format!(r#"<mark data-color="{c}" style="background-color: {c}">"#),
                "</mark>".to_string(),
            )
        }
        Mark::Color(color) => (
            format!(r#"<span style="color: {}">"#, escape_html(color)),
            "</span>".to_string(),
        ),
        Mark::FontFamily(family) => (
            format!(r#"<span style="font-family: {}">"#, escape_html(family)),
            "</span>".to_string(),
        ),
        Mark::FontSize(px) => (
            format!(r#"<span style="font-size: {px}px">"#),
            "</span>".to_string(),
        ),
        Mark::Link(href) => (
            format!(r#"<a href="{}">"#, escape_html(href)),
            "</a>".to_string(),
        ),
    }
}

fn node_html(node: &Node) -> String {
    match node {
        Node::Table {
            rows,
            cols,
            header_row,
        } => {
            let rows = (*rows).max(1);
            let cols = (*cols).max(1);
            let mut out = String::from("<table>\n");
            for r in 0..rows {
                let cell = if r == 0 && *header_row { "th" } else { "td" };
                out.push_str("<tr>");
                for _ in 0..cols {
                    out.push_str(&format!("<{cell}></{cell}>"));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</table>");
            out
        }
        Node::Image {
            src,
            alt,
            width,
            height,
        } => format!(
            r#"<img src="{}" alt="{}" width="{}" height="{}">"#,
            escape_html(src),
            escape_html(alt),
            width,
            height
        ),
    }
}

/// Char range of the line containing char offset `cc`.
fn line_bounds(text: &str, cc: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let cc = cc.min(chars.len());
    let mut start = cc;
    while start > 0 && chars[start - 1] != '\n' {
        start -= 1;
    }
    let mut end = cc;
    while end < chars.len() && chars[end] != '\n' {
        end += 1;
    }
    start..end
}

impl HtmlDocument {
    pub fn new(markup: &str) -> Self {
        Self {
            text: markup.to_string(),
            selection: 0..0,
            revision: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            typing: false,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            selection: self.selection.clone(),
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        if self.undo_stack.len() > UNDO_CAPACITY {
            let overflow = self.undo_stack.len() - UNDO_CAPACITY;
            self.undo_stack.drain(0..overflow);
        }
        self.redo_stack.clear();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Record an undo step and swap in new text.
    fn commit(&mut self, text: String, selection: Range<usize>) {
        self.push_undo();
        self.typing = false;
        self.text = text;
        self.set_selection(selection);
        self.bump();
    }

    fn clamped_selection(&self) -> Range<usize> {
        let len = cc_len(&self.text);
        let a = self.selection.start.min(len);
        let b = self.selection.end.min(len);
        a.min(b)..a.max(b)
    }

    fn byte_range(&self, r: &Range<usize>) -> Range<usize> {
        cc_to_bc(&self.text, r.start)..cc_to_bc(&self.text, r.end)
    }

    fn apply_restore(&mut self, snap: Snapshot) {
        self.text = snap.text;
        self.selection = snap.selection;
        self.typing = false;
        self.bump();
    }
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl RichTextEngine for HtmlDocument {
    fn plain_text(&self) -> String {
        markup::plain_text(&self.text)
    }

    fn markup(&self) -> &str {
        &self.text
    }

    fn set_content(&mut self, markup: &str) {
        if markup == self.text {
            return;
        }
        self.commit(markup.to_string(), 0..0);
    }

    fn edit(&mut self, markup: String) {
        if markup == self.text {
            return;
        }
        if !self.typing {
            self.push_undo();
            self.typing = true;
        }
        self.text = markup;
        self.bump();
    }

    fn selection(&self) -> Range<usize> {
        self.clamped_selection()
    }

    fn set_selection(&mut self, range: Range<usize>) {
        self.selection = range;
        self.selection = self.clamped_selection();
    }

    fn apply_mark(&mut self, mark: Mark) {
        let sel = self.clamped_selection();
        let bytes = self.byte_range(&sel);
        let (open, close) = mark_tags(&mark);

        let before = &self.text[..bytes.start];
        let after = &self.text[bytes.end..];

        // already wrapped: unwrap
        if before.ends_with(&open) && after.starts_with(&close) {
            let mut out = String::with_capacity(self.text.len());
            out.push_str(&before[..before.len() - open.len()]);
            out.push_str(&self.text[bytes.clone()]);
            out.push_str(&after[close.len()..]);
            let shift = cc_len(&open);
            debug!(?mark, "unwrap mark");
            self.commit(out, sel.start - shift..sel.end - shift);
            return;
        }

        let mut out = String::with_capacity(self.text.len() + open.len() + close.len());
        out.push_str(before);
        out.push_str(&open);
        out.push_str(&self.text[bytes.clone()]);
        out.push_str(&close);
        out.push_str(after);
        let shift = cc_len(&open);
        debug!(?mark, "wrap mark");
        self.commit(out, sel.start + shift..sel.end + shift);
    }

    fn clear_marks(&mut self) {
        let sel = self.clamped_selection();
        if sel.is_empty() {
            return;
        }
        let bytes = self.byte_range(&sel);
        let cleaned = inline_tag_re().replace_all(&self.text[bytes.clone()], "");
        if cleaned.len() == bytes.len() {
            return;
        }
        let new_len = cc_len(&cleaned);
        let mut out = String::with_capacity(self.text.len());
        out.push_str(&self.text[..bytes.start]);
        out.push_str(&cleaned);
        out.push_str(&self.text[bytes.end..]);
        self.commit(out, sel.start..sel.start + new_len);
    }

    fn toggle_block(&mut self, block: Block) {
        let sel = self.clamped_selection();
        let line = line_bounds(&self.text, sel.start);
        let bytes = self.byte_range(&line);
        let mut parsed = parse_block(&self.text[bytes.clone()]);

        match block {
            Block::Paragraph => parsed.shape = Shape::Paragraph,
            Block::Heading(n) => {
                let n = n.clamp(1, 6);
                parsed.shape = if parsed.shape == Shape::Heading(n) {
                    Shape::Paragraph
                } else {
                    Shape::Heading(n)
                };
            }
            Block::BulletList | Block::OrderedList | Block::TaskList => {
                let target = match block {
                    Block::BulletList => Shape::Bullet,
                    Block::OrderedList => Shape::Ordered,
                    _ => Shape::Task,
                };
                parsed.shape = if parsed.shape == target {
                    Shape::Paragraph
                } else {
                    target
                };
            }
            Block::Align(a) => parsed.align = Some(a),
        }

        let rendered = render_block(&parsed);
        let mut out = String::with_capacity(self.text.len() + 32);
        out.push_str(&self.text[..bytes.start]);
        out.push_str(&rendered);
        out.push_str(&self.text[bytes.end..]);

        let end = line.start + cc_len(&rendered);
        self.commit(out, end..end);
    }

    fn insert_node(&mut self, node: Node) {
        let sel = self.clamped_selection();
        let bytes = self.byte_range(&sel);
        let before = &self.text[..bytes.start];
        let after = &self.text[bytes.end..];

        let mut html = String::new();
        if !before.is_empty() && !before.ends_with('\n') {
            html.push('\n');
        }
        html.push_str(&node_html(&node));
        if !after.starts_with('\n') {
            html.push('\n');
        }

        let mut out = String::with_capacity(self.text.len() + html.len());
        out.push_str(before);
        out.push_str(&html);
        out.push_str(after);

        let caret = sel.start + cc_len(&html);
        self.commit(out, caret..caret);
    }

    fn images(&self) -> Vec<ImageNode> {
        img_re()
            .find_iter(&self.text)
            .enumerate()
            .map(|(index, m)| {
                let tag = m.as_str();
                let num = |name: &str| markup::attribute(tag, name).and_then(|v| v.parse().ok());
                ImageNode {
                    index,
                    alt: markup::attribute(tag, "alt").unwrap_or_default(),
                    width: num("width"),
                    height: num("height"),
                }
            })
            .collect()
    }

    fn image_src(&self, index: usize) -> Option<String> {
        let m = img_re().find_iter(&self.text).nth(index)?;
        markup::attribute(m.as_str(), "src")
    }

    fn set_image_size(&mut self, index: usize, width: u32, height: u32) -> bool {
        let Some(m) = img_re().find_iter(&self.text).nth(index) else {
            return false;
        };
        let range = m.range();
        let tag = size_attr_re().replace_all(m.as_str(), "").into_owned();
        let head = tag.trim_end_matches('>').trim_end_matches('/').trim_end();
        let new_tag = format!(r#"{} width="{}" height="{}">"#, head, width, height);

        let mut out = String::with_capacity(self.text.len() + 16);
        out.push_str(&self.text[..range.start]);
        out.push_str(&new_tag);
        out.push_str(&self.text[range.end..]);
        let sel = self.selection.clone();
        self.commit(out, sel);
        true
    }

    fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.snapshot());
        self.apply_restore(prev);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.snapshot());
        if self.undo_stack.len() > UNDO_CAPACITY {
            let overflow = self.undo_stack.len() - UNDO_CAPACITY;
            self.undo_stack.drain(0..overflow);
        }
        self.apply_restore(next);
        true
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_selection(text: &str, sel: Range<usize>) -> HtmlDocument {
        let mut d = HtmlDocument::new(text);
        d.set_selection(sel);
        d
    }

    #[test]
    fn bold_toggles() {
        let mut d = doc_with_selection("<p>hello world</p>", 3..8);
        d.apply_mark(Mark::Bold);
        assert_eq!(d.markup(), "<p><strong>hello</strong> world</p>");
        assert_eq!(d.selection(), 11..16);

        d.apply_mark(Mark::Bold);
        assert_eq!(d.markup(), "<p>hello world</p>");
        assert_eq!(d.selection(), 3..8);
    }

    #[test]
    fn color_and_link_marks_escape_values() {
        let mut d = doc_with_selection("<p>go</p>", 3..5);
        d.apply_mark(Mark::Link("https://x.test/?a=1&b=2".into()));
        assert_eq!(d.markup(), r#"<p><a href="https://x.test/?a=1&amp;b=2">go</a></p>"#);

        let mut d = doc_with_selection("<p>red</p>", 3..6);
        d.apply_mark(Mark::Color("#ff0000".into()));
        assert_eq!(d.markup(), r#"<p><span style="color: #ff0000">red</span></p>"#);
    }

    #[test]
    fn clear_marks_strips_inline_tags_only() {
        let mut d = doc_with_selection("<p><strong>a</strong> <em>b</em></p>", 3..32);
        d.clear_marks();
        assert_eq!(d.markup(), "<p>a b</p>");
    }

    #[test]
    fn heading_toggle_round_trip() {
        let mut d = doc_with_selection("<p>Title</p>\n<p>body</p>", 4..4);
        d.toggle_block(Block::Heading(1));
        assert_eq!(d.markup(), "<h1>Title</h1>\n<p>body</p>");
        d.toggle_block(Block::Heading(1));
        assert_eq!(d.markup(), "<p>Title</p>\n<p>body</p>");
    }

    #[test]
    fn bare_line_becomes_list() {
        let mut d = doc_with_selection("first\nsecond", 8..8);
        d.toggle_block(Block::BulletList);
        assert_eq!(d.markup(), "first\n<ul><li>second</li></ul>");
        d.toggle_block(Block::BulletList);
        assert_eq!(d.markup(), "first\n<p>second</p>");
    }

    #[test]
    fn alignment_is_kept_across_shape_changes() {
        let mut d = doc_with_selection("<p>x</p>", 0..0);
        d.toggle_block(Block::Align(TextAlign::Center));
        assert_eq!(d.markup(), r#"<p style="text-align: center">x</p>"#);
        d.toggle_block(Block::Heading(2));
        assert_eq!(d.markup(), r#"<h2 style="text-align: center">x</h2>"#);
        d.toggle_block(Block::Align(TextAlign::Left));
        assert_eq!(d.markup(), "<h2>x</h2>");
    }

    #[test]
    fn insert_table_on_own_lines() {
        let mut d = doc_with_selection("<p>a</p>", 8..8);
        d.insert_node(Node::Table {
            rows: 2,
            cols: 2,
            header_row: true,
        });
        assert_eq!(
            d.markup(),
            "<p>a</p>\n<table>\n<tr><th></th><th></th></tr>\n<tr><td></td><td></td></tr>\n</table>\n"
        );
        assert_eq!(d.plain_text(), "a");
    }

    #[test]
    fn image_listing_and_resize() {
        let mut d = HtmlDocument::new("");
        d.insert_node(Node::Image {
            src: "data:image/png;base64,AAAA".into(),
            alt: "pic".into(),
            width: 300,
            height: 200,
        });
        let imgs = d.images();
        assert_eq!(imgs.len(), 1);
        assert_eq!((imgs[0].width, imgs[0].height), (Some(300), Some(200)));
        assert_eq!(d.image_src(0).as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(d.image_src(1), None);

        assert!(d.set_image_size(0, 150, 100));
        assert_eq!(d.images()[0].width, Some(150));
        assert!(d.markup().contains(r#"alt="pic" width="150" height="100">"#));
        assert!(!d.set_image_size(5, 1, 1));
    }

    #[test]
    fn typing_coalesces_into_one_undo_step() {
        let mut d = HtmlDocument::new("<p></p>");
        d.edit("<p>a</p>".into());
        d.edit("<p>ab</p>".into());
        d.edit("<p>abc</p>".into());
        assert!(d.undo());
        assert_eq!(d.markup(), "<p></p>");
        assert!(d.redo());
        assert_eq!(d.markup(), "<p>abc</p>");
    }

    #[test]
    fn commands_break_typing_runs() {
        let mut d = HtmlDocument::new("");
        d.edit("x".into());
        d.set_content("<p>y</p>");
        d.edit("<p>yz</p>".into());
        d.undo();
        assert_eq!(d.markup(), "<p>y</p>");
        d.undo();
        assert_eq!(d.markup(), "x");
        d.undo();
        assert_eq!(d.markup(), "");
        assert!(!d.can_undo());
    }

    #[test]
    fn revision_moves_on_every_mutation() {
        let mut d = HtmlDocument::new("a");
        let r0 = d.revision();
        d.set_content("a");
        assert_eq!(d.revision(), r0);
        d.set_content("b");
        assert!(d.revision() > r0);
        let r1 = d.revision();
        d.undo();
        assert!(d.revision() > r1);
    }

    #[test]
    fn undo_history_is_bounded() {
        let mut d = HtmlDocument::new("");
        for i in 0..(UNDO_CAPACITY + 10) {
            d.set_content(&i.to_string());
        }
        let mut n = 0;
        while d.undo() {
            n += 1;
        }
        assert_eq!(n, UNDO_CAPACITY);
    }
}
