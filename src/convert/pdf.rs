use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use regex::Regex;
use std::sync::OnceLock;

use crate::engine::markup;
use crate::pagination::PageFormat;

// A4 in PDF points
const A4_SHORT: i64 = 595;
const A4_LONG: i64 = 842;
const MARGIN: i64 = 56;
const BODY_SIZE: i64 = 11;

#[derive(Clone, Debug, PartialEq)]
struct Line {
    size: i64,
    text: String,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<h([1-6])\b").expect("static regex"))
}

fn font_size(level: Option<u32>) -> i64 {
    match level {
        Some(1) => 24,
        Some(2) => 20,
        Some(3) => 16,
        Some(_) => 13,
        None => BODY_SIZE,
    }
}

/// Helvetica averages a little over half an em per glyph.
fn chars_per_line(width: i64, size: i64) -> usize {
    ((width as f64) / (size as f64 * 0.52)).floor().max(8.0) as usize
}

fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let cur_len = cur.chars().count();
        if cur_len > 0 && cur_len + 1 + word_len > max {
            out.push(std::mem::take(&mut cur));
        }
        if word_len > max {
            // hard-split words longer than a line
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max) {
                if !cur.is_empty() {
                    out.push(std::mem::take(&mut cur));
                }
                cur = chunk.iter().collect();
            }
            continue;
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() || out.is_empty() {
        out.push(cur);
    }
    out
}

fn layout_lines(markup_text: &str, text_width: i64) -> Vec<Line> {
    let mut lines = Vec::new();
    for source_line in markup_text.lines() {
        let level = heading_re()
            .captures(source_line)
            .and_then(|c| c[1].parse::<u32>().ok());
        let size = font_size(level);
        let text = markup::plain_text(source_line);
        if text.trim().is_empty() {
            continue;
        }
        for para in text.split('\n') {
            let para = para.replace('\t', "    ");
            for w in wrap(&para, chars_per_line(text_width, size)) {
                lines.push(Line { size, text: w });
            }
        }
    }
    lines
}

/// WinAnsi covers Latin-1; anything outside becomes '?'.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

fn page_content(lines: &[Line], page_h: i64) -> Content {
    let mut ops = Vec::new();
    let mut y = page_h - MARGIN;
    for line in lines {
        y -= line.size * 14 / 10;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), line.size.into()]));
        ops.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode(&line.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    Content { operations: ops }
}

/// Split lines into pages by accumulated line height.
fn paginate(lines: Vec<Line>, usable_h: i64) -> Vec<Vec<Line>> {
    let mut pages = vec![];
    let mut cur = vec![];
    let mut used = 0;
    for line in lines {
        let h = line.size * 14 / 10;
        if used + h > usable_h && !cur.is_empty() {
            pages.push(std::mem::take(&mut cur));
            used = 0;
        }
        used += h;
        cur.push(line);
    }
    if !cur.is_empty() || pages.is_empty() {
        pages.push(cur);
    }
    pages
}

/// Render the document as a text PDF on A4 pages.
pub fn render_pdf(markup_text: &str, format: PageFormat) -> Result<Vec<u8>> {
    let (page_w, page_h) = if format.is_landscape() {
        (A4_LONG, A4_SHORT)
    } else {
        (A4_SHORT, A4_LONG)
    };

    let lines = layout_lines(markup_text, page_w - 2 * MARGIN);
    let pages = paginate(lines, page_h - 2 * MARGIN);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let content = page_content(page, page_h);
        let bytes = content.encode().context("Failed to encode PDF page content")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![0.into(), 0.into(), page_w.into(), page_h.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).context("Failed to write PDF")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn headings_get_larger_type() {
        let lines = layout_lines("<h1>Big</h1>\n<p>small</p>\n<p></p>", 400);
        assert_eq!(
            lines,
            vec![
                Line { size: 24, text: "Big".into() },
                Line { size: BODY_SIZE, text: "small".into() },
            ]
        );
    }

    #[test]
    fn long_documents_span_pages() {
        let lines: Vec<Line> = (0..200)
            .map(|i| Line { size: BODY_SIZE, text: i.to_string() })
            .collect();
        let pages = paginate(lines, A4_LONG - 2 * MARGIN);
        assert!(pages.len() > 1);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), 200);
    }

    #[test]
    fn produces_a_pdf_file() {
        let bytes = render_pdf("<h1>Report</h1>\n<p>Body text é</p>", PageFormat::LandscapeA4).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
