//! `.docx` → HTML markup.
//!
//! Covers what the editor can represent: paragraphs, headings, alignment,
//! bold/italic/underline/strike runs, breaks, hyperlinks, list paragraphs,
//! tables and embedded pictures. Anything else is dropped with a warning.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use roxmltree::Node;
use zip::ZipArchive;

use crate::convert::picture;
use crate::engine::markup::escape_html;
use crate::pagination::{fit_image, PageFormat};

#[derive(Clone, Debug, Default)]
pub struct Imported {
    pub markup: String,
    pub warnings: Vec<String>,
}

struct Converter {
    rels: HashMap<String, String>,
    /// Picture bytes by relationship id.
    media: HashMap<String, Vec<u8>>,
    format: PageFormat,
    warnings: Vec<String>,
}

fn read_bytes(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(e) => e,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to open part '{}'", name)),
    };
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read part '{}'", name))?;
    Ok(Some(bytes))
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<String>> {
    match read_bytes(archive, name)? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .with_context(|| format!("Part '{}' is not UTF-8", name)),
        None => Ok(None),
    }
}

/// Relationship targets are relative to `word/` unless absolute.
fn part_name(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}

/// Pre-read every picture the document relationships point at.
fn read_media(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    rels: &HashMap<String, String>,
) -> Result<HashMap<String, Vec<u8>>> {
    let mut media = HashMap::new();
    for (id, target) in rels {
        if !target.contains("media/") {
            continue;
        }
        if let Some(bytes) = read_bytes(archive, &part_name(target))? {
            media.insert(id.clone(), bytes);
        }
    }
    Ok(media)
}

/// Attribute by local name, ignoring the namespace prefix (`w:val` → `val`).
fn attr<'a>(node: Node<'a, '_>, local: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == local)
        .map(|a| a.value())
}

fn child<'a, 'input>(node: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == local)
}

/// `<w:b/>` is on, `<w:b w:val="false"/>` or `"0"` is off.
fn flag(props: Option<Node>, local: &str) -> bool {
    let Some(el) = props.and_then(|p| child(p, local)) else {
        return false;
    };
    !matches!(attr(el, "val"), Some("false") | Some("0") | Some("none"))
}

fn parse_rels(xml: &str) -> Result<HashMap<String, String>> {
    let doc = roxmltree::Document::parse(xml).context("Relationships part is not valid XML")?;
    let mut rels = HashMap::new();
    for node in doc.descendants() {
        if node.tag_name().name() == "Relationship" {
            if let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) {
                rels.insert(id.to_string(), target.to_string());
            }
        }
    }
    Ok(rels)
}

impl Converter {
    fn warn(&mut self, msg: String) {
        if !self.warnings.contains(&msg) {
            self.warnings.push(msg);
        }
    }

    fn run(&mut self, r: Node) -> String {
        let props = child(r, "rPr");
        let mut text = String::new();
        for c in r.children().filter(|c| c.is_element()) {
            match c.tag_name().name() {
                "t" => text.push_str(&escape_html(c.text().unwrap_or(""))),
                "tab" => text.push('\t'),
                "br" | "cr" => text.push_str("<br>"),
                "rPr" | "lastRenderedPageBreak" | "fldChar" | "instrText" => {}
                "drawing" => {
                    if let Some(img) = self.drawing(c) {
                        text.push_str(&img);
                    }
                }
                "pict" | "object" => self.warn("Embedded objects are not imported".to_string()),
                other => self.warn(format!("Unsupported run content: {}", other)),
            }
        }
        if text.is_empty() {
            return text;
        }

        let mut wraps = Vec::new();
        if flag(props, "b") {
            wraps.push("strong");
        }
        if flag(props, "i") {
            wraps.push("em");
        }
        if flag(props, "u") {
            wraps.push("u");
        }
        if flag(props, "strike") || flag(props, "dstrike") {
            wraps.push("s");
        }
        if let Some(va) = props.and_then(|p| child(p, "vertAlign")).and_then(|v| attr(v, "val")) {
            match va {
                "subscript" => wraps.push("sub"),
                "superscript" => wraps.push("sup"),
                _ => {}
            }
        }

        for tag in wraps.iter().rev() {
            text = format!("<{tag}>{text}</{tag}>");
        }
        text
    }

    /// `<w:drawing>` → `<img>`, sized to fit the page like an inserted picture.
    fn drawing(&mut self, d: Node) -> Option<String> {
        let embed = d
            .descendants()
            .find(|n| n.tag_name().name() == "blip")
            .and_then(|b| attr(b, "embed"));
        let Some(id) = embed else {
            self.warn("Drawings without a picture are not imported".to_string());
            return None;
        };
        let Some(bytes) = self.media.get(id) else {
            self.warn(format!("Picture '{}' is missing from the document", id));
            return None;
        };

        match picture::load_image(bytes) {
            Ok(img) => {
                let alt = d
                    .descendants()
                    .find(|n| n.tag_name().name() == "docPr")
                    .and_then(|n| attr(n, "descr").or_else(|| attr(n, "name")))
                    .unwrap_or("image");
                let (w, h) = fit_image(img.width, img.height, self.format);
                Some(format!(
                    r#"<img src="{}" alt="{}" width="{}" height="{}">"#,
                    img.data_url,
                    escape_html(alt),
                    w,
                    h
                ))
            }
            Err(e) => {
                self.warn(format!("Skipped an unreadable picture: {:#}", e));
                None
            }
        }
    }

    fn inline(&mut self, p: Node) -> String {
        let mut out = String::new();
        for c in p.children().filter(|c| c.is_element()) {
            match c.tag_name().name() {
                "r" => out.push_str(&self.run(c)),
                "hyperlink" => {
                    let inner: String = c
                        .children()
                        .filter(|r| r.is_element() && r.tag_name().name() == "r")
                        .map(|r| self.run(r))
                        .collect();
                    let href = attr(c, "id").and_then(|id| self.rels.get(id).cloned());
                    match href {
                        Some(h) => out.push_str(&format!(r#"<a href="{}">{}</a>"#, escape_html(&h), inner)),
                        None => out.push_str(&inner),
                    }
                }
                "ins" | "smartTag" | "sdtContent" => out.push_str(&self.inline(c)),
                "pPr" | "bookmarkStart" | "bookmarkEnd" | "proofErr" | "del" => {}
                other => self.warn(format!("Unsupported paragraph content: {}", other)),
            }
        }
        out
    }

    fn paragraph(&mut self, p: Node) -> Option<String> {
        let inner = self.inline(p);
        if inner.trim().is_empty() {
            return None;
        }

        let ppr = child(p, "pPr");
        let style = ppr
            .and_then(|pp| child(pp, "pStyle"))
            .and_then(|s| attr(s, "val"))
            .unwrap_or("");
        let is_list = ppr.and_then(|pp| child(pp, "numPr")).is_some() || style == "ListParagraph";

        let align = match ppr.and_then(|pp| child(pp, "jc")).and_then(|j| attr(j, "val")) {
            Some("center") => r#" style="text-align: center""#,
            Some("right") | Some("end") => r#" style="text-align: right""#,
            Some("both") | Some("distribute") => r#" style="text-align: justify""#,
            _ => "",
        };

        let heading = match style {
            "Title" => Some(1),
            "Subtitle" => Some(2),
            s => s
                .strip_prefix("Heading")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=6).contains(n)),
        };

        Some(if let Some(n) = heading {
            format!("<h{n}{align}>{inner}</h{n}>")
        } else if is_list {
            format!("<ul><li{align}>{inner}</li></ul>")
        } else {
            format!("<p{align}>{inner}</p>")
        })
    }

    fn cell(&mut self, tc: Node) -> String {
        tc.children()
            .filter(|c| c.is_element() && c.tag_name().name() == "p")
            .map(|p| self.inline(p))
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("<br>")
    }

    fn table(&mut self, tbl: Node) -> String {
        let mut out = String::from("<table>\n");
        for tr in tbl
            .children()
            .filter(|c| c.is_element() && c.tag_name().name() == "tr")
        {
            let header = child(tr, "trPr").and_then(|p| child(p, "tblHeader")).is_some();
            let tag = if header { "th" } else { "td" };
            out.push_str("<tr>");
            for tc in tr
                .children()
                .filter(|c| c.is_element() && c.tag_name().name() == "tc")
            {
                let body = self.cell(tc);
                out.push_str(&format!("<{tag}>{body}</{tag}>"));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>");
        out
    }
}

/// Convert a `.docx` archive. Pictures are fitted to `format`.
pub fn docx_to_html(bytes: &[u8], format: PageFormat) -> Result<Imported> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("File is not a Word (.docx) document")?;

    let xml = read_part(&mut archive, "word/document.xml")?
        .context("Document body (word/document.xml) not found")?;
    let rels = match read_part(&mut archive, "word/_rels/document.xml.rels")? {
        Some(r) => parse_rels(&r)?,
        None => HashMap::new(),
    };
    let media = read_media(&mut archive, &rels)?;

    let doc = roxmltree::Document::parse(&xml).context("Document body is not valid XML")?;
    let body = doc
        .descendants()
        .find(|n| n.tag_name().name() == "body")
        .context("Document has no body")?;

    let mut conv = Converter {
        rels,
        media,
        format,
        warnings: Vec::new(),
    };
    let mut blocks = Vec::new();
    for node in body.children().filter(|c| c.is_element()) {
        match node.tag_name().name() {
            "p" => blocks.extend(conv.paragraph(node)),
            "tbl" => blocks.push(conv.table(node)),
            "sectPr" | "bookmarkStart" | "bookmarkEnd" => {}
            other => conv.warn(format!("Unsupported block: {}", other)),
        }
    }

    Ok(Imported {
        markup: blocks.join("\n"),
        warnings: conv.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn build_docx(body: &str, rels: Option<&str>) -> Vec<u8> {
        build_docx_with(body, rels, &[])
    }

    fn build_docx_with(body: &str, rels: Option<&str>, parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zw = zip::ZipWriter::new(&mut buf);
            let opts = zip::write::FileOptions::default();
            zw.start_file("word/document.xml", opts).unwrap();
            write!(zw, r#"<?xml version="1.0"?><w:document {W}><w:body>{body}</w:body></w:document>"#).unwrap();
            if let Some(rels) = rels {
                zw.start_file("word/_rels/document.xml.rels", opts).unwrap();
                zw.write_all(rels.as_bytes()).unwrap();
            }
            for (name, bytes) in parts {
                zw.start_file(*name, opts).unwrap();
                zw.write_all(bytes).unwrap();
            }
            zw.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn headings_paragraphs_and_runs() {
        let body = r#"
            <w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
            <w:p><w:pPr><w:jc w:val="center"/></w:pPr>
                <w:r><w:rPr><w:b/></w:rPr><w:t>Bold</w:t></w:r>
                <w:r><w:t xml:space="preserve"> &amp; </w:t></w:r>
                <w:r><w:rPr><w:i/><w:b w:val="0"/></w:rPr><w:t>it</w:t></w:r>
            </w:p>
            <w:p></w:p>
            <w:sectPr/>"#;
        let out = docx_to_html(&build_docx(body, None), PageFormat::PortraitA4).unwrap();
        assert_eq!(
            out.markup,
            "<h2>Intro</h2>\n<p style=\"text-align: center\"><strong>Bold</strong> &amp; <em>it</em></p>"
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn tables_lists_and_links() {
        let body = r#"
            <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/></w:numPr></w:pPr><w:r><w:t>item</w:t></w:r></w:p>
            <w:p><w:hyperlink r:id="rId7"><w:r><w:t>site</w:t></w:r></w:hyperlink></w:p>
            <w:tbl>
              <w:tr><w:trPr><w:tblHeader/></w:trPr><w:tc><w:p><w:r><w:t>H</w:t></w:r></w:p></w:tc></w:tr>
              <w:tr><w:tc><w:p><w:r><w:t>v</w:t></w:r></w:p></w:tc></w:tr>
            </w:tbl>"#;
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Type="hyperlink" Target="https://example.com" TargetMode="External"/></Relationships>"#;
        let out = docx_to_html(&build_docx(body, Some(rels)), PageFormat::PortraitA4).unwrap();
        assert_eq!(
            out.markup,
            "<ul><li>item</li></ul>\n<p><a href=\"https://example.com\">site</a></p>\n<table>\n<tr><th>H</th></tr>\n<tr><td>v</td></tr>\n</table>"
        );
    }

    const DRAWING: &str = r#"<w:drawing><wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:docPr id="1" name="Picture 1" descr="a dot"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:blipFill><a:blip r:embed="rId5"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#;

    const IMAGE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/></Relationships>"#;

    #[test]
    fn embedded_pictures_become_images() {
        let body = format!("<w:p><w:r><w:t>see </w:t></w:r><w:r>{DRAWING}</w:r></w:p>");
        let bytes = build_docx_with(
            &body,
            Some(IMAGE_RELS),
            &[("word/media/image1.png", picture::PNG_1X1)],
        );
        let out = docx_to_html(&bytes, PageFormat::PortraitA4).unwrap();

        assert!(out.markup.starts_with(r#"<p>see <img src="data:image/png;base64,iVBORw0KGgo"#));
        assert!(out.markup.ends_with(r#"alt="a dot" width="1" height="1"></p>"#));
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn missing_pictures_become_warnings() {
        let body = format!("<w:p><w:r><w:t>x</w:t></w:r><w:r>{DRAWING}</w:r><w:r><w:drawing/></w:r></w:p>");
        let out = docx_to_html(&build_docx(&body, Some(IMAGE_RELS)), PageFormat::PortraitA4).unwrap();
        assert_eq!(out.markup, "<p>x</p>");
        assert_eq!(
            out.warnings,
            vec![
                "Picture 'rId5' is missing from the document".to_string(),
                "Drawings without a picture are not imported".to_string(),
            ]
        );
    }

    #[test]
    fn rejects_non_zip_input() {
        assert!(docx_to_html(b"plain text, not a docx", PageFormat::PortraitA4).is_err());
    }
}
