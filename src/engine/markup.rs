use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("static regex"))
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*"([^"]*)""#).expect("static regex")
    })
}

fn data_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"src="(data:[^"]*)""#).expect("static regex"))
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"src="image:([0-9]+)""#).expect("static regex"))
}

/// Data URLs shorter than this stay inline.
const COLLAPSE_MIN: usize = 64;

/// Convert char-index to byte-index, clamped to the end of `s`.
pub fn cc_to_bc(s: &str, cc: usize) -> usize {
    s.char_indices().nth(cc).map(|(bi, _)| bi).unwrap_or(s.len())
}

pub fn cc_len(s: &str) -> usize {
    s.chars().count()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn decode_entities(s: &str) -> String {
    entity_re()
        .replace_all(s, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded
                .map(|c| c.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn tag_name(tag: &str) -> (bool, String) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>').trim();
    let closing = inner.starts_with('/');
    let name: String = inner
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    (closing, name.to_ascii_lowercase())
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "tr" | "div" | "blockquote"
            | "table" | "ul" | "ol" | "pre"
    )
}

fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Plain-text projection: tags dropped, entities decoded, one newline per block.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut last = 0;

    let push_text = |out: &mut String, seg: &str| {
        let decoded = decode_entities(seg);
        for ch in decoded.chars() {
            match ch {
                '\r' => {}
                '\n' => push_break(out),
                _ => out.push(ch),
            }
        }
    };

    for m in tag_re().find_iter(markup) {
        push_text(&mut out, &markup[last..m.start()]);
        last = m.end();

        let (closing, name) = tag_name(m.as_str());
        match name.as_str() {
            "br" => out.push('\n'),
            "td" | "th" if closing => out.push('\t'),
            n if closing && is_block(n) => {
                if out.ends_with('\t') {
                    out.pop();
                }
                push_break(&mut out);
            }
            _ => {}
        }
    }
    push_text(&mut out, &markup[last..]);

    out.trim_end().to_string()
}

/// True where [`plain_text`] inserts a separator, so text on either side of
/// the tag never joins into one word.
fn breaks_text(tag: &str) -> bool {
    let (closing, name) = tag_name(tag);
    name == "br" || (closing && (is_block(&name) || name == "td" || name == "th"))
}

enum Piece<'a> {
    Text { raw: &'a str, decoded: String, at: usize },
    Tag(&'a str),
}

fn push_piece<'a>(pieces: &mut Vec<Piece<'a>>, text: &mut String, raw: &'a str) {
    let decoded = decode_entities(raw);
    let at = text.len();
    text.push_str(&decoded);
    pieces.push(Piece::Text { raw, decoded, at });
}

fn flush_run(
    out: &mut String,
    pieces: &mut Vec<Piece<'_>>,
    text: &mut String,
    replacement: &str,
    find: &mut impl FnMut(&str) -> Vec<Range<usize>>,
) -> usize {
    let hits = find(text.as_str());
    let escaped = escape_html(replacement);

    for piece in pieces.drain(..) {
        match piece {
            Piece::Tag(tag) => out.push_str(tag),
            Piece::Text { raw, decoded, at } => {
                let end = at + decoded.len();
                if !hits.iter().any(|h| h.start < end && h.end > at) {
                    out.push_str(raw);
                    continue;
                }
                let mut kept = String::new();
                for (i, ch) in decoded.char_indices() {
                    let pos = at + i;
                    if hits.iter().any(|h| h.start == pos) {
                        out.push_str(&escape_html(&kept));
                        kept.clear();
                        out.push_str(&escaped);
                    }
                    if !hits.iter().any(|h| h.start <= pos && pos < h.end) {
                        kept.push(ch);
                    }
                }
                out.push_str(&escape_html(&kept));
            }
        }
    }
    text.clear();
    hits.len()
}

/// Replace matches found in the decoded document text, the same text
/// [`plain_text`] yields. Text split by inline tags is searched as one run;
/// a hit spanning tags puts the replacement in its first piece and keeps the
/// tags. Untouched text keeps its original entity spelling, and the
/// replacement is escaped. Returns the new markup and the number of hits.
pub fn replace_text_matches(
    markup: &str,
    replacement: &str,
    mut find: impl FnMut(&str) -> Vec<Range<usize>>,
) -> (String, usize) {
    let mut out = String::with_capacity(markup.len());
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut count = 0;
    let mut last = 0;

    for m in tag_re().find_iter(markup) {
        push_piece(&mut pieces, &mut text, &markup[last..m.start()]);
        last = m.end();
        if breaks_text(m.as_str()) {
            count += flush_run(&mut out, &mut pieces, &mut text, replacement, &mut find);
            out.push_str(m.as_str());
        } else {
            pieces.push(Piece::Tag(m.as_str()));
        }
    }
    push_piece(&mut pieces, &mut text, &markup[last..]);
    count += flush_run(&mut out, &mut pieces, &mut text, replacement, &mut find);

    (out, count)
}

/// Markup with long `src="data:..."` values swapped for `image:N`
/// placeholders, so an editor buffer does not carry megabytes of base64.
#[derive(Clone, Debug, Default)]
pub struct CollapsedMarkup {
    pub text: String,
    urls: Vec<String>,
    /// (char offset of the placeholder in `text`, placeholder chars, url chars)
    spans: Vec<(usize, usize, usize)>,
}

pub fn collapse_data_urls(markup: &str) -> CollapsedMarkup {
    let mut out = CollapsedMarkup::default();
    let mut last = 0;
    let mut chars = 0;
    for caps in data_src_re().captures_iter(markup) {
        let Some(url) = caps.get(1).filter(|u| u.len() >= COLLAPSE_MIN) else {
            continue;
        };
        let before = &markup[last..url.start()];
        out.text.push_str(before);
        chars += cc_len(before);

        let placeholder = format!("image:{}", out.urls.len());
        out.spans.push((chars, placeholder.len(), cc_len(url.as_str())));
        out.text.push_str(&placeholder);
        chars += placeholder.len();
        out.urls.push(url.as_str().to_string());
        last = url.end();
    }
    out.text.push_str(&markup[last..]);
    out
}

impl CollapsedMarkup {
    /// Put the data URLs back into an edited buffer. A placeholder the edit
    /// broke stays as typed.
    pub fn expand(&self, edited: &str) -> String {
        if self.urls.is_empty() {
            return edited.to_string();
        }
        placeholder_re()
            .replace_all(edited, |caps: &regex::Captures| {
                match caps[1].parse::<usize>().ok().and_then(|n| self.urls.get(n)) {
                    Some(url) => format!(r#"src="{}""#, url),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Char offset in `text` → char offset in the full markup. Offsets inside
    /// a placeholder map to the start of its URL.
    pub fn source_offset(&self, cc: usize) -> usize {
        let mut shift = 0;
        for &(at, short, long) in &self.spans {
            if cc >= at + short {
                shift += long - short;
            } else if cc > at {
                return at + shift;
            } else {
                break;
            }
        }
        cc + shift
    }
}

/// `name="value"` pairs of a single tag.
pub fn attributes(tag: &str) -> Vec<(String, String)> {
    attr_re()
        .captures_iter(tag)
        .map(|c| (c[1].to_ascii_lowercase(), decode_entities(&c[2])))
        .collect()
}

pub fn attribute(tag: &str, name: &str) -> Option<String> {
    attributes(tag)
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_of_blocks() {
        let html = "<h1>Title</h1>\n<p>Hello <strong>bold</strong> world</p>\n<p>a &amp; b</p>";
        assert_eq!(plain_text(html), "Title\nHello bold world\na & b");
    }

    #[test]
    fn projection_of_tables_and_breaks() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table><p>x<br>y</p>";
        assert_eq!(plain_text(html), "A\tB\n1\t2\nx\ny");
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("&lt;b&gt; &#65;&#x42; &bogus;"), "<b> AB &bogus;");
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    fn replace_word(html: &str, word: &str, with: &str) -> (String, usize) {
        replace_text_matches(html, with, |text| {
            text.match_indices(word).map(|(i, m)| i..i + m.len()).collect()
        })
    }

    #[test]
    fn replacing_skips_tags_and_attributes() {
        let (out, n) = replace_word(r#"<p class="cat">cat</p>"#, "cat", "dog");
        assert_eq!(out, r#"<p class="cat">dog</p>"#);
        assert_eq!(n, 1);
    }

    #[test]
    fn replacing_sees_decoded_text() {
        let (out, n) = replace_word("<p>Tom &amp; Jerry</p>", "amp", "X");
        assert_eq!((out.as_str(), n), ("<p>Tom &amp; Jerry</p>", 0));

        let (out, n) = replace_word("<p>Tom &amp; Jerry</p>", "&", "<and>");
        assert_eq!((out.as_str(), n), ("<p>Tom &lt;and&gt; Jerry</p>", 1));
    }

    #[test]
    fn replacing_across_inline_tags() {
        let html = "<p>c<strong>at</strong> cat</p>";
        let (out, n) = replace_word(html, "cat", "dog");
        assert_eq!(n, 2);
        assert_eq!(out, "<p>dog<strong></strong> dog</p>");
        assert_eq!(plain_text(&out), "dog dog");
    }

    #[test]
    fn replacing_stops_at_block_edges() {
        let (out, n) = replace_word("<p>ca</p>\n<p>t&nbsp;x</p>", "cat", "dog");
        assert_eq!(n, 0);
        assert_eq!(out, "<p>ca</p>\n<p>t&nbsp;x</p>");
    }

    #[test]
    fn long_data_urls_collapse_and_expand() {
        let url = format!("data:image/png;base64,{}", "A".repeat(100));
        let html = format!(r#"<p>é<img src="{url}" alt="x"></p>"#);
        let c = collapse_data_urls(&html);
        assert_eq!(c.text, r#"<p>é<img src="image:0" alt="x"></p>"#);
        assert_eq!(c.expand(&c.text), html);

        let edited = c.text.replace("<p>é", "<p>éa");
        assert_eq!(c.expand(&edited), html.replace("<p>é", "<p>éa"));

        // offsets after the placeholder shift by the hidden URL
        let after = cc_len(r#"<p>é<img src="image:0""#);
        assert_eq!(c.source_offset(2), 2);
        assert_eq!(c.source_offset(after), cc_len(&format!(r#"<p>é<img src="{url}""#)));
        assert_eq!(c.source_offset(after - 3), cc_len(r#"<p>é<img src=""#));
    }

    #[test]
    fn short_data_urls_stay_inline() {
        let html = r#"<img src="data:image/png;base64,AAAA">"#;
        let c = collapse_data_urls(html);
        assert_eq!(c.text, html);
        assert_eq!(c.expand(r#"<img src="image:0">"#), r#"<img src="image:0">"#);
        assert_eq!(c.source_offset(5), 5);
    }

    #[test]
    fn attrs() {
        let tag = r#"<img src="data:x" alt="a &amp; b" width="300">"#;
        assert_eq!(attribute(tag, "alt").as_deref(), Some("a & b"));
        assert_eq!(attribute(tag, "width").as_deref(), Some("300"));
        assert_eq!(attribute(tag, "height"), None);
    }

    #[test]
    fn char_to_byte() {
        let s = "héllo";
        assert_eq!(cc_to_bc(s, 2), 3);
        assert_eq!(cc_to_bc(s, 99), s.len());
    }
}
