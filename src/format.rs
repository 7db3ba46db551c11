use time::macros::format_description;
use time::OffsetDateTime;

pub fn format_date(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "-".into())
}

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| "-".into())
}

/// Cut to `max` chars, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let mut out: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        out.push('…');
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn counts_label(words: usize, chars: usize) -> String {
    format!("{} words · {} chars", words, chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamps() {
        let ts = datetime!(2024-03-09 07:05:00 UTC);
        assert_eq!(format_date(ts), "2024-03-09");
        assert_eq!(format_timestamp(ts), "2024-03-09 07:05");
    }

    #[test]
    fn truncation_is_char_based() {
        assert_eq!(truncate("héllo world", 5), "héllo…");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn words() {
        assert_eq!(word_count("  one two\nthree\t"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(counts_label(2, 9), "2 words · 9 chars");
    }
}
