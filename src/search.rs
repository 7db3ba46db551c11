//! Literal find/replace over a plain-text buffer.
//!
//! The search term is always escaped before it becomes a pattern, so "a.b" only
//! matches the three characters `a`, `.`, `b`. The replacement is inserted
//! verbatim (no `$1` expansion).

use regex::{NoExpand, Regex, RegexBuilder};
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

/// Byte range of one occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

fn compile(term: &str, opts: FindOptions) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }

    let escaped = regex::escape(term);
    let pattern = if opts.whole_word {
        format!(r"\b{}\b", escaped)
    } else {
        escaped
    };

    match RegexBuilder::new(&pattern)
        .case_insensitive(!opts.case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(term, error = %e, "could not build search pattern");
            None
        }
    }
}

/// All non-overlapping occurrences of `term`, left to right.
pub fn find_matches(text: &str, term: &str, opts: FindOptions) -> Vec<Match> {
    let Some(re) = compile(term, opts) else {
        return vec![];
    };
    re.find_iter(text)
        .map(|m| Match {
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Replace every occurrence of `term` with `replacement`. An empty term leaves
/// the text untouched.
pub fn replace_all(text: &str, term: &str, replacement: &str, opts: FindOptions) -> String {
    let Some(re) = compile(term, opts) else {
        return text.to_string();
    };
    re.replace_all(text, NoExpand(replacement)).into_owned()
}

/// Up to `radius` chars either side of the match, with ellipses where cut.
pub fn context_snippet(text: &str, m: Match, radius: usize) -> String {
    let (Some(before), Some(hit), Some(after)) =
        (text.get(..m.start), text.get(m.start..m.end), text.get(m.end..))
    else {
        return String::new();
    };

    let lead: String = {
        let tail: Vec<char> = before.chars().rev().take(radius).collect();
        tail.into_iter().rev().collect()
    };
    let trail: String = after.chars().take(radius).collect();

    let mut out = String::new();
    if lead.chars().count() < before.chars().count() {
        out.push('…');
    }
    out.push_str(&lead.replace('\n', " "));
    out.push('[');
    out.push_str(hit);
    out.push(']');
    out.push_str(&trail.replace('\n', " "));
    if trail.chars().count() < after.chars().count() {
        out.push('…');
    }
    out
}

/// Search panel state. `current_match` is 1-based; 0 means no active match.
#[derive(Clone, Debug, Default)]
pub struct FindReplaceState {
    pub search_term: String,
    pub replace_term: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub current_match: usize,
    pub total_matches: usize,
    matches: Vec<Match>,
}

impl FindReplaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> FindOptions {
        FindOptions {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
        }
    }

    pub fn find(&mut self, text: &str, term: &str) {
        self.search_term = term.to_string();
        self.matches = find_matches(text, term, self.options());
        self.total_matches = self.matches.len();
        self.current_match = if self.total_matches > 0 { 1 } else { 0 };
    }

    /// Recount after the text changed, keeping the cursor where it can stay.
    pub fn refresh(&mut self, text: &str) {
        if self.search_term.is_empty() {
            return;
        }
        self.matches = find_matches(text, &self.search_term, self.options());
        self.total_matches = self.matches.len();
        if self.total_matches == 0 {
            self.current_match = 0;
        } else {
            self.current_match = self.current_match.clamp(1, self.total_matches);
        }
    }

    pub fn find_next(&mut self) {
        if self.total_matches == 0 {
            return;
        }
        self.current_match = if self.current_match >= self.total_matches {
            1
        } else {
            self.current_match + 1
        };
    }

    pub fn find_previous(&mut self) {
        if self.total_matches == 0 {
            return;
        }
        self.current_match = if self.current_match <= 1 {
            self.total_matches
        } else {
            self.current_match - 1
        };
    }

    pub fn current(&self) -> Option<Match> {
        self.current_match
            .checked_sub(1)
            .and_then(|i| self.matches.get(i))
            .copied()
    }

    /// Replace every match in `text` and clear the search.
    pub fn replace(&mut self, text: &str) -> String {
        let out = replace_all(text, &self.search_term, &self.replace_term, self.options());
        self.clear();
        out
    }

    pub fn clear(&mut self) {
        self.search_term.clear();
        self.replace_term.clear();
        self.current_match = 0;
        self.total_matches = 0;
        self.matches.clear();
    }

    pub fn counter_label(&self) -> String {
        if self.total_matches == 0 {
            if self.search_term.is_empty() {
                String::new()
            } else {
                "No results".to_string()
            }
        } else {
            format!("{} of {}", self.current_match, self.total_matches)
        }
    }
}
