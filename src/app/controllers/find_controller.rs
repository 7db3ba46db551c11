use tracing::info;

use crate::app::actions::Action;
use crate::app::state::AppState;
use crate::engine::markup;
use crate::search;

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::OpenFind { with_replace } => {
            state.view.find_open = true;
            state.view.show_replace |= *with_replace;
            state.view.focus_find = true;
            true
        }
        Action::RunFind(term) => {
            let text = state.engine.plain_text();
            state.find.find(&text, term);
            true
        }
        Action::FindNext => {
            state.find.find_next();
            true
        }
        Action::FindPrevious => {
            state.find.find_previous();
            true
        }
        Action::ReplaceAll => {
            state.replace_all_in_document();
            true
        }
        Action::CloseFind => {
            state.view.find_open = false;
            state.view.show_replace = false;
            true
        }
        _ => false,
    }
}

impl AppState {
    /// Replace every occurrence in the document text. Matching runs on the
    /// same decoded text the counter was computed from, so the number of
    /// replacements equals the number of matches shown. Returns that number.
    pub(crate) fn replace_all_in_document(&mut self) -> usize {
        if self.find.search_term.is_empty() {
            return 0;
        }
        let term = self.find.search_term.clone();
        let opts = self.find.options();

        let (updated, count) =
            markup::replace_text_matches(self.engine.markup(), &self.find.replace_term, |text| {
                search::find_matches(text, &term, opts)
                    .into_iter()
                    .map(|m| m.start..m.end)
                    .collect()
            });

        // reset terms and counters the same way a plain-text replace does
        self.find.clear();
        self.drafts.find_input.clear();

        if updated != self.engine.markup() {
            self.engine.set_content(&updated);
            info!(term = %term, count, "replaced all");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;

    #[test]
    fn find_counts_in_plain_text_not_markup() {
        let mut st = app_state();
        st.engine.set_content(r#"<p class="strong">strong <strong>strong</strong></p>"#);
        st.apply_action(Action::RunFind("strong".into()));
        assert_eq!(st.find.total_matches, 2);
        assert_eq!(st.find.current_match, 1);

        st.apply_action(Action::FindNext);
        st.apply_action(Action::FindNext);
        assert_eq!(st.find.current_match, 1);
        st.apply_action(Action::FindPrevious);
        assert_eq!(st.find.current_match, 2);
    }

    #[test]
    fn replace_all_leaves_tags_alone_and_resets() {
        let mut st = app_state();
        st.engine.set_content(r#"<p class="cat">cat and Cat</p>"#);
        st.apply_action(Action::RunFind("cat".into()));
        st.find.replace_term = "dog".into();

        st.apply_action(Action::ReplaceAll);

        assert_eq!(st.engine.markup(), r#"<p class="cat">dog and dog</p>"#);
        assert_eq!(st.find.search_term, "");
        assert_eq!(st.find.replace_term, "");
        assert_eq!((st.find.current_match, st.find.total_matches), (0, 0));
    }

    fn replace_counted(st: &mut AppState, html: &str, term: &str, with: &str) -> (usize, usize) {
        st.engine.set_content(html);
        st.apply_action(Action::RunFind(term.into()));
        let shown = st.find.total_matches;
        st.find.replace_term = with.into();
        (shown, st.replace_all_in_document())
    }

    #[test]
    fn replacements_match_the_counter_with_entities() {
        let mut st = app_state();
        assert_eq!(replace_counted(&mut st, "<p>Tom &amp; Jerry</p>", "amp", "X"), (0, 0));
        assert_eq!(st.engine.markup(), "<p>Tom &amp; Jerry</p>");

        assert_eq!(replace_counted(&mut st, "<p>Tom &amp; Jerry</p>", "&", "and"), (1, 1));
        assert_eq!(st.engine.plain_text(), "Tom and Jerry");
    }

    #[test]
    fn replacements_match_the_counter_across_inline_tags() {
        let mut st = app_state();
        let (shown, done) = replace_counted(&mut st, "<p>c<strong>at</strong> cat</p>", "cat", "dog");
        assert_eq!((shown, done), (2, 2));
        assert_eq!(st.engine.plain_text(), "dog dog");
    }

    #[test]
    fn replacement_text_is_escaped() {
        let mut st = app_state();
        replace_counted(&mut st, "<p>salt and pepper</p>", "and", "<b>&");
        assert_eq!(st.engine.markup(), "<p>salt &lt;b&gt;&amp; pepper</p>");
        assert_eq!(st.engine.plain_text(), "salt <b>& pepper");
    }

    #[test]
    fn replace_with_empty_term_is_a_no_op() {
        let mut st = app_state();
        st.engine.set_content("<p>text</p>");
        let rev = st.engine.revision();
        st.apply_action(Action::ReplaceAll);
        assert_eq!(st.engine.revision(), rev);
    }

    #[test]
    fn edits_refresh_the_counter() {
        let mut st = app_state();
        st.engine.set_content("<p>a a a</p>");
        st.apply_action(Action::RunFind("a".into()));
        st.apply_action(Action::FindPrevious);
        assert_eq!(st.find.current_match, 3);

        st.engine.set_content("<p>a</p>");
        st.finalize_frame();
        assert_eq!((st.find.current_match, st.find.total_matches), (1, 1));
    }
}
