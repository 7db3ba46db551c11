use tracing::debug;

use crate::app::actions::Action;
use crate::app::state::AppState;

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::SaveVersion(name) => {
            let name = name.trim();
            if name.is_empty() {
                return true;
            }
            // store content is refreshed at end of frame; take it from the engine
            let content = state.engine.markup().to_string();
            let author = Some(state.settings.author.clone());
            state.store.save_version(name, &content, author);
            state.drafts.version_name.clear();
            true
        }
        Action::RestoreVersion(id) => {
            match state.store.load_version(*id) {
                Some(content) => state.engine.set_content(&content),
                None => debug!(%id, "restore ignored"),
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;
    use crate::model::VersionId;

    #[test]
    fn restore_pushes_content_into_the_engine() {
        let mut st = app_state();
        st.engine.set_content("<p>first</p>");
        st.apply_action(Action::SaveVersion("v1".into()));
        let v1 = st.store.versions()[0].id;

        st.engine.set_content("<p>second</p>");
        st.apply_action(Action::SaveVersion(" v2 ".into()));
        assert_eq!(st.store.versions()[1].name, "v2");

        st.apply_action(Action::RestoreVersion(v1));
        st.finalize_frame();

        assert_eq!(st.engine.markup(), "<p>first</p>");
        assert_eq!(st.store.content(), "<p>first</p>");
        assert_eq!(st.store.current_version(), Some(v1));
    }

    #[test]
    fn versions_and_comments_follow_the_current_author() {
        let mut st = app_state();
        st.settings.author = "Katherine".into();
        st.apply_action(Action::SaveVersion("v1".into()));
        st.apply_action(Action::AddComment("check".into()));

        let version_author = st.store.versions()[0].author.clone();
        assert_eq!(version_author.as_deref(), Some("Katherine"));
        assert_eq!(st.store.comments()[0].author, "Katherine");
    }

    #[test]
    fn blank_names_and_unknown_ids_do_nothing() {
        let mut st = app_state();
        st.apply_action(Action::SaveVersion("   ".into()));
        assert!(st.store.versions().is_empty());

        let before = st.engine.markup().to_string();
        st.apply_action(Action::RestoreVersion(VersionId::new()));
        assert_eq!(st.engine.markup(), before);
    }
}
