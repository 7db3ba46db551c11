use crate::app::actions::Action;
use crate::app::state::AppState;
use crate::model::{CommentDraft, CommentPatch};

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::AddComment(text) => {
            let text = text.trim();
            if text.is_empty() {
                return true;
            }
            let draft = CommentDraft {
                content: text.to_string(),
                author: state.settings.author.clone(),
                position: state.engine.selection().start,
            };
            state.store.add_comment(draft);
            state.drafts.comment.clear();
            true
        }
        Action::ResolveComment { id, resolved } => {
            state.store.update_comment(*id, CommentPatch::resolved(*resolved));
            true
        }
        Action::DeleteComment(id) => {
            state.store.delete_comment(*id);
            true
        }
        _ => false,
    }
}
