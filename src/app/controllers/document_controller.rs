use tracing::{debug, info};

use crate::app::actions::Action;
use crate::app::state::AppState;
use crate::engine::{Mark, Node};

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::ApplyMark(mark) => {
            if let Mark::FontFamily(f) = mark {
                state.drafts.font_family = f.clone();
            }
            if let Mark::FontSize(px) = mark {
                state.drafts.font_size = *px;
            }
            state.engine.apply_mark(mark.clone());
            true
        }
        Action::ClearMarks => {
            state.engine.clear_marks();
            true
        }
        Action::ToggleBlock(block) => {
            state.engine.toggle_block(*block);
            true
        }
        Action::Undo => {
            if !state.engine.undo() {
                debug!("nothing to undo");
            }
            true
        }
        Action::Redo => {
            if !state.engine.redo() {
                debug!("nothing to redo");
            }
            true
        }
        Action::InsertLink(url) => {
            state.view.link_prompt_open = false;
            let url = url.trim();
            if !url.is_empty() {
                state.engine.apply_mark(Mark::Link(url.to_string()));
            }
            true
        }
        Action::InsertTable { rows, cols } => {
            state.view.table_picker_open = false;
            state.engine.insert_node(Node::Table {
                rows: *rows,
                cols: *cols,
                header_row: true,
            });
            info!(rows, cols, "inserted table");
            true
        }
        _ => false,
    }
}

/// Mirror engine changes into the store and keep search counts honest.
pub fn finalize_frame(state: &mut AppState) {
    let rev = state.engine.revision();
    if rev == state.last_revision {
        return;
    }
    state.last_revision = rev;

    state.store.set_content(state.engine.markup());
    state.find.refresh(&state.engine.plain_text());

    let images = state.engine.images().len();
    if state.selected_image.is_some_and(|i| i >= images) {
        state.selected_image = None;
        state.image.deselect();
    }
}
