use eframe::egui;
use tracing::debug;

use crate::app::actions::Action;
use crate::app::interaction::{Commit, ImageInteraction, DEFAULT_IMAGE_SIZE};
use crate::app::state::AppState;

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::SelectImage(index) => {
            state.select_image(*index);
            true
        }
        Action::ImageGesture(commit) => {
            state.commit_image_gesture(*commit);
            true
        }
        _ => false,
    }
}

impl AppState {
    fn select_image(&mut self, index: usize) {
        let Some(node) = self.engine.images().into_iter().find(|n| n.index == index) else {
            return;
        };
        let size = egui::vec2(
            node.width.map(|w| w as f32).unwrap_or(DEFAULT_IMAGE_SIZE.x),
            node.height.map(|h| h as f32).unwrap_or(DEFAULT_IMAGE_SIZE.y),
        );
        self.image = ImageInteraction::new(size);
        self.image.selected = true;
        self.selected_image = Some(index);
    }

    fn commit_image_gesture(&mut self, commit: Commit) {
        match commit {
            Commit::Resized { width, height } => {
                let Some(index) = self.selected_image else {
                    return;
                };
                if !self.engine.set_image_size(index, width, height) {
                    debug!(index, "image vanished before resize committed");
                }
            }
            // images flow inline; the offset only affects the preview
            Commit::Moved(offset) => debug!(?offset, "image moved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;
    use crate::engine::RichTextEngine;

    const DOC: &str = "<p>a</p>\n<img src=\"data:x\" alt=\"one\">\n<img src=\"data:y\" alt=\"two\" width=\"120\" height=\"80\">";

    #[test]
    fn selecting_uses_document_size_or_default() {
        let mut st = app_state();
        st.engine.set_content(DOC);

        st.apply_action(Action::SelectImage(0));
        assert_eq!(st.image.size, DEFAULT_IMAGE_SIZE);

        st.apply_action(Action::SelectImage(1));
        assert_eq!(st.image.size, egui::vec2(120.0, 80.0));
        assert_eq!(st.selected_image, Some(1));

        st.apply_action(Action::SelectImage(7));
        assert_eq!(st.selected_image, Some(1));
    }

    #[test]
    fn resize_commit_writes_back() {
        let mut st = app_state();
        st.engine.set_content(DOC);
        st.apply_action(Action::SelectImage(0));
        st.apply_action(Action::ImageGesture(Commit::Resized {
            width: 240,
            height: 160,
        }));
        let imgs = st.engine.images();
        assert_eq!((imgs[0].width, imgs[0].height), (Some(240), Some(160)));
    }

    #[test]
    fn selection_is_dropped_when_the_image_disappears() {
        let mut st = app_state();
        st.engine.set_content(DOC);
        st.apply_action(Action::SelectImage(1));
        st.finalize_frame();

        st.engine.set_content("<p>no images</p>");
        st.finalize_frame();
        assert_eq!(st.selected_image, None);
        assert!(!st.image.selected);
    }
}
