use super::actions::Action;
use super::state::AppState;

use super::controllers::{
    comments_controller, document_controller, find_controller, image_controller, io_controller,
    layout_controller, versions_controller,
};

impl AppState {
    pub fn apply_action(&mut self, action: Action) {
        // Keep ordering stable (document -> panels -> io -> layout)
        if document_controller::handle(self, &action) {
            return;
        }
        if find_controller::handle(self, &action) {
            return;
        }
        if comments_controller::handle(self, &action) {
            return;
        }
        if versions_controller::handle(self, &action) {
            return;
        }
        if image_controller::handle(self, &action) {
            return;
        }
        if io_controller::handle(self, &action) {
            return;
        }
        if layout_controller::handle(self, &action) {
            return;
        }
    }

    pub fn finalize_frame(&mut self) {
        // Background results first so their edits are mirrored this frame.
        io_controller::finalize_frame(self);
        document_controller::finalize_frame(self);
    }
}
