use tracing::info;

use crate::app::actions::{Action, Panel};
use crate::app::state::AppState;

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::SetPageFormat(format) => {
            if state.settings.page_format != *format {
                state.settings.page_format = *format;
                info!(format = format.label(), "page format changed");
                state.persist_settings();
            }
            true
        }
        Action::PreviousPage => {
            state.pages.previous();
            state.view.scroll_to_page = Some(state.pages.current);
            true
        }
        Action::NextPage => {
            state.pages.next();
            state.view.scroll_to_page = Some(state.pages.current);
            true
        }
        Action::TogglePanel(panel) => {
            let open = !state.panel_open(*panel);
            state.set_panel(*panel, open);
            true
        }
        Action::ClosePanel(panel) => {
            state.set_panel(*panel, false);
            true
        }
        Action::ToggleDarkMode => {
            state.settings.dark_mode = !state.settings.dark_mode;
            state.persist_settings();
            true
        }
        Action::DismissNotification => {
            state.notification = None;
            true
        }
        _ => false,
    }
}

impl AppState {
    pub fn panel_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::FindReplace => self.view.find_open,
            Panel::Comments => self.view.comments_open,
            Panel::Versions => self.view.versions_open,
            Panel::LinkPrompt => self.view.link_prompt_open,
            Panel::TablePicker => self.view.table_picker_open,
            Panel::ImageResizer => self.view.image_resizer_open,
        }
    }

    fn set_panel(&mut self, panel: Panel, open: bool) {
        match panel {
            Panel::FindReplace => {
                self.view.find_open = open;
                self.view.focus_find = open;
                if !open {
                    self.view.show_replace = false;
                }
            }
            Panel::Comments => {
                self.view.comments_open = open;
                if self.settings.show_comments != open {
                    self.settings.show_comments = open;
                    self.persist_settings();
                }
            }
            Panel::Versions => {
                self.view.versions_open = open;
                if self.settings.show_versions != open {
                    self.settings.show_versions = open;
                    self.persist_settings();
                }
            }
            Panel::LinkPrompt => self.view.link_prompt_open = open,
            Panel::TablePicker => {
                self.view.table_picker_open = open;
                self.drafts.table_hover = (0, 0);
            }
            Panel::ImageResizer => {
                self.view.image_resizer_open = open;
                if !open {
                    self.image.cancel();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;
    use crate::pagination::PageFormat;

    #[test]
    fn page_navigation_is_clamped() {
        let mut st = app_state();
        st.pages.set_total(3);

        st.apply_action(Action::PreviousPage);
        assert_eq!(st.pages.current, 1);

        for _ in 0..5 {
            st.apply_action(Action::NextPage);
        }
        assert_eq!(st.pages.current, 3);
        assert_eq!(st.view.scroll_to_page, Some(3));
    }

    #[test]
    fn panels_toggle_and_remember_sidebar_choice() {
        let mut st = app_state();
        st.apply_action(Action::TogglePanel(Panel::Comments));
        assert!(st.view.comments_open);
        assert!(st.settings.show_comments);

        st.apply_action(Action::ClosePanel(Panel::Comments));
        assert!(!st.view.comments_open);
        assert!(!st.settings.show_comments);
    }

    #[test]
    fn closing_find_hides_replace() {
        let mut st = app_state();
        st.apply_action(Action::OpenFind { with_replace: true });
        assert!(st.view.find_open && st.view.show_replace && st.view.focus_find);

        st.apply_action(Action::TogglePanel(Panel::FindReplace));
        assert!(!st.view.find_open);
        assert!(!st.view.show_replace);
    }

    #[test]
    fn page_format_is_saved() {
        let mut st = app_state();
        st.apply_action(Action::SetPageFormat(PageFormat::Continuous));
        assert_eq!(st.settings.page_format, PageFormat::Continuous);

        let dir = st.platform.app_data_dir("wordApp").unwrap();
        let saved = crate::app::settings::EditorSettings::load(&dir);
        assert_eq!(saved.page_format, PageFormat::Continuous);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn notification_dismiss() {
        let mut st = app_state();
        st.notify_error("Export failed", "disk full");
        st.apply_action(Action::DismissNotification);
        assert!(st.notification.is_none());
    }
}
