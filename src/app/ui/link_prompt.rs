use eframe::egui;

use crate::app::actions::{Action, Panel};
use crate::app::state::AppState;

pub fn link_prompt(ctx: &egui::Context, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];
    if !state.view.link_prompt_open {
        return actions;
    }

    let mut open = true;
    egui::Window::new("Insert link")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 120.0))
        .show(ctx, |ui| {
            ui.label("Enter URL:");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut state.drafts.link_url)
                    .desired_width(320.0)
                    .hint_text("https://example.com"),
            );
            if ui.memory(|m| m.focused().is_none()) {
                resp.request_focus();
            }
            let submit = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.horizontal(|ui| {
                if ui.button("Insert").clicked() || submit {
                    actions.push(Action::InsertLink(state.drafts.link_url.clone()));
                }
                if ui.button("Cancel").clicked() {
                    actions.push(Action::ClosePanel(Panel::LinkPrompt));
                }
            });
        });

    if !open {
        actions.push(Action::ClosePanel(Panel::LinkPrompt));
    }
    actions
}
