use eframe::egui;

use crate::app::actions::Action;
use crate::app::state::AppState;
use crate::search;

const SNIPPET_RADIUS: usize = 24;

pub fn find_replace(ctx: &egui::Context, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];
    if !state.view.find_open {
        return actions;
    }

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        actions.push(Action::CloseFind);
        return actions;
    }

    let mut open = true;
    egui::Window::new("Find & Replace")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 96.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let find_resp = ui.add(
                    egui::TextEdit::singleline(&mut state.drafts.find_input)
                        .desired_width(220.0)
                        .hint_text("Search..."),
                );
                if state.view.focus_find {
                    find_resp.request_focus();
                    state.view.focus_find = false;
                }
                if find_resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    actions.push(Action::RunFind(state.drafts.find_input.clone()));
                }
                if ui.button("Find").clicked() {
                    actions.push(Action::RunFind(state.drafts.find_input.clone()));
                }
            });

            ui.horizontal(|ui| {
                let case = ui
                    .checkbox(&mut state.find.case_sensitive, "Match case")
                    .changed();
                let word = ui
                    .checkbox(&mut state.find.whole_word, "Whole word")
                    .changed();
                // options apply to the term already searched for
                if (case || word) && !state.find.search_term.is_empty() {
                    actions.push(Action::RunFind(state.find.search_term.clone()));
                }
            });

            ui.horizontal(|ui| {
                let label = state.find.counter_label();
                if !label.is_empty() {
                    ui.label(label);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let has = state.find.total_matches > 0;
                    if ui.add_enabled(has, egui::Button::new("Next ▼")).clicked() {
                        actions.push(Action::FindNext);
                    }
                    if ui.add_enabled(has, egui::Button::new("▲ Prev")).clicked() {
                        actions.push(Action::FindPrevious);
                    }
                });
            });

            if let Some(m) = state.find.current() {
                let text = state.engine.plain_text();
                ui.small(search::context_snippet(&text, m, SNIPPET_RADIUS));
            }

            ui.separator();

            let toggle = if state.view.show_replace { "Hide Replace" } else { "Replace" };
            if ui.button(toggle).clicked() {
                state.view.show_replace = !state.view.show_replace;
            }

            if state.view.show_replace {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.find.replace_term)
                            .desired_width(220.0)
                            .hint_text("Replace with..."),
                    );
                    let can = !state.find.search_term.is_empty();
                    if ui.add_enabled(can, egui::Button::new("Replace all")).clicked() {
                        actions.push(Action::ReplaceAll);
                    }
                });
            }
        });

    if !open {
        actions.push(Action::CloseFind);
    }
    actions
}
