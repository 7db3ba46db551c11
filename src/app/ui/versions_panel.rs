use eframe::egui;

use crate::app::actions::{Action, Panel};
use crate::app::state::AppState;
use crate::format;

pub fn versions_panel(ui: &mut egui::Ui, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];

    ui.horizontal(|ui| {
        ui.heading("Versions");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✕").clicked() {
                actions.push(Action::ClosePanel(Panel::Versions));
            }
        });
    });
    ui.separator();

    ui.horizontal(|ui| {
        let resp = ui.add(
            egui::TextEdit::singleline(&mut state.drafts.version_name)
                .desired_width(160.0)
                .hint_text("Version name..."),
        );
        let can_save = !state.drafts.version_name.trim().is_empty();
        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() || (enter && can_save) {
            actions.push(Action::SaveVersion(state.drafts.version_name.clone()));
        }
    });

    ui.add_space(8.0);

    if state.store.versions().is_empty() {
        ui.weak("No versions saved yet");
        return actions;
    }

    let current = state.store.current_version();
    egui::ScrollArea::vertical()
        .id_source("versions_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for v in state.store.versions() {
                let is_current = current == Some(v.id);
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.strong(format::truncate(&v.name, 32)).on_hover_text(&v.name);
                        if is_current {
                            ui.colored_label(ui.visuals().selection.bg_fill, "Current");
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Restore").clicked() {
                                actions.push(Action::RestoreVersion(v.id));
                            }
                        });
                    });
                    ui.weak(format::format_timestamp(v.timestamp));
                    if let Some(author) = &v.author {
                        ui.small(format!("by {author}"));
                    }
                });
                ui.add_space(4.0);
            }
        });

    actions
}
