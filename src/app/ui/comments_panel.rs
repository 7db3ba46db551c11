use eframe::egui;

use crate::app::actions::{Action, Panel};
use crate::app::state::AppState;
use crate::format;

const RESOLVED_TINT: egui::Color32 = egui::Color32::from_rgba_premultiplied(34, 197, 94, 24);

pub fn comments_panel(ui: &mut egui::Ui, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];

    ui.horizontal(|ui| {
        ui.heading("Comments");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✕").clicked() {
                actions.push(Action::ClosePanel(Panel::Comments));
            }
        });
    });
    ui.separator();

    ui.add(
        egui::TextEdit::multiline(&mut state.drafts.comment)
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .hint_text("Add a comment..."),
    );
    let can_add = !state.drafts.comment.trim().is_empty();
    if ui
        .add_enabled(can_add, egui::Button::new("Add Comment"))
        .clicked()
    {
        actions.push(Action::AddComment(state.drafts.comment.clone()));
    }

    ui.add_space(8.0);

    if state.store.comments().is_empty() {
        ui.weak("No comments yet");
        return actions;
    }

    egui::ScrollArea::vertical()
        .id_source("comments_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for c in state.store.comments() {
                let fill = if c.resolved {
                    RESOLVED_TINT
                } else {
                    ui.visuals().faint_bg_color
                };
                egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.strong(&c.author);
                        ui.weak(format::format_date(c.timestamp));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                actions.push(Action::DeleteComment(c.id));
                            }
                            let (icon, hover) = if c.resolved {
                                ("↺", "Mark as unresolved")
                            } else {
                                ("✔", "Mark as resolved")
                            };
                            if ui.small_button(icon).on_hover_text(hover).clicked() {
                                actions.push(Action::ResolveComment {
                                    id: c.id,
                                    resolved: !c.resolved,
                                });
                            }
                        });
                    });
                    ui.label(&c.content);
                    if c.resolved {
                        ui.small("Resolved");
                    }
                });
                ui.add_space(4.0);
            }
        });

    actions
}
