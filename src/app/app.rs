use eframe::egui;

use super::actions::Action;
use super::{theme, ui};
use super::AppState;
use crate::format;

fn shortcut_actions(ctx: &egui::Context) -> Vec<Action> {
    let mut actions = vec![];
    // Consumed before the document TextEdit runs so its built-in undo never sees them.
    ctx.input_mut(|i| {
        if i.consume_key(egui::Modifiers::COMMAND, egui::Key::F) {
            actions.push(Action::OpenFind { with_replace: false });
        }
        if i.consume_key(egui::Modifiers::COMMAND, egui::Key::H) {
            actions.push(Action::OpenFind { with_replace: true });
        }
        if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z)
            || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y)
        {
            actions.push(Action::Redo);
        }
        if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
            actions.push(Action::Undo);
        }
    });
    actions
}

impl AppState {
    fn apply_all(&mut self, actions: Vec<Action>) {
        for a in actions {
            self.apply_action(a);
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply(ctx, self.settings.dark_mode);

        let text = self.engine.plain_text();
        let words = format::word_count(&text);
        let chars = text.chars().count();

        // Native window title
        let title = format!("Word Editor - {} words", words);
        if self.last_window_title.as_deref() != Some(title.as_str()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_window_title = Some(title);
        }

        // Shortcuts, drops and image pastes are ignored while a message box is up.
        if self.notification.is_none() {
            let actions = shortcut_actions(ctx);
            self.apply_all(actions);
            let actions = ui::image_drop::image_drop(ctx);
            self.apply_all(actions);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui_top| {
            let actions = ui::toolbar::toolbar(ctx, ui_top, self);
            self.apply_all(actions);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui_bottom| {
            let mut reveal = false;
            ui_bottom.horizontal(|ui| {
                if let Some(task) = self.pending.first() {
                    ui.spinner();
                    ui.label(task.label);
                } else if let Some(status) = &self.status {
                    ui.label(status);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format::counts_label(words, chars));
                    if self.last_export.is_some() && ui.link("Open last export").clicked() {
                        reveal = true;
                    }
                });
            });
            if reveal {
                self.apply_action(Action::RevealExport);
            }
        });

        if self.view.comments_open {
            egui::SidePanel::right("comments_panel")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui_side| {
                    let actions = ui::comments_panel::comments_panel(ui_side, self);
                    self.apply_all(actions);
                });
        }
        if self.view.versions_open {
            egui::SidePanel::right("versions_panel")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui_side| {
                    let actions = ui::versions_panel::versions_panel(ui_side, self);
                    self.apply_all(actions);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui_center| {
            ui::document_view::document_view(ctx, ui_center, self);
        });

        // Floating windows, drawn over the document.
        let actions = ui::find_replace::find_replace(ctx, self);
        self.apply_all(actions);
        let actions = ui::color_picker::color_picker(ctx, self);
        self.apply_all(actions);
        let actions = ui::table_picker::table_picker(ctx, self);
        self.apply_all(actions);
        let actions = ui::link_prompt::link_prompt(ctx, self);
        self.apply_all(actions);
        let actions = ui::image_resizer::image_resizer(ctx, self);
        self.apply_all(actions);

        // Modal last so it sits above everything else.
        let actions = ui::notification::notification(ctx, self);
        self.apply_all(actions);

        self.finalize_frame();

        if !self.pending.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
