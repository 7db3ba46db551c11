use eframe::egui;

use crate::app::actions::Action;
use crate::app::state::AppState;

fn centered_rect(screen: egui::Rect, w: f32, h: f32) -> egui::Rect {
    egui::Rect::from_center_size(screen.center(), egui::vec2(w, h))
}

/// Blocking message box. Everything behind it is dimmed and does not receive
/// input until the message is dismissed.
pub fn notification(ctx: &egui::Context, state: &AppState) -> Vec<Action> {
    let mut actions = Vec::new();

    let Some(note) = &state.notification else {
        return actions;
    };

    if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter)) {
        actions.push(Action::DismissNotification);
        return actions;
    }

    let screen = ctx.screen_rect();
    let popup_rect = centered_rect(screen, 420.0, 180.0);

    // Modal blocker: dims the screen and swallows clicks outside the popup.
    egui::Area::new(egui::Id::new("notification_modal_blocker"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.set_min_size(screen.size());
            ui.painter().rect_filled(
                screen,
                0.0,
                egui::Color32::from_rgba_unmultiplied(0, 0, 0, 90),
            );
            let _ = ui.allocate_rect(screen, egui::Sense::click_and_drag());
        });

    egui::Area::new(egui::Id::new("notification_popup"))
        .order(egui::Order::Tooltip)
        .fixed_pos(popup_rect.min)
        .show(ctx, |ui| {
            ui.set_min_size(popup_rect.size());
            ui.set_max_size(popup_rect.size());

            egui::Frame::popup(ui.style())
                .rounding(egui::Rounding::same(10.0))
                .shadow(ui.style().visuals.popup_shadow)
                .show(ui, |ui| {
                    ui.set_min_size(popup_rect.size());

                    let title_color = if note.is_error {
                        ui.visuals().error_fg_color
                    } else {
                        ui.visuals().strong_text_color()
                    };
                    ui.heading(egui::RichText::new(&note.title).color(title_color));
                    ui.separator();

                    egui::ScrollArea::vertical()
                        .max_height(popup_rect.height() - 90.0)
                        .show(ui, |ui| {
                            ui.label(&note.body);
                        });

                    ui.add_space(8.0);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                        if ui.button("OK").clicked() {
                            actions.push(Action::DismissNotification);
                        }
                    });
                });
        });

    actions
}
