use eframe::egui;

use crate::app::actions::Action;
use crate::app::state::AppState;
use crate::engine::Mark;

use super::helpers::{hex_of, parse_hex_color};

const PRESET_COLORS: [&str; 80] = [
    "#000000", "#434343", "#666666", "#999999", "#b7b7b7", "#cccccc", "#d9d9d9", "#efefef", "#f3f3f3", "#ffffff",
    "#980000", "#ff0000", "#ff9900", "#ffff00", "#00ff00", "#00ffff", "#4a86e8", "#0000ff", "#9900ff", "#ff00ff",
    "#e6b8af", "#f4cccc", "#fce5cd", "#fff2cc", "#d9ead3", "#d0e0e3", "#c9daf8", "#cfe2f3", "#d9d2e9", "#ead1dc",
    "#dd7e6b", "#ea9999", "#f9cb9c", "#ffe599", "#b6d7a8", "#a2c4c9", "#a4c2f4", "#9fc5e8", "#b4a7d6", "#d5a6bd",
    "#cc4125", "#e06666", "#f6b26b", "#ffd966", "#93c47d", "#76a5af", "#6d9eeb", "#6fa8dc", "#8e7cc3", "#c27ba0",
    "#a61c00", "#cc0000", "#e69138", "#f1c232", "#6aa84f", "#45818e", "#3c78d8", "#3d85c6", "#674ea7", "#a64d79",
    "#85200c", "#990000", "#b45f06", "#bf9000", "#38761d", "#134f5c", "#1155cc", "#0b5394", "#351c75", "#741b47",
    "#5b0f00", "#660000", "#783f04", "#7f6000", "#274e13", "#0c343d", "#1c4587", "#073763", "#20124d", "#4c1130",
];

const SWATCH: f32 = 18.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Text,
    Highlight,
}

impl Target {
    fn mark(self, hex: String) -> Mark {
        match self {
            Target::Text => Mark::Color(hex),
            Target::Highlight => Mark::Highlight(Some(hex)),
        }
    }
}

/// Text and highlight color palettes. At most one is open at a time.
pub fn color_picker(ctx: &egui::Context, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];

    let target = if state.view.text_color_open {
        Target::Text
    } else if state.view.highlight_color_open {
        Target::Highlight
    } else {
        return actions;
    };

    let title = match target {
        Target::Text => "Text color",
        Target::Highlight => "Highlight color",
    };

    let mut open = true;
    let mut picked: Option<String> = None;

    egui::Window::new(title)
        .id(egui::Id::new("color_picker_window"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_pos(egui::pos2(320.0, 90.0))
        .show(ctx, |ui| {
            ui.small("Theme colors");
            egui::Grid::new("color_swatches")
                .spacing([3.0, 3.0])
                .show(ui, |ui| {
                    for (i, hex) in PRESET_COLORS.iter().enumerate() {
                        let Some(color) = parse_hex_color(hex) else {
                            continue;
                        };
                        let (rect, resp) =
                            ui.allocate_exact_size(egui::vec2(SWATCH, SWATCH), egui::Sense::click());
                        ui.painter().rect_filled(rect, 2.0, color);
                        ui.painter().rect_stroke(
                            rect,
                            2.0,
                            ui.visuals().widgets.noninteractive.bg_stroke,
                        );
                        if resp.on_hover_text(*hex).clicked() {
                            picked = Some(hex.to_string());
                        }
                        if i % 10 == 9 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(6.0);
            ui.small("Custom color");
            ui.horizontal(|ui| {
                let mut color =
                    parse_hex_color(&state.drafts.custom_color).unwrap_or(egui::Color32::BLACK);
                if ui.color_edit_button_srgba(&mut color).changed() {
                    state.drafts.custom_color = hex_of(color);
                }
                ui.add(
                    egui::TextEdit::singleline(&mut state.drafts.custom_color)
                        .desired_width(80.0)
                        .hint_text("#000000"),
                );
                let parsed = parse_hex_color(&state.drafts.custom_color);
                if ui
                    .add_enabled(parsed.is_some(), egui::Button::new("Apply"))
                    .clicked()
                {
                    picked = parsed.map(hex_of);
                }
            });
        });

    if let Some(hex) = picked {
        actions.push(Action::ApplyMark(target.mark(hex)));
        open = false;
    }
    if !open {
        state.view.text_color_open = false;
        state.view.highlight_color_open = false;
    }

    actions
}
