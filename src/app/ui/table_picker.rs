use eframe::egui;

use crate::app::actions::{Action, Panel};
use crate::app::state::AppState;

const MAX_ROWS: usize = 8;
const MAX_COLS: usize = 10;
const CELL: f32 = 16.0;
const GAP: f32 = 3.0;

/// Grid picker: hover to size, click to insert.
pub fn table_picker(ctx: &egui::Context, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];
    if !state.view.table_picker_open {
        return actions;
    }

    let mut open = true;
    egui::Window::new("Insert table")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_pos(egui::pos2(520.0, 90.0))
        .show(ctx, |ui| {
            let size = egui::vec2(
                MAX_COLS as f32 * (CELL + GAP),
                MAX_ROWS as f32 * (CELL + GAP),
            );
            let (rect, resp) = ui.allocate_exact_size(size, egui::Sense::click());

            let cell_at = |p: egui::Pos2| -> Option<(usize, usize)> {
                if !rect.contains(p) {
                    return None;
                }
                let col = ((p.x - rect.left()) / (CELL + GAP)) as usize;
                let row = ((p.y - rect.top()) / (CELL + GAP)) as usize;
                Some((row.min(MAX_ROWS - 1), col.min(MAX_COLS - 1)))
            };

            if let Some(cell) = resp.hover_pos().and_then(cell_at) {
                state.drafts.table_hover = cell;
            }
            if resp.clicked() {
                if let Some((row, col)) = resp.interact_pointer_pos().and_then(cell_at) {
                    actions.push(Action::InsertTable {
                        rows: row + 1,
                        cols: col + 1,
                    });
                }
            }

            let (hr, hc) = state.drafts.table_hover;
            let painter = ui.painter();
            for row in 0..MAX_ROWS {
                for col in 0..MAX_COLS {
                    let min = rect.min + egui::vec2(col as f32 * (CELL + GAP), row as f32 * (CELL + GAP));
                    let cell = egui::Rect::from_min_size(min, egui::vec2(CELL, CELL));
                    let fill = if row <= hr && col <= hc {
                        ui.visuals().selection.bg_fill
                    } else {
                        ui.visuals().extreme_bg_color
                    };
                    painter.rect_filled(cell, 1.0, fill);
                    painter.rect_stroke(cell, 1.0, ui.visuals().widgets.noninteractive.bg_stroke);
                }
            }

            ui.add_space(4.0);
            ui.vertical_centered(|ui| {
                ui.small(format!("{} × {} Table", hr + 1, hc + 1));
            });
        });

    if !open {
        actions.push(Action::ClosePanel(Panel::TablePicker));
    }
    actions
}
