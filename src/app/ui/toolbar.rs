use eframe::egui;

use super::super::actions::{Action, ExportKind, Panel};
use super::super::state::AppState;
use super::helpers::{sized_button, tool_button};
use crate::engine::{Block, Mark, TextAlign};
use crate::pagination::PageFormat;

pub const FONT_FAMILIES: [(&str, &str); 10] = [
    ("Arial", "Arial, sans-serif"),
    ("Helvetica", "Helvetica, sans-serif"),
    ("Times New Roman", "Times New Roman, serif"),
    ("Georgia", "Georgia, serif"),
    ("Courier New", "Courier New, monospace"),
    ("Verdana", "Verdana, sans-serif"),
    ("Trebuchet MS", "Trebuchet MS, sans-serif"),
    ("Impact", "Impact, sans-serif"),
    ("Comic Sans MS", "Comic Sans MS, cursive"),
    ("Palatino", "Palatino, serif"),
];

pub const FONT_SIZES: [u32; 8] = [12, 14, 16, 18, 20, 24, 28, 32];

fn font_name(value: &str) -> &str {
    FONT_FAMILIES
        .iter()
        .find(|(_, v)| *v == value)
        .map(|(n, _)| *n)
        .unwrap_or("Arial")
}

pub fn toolbar(_ctx: &egui::Context, ui: &mut egui::Ui, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];

    ui.horizontal_wrapped(|ui| {
        // ----- Files -----
        if sized_button(ui, "Import Word").clicked() {
            actions.push(Action::ImportWord);
        }
        if sized_button(ui, "Export PDF").clicked() {
            actions.push(Action::Export(ExportKind::Pdf));
        }
        if sized_button(ui, "Export HTML").clicked() {
            actions.push(Action::Export(ExportKind::Html));
        }

        ui.separator();

        // ----- History -----
        if ui
            .add_enabled(state.engine.can_undo(), egui::Button::new("↶"))
            .on_hover_text("Undo (Ctrl+Z)")
            .clicked()
        {
            actions.push(Action::Undo);
        }
        if ui
            .add_enabled(state.engine.can_redo(), egui::Button::new("↷"))
            .on_hover_text("Redo (Ctrl+Y)")
            .clicked()
        {
            actions.push(Action::Redo);
        }

        ui.separator();

        // ----- Typeface -----
        egui::ComboBox::from_id_source("font_family_combo")
            .selected_text(font_name(&state.drafts.font_family))
            .width(140.0)
            .show_ui(ui, |ui| {
                for (name, value) in FONT_FAMILIES {
                    if ui
                        .selectable_label(state.drafts.font_family == value, name)
                        .clicked()
                    {
                        actions.push(Action::ApplyMark(Mark::FontFamily(value.to_string())));
                    }
                }
            });

        egui::ComboBox::from_id_source("block_style_combo")
            .selected_text("Text style")
            .width(110.0)
            .show_ui(ui, |ui| {
                if ui.selectable_label(false, "Paragraph").clicked() {
                    actions.push(Action::ToggleBlock(Block::Paragraph));
                }
                for level in 1..=6u8 {
                    if ui.selectable_label(false, format!("Heading {level}")).clicked() {
                        actions.push(Action::ToggleBlock(Block::Heading(level)));
                    }
                }
            });

        egui::ComboBox::from_id_source("font_size_combo")
            .selected_text(format!("{}px", state.drafts.font_size))
            .width(64.0)
            .show_ui(ui, |ui| {
                for px in FONT_SIZES {
                    if ui
                        .selectable_label(state.drafts.font_size == px, format!("{px}px"))
                        .clicked()
                    {
                        actions.push(Action::ApplyMark(Mark::FontSize(px)));
                    }
                }
            });

        if tool_button(ui, "A", "Text color", state.view.text_color_open) {
            state.view.text_color_open = !state.view.text_color_open;
            state.view.highlight_color_open = false;
        }
        if tool_button(ui, "🖍", "Highlight color", state.view.highlight_color_open) {
            state.view.highlight_color_open = !state.view.highlight_color_open;
            state.view.text_color_open = false;
        }

        ui.separator();

        // ----- Marks -----
        let marks = [
            ("B", "Bold", Mark::Bold),
            ("I", "Italic", Mark::Italic),
            ("U", "Underline", Mark::Underline),
            ("S", "Strikethrough", Mark::Strike),
            ("H", "Highlight", Mark::Highlight(None)),
        ];
        for (label, hover, mark) in marks {
            if tool_button(ui, label, hover, false) {
                actions.push(Action::ApplyMark(mark));
            }
        }

        ui.separator();

        // ----- Alignment -----
        let aligns = [
            ("⬅", "Align left", TextAlign::Left),
            ("↔", "Align center", TextAlign::Center),
            ("➡", "Align right", TextAlign::Right),
            ("☰", "Justify", TextAlign::Justify),
        ];
        for (label, hover, align) in aligns {
            if tool_button(ui, label, hover, false) {
                actions.push(Action::ToggleBlock(Block::Align(align)));
            }
        }

        ui.separator();

        // ----- Lists -----
        let lists = [
            ("•", "Bullet list", Block::BulletList),
            ("1.", "Numbered list", Block::OrderedList),
            ("☑", "Task list", Block::TaskList),
        ];
        for (label, hover, block) in lists {
            if tool_button(ui, label, hover, false) {
                actions.push(Action::ToggleBlock(block));
            }
        }

        ui.separator();

        // ----- Insert -----
        if tool_button(ui, "🔗", "Insert link", state.view.link_prompt_open) {
            actions.push(Action::TogglePanel(Panel::LinkPrompt));
        }
        if tool_button(ui, "🖼", "Insert image", false) {
            actions.push(Action::PickImage);
        }
        if tool_button(ui, "▦", "Insert table", state.view.table_picker_open) {
            actions.push(Action::TogglePanel(Panel::TablePicker));
        }
        if tool_button(ui, "⇲", "Resize images", state.view.image_resizer_open) {
            actions.push(Action::TogglePanel(Panel::ImageResizer));
        }

        ui.separator();

        // ----- Review -----
        if tool_button(ui, "🔍", "Find & replace (Ctrl+F)", state.view.find_open) {
            actions.push(Action::TogglePanel(Panel::FindReplace));
        }
        if tool_button(ui, "💬", "Comments", state.view.comments_open) {
            actions.push(Action::TogglePanel(Panel::Comments));
        }
        if tool_button(ui, "🕓", "Version history", state.view.versions_open) {
            actions.push(Action::TogglePanel(Panel::Versions));
        }

        ui.separator();

        if tool_button(ui, "x₂", "Subscript", false) {
            actions.push(Action::ApplyMark(Mark::Subscript));
        }
        if tool_button(ui, "x²", "Superscript", false) {
            actions.push(Action::ApplyMark(Mark::Superscript));
        }
        if tool_button(ui, "⌫", "Clear formatting", false) {
            actions.push(Action::ClearMarks);
        }
    });

    ui.separator();

    // ----- Page format + navigator -----
    ui.horizontal(|ui| {
        ui.label("Page format:");
        let current = state.settings.page_format;
        egui::ComboBox::from_id_source("page_format_combo")
            .selected_text(current.label())
            .width(130.0)
            .show_ui(ui, |ui| {
                for f in PageFormat::ALL {
                    if ui.selectable_label(current == f, f.label()).clicked() {
                        actions.push(Action::SetPageFormat(f));
                    }
                }
            });

        if current != PageFormat::Continuous && state.pages.total > 1 {
            ui.separator();
            ui.label(format!("Page {} of {}", state.pages.current, state.pages.total));
            if ui
                .add_enabled(state.pages.has_previous(), egui::Button::new("Previous"))
                .clicked()
            {
                actions.push(Action::PreviousPage);
            }
            if ui
                .add_enabled(state.pages.has_next(), egui::Button::new("Next"))
                .clicked()
            {
                actions.push(Action::NextPage);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if state.settings.dark_mode { "☀ Light" } else { "🌙 Dark" };
            if ui.button(label).clicked() {
                actions.push(Action::ToggleDarkMode);
            }
        });
    });

    actions
}
