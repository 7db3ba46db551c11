use eframe::egui;

/// `#rrggbb` (or `rrggbb`) to a color.
pub fn parse_hex_color(s: &str) -> Option<egui::Color32> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(egui::Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?))
}

pub fn hex_of(c: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

/// Button sized to its label so toolbar rows line up.
pub fn sized_button(ui: &mut egui::Ui, label: &str) -> egui::Response {
    let font_id = ui.style().text_styles[&egui::TextStyle::Button].clone();
    let text_w = ui.fonts(|f| {
        f.layout_no_wrap(label.to_owned(), font_id, ui.visuals().text_color())
            .size()
            .x
    });
    let w = (text_w + 18.0).ceil();
    let h = ui.spacing().interact_size.y;
    ui.add_sized([w, h], egui::Button::new(label))
}

/// Toolbar toggle: highlighted when `active`.
pub fn tool_button(ui: &mut egui::Ui, label: &str, hover: &str, active: bool) -> bool {
    ui.add(egui::SelectableLabel::new(active, label))
        .on_hover_text(hover)
        .clicked()
}
