use eframe::egui;
use egui_extras::syntax_highlighting::{highlight, CodeTheme};

use crate::app::state::AppState;
use crate::engine::markup::{self, CollapsedMarkup};
use crate::pagination::estimate_pages;

fn editor_id() -> egui::Id {
    egui::Id::new("document_editor")
}

/// Paints a dashed rule and a "Page N" tag at every page boundary.
fn paint_page_breaks(ui: &egui::Ui, rect: egui::Rect, page_h: f32, total: usize) {
    let painter = ui.painter();
    let stroke = egui::Stroke::new(1.0, ui.visuals().weak_text_color());
    for n in 1..total {
        let y = rect.top() + n as f32 * page_h;
        let mut x = rect.left();
        while x < rect.right() {
            let end = (x + 6.0).min(rect.right());
            painter.line_segment([egui::pos2(x, y), egui::pos2(end, y)], stroke);
            x += 10.0;
        }
        painter.text(
            egui::pos2(rect.right() - 4.0, y - 2.0),
            egui::Align2::RIGHT_BOTTOM,
            format!("Page {}", n + 1),
            egui::FontId::proportional(11.0),
            ui.visuals().weak_text_color(),
        );
    }
}

/// Collapsed buffer for the current engine revision, rebuilt only when it changed.
fn collapsed_markup(state: &mut AppState) -> CollapsedMarkup {
    let revision = state.engine.revision();
    match state.view.collapsed.take() {
        Some((r, c)) if r == revision => c,
        _ => markup::collapse_data_urls(state.engine.markup()),
    }
}

/// The editable document surface.
///
/// Typing goes through [`RichTextEngine::edit`](crate::engine::RichTextEngine::edit);
/// the caret is pushed into the engine selection only when it moved, so
/// selections set by toolbar commands are not clobbered on the next frame.
/// Embedded image data is shown as `image:N` placeholders.
pub fn document_view(ctx: &egui::Context, ui: &mut egui::Ui, state: &mut AppState) {
    let format = state.settings.page_format;
    let mut collapsed = collapsed_markup(state);
    let mut buffer = collapsed.text.clone();

    let mut scroll = egui::ScrollArea::vertical()
        .id_source("document_scroll")
        .auto_shrink([false, false]);
    let jumped = state.view.scroll_to_page.take();
    if let (Some(page), Some(h)) = (jumped, format.page_height()) {
        scroll = scroll.vertical_scroll_offset(page.saturating_sub(1) as f32 * h);
    }

    let theme = CodeTheme::from_memory(ctx);
    let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
        let mut job = highlight(ui.ctx(), &theme, text, "html");
        job.wrap.max_width = wrap_width;
        ui.fonts(|f| f.layout_job(job))
    };

    let out = scroll.show(ui, |ui| {
        let width = format.view_width().min(ui.available_width() - 16.0).max(200.0);
        let min_h = format.page_height().unwrap_or(0.0);
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            let output = egui::TextEdit::multiline(&mut buffer)
                .id(editor_id())
                .code_editor()
                .desired_width(width)
                .desired_rows(30)
                .min_size(egui::vec2(width, min_h))
                .layouter(&mut layouter)
                .show(ui);

            let rect = output.response.rect;
            match format.page_height() {
                Some(h) => {
                    let total = estimate_pages(rect.height(), format);
                    state.pages.set_total(total);
                    paint_page_breaks(ui, rect, h, total);
                }
                None => state.pages.set_total(1),
            }
            ui.add_space(12.0);
            output
        })
        .inner
    });

    let output = out.inner;
    if output.response.changed() {
        state.engine.edit(collapsed.expand(&buffer));
        collapsed = markup::collapse_data_urls(state.engine.markup());
    }

    if let Some(range) = output.cursor_range.map(|c| c.as_sorted_char_range()) {
        if state.view.view_cursor.as_ref() != Some(&range) {
            let start = collapsed.source_offset(range.start);
            let end = collapsed.source_offset(range.end);
            state.engine.set_selection(start..end);
            state.view.view_cursor = Some(range);
        }
    }
    state.view.collapsed = Some((state.engine.revision(), collapsed));

    // Scrolled by hand: the navigator follows the viewport.
    if jumped.is_none() {
        if let Some(h) = format.page_height() {
            let page = (out.state.offset.y / h).floor().max(0.0) as usize + 1;
            state.pages.current = page.min(state.pages.total.max(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;

    #[test]
    fn buffer_hides_image_data_until_the_document_changes() {
        let mut st = app_state();
        let url = format!("data:image/png;base64,{}", "A".repeat(80));
        st.engine.set_content(&format!(r#"<p><img src="{url}"></p>"#));

        let c = collapsed_markup(&mut st);
        assert_eq!(c.text, r#"<p><img src="image:0"></p>"#);
        assert_eq!(c.expand(&c.text), st.engine.markup());

        st.view.collapsed = Some((st.engine.revision(), c));
        st.engine.set_content("<p>plain</p>");
        assert_eq!(collapsed_markup(&mut st).text, "<p>plain</p>");
    }
}
