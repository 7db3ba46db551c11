use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui;
use tracing::warn;

use crate::app::actions::{Action, Panel};
use crate::app::interaction::Handle;
use crate::app::state::{AppState, ImagePreview};
use crate::convert::picture;

const HANDLE_SIZE: f32 = 10.0;
const CANVAS_PAD: f32 = 24.0;

fn handle_rect(handle: Handle, frame: egui::Rect) -> egui::Rect {
    egui::Rect::from_center_size(handle.anchor(frame), egui::vec2(HANDLE_SIZE, HANDLE_SIZE))
}

fn hit_handle(frame: egui::Rect, p: egui::Pos2) -> Option<Handle> {
    Handle::ALL
        .into_iter()
        .find(|h| handle_rect(*h, frame).expand(2.0).contains(p))
}

/// Texture for the selected image. Decoded once per source; a revision bump
/// only costs a hash of the source.
fn preview_texture(ctx: &egui::Context, state: &mut AppState) -> Option<egui::TextureHandle> {
    let index = state.selected_image?;
    let revision = state.engine.revision();
    if let Some(p) = state.preview.as_ref().filter(|p| p.index == index && p.revision == revision) {
        return p.texture.clone();
    }

    let src = state.engine.image_src(index)?;
    let mut hasher = DefaultHasher::new();
    src.hash(&mut hasher);
    let source_hash = hasher.finish();
    if let Some(p) = state
        .preview
        .as_mut()
        .filter(|p| p.index == index && p.source_hash == source_hash)
    {
        p.revision = revision;
        return p.texture.clone();
    }

    let texture = match picture::decode_pixels(&src) {
        Ok(px) => {
            let size = [px.width as usize, px.height as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, &px.rgba);
            Some(ctx.load_texture(format!("image-preview-{index}"), image, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            warn!(index, error = %format!("{:#}", e), "no preview for image");
            None
        }
    };
    state.preview = Some(ImagePreview {
        index,
        revision,
        source_hash,
        texture: texture.clone(),
    });
    texture
}

/// Lists the document's images and lets one be moved/resized on a canvas.
/// Releasing a resize writes the new size back into the document.
pub fn image_resizer(ctx: &egui::Context, state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![];
    if !state.view.image_resizer_open {
        return actions;
    }

    let images = state.engine.images();
    let texture = preview_texture(ctx, state);
    let mut open = true;

    egui::Window::new("Images")
        .open(&mut open)
        .default_size([720.0, 480.0])
        .show(ctx, |ui| {
            if images.is_empty() {
                ui.weak("The document has no images. Use the image button to insert one.");
                return;
            }

            ui.horizontal_top(|ui| {
                ui.vertical(|ui| {
                    ui.set_width(180.0);
                    for img in &images {
                        let label = match (img.width, img.height) {
                            (Some(w), Some(h)) => format!("{}. {} ({}×{})", img.index + 1, img.alt, w, h),
                            _ => format!("{}. {}", img.index + 1, img.alt),
                        };
                        let selected = state.selected_image == Some(img.index);
                        if ui.selectable_label(selected, label).clicked() {
                            actions.push(Action::SelectImage(img.index));
                        }
                    }
                });

                ui.separator();

                if state.selected_image.is_none() {
                    ui.weak("Select an image");
                    return;
                }

                ui.vertical(|ui| {
                    let size = ui.available_size().max(egui::vec2(320.0, 320.0));
                    let (resp, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
                    let canvas = resp.rect;
                    painter.rect_filled(canvas, 4.0, ui.visuals().extreme_bg_color);

                    let frame = egui::Rect::from_min_size(
                        canvas.min + egui::vec2(CANVAS_PAD, CANVAS_PAD) + state.image.offset,
                        state.image.size,
                    );

                    let (pressed, down, pos, has_pointer, focused) = ui.input(|i| {
                        (
                            i.pointer.primary_pressed(),
                            i.pointer.primary_down(),
                            i.pointer.interact_pos(),
                            i.pointer.has_pointer(),
                            i.focused,
                        )
                    });

                    // ---- gesture state machine ----
                    if pressed {
                        if let Some(p) = pos.filter(|p| canvas.contains(*p)) {
                            if let Some(h) = state.image.selected.then(|| hit_handle(frame, p)).flatten() {
                                state.image.begin_resize(h, p);
                            } else if frame.contains(p) {
                                state.image.begin_drag(p);
                            } else {
                                state.image.deselect();
                            }
                        }
                    }

                    if state.image.is_active() {
                        if !has_pointer || !focused {
                            if let Some(c) = state.image.cancel() {
                                actions.push(Action::ImageGesture(c));
                            }
                        } else if !down {
                            if let Some(c) = state.image.release() {
                                actions.push(Action::ImageGesture(c));
                            }
                        } else if let Some(p) = pos {
                            state.image.pointer_moved(p);
                            ctx.request_repaint();
                        }
                    }

                    // ---- paint (after the state update so it tracks the pointer) ----
                    let frame = egui::Rect::from_min_size(
                        canvas.min + egui::vec2(CANVAS_PAD, CANVAS_PAD) + state.image.offset,
                        state.image.size,
                    );
                    let painter = painter.with_clip_rect(canvas);
                    let size_label = format!("{:.0} × {:.0}", state.image.size.x, state.image.size.y);
                    match &texture {
                        Some(tex) => {
                            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                            painter.image(tex.id(), frame, uv, egui::Color32::WHITE);
                            painter.text(
                                frame.left_bottom() + egui::vec2(4.0, -4.0),
                                egui::Align2::LEFT_BOTTOM,
                                size_label,
                                egui::FontId::proportional(11.0),
                                ui.visuals().strong_text_color(),
                            );
                        }
                        None => {
                            painter.rect_filled(frame, 2.0, ui.visuals().faint_bg_color);
                            painter.text(
                                frame.center(),
                                egui::Align2::CENTER_CENTER,
                                size_label,
                                egui::FontId::proportional(14.0),
                                ui.visuals().text_color(),
                            );
                        }
                    }

                    if state.image.selected {
                        let accent = ui.visuals().selection.bg_fill;
                        painter.rect_stroke(frame, 2.0, egui::Stroke::new(2.0, accent));
                        for h in Handle::ALL {
                            let r = handle_rect(h, frame);
                            painter.rect_filled(r, 1.0, accent);
                            painter.rect_stroke(r, 1.0, egui::Stroke::new(1.0, egui::Color32::WHITE));
                        }
                        if let Some(h) = pos.and_then(|p| hit_handle(frame, p)) {
                            ctx.set_cursor_icon(h.cursor());
                        } else if pos.is_some_and(|p| frame.contains(p)) {
                            ctx.set_cursor_icon(if state.image.is_active() {
                                egui::CursorIcon::Grabbing
                            } else {
                                egui::CursorIcon::Grab
                            });
                        }
                    }
                });
            });
        });

    if !open {
        actions.push(Action::ClosePanel(Panel::ImageResizer));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;
    use crate::engine::Node;

    fn insert_png(st: &mut AppState, w: u32, h: u32) {
        let data = picture::load_image(&picture::png_bytes(w, h)).unwrap();
        st.engine.insert_node(Node::Image {
            src: data.data_url,
            alt: "red".into(),
            width: w,
            height: h,
        });
    }

    #[test]
    fn selected_image_is_decoded_into_a_texture() {
        let ctx = egui::Context::default();
        let mut st = app_state();
        assert!(preview_texture(&ctx, &mut st).is_none());

        insert_png(&mut st, 4, 2);
        st.selected_image = Some(0);
        let tex = preview_texture(&ctx, &mut st).unwrap();
        assert_eq!(tex.size(), [4, 2]);

        // unrelated edits keep the decoded texture
        let edited = format!("<p>more</p>\n{}", st.engine.markup());
        st.engine.set_content(&edited);
        let again = preview_texture(&ctx, &mut st).unwrap();
        assert_eq!(again.id(), tex.id());
    }

    #[test]
    fn undecodable_sources_have_no_preview() {
        let ctx = egui::Context::default();
        let mut st = app_state();
        st.engine.set_content(r#"<p><img src="https://example.com/a.png" alt="remote"></p>"#);
        st.selected_image = Some(0);
        assert!(preview_texture(&ctx, &mut st).is_none());
        assert!(st.preview.as_ref().is_some_and(|p| p.texture.is_none()));
    }
}
