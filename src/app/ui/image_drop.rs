use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui;
use tracing::debug;

use crate::app::actions::Action;
use crate::convert::picture;

fn dropped_action(file: &egui::DroppedFile) -> Option<Action> {
    match (&file.path, &file.bytes) {
        (Some(path), _) if picture::is_image_path(path) => Some(Action::InsertImageFile(path.clone())),
        (None, Some(bytes)) if picture::is_image_path(Path::new(&file.name)) => {
            Some(Action::InsertImageBytes {
                name: file.name.clone(),
                bytes: bytes.clone(),
            })
        }
        _ => {
            debug!(name = %file.name, "ignored dropped file");
            None
        }
    }
}

/// Pasted text that stands for an image: a base64 image `data:` URL or the
/// path of an existing image file.
fn pasted_action(text: &str) -> Option<Action> {
    let text = text.trim();
    if text.starts_with("data:image/") {
        let bytes = picture::data_url_bytes(text)?;
        return Some(Action::InsertImageBytes {
            name: "pasted image".to_string(),
            bytes: Arc::from(bytes),
        });
    }
    let path = PathBuf::from(text.strip_prefix("file://").unwrap_or(text));
    (picture::is_image_path(&path) && path.is_file()).then_some(Action::InsertImageFile(path))
}

fn paint_drop_hint(ctx: &egui::Context) {
    let screen = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("image_drop_hint"),
    ));
    painter.rect_filled(screen, 0.0, egui::Color32::from_black_alpha(120));
    painter.text(
        screen.center(),
        egui::Align2::CENTER_CENTER,
        "Drop images to insert them",
        egui::FontId::proportional(22.0),
        egui::Color32::WHITE,
    );
}

/// Files dropped on the window and image pastes become insertions. Image
/// pastes are taken out of the input so the document view does not also
/// receive them as text.
pub fn image_drop(ctx: &egui::Context) -> Vec<Action> {
    let mut actions: Vec<Action> =
        ctx.input(|i| i.raw.dropped_files.iter().filter_map(dropped_action).collect());

    ctx.input_mut(|i| {
        i.events.retain(|e| {
            let egui::Event::Paste(text) = e else {
                return true;
            };
            match pasted_action(text) {
                Some(a) => {
                    actions.push(a);
                    false
                }
                None => true,
            }
        })
    });

    if ctx.input(|i| !i.raw.hovered_files.is_empty()) {
        paint_drop_hint(ctx);
    }
    actions
}
