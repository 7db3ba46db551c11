use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::app::actions::{Action, ExportKind};
use crate::app::state::{AppState, PendingTask, TaskOutput};
use crate::convert::{docx, html_export, pdf, picture};
use crate::engine::Node;
use crate::pagination::fit_image;

const WORD_FILTER: (&str, &[&str]) = ("Word document", &["docx"]);
const IMAGE_FILTER: (&str, &[&str]) = ("Image", picture::IMAGE_EXTENSIONS);
const PDF_FILTER: (&str, &[&str]) = ("PDF", &["pdf"]);
const HTML_FILTER: (&str, &[&str]) = ("HTML", &["html", "htm"]);

pub fn handle(state: &mut AppState, action: &Action) -> bool {
    match action {
        Action::ImportWord => {
            state.import_word();
            true
        }
        Action::PickImage => {
            state.pick_image();
            true
        }
        Action::InsertImageFile(path) => {
            state.insert_image_file(path.clone());
            true
        }
        Action::InsertImageBytes { name, bytes } => {
            state.insert_image_bytes(name, bytes.clone());
            true
        }
        Action::Export(kind) => {
            state.export(*kind);
            true
        }
        Action::RevealExport => {
            if let Some(path) = state.last_export.clone() {
                if let Err(e) = state.platform.reveal(&path) {
                    warn!(error = %format!("{:#}", e), "could not open export");
                }
            }
            true
        }
        _ => false,
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_string()
}

/// Alt text for an inserted image: the file name without its extension.
fn alt_text(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn spawn_task<F>(state: &mut AppState, label: &'static str, work: F)
where
    F: FnOnce() -> Result<TaskOutput> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Result<TaskOutput, String>>();
    std::thread::spawn(move || {
        let res = work().map_err(|e| format!("{:#}", e));
        let _ = tx.send(res);
    });
    state.pending.push(PendingTask { label, rx });
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

impl AppState {
    pub(crate) fn import_word(&mut self) {
        let Some(path) = self.platform.pick_file("Import Word document", WORD_FILTER) else {
            return;
        };
        self.status = Some(format!("Importing {}…", file_label(&path)));
        let format = self.settings.page_format;
        spawn_task(self, "Import", move || {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let imported = docx::docx_to_html(&bytes, format)?;
            Ok(TaskOutput::Imported(imported))
        });
    }

    pub(crate) fn pick_image(&mut self) {
        if let Some(path) = self.platform.pick_file("Insert image", IMAGE_FILTER) {
            self.insert_image_file(path);
        }
    }

    /// Read and embed an image file; it lands at the selection once decoded.
    pub(crate) fn insert_image_file(&mut self, path: PathBuf) {
        let alt = alt_text(&path);
        spawn_task(self, "Image", move || {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let data = picture::load_image(&bytes)?;
            Ok(TaskOutput::Image { data, alt })
        });
    }

    /// Embed image bytes that arrived without a file, from a drop or a paste.
    pub(crate) fn insert_image_bytes(&mut self, name: &str, bytes: Arc<[u8]>) {
        let alt = alt_text(Path::new(name));
        spawn_task(self, "Image", move || {
            let data = picture::load_image(&bytes)?;
            Ok(TaskOutput::Image { data, alt })
        });
    }

    pub(crate) fn export(&mut self, kind: ExportKind) {
        let (title, default_name, filter) = match kind {
            ExportKind::Pdf => ("Export as PDF", "document.pdf", PDF_FILTER),
            ExportKind::Html => ("Export as HTML", "document.html", HTML_FILTER),
        };
        let Some(path) = self.platform.save_file(title, default_name, filter) else {
            return;
        };

        let markup = self.engine.markup().to_string();
        let format = self.settings.page_format;
        self.status = Some(format!("Exporting {}…", file_label(&path)));

        spawn_task(self, "Export", move || {
            let bytes = match kind {
                ExportKind::Pdf => pdf::render_pdf(&markup, format)?,
                ExportKind::Html => html_export::standalone_html(&markup, "Document").into_bytes(),
            };
            write_file(&path, &bytes)?;
            Ok(TaskOutput::Exported(path))
        });
    }

    pub(crate) fn apply_task_output(&mut self, output: TaskOutput) {
        match output {
            TaskOutput::Imported(imported) => {
                self.engine.set_content(&imported.markup);
                self.status = Some("Document imported".to_string());
                if !imported.warnings.is_empty() {
                    for w in &imported.warnings {
                        warn!(warning = %w, "import");
                    }
                    self.notify_info("Imported with warnings", imported.warnings.join("\n"));
                }
            }
            TaskOutput::Image { data, alt } => {
                let (width, height) = fit_image(data.width, data.height, self.settings.page_format);
                self.engine.insert_node(Node::Image {
                    src: data.data_url,
                    alt,
                    width,
                    height,
                });
                info!(width, height, "inserted image");
            }
            TaskOutput::Exported(path) => {
                info!(path = %path.display(), "exported");
                self.status = Some(format!("Saved {}", path.display()));
                self.last_export = Some(path);
            }
        }
    }
}

/// Drain finished background work. Failures become a blocking notification
/// and leave the document untouched.
pub fn finalize_frame(state: &mut AppState) {
    if state.pending.is_empty() {
        return;
    }

    let mut finished: Vec<(&'static str, Result<TaskOutput, String>)> = Vec::new();
    state.pending.retain(|task| match task.rx.try_recv() {
        Ok(res) => {
            finished.push((task.label, res));
            false
        }
        Err(TryRecvError::Empty) => true,
        Err(TryRecvError::Disconnected) => {
            finished.push((task.label, Err("Background task stopped unexpectedly".to_string())));
            false
        }
    });

    for (label, res) in finished {
        match res {
            Ok(output) => state.apply_task_output(output),
            Err(msg) => {
                error!(task = label, error = %msg, "background task failed");
                state.status = None;
                state.notify_error(&format!("{label} failed"), msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app_state;
    use crate::convert::docx::Imported;
    use crate::convert::picture::ImageData;
    use crate::engine::RichTextEngine;

    fn deliver(st: &mut AppState, label: &'static str, res: Result<TaskOutput, String>) {
        let (tx, rx) = mpsc::channel();
        tx.send(res).unwrap();
        st.pending.push(PendingTask { label, rx });
        st.finalize_frame();
    }

    #[test]
    fn imported_markup_replaces_the_document() {
        let mut st = app_state();
        deliver(
            &mut st,
            "Import",
            Ok(TaskOutput::Imported(Imported {
                markup: "<h1>From Word</h1>".into(),
                warnings: vec![],
            })),
        );
        assert!(st.pending.is_empty());
        assert_eq!(st.engine.markup(), "<h1>From Word</h1>");
        assert_eq!(st.store.content(), "<h1>From Word</h1>");
        assert!(st.notification.is_none());
    }

    #[test]
    fn import_warnings_are_surfaced() {
        let mut st = app_state();
        deliver(
            &mut st,
            "Import",
            Ok(TaskOutput::Imported(Imported {
                markup: "<p>x</p>".into(),
                warnings: vec!["Embedded objects are not imported".into()],
            })),
        );
        let n = st.notification.as_ref().unwrap();
        assert!(!n.is_error);
        assert!(n.body.contains("Embedded objects"));
    }

    #[test]
    fn failures_notify_and_keep_the_document() {
        let mut st = app_state();
        let before = st.engine.markup().to_string();
        deliver(&mut st, "Import", Err("Not a Word document".into()));

        let n = st.notification.as_ref().unwrap();
        assert!(n.is_error);
        assert_eq!(n.title, "Import failed");
        assert_eq!(st.engine.markup(), before);
    }

    #[test]
    fn images_are_fitted_to_the_page() {
        let mut st = app_state();
        st.engine.set_content("<p>x</p>");
        deliver(
            &mut st,
            "Image",
            Ok(TaskOutput::Image {
                data: ImageData {
                    data_url: "data:image/png;base64,AAAA".into(),
                    width: 1200,
                    height: 600,
                },
                alt: "chart".into(),
            }),
        );
        let imgs = st.engine.images();
        assert_eq!(imgs.len(), 1);
        assert_eq!((imgs[0].width, imgs[0].height), (Some(600), Some(300)));
        assert_eq!(imgs[0].alt, "chart");
    }

    fn wait_for_tasks(st: &mut AppState) {
        for _ in 0..500 {
            st.finalize_frame();
            if st.pending.is_empty() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("background tasks did not finish");
    }

    #[test]
    fn every_delivered_image_is_inserted() {
        let mut st = app_state();
        st.engine.set_content("<p>x</p>");
        for alt in ["first", "second"] {
            deliver(
                &mut st,
                "Image",
                Ok(TaskOutput::Image {
                    data: ImageData {
                        data_url: "data:image/png;base64,AAAA".into(),
                        width: 40,
                        height: 30,
                    },
                    alt: alt.into(),
                }),
            );
        }
        let alts: Vec<_> = st.engine.images().into_iter().map(|i| i.alt).collect();
        assert_eq!(alts.len(), 2);
        assert!(alts.contains(&"first".to_string()) && alts.contains(&"second".to_string()));
    }

    #[test]
    fn dropped_bytes_and_files_are_inserted() {
        let dir = std::env::temp_dir().join(format!("wordapp-drop-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dot.png");
        std::fs::write(&path, picture::PNG_1X1).unwrap();

        let mut st = app_state();
        st.apply_action(Action::InsertImageFile(path));
        st.apply_action(Action::InsertImageBytes {
            name: "pasted.png".into(),
            bytes: Arc::from(picture::PNG_1X1),
        });
        wait_for_tasks(&mut st);

        let mut alts: Vec<_> = st.engine.images().into_iter().map(|i| i.alt).collect();
        alts.sort();
        assert_eq!(alts, vec!["dot".to_string(), "pasted".to_string()]);
        assert!(st.notification.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_drops_notify() {
        let mut st = app_state();
        let before = st.engine.markup().to_string();
        st.apply_action(Action::InsertImageBytes {
            name: "notes.png".into(),
            bytes: Arc::from(&b"not an image"[..]),
        });
        wait_for_tasks(&mut st);

        let n = st.notification.as_ref().unwrap();
        assert!(n.is_error);
        assert_eq!(n.title, "Image failed");
        assert_eq!(st.engine.markup(), before);
    }

    #[test]
    fn unfinished_tasks_stay_pending() {
        let mut st = app_state();
        let (_tx, rx) = mpsc::channel();
        st.pending.push(PendingTask { label: "Export", rx });
        st.finalize_frame();
        assert_eq!(st.pending.len(), 1);
    }

    #[test]
    fn html_export_writes_a_page() {
        let dir = std::env::temp_dir().join(format!("wordapp-export-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.html");
        write_file(&path, html_export::standalone_html("<p>x</p>", "Document").as_bytes()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<p>x</p>"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
