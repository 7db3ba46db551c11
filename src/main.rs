mod app;
mod convert;
mod engine;
mod format;
mod model;
mod pagination;
mod platform;
mod search;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::settings::EditorSettings;
use app::state::APP_NAME;
use platform::native::NativePlatform;
use platform::Platform;

fn main() -> eframe::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let platform: Arc<dyn Platform> = Arc::new(NativePlatform::new());
    let mut settings = match platform.app_data_dir(APP_NAME) {
        Ok(dir) => EditorSettings::load(&dir),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "no app data dir; using default settings");
            EditorSettings::default()
        }
    };
    settings.apply_env_overrides();
    info!(format = settings.page_format.label(), author = %settings.author, "starting editor");

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Word Editor",
        native_options,
        Box::new(move |_cc| Box::new(app::AppState::new(platform, settings))),
    )
}
