use eframe::egui;
use egui_extras::syntax_highlighting::CodeTheme;

fn seed_solarized_once(ctx: &egui::Context) {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let has_stored = ctx.data_mut(|d| {
            d.get_persisted::<CodeTheme>(egui::Id::new("dark")).is_some()
                || d.get_persisted::<CodeTheme>(egui::Id::new("light")).is_some()
        });
        if has_stored {
            return;
        }

        // Matches egui_extras::syntax_highlighting::CodeTheme with syntect enabled in 0.27
        let seeds = [
            (r#"{"dark_mode":true,"syntect_theme":"SolarizedDark"}"#, true),
            (r#"{"dark_mode":false,"syntect_theme":"SolarizedLight"}"#, false),
        ];
        for (json, dark) in seeds {
            let theme = serde_json::from_str::<CodeTheme>(json).unwrap_or_else(|_| {
                if dark {
                    CodeTheme::dark()
                } else {
                    CodeTheme::light()
                }
            });
            theme.store_in_memory(ctx);
        }
    });
}

/// Applies the light/dark setting. Markup highlighting follows via
/// `CodeTheme::from_memory`, which keys off the current visuals.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    seed_solarized_once(ctx);
    if ctx.style().visuals.dark_mode != dark_mode {
        ctx.set_visuals(if dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
    }
}
