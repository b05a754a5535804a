use cmd_launcher::gui::LauncherApp;
use cmd_launcher::icon::load_icon_or_fallback;
use cmd_launcher::logging;
use cmd_launcher::settings::{app_dir, Settings};

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let base = app_dir();
    let settings_path = base.join("settings.json");

    let mut startup_errors = Vec::new();
    let settings = match Settings::load(&settings_path.to_string_lossy()) {
        Ok(s) => s,
        Err(e) => {
            startup_errors.push(format!("settings.json: {e:#}"));
            Settings::default()
        }
    };

    logging::init(settings.debug_logging, settings.log_file(&base));
    for e in &startup_errors {
        tracing::error!("{e}");
    }
    tracing::info!(dir = %base.display(), "starting launcher");

    let icon = load_icon_or_fallback(&settings.window_icon(&base));
    let (width, height) = settings.window_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Launcher")
            .with_inner_size([width as f32, height as f32])
            .with_decorations(false)
            .with_always_on_top()
            .with_icon(egui::IconData {
                rgba: icon.rgba,
                width: icon.width,
                height: icon.height,
            }),
        ..Default::default()
    };

    eframe::run_native(
        "Launcher",
        native_options,
        Box::new(move |cc| {
            Box::new(LauncherApp::new(
                cc,
                settings,
                base,
                settings_path,
                startup_errors,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
