mod backend_bridge;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use production_core::{load_settings, Settings};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::ProductionApp;

/// Settings from file and environment, with the local store moved under the
/// per-user data directory unless one was configured.
fn resolve_settings() -> Settings {
    let mut settings = load_settings();
    if settings.storage_path == Settings::default().storage_path {
        if let Some(data_dir) = dirs::data_dir() {
            settings.storage_path = data_dir
                .join("production_console")
                .join("local_storage.json");
        }
    }
    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = resolve_settings();
    let startup_issue = settings.validate().err().map(|err| format!("{err:#}"));
    if let Some(issue) = &startup_issue {
        tracing::error!("invalid settings: {issue}");
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Production Console")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([820.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Production Console",
        options,
        Box::new(move |_cc| {
            let mut app = ProductionApp::new(cmd_tx, ui_rx, &settings);
            if let Some(issue) = startup_issue {
                app.report_error(issue);
            }
            Ok(Box::new(app))
        }),
    )
}
