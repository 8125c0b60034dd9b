mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::OnsetViewerApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

/// Interactive viewer for APOE cohort onset analysis.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Clinical table to open at start-up (.csv, .tsv, .json or .parquet).
    path: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::default();
    if let Some(path) = &args.path {
        // A failed load is shown in the status bar; the viewer still opens.
        let _ = state.open_path(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "APOE Onset Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(OnsetViewerApp::new(state)))),
    )
}
