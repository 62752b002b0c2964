mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use eframe::egui;

use app::ClimateFolioApp;
use climate_folio::config::AppConfig;
use state::AppState;

/// Portfolio with a monthly temperature statistics dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset to load on start-up (overrides `[data].path`)
    #[arg(short, long)]
    data: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(path) = args.data {
        config.data.path = path;
    }

    let mut state = AppState::new(config);
    state.load_configured();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Folio – Temperature Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(ClimateFolioApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
