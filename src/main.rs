use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use penguin_dash::app::PenguinDashApp;
use penguin_dash::config::DashboardConfig;
use penguin_dash::data::{loader, sample};
use penguin_dash::session::Session;

/// Interactive Palmer Penguins dashboard.
#[derive(Debug, Parser)]
#[command(name = "penguin-dash", version, about)]
struct Cli {
    /// TOML configuration file (default: ./penguin-dash.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset to load (.csv, .json or .parquet); the built-in sample is
    /// used when omitted.
    #[arg(short, long, env = "PENGUIN_DASH_DATA")]
    data: Option<PathBuf>,
}

fn startup(cli: Cli) -> Result<(Session, DashboardConfig)> {
    let config = DashboardConfig::load(cli.config.as_deref())?.with_data_override(cli.data);

    let dataset = match &config.data_path {
        Some(path) => loader::load_file(path)?,
        None => {
            let dataset = sample::penguins();
            log::info!("Using built-in sample of {} penguins", dataset.len());
            dataset
        }
    };

    let session = Session::new(dataset, &config.defaults).context("invalid selection defaults")?;
    Ok((session, config))
}

fn main() -> eframe::Result {
    env_logger::init();

    let (session, config) = match startup(Cli::parse()) {
        Ok(ready) => ready,
        Err(e) => {
            log::error!("Startup failed: {e:#}");
            eprintln!("penguin-dash: {e:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_theme(egui::Theme::Light);
            Ok(Box::new(PenguinDashApp::new(session, config)))
        }),
    )
}
