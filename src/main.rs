mod app;
mod config;
mod dataset;
mod graph;
mod layout;
mod spatial;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use log::info;

use crate::config::EngineConfig;
use crate::dataset::JsonFileSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// People/relationship dataset, as JSON.
    #[arg(long, default_value = "data/sample_network.json")]
    data: PathBuf,
    #[arg(long, default_value_t = 220)]
    layout_iterations: usize,
    #[arg(long, default_value_t = 1440.0)]
    width: f32,
    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("loading relationship graph from {}", args.data.display());

    let config = EngineConfig {
        layout_iterations: args.layout_iterations,
        ..EngineConfig::default()
    };
    let source = Arc::new(JsonFileSource::new(args.data));
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "relgraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::RelGraphApp::new(cc, source, config)))),
    )
}
