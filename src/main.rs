// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! TONETRACK - multi-track audio annotation editor
//!
//! A cross-platform desktop application for annotating audio clips with
//! time-ranged transcriptions, transliterations, translations and tone
//! tags on parallel timeline tracks.

mod app;
mod cli;
mod config;
mod constants;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::TonetrackApp;
use clap::Parser;
use cli::Args;
use config::EditorConfig;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let config = EditorConfig::load(args.config.as_deref())?;
    log::info!("Using service at {}", config.api_base_url);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("TONETRACK - Audio Annotation Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "TONETRACK",
        options,
        Box::new(move |_cc| Ok(Box::new(TonetrackApp::new(config, &args)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
