// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Multi-track audio annotation editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (default: $TONETRACK_CONFIG or ./tonetrack.yaml)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Audio id to request from the service on startup
    #[arg(long = "audio-id", value_name = "ID")]
    pub audio_id: Option<String>,

    /// Skip the automatic audio fetch on startup
    #[arg(long = "offline")]
    pub offline: bool,

    /// Annotation document (.json, .yaml) to load on startup
    #[arg(short = 'i', long = "import", value_name = "FILE")]
    pub import: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// Log level implied by the `-v` count.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
