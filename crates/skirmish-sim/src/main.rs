//! # Skirmish Sim
//!
//! Headless sandbox host for the Skirmish gameplay behaviours.
//!
//! Builds a small level from `skirmish.toml` (or the path given as the first
//! argument), runs the enemy AI, player manager and HUD for a fixed number of
//! frames and prints a JSON report.
//!
//! `skirmish-sim --init [path]` writes the built-in level to `path`
//! (default `skirmish.toml`) as a starting point for editing.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod scene;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{SimConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("skirmish=info".parse()?))
        .init();

    info!("Skirmish sandbox starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let config = match args.next().as_deref() {
        Some("--init") => {
            let path = args.next().unwrap_or_else(|| CONFIG_FILE.to_string());
            SimConfig::default().save_to(path)?;
            return Ok(());
        },
        Some(path) => SimConfig::load_from(path),
        None => SimConfig::load(),
    };

    let report = app::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Skirmish sandbox finished");
    Ok(())
}
