// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PlantVision API server
//!
//! Serves the local JSON API that camera and dashboard front ends call.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use plantvision::{AppConfig, PlantVision};

#[derive(Parser, Debug)]
#[command(name = "plantvision-web")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "PlantVision local API server")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "plantvision.json")]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("PlantVision API v1.0.0");

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading config from {:?}", args.config))?;

    if let Some(host) = args.host {
        config.web.host = host;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }

    let app = PlantVision::from_config(config).context("initializing services")?;
    info!(
        "History: {:?} backend at {}",
        app.config.storage.backend, app.config.storage.path
    );

    plantvision::web::start_server(app)
        .await
        .context("API server stopped")
}
