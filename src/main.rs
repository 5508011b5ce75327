//! Pizzeria server binary
//!
//! ```sh
//! pizzeria --config pizzeria.yaml --bind 0.0.0.0:8080
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pizzeria::app::{Stores, server};
use pizzeria::config::AppConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pizzeria", version, about = "REST backend for pizzas and toppings")]
struct Args {
    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Socket address to listen on, overrides `server.bind`
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    tracing::info!(
        "Starting {} v{} ({:?} storage)",
        config.application_name,
        env!("CARGO_PKG_VERSION"),
        config.storage.backend
    );

    let stores = Stores::from_config(&config)
        .await
        .context("opening storage")?;
    server(&config, stores)
        .serve(&config.server.bind)
        .await
        .with_context(|| format!("serving on {}", config.server.bind))?;

    Ok(())
}
