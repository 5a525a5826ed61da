//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `fetch_proxy` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All proxy functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use fetch_proxy::config::Opt;
use fetch_proxy::initialization::{init_crypto_provider, init_logger_with};
use fetch_proxy::{run_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load FETCH_PROXY_* settings from .env if present
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config: Config = Opt::parse().into();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    // Needed before the first HTTPS upstream request
    init_crypto_provider();

    if let Err(e) = run_server(config).await {
        eprintln!("fetch_proxy error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
