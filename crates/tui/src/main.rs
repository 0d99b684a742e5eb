mod app;
mod export;
mod gesture;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use staffboard_core::config::{self, AppConfig};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;

    let sheet = std::env::args_os().nth(1).map(PathBuf::from);
    let mut app = app::StaffboardApp::new(config);
    app.bootstrap(sheet);
    app.run().await
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("staffboard.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal UI owns stdout, so only the file layer is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
