mod app;
mod config;
mod input;
mod term;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::File, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = config::Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_tracing(path)?;
    }
    app::run(args)
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
