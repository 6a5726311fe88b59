mod aggregate;
mod backup;
mod budgets;
mod db;
mod entry;
mod export;
mod models;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    init_logging(&data_dir)?;

    let db_path = get_db_path(&data_dir);
    tracing::info!(path = %db_path.display(), "opening database");
    let mut db = db::Database::open(&db_path)?;

    match args.len() {
        0 | 1 => run::as_tui(&mut db),
        _ => run::as_cli(&args, &mut db),
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finsavvy", "FinSavvy")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

/// `FINSAVVY_DB` wins over the data directory default.
fn get_db_path(data_dir: &Path) -> PathBuf {
    match std::env::var_os("FINSAVVY_DB") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir.join("finsavvy.db"),
    }
}

/// Appends to `finsavvy.log`. The terminal belongs to the TUI, so nothing
/// is written to stdout or stderr.
fn init_logging(data_dir: &Path) -> Result<()> {
    let log_path = data_dir.join("finsavvy.log");
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_env("FINSAVVY_LOG")
            .unwrap_or_else(|_| EnvFilter::new("finsavvy=info"));
        // A subscriber installed elsewhere keeps precedence
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
    Ok(())
}
