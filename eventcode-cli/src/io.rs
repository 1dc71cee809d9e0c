//! File I/O for native CLI

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension given to save paths typed without one
pub const DEFAULT_EXTENSION: &str = "csv";

/// Load a transcript text file
pub fn load_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))
}

/// Get the ~/.eventcode directory path, creating it if needed
pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let app_dir = home.join(".eventcode");
    ensure_dir(&app_dir)?;
    Ok(app_dir)
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

/// Suggested save path for a transcript coded at `now`
pub fn default_export_path(export_dir: &Path, now: DateTime<Local>) -> PathBuf {
    export_dir.join(format!(
        "transcript-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        DEFAULT_EXTENSION
    ))
}

/// Turn the typed save path into a destination.
///
/// Empty input cancels the save. A leading `~/` expands to the home
/// directory and a missing extension becomes `.csv`.
pub fn resolve_destination(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut path = match input.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    };

    if path.extension().is_none() {
        path.set_extension(DEFAULT_EXTENSION);
    }
    Some(path)
}
