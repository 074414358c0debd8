//! Native runtime: file-backed storage, log setup and platform paths.

pub mod logging;
pub mod storage;

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the persisted lists. `override_dir` comes from `--data-dir`.
pub fn get_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let data_dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => directories::ProjectDirs::from("com", "reelshelf", "reelshelf")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .data_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub fn get_log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}
