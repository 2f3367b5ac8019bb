use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_NAME: &str = "gitup";

/// Per-repository config file, looked up at the working-copy root.
pub const PROJECT_CONFIG_FILENAME: &str = ".gitup.toml";

/// Return the gitup config directory (`~/.config/gitup/`).
///
/// The directory is not created; a missing global config simply means defaults.
pub fn config_dir() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .context("could not determine config directory")?
        .join(APP_NAME);
    Ok(path)
}
