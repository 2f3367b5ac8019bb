use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::paths;

// --- Config file structs ---

/// Contents of either config file: the global `~/.config/gitup/config.toml`
/// or the project `.gitup.toml` at the working-copy root.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub sync: Option<SyncConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    pub remote: Option<String>,
    pub rebase: Option<bool>,
    pub prune: Option<bool>,
    pub confirm: Option<bool>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    pub color: Option<bool>,
}

/// Read and parse an optional TOML config file.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns an error if the file exists but cannot be read or contains invalid TOML.
fn load_optional_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(None);
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("failed to read config file: {}", path.display())));
        }
    };
    let config: T = toml::from_str(&contents)
        .with_context(|| format!("invalid TOML in config file: {}", path.display()))?;
    Ok(Some(config))
}

// --- Resolved config ---

/// Flags given on the command line. Boolean switches can only turn a setting
/// on, so `false` means "not given" and falls through to the files.
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub remote: Option<String>,
    pub rebase: bool,
    pub prune: bool,
    pub confirm: bool,
    pub no_color: bool,
}

#[derive(Debug, PartialEq)]
pub struct ResolvedConfig {
    /// Remote to use when the repository has several.
    pub remote: Option<String>,
    pub rebase: bool,
    pub prune: bool,
    pub confirm: bool,
    pub exclude: Vec<String>,
    pub color: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            remote: None,
            rebase: false,
            prune: false,
            confirm: false,
            exclude: Vec::new(),
            color: true,
        }
    }
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

/// Resolve configuration by merging: CLI flags → project → global → defaults.
///
/// Each field is taken from the first layer that sets it. `exclude` lists are
/// not concatenated; the project list replaces the global one.
pub fn resolve_config(
    cli: Option<&CliConfigOverrides>,
    project: Option<&FileConfig>,
    global: &FileConfig,
) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let p_sync = project.and_then(|p| p.sync.as_ref());
    let p_ui = project.and_then(|p| p.ui.as_ref());
    let g_sync = global.sync.as_ref();
    let g_ui = global.ui.as_ref();

    let sync_bool = |cli_value: Option<bool>, pick: fn(&SyncConfig) -> Option<bool>, default: bool| {
        cli_value
            .or_else(|| p_sync.and_then(pick))
            .or_else(|| g_sync.and_then(pick))
            .unwrap_or(default)
    };

    ResolvedConfig {
        remote: cli
            .and_then(|c| c.remote.clone())
            .or_else(|| p_sync.and_then(|s| s.remote.clone()))
            .or_else(|| g_sync.and_then(|s| s.remote.clone())),
        rebase: sync_bool(cli.and_then(|c| flag(c.rebase)), |s| s.rebase, defaults.rebase),
        prune: sync_bool(cli.and_then(|c| flag(c.prune)), |s| s.prune, defaults.prune),
        confirm: sync_bool(cli.and_then(|c| flag(c.confirm)), |s| s.confirm, defaults.confirm),
        exclude: p_sync
            .and_then(|s| s.exclude.clone())
            .or_else(|| g_sync.and_then(|s| s.exclude.clone()))
            .unwrap_or(defaults.exclude),
        color: cli
            .and_then(|c| c.no_color.then_some(false))
            .or_else(|| p_ui.and_then(|u| u.color))
            .or_else(|| g_ui.and_then(|u| u.color))
            .unwrap_or(defaults.color),
    }
}

/// Load project config from the working-copy root.
///
/// Returns `Ok(None)` if `.gitup.toml` does not exist.
pub fn load_project_config(repo_root: &Path) -> Result<Option<FileConfig>> {
    load_optional_toml(&repo_root.join(paths::PROJECT_CONFIG_FILENAME))
}

/// Load global config from a specific file path.
///
/// Returns `FileConfig::default()` if the file does not exist.
pub fn load_global_config_from(path: &Path) -> Result<FileConfig> {
    load_optional_toml(path).map(|opt| opt.unwrap_or_default())
}

/// Return the path to the global config file (`~/.config/gitup/config.toml`).
pub fn global_config_path() -> Result<PathBuf> {
    Ok(paths::config_dir()?.join("config.toml"))
}

/// Load global config from the XDG config directory. Returns defaults if the
/// file does not exist.
pub fn load_global_config() -> Result<FileConfig> {
    let path = global_config_path()?;
    load_global_config_from(&path)
}
