//! Config file discovery and CLI/config merging.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use sl2_core::{EditorConfig, GameVariant};
use tracing::{debug, warn};

fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
    Ok(config_dir.join("sl2edit").join("config.toml"))
}

/// Load the editor config, falling back to defaults when it is missing or invalid
pub fn load(explicit: Option<&Path>) -> EditorConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            _ => return EditorConfig::default(),
        },
    };

    match EditorConfig::load(&path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!(
                "Failed to load config {}: {}, using defaults",
                path.display(),
                e
            );
            EditorConfig::default()
        }
    }
}

pub fn resolve_game(flag: Option<GameVariant>, config: &EditorConfig) -> Result<GameVariant> {
    match flag.or(config.game) {
        Some(game) => Ok(game),
        None => bail!("No game selected: pass --game (dsr, ds2, ds3, er) or set `game` in the config file"),
    }
}

pub fn resolve_dump_dir(arg: Option<PathBuf>, config: &EditorConfig) -> Result<PathBuf> {
    arg.or_else(|| config.dump_dir.clone())
        .context("No output directory: pass DIR or set `dump_dir` in the config file")
}
