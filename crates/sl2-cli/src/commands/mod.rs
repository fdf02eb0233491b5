//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod dump;
pub mod hex_utils;
pub mod hexdump;
pub mod list;
pub mod patch;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sl2_core::{GameVariant, SaveContainer};

/// Read and load a save file, printing name warnings
pub fn open_save(game: GameVariant, input: &Path) -> Result<SaveContainer> {
    let raw = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let save = SaveContainer::load(game, raw)
        .with_context(|| format!("Failed to load {} as a {} save", input.display(), game))?;

    for warning in save.name_warnings() {
        eprintln!(
            "{} slot #{} [{}] has non-ASCII characters in its name; patching it may fail",
            "warning:".yellow().bold(),
            warning.slot,
            warning.character_name
        );
    }
    Ok(save)
}
