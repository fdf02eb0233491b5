//! Dump command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use sl2_core::GameVariant;

/// Run the dump command
pub fn run(game: GameVariant, input: &Path, dir: &Path) -> Result<()> {
    let save = super::open_save(game, input)?;
    let written = save
        .dump_decrypted(dir)
        .with_context(|| format!("Failed to dump entries to {}", dir.display()))?;

    for (entry, path) in save.entries().iter().zip(&written) {
        let slot = entry
            .character_name()
            .map(|name| format!(" [{}]", name))
            .unwrap_or_default();
        println!("  #{:<2} {}{}", entry.index, path.display(), slot);
    }
    println!("Dumped {} entries to: {}", written.len(), dir.display());
    Ok(())
}
