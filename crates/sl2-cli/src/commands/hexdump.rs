//! Hexdump command implementation.
//!
//! Displays decrypted entry bytes in traditional hexdump format, useful for
//! locating fields inside slot data.

use std::path::Path;

use anyhow::{Result, bail};
use sl2_core::GameVariant;

use super::hex_utils::format_hexdump;

/// Run the hexdump command
pub fn run(
    game: GameVariant,
    input: &Path,
    entry: usize,
    offset: usize,
    size: usize,
    ascii: bool,
) -> Result<()> {
    let save = super::open_save(game, input)?;
    let payload = save.decrypted(entry)?;
    let name = &save.entry(entry)?.name;

    if offset >= payload.len() && !payload.is_empty() {
        bail!(
            "Offset 0x{:X} is past the end of entry #{} ({} bytes)",
            offset,
            entry,
            payload.len()
        );
    }
    let end = offset.saturating_add(size).min(payload.len());
    let bytes = payload.get(offset..end).unwrap_or_default();

    println!(
        "Hexdump of entry #{} [{}] at 0x{:X} ({} of {} bytes):",
        entry,
        name,
        offset,
        bytes.len(),
        payload.len()
    );
    println!();
    for line in format_hexdump(bytes, offset, ascii) {
        println!("{}", line);
    }
    Ok(())
}
