//! List command implementation.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use sl2_core::{GameVariant, NameWarning, SaveContainer, SlotInfo, slot_list};

#[derive(Serialize)]
struct Listing<'a> {
    game: GameVariant,
    entries: usize,
    slots: Vec<SlotInfo>,
    warnings: &'a [NameWarning],
}

fn listing(save: &SaveContainer) -> Listing<'_> {
    Listing {
        game: save.variant(),
        entries: save.entries().len(),
        slots: slot_list(save.occupancy()),
        warnings: save.name_warnings(),
    }
}

/// Run the list command
pub fn run(game: GameVariant, input: &Path, json: bool) -> Result<()> {
    let save = super::open_save(game, input)?;
    let listing = listing(&save);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{} - {} ({} entries)",
        input.display(),
        game.title().bold(),
        listing.entries
    );
    if listing.slots.is_empty() {
        println!("  No occupied slots");
        return Ok(());
    }

    for slot in &listing.slots {
        let flagged = listing.warnings.iter().any(|w| w.slot == slot.slot);
        if flagged {
            println!("  #{:<2} {}", slot.slot, slot.character_name.yellow());
        } else {
            println!("  #{:<2} {}", slot.slot, slot.character_name.green());
        }
    }
    Ok(())
}
