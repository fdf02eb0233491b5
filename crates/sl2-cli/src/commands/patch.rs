//! Patch command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use sl2_core::{GameVariant, PatchReport, PatchTarget};

/// Run the patch command
pub fn run(
    game: GameVariant,
    input: &Path,
    output: &Path,
    value: u32,
    target: PatchTarget,
) -> Result<()> {
    if same_file(input, output) {
        bail!(
            "Output {} is the input file; choose a different output path",
            output.display()
        );
    }

    let mut save = super::open_save(game, input)?;
    if save.occupancy().is_empty() {
        bail!("No occupied slots in {}", input.display());
    }

    let report = save.patch(target, value)?;

    // Only reached when every targeted slot was patched
    fs::write(output, save.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_report(&report);
    println!("Wrote modified save to: {}", output.display());
    Ok(())
}

fn print_report(report: &PatchReport) {
    for slot in &report.slots {
        println!("Slot #{} [{}]", slot.slot, slot.character_name.bold());
        for field in &slot.fields {
            if field.changed() {
                println!(
                    "  0x{:04X}: {} -> {}",
                    field.offset,
                    field.before,
                    field.after.green()
                );
            } else {
                println!(
                    "  0x{:04X}: {} (kept, already >= {})",
                    field.offset,
                    field.before.dimmed(),
                    report.value
                );
            }
        }
    }
}

/// Check whether two paths refer to the same file
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
