//! Save container orchestration: load, slot discovery, patch and dump.

mod entry;
#[cfg(test)]
pub(crate) mod mock;
pub mod parser;

pub use entry::Entry;
pub use parser::{ContainerHeader, EntryHeader};

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::EntryCodec;
use crate::crypto::Checksum;
use crate::error::{Error, FormatError, Result};
use crate::patch::{FieldChange, patch_fields};
use crate::profile::GameVariant;
use crate::repack::splice;
use crate::slots::{SlotOccupancy, locate_slots};
use crate::text::is_printable_ascii;

/// Smallest progression value accepted by [`SaveContainer::patch`]
pub const MIN_VALUE: u32 = 1;
/// Largest progression value accepted by [`SaveContainer::patch`]
pub const MAX_VALUE: u32 = 999_999_999;

/// Which occupied slots a patch applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTarget {
    All,
    Slot(usize),
}

impl PatchTarget {
    pub fn includes(&self, slot: usize) -> bool {
        match self {
            PatchTarget::All => true,
            PatchTarget::Slot(s) => *s == slot,
        }
    }
}

impl From<Option<usize>> for PatchTarget {
    fn from(slot: Option<usize>) -> Self {
        slot.map_or(PatchTarget::All, PatchTarget::Slot)
    }
}

/// Character whose name cannot be located reliably inside its slot data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameWarning {
    pub slot: usize,
    pub character_name: String,
}

/// Result of patching one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPatch {
    pub slot: usize,
    pub character_name: String,
    pub fields: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub value: u32,
    pub slots: Vec<SlotPatch>,
}

/// A loaded BND4 save container.
///
/// Owns the file buffer; entries reference their bytes by range.
#[derive(Debug)]
pub struct SaveContainer {
    variant: GameVariant,
    raw: Vec<u8>,
    header: ContainerHeader,
    entries: Vec<Entry>,
    occupancy: SlotOccupancy,
    warnings: Vec<NameWarning>,
    codec: EntryCodec,
}

impl SaveContainer {
    pub fn load(variant: GameVariant, raw: Vec<u8>) -> Result<Self> {
        Self::load_with_codec(EntryCodec::new(variant), raw)
    }

    /// Load with a custom codec (e.g. a different cipher chain)
    pub fn load_with_codec(codec: EntryCodec, raw: Vec<u8>) -> Result<Self> {
        let variant = codec.variant();
        info!("Loading {} save ({} bytes)", variant.title(), raw.len());

        let (header, mut entries) = parser::parse(&raw, variant)?;
        let profile = variant.profile();
        if profile.directory_entry >= entries.len() {
            return Err(FormatError::MissingDirectoryEntry {
                index: profile.directory_entry,
                count: entries.len(),
            }
            .into());
        }

        // Ascending order: the directory entry must be decrypted before slot discovery
        for entry in entries.iter_mut() {
            let plaintext = codec.decrypt(entry, &raw[entry.body_range()])?;
            debug!(
                "Decrypted entry #{} [{}]: {} bytes",
                entry.index,
                entry.name,
                plaintext.len()
            );
            entry.set_plaintext(plaintext);
        }

        let directory = &entries[profile.directory_entry];
        let occupancy = locate_slots(
            &profile.slots,
            directory.index,
            directory.plaintext().unwrap_or_default(),
        )?;

        for (&slot, name) in &occupancy {
            let entry = entries
                .get_mut(slot)
                .ok_or(FormatError::MissingSlotEntry { slot })?;
            entry.set_character_name(name.clone());
            info!("Slot #{} is occupied by [{}]", slot, name);
        }

        let warnings = name_warnings(variant, &occupancy);
        for warning in &warnings {
            warn!(
                "Character name [{}] in slot #{} contains non-ASCII characters; patching it may fail",
                warning.character_name, warning.slot
            );
        }

        info!(
            "Loaded {} entries, {} occupied slot(s)",
            entries.len(),
            occupancy.len()
        );

        Ok(Self {
            variant,
            raw,
            header,
            entries,
            occupancy,
            warnings,
            codec,
        })
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(Error::EntryNotFound {
            index,
            count: self.entries.len(),
        })
    }

    /// Occupied slot number -> character name
    pub fn occupancy(&self) -> &SlotOccupancy {
        &self.occupancy
    }

    /// Occupied slots whose names contain non-ASCII characters
    pub fn name_warnings(&self) -> &[NameWarning] {
        &self.warnings
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    /// Decrypted payload of entry `index`.
    ///
    /// Entries re-encrypted by a previous patch are decrypted again from the buffer.
    pub fn decrypted(&self, index: usize) -> Result<Cow<'_, [u8]>> {
        let entry = self.entry(index)?;
        match entry.plaintext() {
            Some(plaintext) => Ok(Cow::Borrowed(plaintext)),
            None => Ok(Cow::Owned(
                self.codec.decrypt(entry, &self.raw[entry.body_range()])?,
            )),
        }
    }

    /// Raise the progression value of the targeted slots to at least `value`.
    ///
    /// Either every targeted slot is patched or the container is left untouched.
    pub fn patch(&mut self, target: PatchTarget, value: u32) -> Result<PatchReport> {
        if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
            return Err(Error::ValueOutOfRange {
                value,
                min: MIN_VALUE,
                max: MAX_VALUE,
            });
        }
        if let PatchTarget::Slot(slot) = target {
            if !self.occupancy.contains_key(&slot) {
                return Err(Error::SlotNotOccupied(slot));
            }
        }

        let mut buffer = self.raw.clone();
        let mut staged: Vec<(usize, Checksum)> = Vec::new();
        let mut report = PatchReport {
            value,
            slots: Vec::new(),
        };

        for entry in self
            .entries
            .iter()
            .filter(|e| e.occupied() && target.includes(e.index))
        {
            let character_name = entry.character_name().unwrap_or_default();
            info!(
                "Modifying entry #{} [{}]; setting value to {}",
                entry.index, character_name, value
            );

            let mut payload = self.decrypted(entry.index)?.into_owned();
            let fields = patch_fields(
                self.variant,
                entry.index,
                &mut payload,
                character_name,
                value,
            )?;

            let original_body = &self.raw[entry.body_range()];
            let body = self.codec.encrypt(entry, original_body, &payload)?;
            let digest = splice(&mut buffer, entry, &body)?;
            debug!("Entry #{} new checksum: {:02X?}", entry.index, digest);

            staged.push((entry.index, digest));
            report.slots.push(SlotPatch {
                slot: entry.index,
                character_name: character_name.to_string(),
                fields,
            });
        }

        self.raw = buffer;
        for (index, digest) in staged {
            let entry = &mut self.entries[index];
            entry.checksum = digest;
            entry.clear_plaintext();
        }

        info!("Patched {} slot(s)", report.slots.len());
        Ok(report)
    }

    /// Write every decrypted entry payload to `dir/<entry name>`.
    pub fn dump_decrypted(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let payload = self.decrypted(entry.index)?;
            let path = dir.join(dump_file_name(entry));
            fs::write(&path, &payload)?;
            debug!("Wrote entry #{} to {}", entry.index, path.display());
            written.push(path);
        }

        info!("Dumped {} entries to {}", written.len(), dir.display());
        Ok(written)
    }
}

fn name_warnings(variant: GameVariant, occupancy: &SlotOccupancy) -> Vec<NameWarning> {
    if !variant.uses_name_anchor() {
        return Vec::new();
    }
    occupancy
        .iter()
        .filter(|(_, name)| !is_printable_ascii(name))
        .map(|(&slot, name)| NameWarning {
            slot,
            character_name: name.clone(),
        })
        .collect()
}

fn dump_file_name(entry: &Entry) -> String {
    let name: String = entry
        .name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    if name.is_empty() || name == "." || name == ".." {
        format!("entry_{:03}", entry.index)
    } else {
        name
    }
}
