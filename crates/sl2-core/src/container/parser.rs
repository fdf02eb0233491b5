//! BND4 header and entry table parsing.

use tracing::debug;

use crate::crypto::{Checksum, Iv};
use crate::error::FormatError;
use crate::profile::GameVariant;
use crate::profile::layout::bnd4;
use crate::text::decode_utf16_until_nul;
use crate::utils::read_u32_le;

use super::Entry;

/// Fixed BND4 header fields the editor relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub entry_count: usize,
    /// Informational; entry names are always decoded as UTF-16
    pub unicode: bool,
}

/// Raw fields of one 32-byte entry header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    pub size: u32,
    pub data_offset: u32,
    pub name_offset: u32,
    pub footer_length: u32,
}

/// Validate the container header and decode every entry header.
///
/// The buffer is only read. Each returned entry still has to be decrypted.
pub fn parse(
    raw: &[u8],
    variant: GameVariant,
) -> Result<(ContainerHeader, Vec<Entry>), FormatError> {
    let header = parse_header(raw)?;
    debug!(
        "BND4 header matched: {} entries, unicode: {}",
        header.entry_count, header.unicode
    );

    let min_size = if variant.is_encrypted() {
        bnd4::CHECKSUM_LEN + bnd4::IV_LEN
    } else {
        bnd4::CHECKSUM_LEN
    };

    // The count is untrusted until every entry header has been read
    let mut entries =
        Vec::with_capacity(header.entry_count.min(raw.len() / bnd4::ENTRY_HEADER_LEN));
    for index in 0..header.entry_count {
        let entry_header = parse_entry_header(raw, index)?;
        let entry = build_entry(raw, index, entry_header, min_size, variant.is_encrypted())?;

        debug!(
            "Entry #{}: name=[{}], size={}, data_offset={}, name_offset={}, footer_length={}",
            index,
            entry.name,
            entry.size,
            entry.data_offset,
            entry.name_offset,
            entry.footer_length
        );
        entries.push(entry);
    }

    Ok((header, entries))
}

pub fn parse_header(raw: &[u8]) -> Result<ContainerHeader, FormatError> {
    if raw.len() < bnd4::HEADER_LEN {
        return Err(FormatError::Truncated {
            what: "BND4 header",
            needed: bnd4::HEADER_LEN,
            available: raw.len(),
        });
    }

    if &raw[..4] != bnd4::MAGIC {
        return Err(FormatError::InvalidMagic {
            found: raw[..4].to_vec(),
        });
    }

    let entry_count = read_u32_le(raw, bnd4::ENTRY_COUNT).unwrap_or_default() as usize;
    let unicode = raw[bnd4::UNICODE_FLAG] == 1;

    Ok(ContainerHeader {
        entry_count,
        unicode,
    })
}

pub fn parse_entry_header(raw: &[u8], index: usize) -> Result<EntryHeader, FormatError> {
    let pos = bnd4::HEADER_LEN + bnd4::ENTRY_HEADER_LEN * index;
    let header = raw
        .get(pos..pos + bnd4::ENTRY_HEADER_LEN)
        .ok_or(FormatError::Truncated {
            what: "entry header",
            needed: pos + bnd4::ENTRY_HEADER_LEN,
            available: raw.len(),
        })?;

    if header[..8] != bnd4::ENTRY_MAGIC {
        return Err(FormatError::InvalidEntryMagic { index });
    }

    // The header slice is exactly ENTRY_HEADER_LEN bytes, so every field fits
    let field = |offset| read_u32_le(header, offset).unwrap_or_default();
    Ok(EntryHeader {
        size: field(bnd4::ENTRY_SIZE),
        data_offset: field(bnd4::ENTRY_DATA_OFFSET),
        name_offset: field(bnd4::ENTRY_NAME_OFFSET),
        footer_length: field(bnd4::ENTRY_FOOTER_LENGTH),
    })
}

fn build_entry(
    raw: &[u8],
    index: usize,
    header: EntryHeader,
    min_size: usize,
    encrypted: bool,
) -> Result<Entry, FormatError> {
    if (header.size as usize) < min_size {
        return Err(FormatError::EntryTooSmall {
            index,
            size: header.size,
        });
    }

    let data_start = header.data_offset as usize;
    let data = data_start
        .checked_add(header.size as usize)
        .and_then(|end| raw.get(data_start..end))
        .ok_or(FormatError::EntryOutOfBounds { index })?;

    let name_start = header.name_offset as usize;
    let name_bytes = name_start
        .checked_add(bnd4::ENTRY_NAME_LEN)
        .and_then(|end| raw.get(name_start..end))
        .ok_or(FormatError::EntryOutOfBounds { index })?;
    let name = decode_utf16_until_nul(name_bytes);

    let mut checksum: Checksum = [0; 16];
    checksum.copy_from_slice(&data[..bnd4::CHECKSUM_LEN]);

    let iv = if encrypted {
        let mut iv: Iv = [0; 16];
        iv.copy_from_slice(&data[bnd4::CHECKSUM_LEN..bnd4::CHECKSUM_LEN + bnd4::IV_LEN]);
        Some(iv)
    } else {
        None
    };

    Ok(Entry::new(index, header, name, checksum, iv))
}
