//! Slot discovery from the decrypted directory entry.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::FormatError;
use crate::profile::SlotLayout;
use crate::profile::layout::SLOT_COUNT;
use crate::text::decode_utf16_until_nul;

/// Occupied slot number -> character name.
///
/// The slot number is also the index of the entry holding that slot's data.
pub type SlotOccupancy = BTreeMap<usize, String>;

/// One character found in the directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotInfo {
    pub slot: usize,
    pub character_name: String,
}

/// Read slot occupancy from the decrypted payload of the directory entry.
///
/// `directory_index` is only used for error context.
pub fn locate_slots(
    layout: &SlotLayout,
    directory_index: usize,
    directory: &[u8],
) -> Result<SlotOccupancy, FormatError> {
    let occupancy = match *layout {
        SlotLayout::Unified {
            occupancy,
            slot_data,
            slot_length,
            name_max_len,
        } => {
            let flags = read_region(directory, directory_index, occupancy, SLOT_COUNT)?;
            let mut slots = SlotOccupancy::new();
            for (i, _) in flags.iter().enumerate().filter(|(_, flag)| **flag != 0) {
                let name_offset = slot_data + slot_length * i;
                let name = read_region(directory, directory_index, name_offset, name_max_len * 2)?;
                slots.insert(i, decode_utf16_until_nul(name));
            }
            slots
        }
        SlotLayout::Legacy {
            occupancy,
            name,
            stride,
            name_max_len,
        } => {
            let mut slots = SlotOccupancy::new();
            for i in 0..SLOT_COUNT {
                let flag = read_region(directory, directory_index, occupancy + stride * i, 1)?;
                if flag[0] == 0 {
                    continue;
                }
                let name_bytes =
                    read_region(directory, directory_index, name + stride * i, name_max_len * 2)?;
                // Slots in this layout are numbered from 1
                slots.insert(i + 1, decode_utf16_until_nul(name_bytes));
            }
            slots
        }
    };

    debug!("Slot occupancy: {:?}", occupancy);
    Ok(occupancy)
}

/// Flatten an occupancy map for display or serialization
pub fn slot_list(occupancy: &SlotOccupancy) -> Vec<SlotInfo> {
    occupancy
        .iter()
        .map(|(slot, name)| SlotInfo {
            slot: *slot,
            character_name: name.clone(),
        })
        .collect()
}

fn read_region(
    data: &[u8],
    index: usize,
    offset: usize,
    len: usize,
) -> Result<&[u8], FormatError> {
    data.get(offset..offset + len)
        .ok_or(FormatError::DirectoryTooShort {
            index,
            needed: offset + len,
            available: data.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::GameVariant;
    use crate::profile::layout::{ds2, dsr, er};
    use crate::text::encode_utf16_le;

    fn put_name(data: &mut [u8], offset: usize, name: &str) {
        let bytes = encode_utf16_le(name);
        data[offset..offset + bytes.len()].copy_from_slice(&bytes);
    }

    #[test]
    fn test_unified_slots() {
        let mut directory = vec![0u8; 4096];
        directory[dsr::OCCUPANCY..dsr::OCCUPANCY + 10]
            .copy_from_slice(&[1, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
        put_name(&mut directory, dsr::SLOT_DATA, "AAA");
        put_name(&mut directory, dsr::SLOT_DATA + dsr::SLOT_LENGTH, "BBB");
        put_name(&mut directory, dsr::SLOT_DATA + dsr::SLOT_LENGTH * 2, "CCC");

        let slots = locate_slots(&GameVariant::Dsr.profile().slots, 10, &directory).unwrap();
        assert_eq!(
            slots,
            SlotOccupancy::from([(0, "AAA".to_string()), (2, "CCC".to_string())])
        );
    }

    #[test]
    fn test_unified_name_truncated_at_max_len() {
        let mut directory = vec![0u8; 4096];
        directory[dsr::OCCUPANCY] = 1;
        put_name(&mut directory, dsr::SLOT_DATA, "ABCDEFGHIJKLMNOP");

        let slots = locate_slots(&GameVariant::Dsr.profile().slots, 10, &directory).unwrap();
        assert_eq!(slots[&0], "ABCDEFGHIJKLM");
    }

    #[test]
    fn test_unified_any_nonzero_flag_is_occupied() {
        let mut directory = vec![0u8; er::SLOT_DATA + er::SLOT_LENGTH * 10];
        directory[er::OCCUPANCY + 9] = 0x7F;
        put_name(&mut directory, er::SLOT_DATA + er::SLOT_LENGTH * 9, "Tarnished");

        let slots = locate_slots(&GameVariant::Er.profile().slots, 10, &directory).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[&9], "Tarnished");
    }

    #[test]
    fn test_legacy_slots_are_one_based() {
        let mut directory = vec![0u8; ds2::NAME + ds2::SLOT_STRIDE * 10];
        directory[ds2::OCCUPANCY] = 1;
        directory[ds2::OCCUPANCY + ds2::SLOT_STRIDE * 3] = 1;
        put_name(&mut directory, ds2::NAME, "Bearer");
        put_name(&mut directory, ds2::NAME + ds2::SLOT_STRIDE * 3, "Lucatiel");

        let slots = locate_slots(&GameVariant::Ds2.profile().slots, 0, &directory).unwrap();
        assert_eq!(
            slots,
            SlotOccupancy::from([(1, "Bearer".to_string()), (4, "Lucatiel".to_string())])
        );
    }

    #[test]
    fn test_empty_directory_has_no_slots() {
        let directory = vec![0u8; 8192];
        let slots = locate_slots(&GameVariant::Ds3.profile().slots, 10, &directory).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_short_directory_is_rejected() {
        let directory = vec![0u8; 100];
        let err = locate_slots(&GameVariant::Dsr.profile().slots, 10, &directory).unwrap_err();
        assert_eq!(
            err,
            FormatError::DirectoryTooShort {
                index: 10,
                needed: dsr::OCCUPANCY + 10,
                available: 100,
            }
        );
    }

    #[test]
    fn test_slot_list() {
        let occupancy = SlotOccupancy::from([(2, "CCC".to_string()), (0, "AAA".to_string())]);
        let list = slot_list(&occupancy);
        assert_eq!(list[0].slot, 0);
        assert_eq!(list[1].character_name, "CCC");
    }
}
