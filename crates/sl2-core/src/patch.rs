//! Progression field location and the monotonic update policy.

use memchr::memmem;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::profile::{FieldLocation, GameVariant};
use crate::profile::layout::WORD;
use crate::text::encode_utf16_le;
use crate::utils::{read_u32_le, write_u32_le};

/// One progression field before and after patching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Offset inside the decrypted slot payload
    pub offset: usize,
    pub before: u32,
    pub after: u32,
}

impl FieldChange {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Find the progression field offsets of entry `index` inside its decrypted payload
pub fn locate_fields(
    variant: GameVariant,
    index: usize,
    payload: &[u8],
    character_name: &str,
) -> Result<Vec<usize>> {
    let candidates: Vec<isize> = match variant.profile().fields {
        FieldLocation::Fixed(offsets) => offsets.iter().map(|&o| o as isize).collect(),
        FieldLocation::BeforeName(distances) => {
            let name_pos = find_name(variant, index, payload, character_name)?;
            distances
                .iter()
                .map(|&d| name_pos as isize - d as isize)
                .collect()
        }
    };

    candidates
        .into_iter()
        .map(|offset| {
            if offset < 0 || offset as usize + WORD > payload.len() {
                return Err(Error::FieldOutOfRange {
                    index,
                    offset,
                    len: payload.len(),
                });
            }
            Ok(offset as usize)
        })
        .collect()
}

/// Raise every progression field of the slot to at least `value`.
///
/// Fields already above `value` are left untouched: one of them tracks a
/// lifetime total and must never decrease. The payload is only modified once
/// every field has been located.
pub fn patch_fields(
    variant: GameVariant,
    index: usize,
    payload: &mut [u8],
    character_name: &str,
    value: u32,
) -> Result<Vec<FieldChange>> {
    let offsets = locate_fields(variant, index, payload, character_name)?;

    let mut changes = Vec::with_capacity(offsets.len());
    for offset in offsets {
        // locate_fields has bounds-checked every offset
        let before = read_u32_le(payload, offset).unwrap_or_default();
        let after = before.max(value);
        write_u32_le(payload, offset, after);
        changes.push(FieldChange {
            offset,
            before,
            after,
        });
    }

    debug!("Entry #{} field changes: {:?}", index, changes);
    Ok(changes)
}

fn find_name(variant: GameVariant, index: usize, payload: &[u8], name: &str) -> Result<usize> {
    let needle = encode_utf16_le(name);
    let not_found = || Error::FieldNotFound {
        index,
        variant,
        name: name.to_string(),
    };
    if needle.is_empty() {
        return Err(not_found());
    }

    let pos = memmem::find(payload, &needle).ok_or_else(not_found)?;
    debug!("Name found in decrypted data of entry #{} at offset {}", index, pos);
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::layout::{ds2, ds3, dsr, er};

    fn payload_with_name(len: usize, name_pos: usize, name: &str) -> Vec<u8> {
        let mut payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let bytes = encode_utf16_le(name);
        payload[name_pos..name_pos + bytes.len()].copy_from_slice(&bytes);
        payload
    }

    #[test]
    fn test_fixed_offsets_dsr() {
        let mut payload = vec![0u8; 512];
        write_u32_le(&mut payload, dsr::SOULS[0], 100);
        write_u32_le(&mut payload, dsr::SOULS[1], 5_000);

        let changes = patch_fields(GameVariant::Dsr, 0, &mut payload, "ignored", 1_000).unwrap();
        assert_eq!(
            changes,
            vec![
                FieldChange {
                    offset: 224,
                    before: 100,
                    after: 1_000
                },
                FieldChange {
                    offset: 228,
                    before: 5_000,
                    after: 5_000
                },
            ]
        );
        assert_eq!(read_u32_le(&payload, 224), Some(1_000));
        assert_eq!(read_u32_le(&payload, 228), Some(5_000));
    }

    #[test]
    fn test_fixed_offsets_ds2_three_fields() {
        let mut payload = vec![0u8; 128];
        write_u32_le(&mut payload, ds2::SOULS[2], 2_000_000);
        let changes = patch_fields(GameVariant::Ds2, 1, &mut payload, "Bearer", 50).unwrap();

        let offsets: Vec<_> = changes.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![60, 64, 68]);
        assert_eq!(read_u32_le(&payload, 60), Some(50));
        assert_eq!(read_u32_le(&payload, 64), Some(50));
        assert_eq!(read_u32_le(&payload, 68), Some(2_000_000));
    }

    #[test]
    fn test_monotonic_never_decreases() {
        let mut payload = vec![0u8; 512];
        write_u32_le(&mut payload, 224, 700);
        write_u32_le(&mut payload, 228, 700);
        let before = payload.clone();

        let changes = patch_fields(GameVariant::Dsr, 0, &mut payload, "", 699).unwrap();
        assert!(changes.iter().all(|c| !c.changed()));
        assert_eq!(payload, before);
    }

    #[test]
    fn test_name_anchored_ds3_updates_only_two_fields() {
        let name_pos = 300;
        let mut payload = payload_with_name(1024, name_pos, "Hero");
        write_u32_le(&mut payload, name_pos - ds3::SOULS_BEFORE_NAME[0], 10);
        write_u32_le(&mut payload, name_pos - ds3::SOULS_BEFORE_NAME[1], 20);
        let original = payload.clone();

        let changes = patch_fields(GameVariant::Ds3, 0, &mut payload, "Hero", 999).unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(read_u32_le(&payload, 280), Some(999));
        assert_eq!(read_u32_le(&payload, 284), Some(999));

        let differing: Vec<usize> = (0..payload.len())
            .filter(|&i| payload[i] != original[i])
            .collect();
        assert!(differing.iter().all(|&i| (280..288).contains(&i)));
        assert!(!differing.is_empty());
    }

    #[test]
    fn test_name_anchored_er_uses_first_match() {
        let mut payload = payload_with_name(2048, 100, "Hero");
        let bytes = encode_utf16_le("Hero");
        payload[900..900 + bytes.len()].copy_from_slice(&bytes);

        let offsets = locate_fields(GameVariant::Er, 0, &payload, "Hero").unwrap();
        assert_eq!(
            offsets,
            vec![100 - er::RUNES_BEFORE_NAME[0], 100 - er::RUNES_BEFORE_NAME[1]]
        );
    }

    #[test]
    fn test_missing_name_is_field_not_found() {
        let mut payload = payload_with_name(512, 200, "Hero");
        let before = payload.clone();
        let err = patch_fields(GameVariant::Er, 3, &mut payload, "Villain", 5).unwrap_err();
        assert!(err.is_field_not_found());
        assert!(matches!(
            err,
            Error::FieldNotFound { index: 3, variant: GameVariant::Er, ref name } if name == "Villain"
        ));
        assert_eq!(payload, before);
    }

    #[test]
    fn test_empty_name_is_field_not_found() {
        let payload = vec![0u8; 64];
        let err = locate_fields(GameVariant::Ds3, 0, &payload, "").unwrap_err();
        assert!(err.is_field_not_found());
    }

    #[test]
    fn test_name_too_close_to_start() {
        let payload = payload_with_name(256, 10, "Hero");
        let err = locate_fields(GameVariant::Er, 0, &payload, "Hero").unwrap_err();
        assert!(matches!(err, Error::FieldOutOfRange { offset: -38, .. }));
    }

    #[test]
    fn test_fixed_offset_past_end() {
        let mut payload = vec![0u8; 226];
        let err = patch_fields(GameVariant::Dsr, 0, &mut payload, "", 1).unwrap_err();
        assert!(matches!(err, Error::FieldOutOfRange { offset: 224, len: 226, .. }));
        assert!(payload.iter().all(|&b| b == 0));
    }
}
