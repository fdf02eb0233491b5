//! Splices re-encoded entries back into the container buffer.

use crate::container::Entry;
use crate::crypto::{Checksum, checksum};
use crate::error::{Error, FormatError, Result};
use crate::profile::layout::bnd4;

/// Write `checksum(body) || body` over the entry's region of `buffer`.
///
/// Entry sizes never change, so no other byte of the buffer (headers, other
/// entries, footer) is touched. Returns the new checksum.
pub fn splice(buffer: &mut [u8], entry: &Entry, body: &[u8]) -> Result<Checksum> {
    let expected = (entry.size as usize).saturating_sub(bnd4::CHECKSUM_LEN);
    if body.len() != expected {
        return Err(Error::SizeMismatch {
            index: entry.index,
            expected,
            actual: body.len(),
        });
    }

    let digest = checksum(body);
    let region = buffer
        .get_mut(entry.data_range())
        .ok_or(FormatError::EntryOutOfBounds { index: entry.index })?;
    region[..bnd4::CHECKSUM_LEN].copy_from_slice(&digest);
    region[bnd4::CHECKSUM_LEN..].copy_from_slice(body);
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::mock::MockContainerBuilder;
    use crate::container::parser::parse;
    use crate::profile::GameVariant;

    #[test]
    fn test_splice_only_touches_entry_region() {
        let raw = MockContainerBuilder::new(GameVariant::Er)
            .entry("USER_DATA000", vec![1; 40])
            .entry("USER_DATA001", vec![2; 40])
            .entry("USER_DATA002", vec![3; 40])
            .footer(vec![0xEE; 32])
            .build();
        let (_, entries) = parse(&raw, GameVariant::Er).unwrap();
        let target = &entries[1];

        let mut buffer = raw.clone();
        let digest = splice(&mut buffer, target, &[9; 40]).unwrap();

        let range = target.data_range();
        assert_eq!(&buffer[range.start..range.start + 16], &digest[..]);
        assert_eq!(digest, checksum(&[9; 40]));
        assert_ne!(digest, target.checksum);
        for i in (0..buffer.len()).filter(|i| !range.contains(i)) {
            assert_eq!(buffer[i], raw[i], "byte {i} changed");
        }
        assert_eq!(buffer.len(), raw.len());
    }

    #[test]
    fn test_splice_rejects_size_change() {
        let raw = MockContainerBuilder::new(GameVariant::Er)
            .entry("USER_DATA000", vec![1; 40])
            .build();
        let (_, entries) = parse(&raw, GameVariant::Er).unwrap();
        let mut buffer = raw.clone();

        let err = splice(&mut buffer, &entries[0], &[9; 41]).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                expected: 40,
                actual: 41,
                ..
            }
        ));
        assert_eq!(buffer, raw);
    }
}
