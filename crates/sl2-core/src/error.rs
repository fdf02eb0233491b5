use thiserror::Error;

use crate::crypto::CipherError;
use crate::profile::GameVariant;

/// Structural problems with the BND4 container itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("File does not start with \"BND4\" (found {found:02X?})")]
    InvalidMagic { found: Vec<u8> },

    #[error("Truncated container: need {needed} bytes for {what}, have {available}")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Entry header #{index} does not match expected magic value")]
    InvalidEntryMagic { index: usize },

    #[error("Entry #{index} points outside the file")]
    EntryOutOfBounds { index: usize },

    #[error("Entry #{index} is too small ({size} bytes)")]
    EntryTooSmall { index: usize, size: u32 },

    #[error("Directory entry #{index} is missing (container has {count} entries)")]
    MissingDirectoryEntry { index: usize, count: usize },

    #[error("Directory entry #{index} is too short: need {needed} bytes, have {available}")]
    DirectoryTooShort {
        index: usize,
        needed: usize,
        available: usize,
    },

    #[error("Slot #{slot} is marked occupied but the container has no entry #{slot}")]
    MissingSlotEntry { slot: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Unsupported game type: {0} (expected one of dsr, ds2, ds3, er)")]
    UnsupportedVariant(String),

    #[error("Failed to process entry #{index} ({variant}): {primary}; fallback also failed: {fallback}")]
    Crypto {
        index: usize,
        variant: GameVariant,
        primary: CipherError,
        fallback: CipherError,
    },

    #[error(
        "Entry #{index} ({variant}) declares {declared} payload bytes but only {available} were decrypted"
    )]
    LengthPrefix {
        index: usize,
        variant: GameVariant,
        declared: usize,
        available: usize,
    },

    #[error("Failed to find character name ({name}) in entry #{index} ({variant})")]
    FieldNotFound {
        index: usize,
        variant: GameVariant,
        name: String,
    },

    #[error("Field at offset {offset} lies outside entry #{index} ({len} bytes)")]
    FieldOutOfRange {
        index: usize,
        offset: isize,
        len: usize,
    },

    #[error("Entry #{index} would change size: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Entry #{index} does not exist (container has {count} entries)")]
    EntryNotFound { index: usize, count: usize },

    #[error("Slot #{0} does not appear to be occupied")]
    SlotNotOccupied(usize),

    #[error("Value {value} is out of range ({min}..={max})")]
    ValueOutOfRange { value: u32, min: u32, max: u32 },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error comes from the name-anchored field search
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, Error::FieldNotFound { .. })
    }

    /// Check if this error means the entry could not be decrypted or encrypted
    pub fn is_crypto(&self) -> bool {
        matches!(self, Error::Crypto { .. } | Error::LengthPrefix { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_field_not_found() {
        let err = Error::FieldNotFound {
            index: 3,
            variant: GameVariant::Ds3,
            name: "Hero".to_string(),
        };
        assert!(err.is_field_not_found());
        assert!(!err.is_crypto());
        assert!(err.to_string().contains("Hero"));
    }

    #[test]
    fn test_error_is_crypto() {
        let err = Error::Crypto {
            index: 1,
            variant: GameVariant::Ds2,
            primary: CipherError::Misaligned { len: 17 },
            fallback: CipherError::Misaligned { len: 17 },
        };
        assert!(err.is_crypto());
        assert!(err.to_string().contains("#1"));
        assert!(err.to_string().contains("ds2"));
    }

    #[test]
    fn test_format_error_converts() {
        let err: Error = FormatError::InvalidEntryMagic { index: 4 }.into();
        assert!(err.is_format());
        assert_eq!(
            err.to_string(),
            "Entry header #4 does not match expected magic value"
        );
    }
}
