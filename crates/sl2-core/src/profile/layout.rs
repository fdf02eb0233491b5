//! Layout constants for the supported SL2 containers
//!
//! This module centralizes every offset used to locate slot occupancy,
//! character names and progression fields inside decrypted entries.
//! Constants are organized by game.

/// Number of character slots in every supported game
pub const SLOT_COUNT: usize = 10;

/// Word size (4 bytes / 32-bit integer)
pub const WORD: usize = 4;

/// Dark Souls Remastered
pub mod dsr {
    pub const KEY: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];

    pub const DIRECTORY_ENTRY: usize = 10;
    pub const OCCUPANCY: usize = 176;
    pub const SLOT_DATA: usize = 192;
    pub const SLOT_LENGTH: usize = 400;
    pub const NAME_MAX_LEN: usize = 13;

    /// Souls held and its adjacent copy
    pub const SOULS: [usize; 2] = [224, 228];
}

/// Dark Souls II: Scholar of the First Sin
pub mod ds2 {
    pub const KEY: [u8; 16] = [
        0x59, 0x9F, 0x9B, 0x69, 0x96, 0x40, 0xA5, 0x52, 0x36, 0xEE, 0x2D, 0x70, 0x83, 0x5E, 0xC7,
        0x44,
    ];

    pub const DIRECTORY_ENTRY: usize = 0;
    pub const OCCUPANCY: usize = 892;
    pub const NAME: usize = 1286;
    /// Distance between consecutive slot records in the directory entry
    pub const SLOT_STRIDE: usize = 496;
    pub const NAME_MAX_LEN: usize = 14;

    /// Souls held, plus two adjacent counters (one of them is soul memory)
    pub const SOULS: [usize; 3] = [60, 64, 68];
}

/// Dark Souls III
pub mod ds3 {
    pub const KEY: [u8; 16] = [
        0xFD, 0x46, 0x4D, 0x69, 0x5E, 0x69, 0xA3, 0x9A, 0x10, 0xE3, 0x19, 0xA7, 0xAC, 0xE8, 0xB7,
        0xFA,
    ];

    pub const DIRECTORY_ENTRY: usize = 10;
    pub const OCCUPANCY: usize = 4244;
    pub const SLOT_DATA: usize = 4254;
    pub const SLOT_LENGTH: usize = 554;
    pub const NAME_MAX_LEN: usize = 16;

    /// Distance of the souls fields before the first occurrence of the name
    pub const SOULS_BEFORE_NAME: [usize; 2] = [20, 16];
}

/// Elden Ring (unencrypted)
pub mod er {
    pub const DIRECTORY_ENTRY: usize = 10;
    pub const OCCUPANCY: usize = 6484;
    pub const SLOT_DATA: usize = 6494;
    pub const SLOT_LENGTH: usize = 588;
    pub const NAME_MAX_LEN: usize = 16;

    /// Distance of the runes fields before the first occurrence of the name
    pub const RUNES_BEFORE_NAME: [usize; 2] = [48, 44];
}

/// BND4 container framing
pub mod bnd4 {
    pub const MAGIC: &[u8; 4] = b"BND4";
    pub const HEADER_LEN: usize = 64;
    pub const ENTRY_COUNT: usize = 12;
    pub const UNICODE_FLAG: usize = 48;

    pub const ENTRY_HEADER_LEN: usize = 32;
    pub const ENTRY_MAGIC: [u8; 8] = [0x50, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
    pub const ENTRY_SIZE: usize = 8;
    pub const ENTRY_DATA_OFFSET: usize = 16;
    pub const ENTRY_NAME_OFFSET: usize = 20;
    pub const ENTRY_FOOTER_LENGTH: usize = 24;

    /// Entry names are stored as 12 UTF-16 code units
    pub const ENTRY_NAME_LEN: usize = 24;

    pub const CHECKSUM_LEN: usize = 16;
    pub const IV_LEN: usize = 16;
    pub const BLOCK_LEN: usize = 16;
    /// Length prefix in front of every encrypted payload
    pub const LENGTH_PREFIX: usize = 4;
}
