//! Per-game profile table.
//!
//! Each [`GameVariant`] selects key material, the directory entry used for
//! slot discovery, the slot layout inside that entry and the way the
//! progression field is located inside a slot's payload.

pub mod layout;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::crypto::AesKey;
use crate::error::{Error, Result};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    /// Dark Souls Remastered
    #[strum(to_string = "dsr", serialize = "legacy-remastered")]
    Dsr,
    /// Dark Souls II: Scholar of the First Sin
    #[strum(to_string = "ds2", serialize = "legacy-2")]
    Ds2,
    /// Dark Souls III
    #[strum(to_string = "ds3", serialize = "legacy-3")]
    Ds3,
    /// Elden Ring
    #[strum(to_string = "er", serialize = "current-gen")]
    Er,
}

impl GameVariant {
    /// Parse a game token such as `ds3` (case-insensitive).
    pub fn from_token(token: &str) -> Result<Self> {
        token
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| Error::UnsupportedVariant(token.to_string()))
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    /// Get the full game title (for display)
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dsr => "Dark Souls Remastered",
            Self::Ds2 => "Dark Souls II: Scholar of the First Sin",
            Self::Ds3 => "Dark Souls III",
            Self::Er => "Elden Ring",
        }
    }

    pub fn profile(&self) -> &'static GameProfile {
        match self {
            Self::Dsr => &DSR,
            Self::Ds2 => &DS2,
            Self::Ds3 => &DS3,
            Self::Er => &ER,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.profile().key.is_some()
    }

    /// True when the progression field is found by searching for the character name
    pub fn uses_name_anchor(&self) -> bool {
        matches!(self.profile().fields, FieldLocation::BeforeName(_))
    }
}

/// Where slot occupancy and character names live in the directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLayout {
    /// A 10-byte occupancy bitmap followed by fixed-size slot summaries.
    /// Slots are numbered from 0.
    Unified {
        occupancy: usize,
        slot_data: usize,
        slot_length: usize,
        name_max_len: usize,
    },
    /// Occupancy flag and name inside each fixed-stride slot record.
    /// Slots are numbered from 1.
    Legacy {
        occupancy: usize,
        name: usize,
        stride: usize,
        name_max_len: usize,
    },
}

/// How to find the progression field(s) inside a slot's decrypted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// Absolute offsets from the start of the payload
    Fixed(&'static [usize]),
    /// Distances before the first occurrence of the character name
    BeforeName(&'static [usize]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProfile {
    pub variant: GameVariant,
    /// AES-128 key, `None` when entries are stored unencrypted
    pub key: Option<AesKey>,
    pub directory_entry: usize,
    pub slots: SlotLayout,
    pub fields: FieldLocation,
}

static DSR: GameProfile = GameProfile {
    variant: GameVariant::Dsr,
    key: Some(layout::dsr::KEY),
    directory_entry: layout::dsr::DIRECTORY_ENTRY,
    slots: SlotLayout::Unified {
        occupancy: layout::dsr::OCCUPANCY,
        slot_data: layout::dsr::SLOT_DATA,
        slot_length: layout::dsr::SLOT_LENGTH,
        name_max_len: layout::dsr::NAME_MAX_LEN,
    },
    fields: FieldLocation::Fixed(&layout::dsr::SOULS),
};

static DS2: GameProfile = GameProfile {
    variant: GameVariant::Ds2,
    key: Some(layout::ds2::KEY),
    directory_entry: layout::ds2::DIRECTORY_ENTRY,
    slots: SlotLayout::Legacy {
        occupancy: layout::ds2::OCCUPANCY,
        name: layout::ds2::NAME,
        stride: layout::ds2::SLOT_STRIDE,
        name_max_len: layout::ds2::NAME_MAX_LEN,
    },
    fields: FieldLocation::Fixed(&layout::ds2::SOULS),
};

static DS3: GameProfile = GameProfile {
    variant: GameVariant::Ds3,
    key: Some(layout::ds3::KEY),
    directory_entry: layout::ds3::DIRECTORY_ENTRY,
    slots: SlotLayout::Unified {
        occupancy: layout::ds3::OCCUPANCY,
        slot_data: layout::ds3::SLOT_DATA,
        slot_length: layout::ds3::SLOT_LENGTH,
        name_max_len: layout::ds3::NAME_MAX_LEN,
    },
    fields: FieldLocation::BeforeName(&layout::ds3::SOULS_BEFORE_NAME),
};

static ER: GameProfile = GameProfile {
    variant: GameVariant::Er,
    key: None,
    directory_entry: layout::er::DIRECTORY_ENTRY,
    slots: SlotLayout::Unified {
        occupancy: layout::er::OCCUPANCY,
        slot_data: layout::er::SLOT_DATA,
        slot_length: layout::er::SLOT_LENGTH,
        name_max_len: layout::er::NAME_MAX_LEN,
    },
    fields: FieldLocation::BeforeName(&layout::er::RUNES_BEFORE_NAME),
};
