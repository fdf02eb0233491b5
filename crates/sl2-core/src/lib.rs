//! # sl2-core
//!
//! Core library for editing BND4 save containers (`.sl2`).
//!
//! This crate provides:
//! - BND4 header and entry table parsing
//! - Per-entry AES-128-CBC decryption and re-encryption with MD5 checksums
//! - Per-game profiles (Dark Souls Remastered, Dark Souls II, Dark Souls III, Elden Ring)
//! - Slot discovery and the monotonic souls/runes patch
//! - Decrypted entry dumps for investigation
//!
//! ## Example
//!
//! ```ignore
//! use sl2_core::prelude::*;
//!
//! let raw = std::fs::read("ER0000.sl2")?;
//! let mut save = SaveContainer::load(GameVariant::Er, raw)?;
//! let report = save.patch(PatchTarget::All, 999_999_999)?;
//! std::fs::write("ER0000.patched.sl2", save.as_bytes())?;
//! ```

pub mod codec;
pub mod config;
pub mod container;
pub mod crypto;
pub mod error;
pub mod patch;
pub mod prelude;
pub mod profile;
pub mod repack;
pub mod slots;
pub mod text;
pub mod utils;

pub use codec::EntryCodec;
pub use config::{EditorConfig, EditorConfigBuilder};
pub use container::{
    ContainerHeader, Entry, MAX_VALUE, MIN_VALUE, NameWarning, PatchReport, PatchTarget,
    SaveContainer, SlotPatch,
};
pub use crypto::{BlockwiseCbc, CbcCipher, CipherChain, RustCryptoCbc, checksum};
pub use error::{Error, FormatError, Result};
pub use patch::FieldChange;
pub use profile::{GameProfile, GameVariant};
pub use slots::{SlotInfo, SlotOccupancy, slot_list};
