use std::ops::Range;

use crate::crypto::{Checksum, Iv};
use crate::profile::layout::bnd4;

use super::parser::EntryHeader;

/// One BND4 directory item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position in the entry table (0-based)
    pub index: usize,
    /// Total on-disk span, checksum included
    pub size: u32,
    pub data_offset: u32,
    pub name_offset: u32,
    pub footer_length: u32,
    /// Entry name, e.g. "USER_DATA000"
    pub name: String,
    pub checksum: Checksum,
    /// Present only for encrypted variants
    pub iv: Option<Iv>,
    /// Character stored in this entry, set once slot discovery marks it occupied
    character_name: Option<String>,
    plaintext: Option<Vec<u8>>,
}

impl Entry {
    pub(crate) fn new(
        index: usize,
        header: EntryHeader,
        name: String,
        checksum: Checksum,
        iv: Option<Iv>,
    ) -> Self {
        Self {
            index,
            size: header.size,
            data_offset: header.data_offset,
            name_offset: header.name_offset,
            footer_length: header.footer_length,
            name,
            checksum,
            iv,
            character_name: None,
            plaintext: None,
        }
    }

    /// Byte range of the whole entry (checksum + body)
    pub fn data_range(&self) -> Range<usize> {
        let start = self.data_offset as usize;
        start..start + self.size as usize
    }

    /// Byte range of everything after the checksum (IV + ciphertext, or the raw payload)
    pub fn body_range(&self) -> Range<usize> {
        let start = self.data_offset as usize + bnd4::CHECKSUM_LEN;
        start..self.data_range().end
    }

    pub fn character_name(&self) -> Option<&str> {
        self.character_name.as_deref()
    }

    pub fn occupied(&self) -> bool {
        self.character_name.is_some()
    }

    pub fn is_decrypted(&self) -> bool {
        self.plaintext.is_some()
    }

    /// Decrypted payload, if this entry is currently decrypted
    pub fn plaintext(&self) -> Option<&[u8]> {
        self.plaintext.as_deref()
    }

    pub(crate) fn set_plaintext(&mut self, plaintext: Vec<u8>) {
        self.plaintext = Some(plaintext);
    }

    /// Drop the decrypted payload once it no longer matches the stored ciphertext
    pub(crate) fn clear_plaintext(&mut self) {
        self.plaintext = None;
    }

    pub(crate) fn set_character_name(&mut self, name: String) {
        self.character_name = Some(name);
    }
}
