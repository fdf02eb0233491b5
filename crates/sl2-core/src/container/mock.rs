//! Assembles well-formed BND4 buffers for tests.

use crate::codec::frame;
use crate::crypto::{CbcCipher, Iv, RustCryptoCbc, checksum};
use crate::profile::GameVariant;
use crate::profile::layout::bnd4;
use crate::text::encode_utf16_le;

/// Name field stride: 24 bytes of UTF-16 plus a NUL code unit
const NAME_STRIDE: usize = bnd4::ENTRY_NAME_LEN + 2;

pub struct MockContainerBuilder {
    variant: GameVariant,
    unicode: bool,
    entries: Vec<(String, Vec<u8>)>,
    footer: Vec<u8>,
}

impl MockContainerBuilder {
    pub fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            unicode: false,
            entries: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    /// Add an entry holding `payload` once decrypted
    pub fn entry(mut self, name: &str, payload: Vec<u8>) -> Self {
        self.entries.push((name.to_string(), payload));
        self
    }

    /// Trailing bytes after the last entry
    pub fn footer(mut self, footer: Vec<u8>) -> Self {
        self.footer = footer;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let count = self.entries.len();
        let names_start = bnd4::HEADER_LEN + bnd4::ENTRY_HEADER_LEN * count;
        let data_start = align16(names_start + NAME_STRIDE * count);

        let mut raw = vec![0u8; data_start];
        raw[..4].copy_from_slice(bnd4::MAGIC);
        raw[bnd4::ENTRY_COUNT..bnd4::ENTRY_COUNT + 4]
            .copy_from_slice(&(count as u32).to_le_bytes());
        raw[bnd4::UNICODE_FLAG] = u8::from(self.unicode);

        for (index, (name, payload)) in self.entries.iter().enumerate() {
            let body = self.body(index, payload);
            let data_offset = align16(raw.len());
            raw.resize(data_offset, 0);
            raw.extend_from_slice(&checksum(&body));
            raw.extend_from_slice(&body);

            let name_offset = names_start + NAME_STRIDE * index;
            let name_bytes = encode_utf16_le(name);
            let name_len = name_bytes.len().min(bnd4::ENTRY_NAME_LEN);
            raw[name_offset..name_offset + name_len].copy_from_slice(&name_bytes[..name_len]);

            let size = (bnd4::CHECKSUM_LEN + body.len()) as u32;
            let header = bnd4::HEADER_LEN + bnd4::ENTRY_HEADER_LEN * index;
            raw[header..header + 8].copy_from_slice(&bnd4::ENTRY_MAGIC);
            put_u32(&mut raw, header + bnd4::ENTRY_SIZE, size);
            put_u32(&mut raw, header + 12, u32::MAX);
            put_u32(&mut raw, header + bnd4::ENTRY_DATA_OFFSET, data_offset as u32);
            put_u32(&mut raw, header + bnd4::ENTRY_NAME_OFFSET, name_offset as u32);
            put_u32(&mut raw, header + bnd4::ENTRY_FOOTER_LENGTH, 0);
        }

        raw.extend_from_slice(&self.footer);
        raw
    }

    fn body(&self, index: usize, payload: &[u8]) -> Vec<u8> {
        let Some(key) = self.variant.profile().key else {
            return payload.to_vec();
        };
        let iv: Iv = std::array::from_fn(|i| (index * 31 + i * 7 + 1) as u8);
        let blocks = RustCryptoCbc
            .encrypt(&key, &iv, &frame(payload))
            .expect("framed payload is block aligned");
        let mut body = iv.to_vec();
        body.extend_from_slice(&blocks);
        body
    }
}

fn align16(pos: usize) -> usize {
    pos.div_ceil(16) * 16
}

fn put_u32(raw: &mut [u8], pos: usize, value: u32) {
    raw[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}
