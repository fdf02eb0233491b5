//! Entry codec: converts between an entry's on-disk body and its payload.
//!
//! Encrypted bodies are laid out as
//!
//! ```text
//! IV (16) || AES-128-CBC( u32 LE payload length || payload || padding )
//! ```
//!
//! The padding resembles PKCS#7 (every pad byte holds the pad length) but
//! never emits a full block: a frame that is already block-aligned gets no
//! padding at all. Bodies of the unencrypted variant are the payload itself.

use tracing::debug;

use crate::container::Entry;
use crate::crypto::{AesKey, BLOCK_SIZE, CipherChain, Iv};
use crate::error::{Error, FormatError, Result};
use crate::profile::GameVariant;
use crate::profile::layout::bnd4;
use crate::utils::read_u32_le;

/// Padding appended after `length || payload` for a payload of `payload_len` bytes
pub fn custom_padding(payload_len: usize) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (payload_len + bnd4::LENGTH_PREFIX) % BLOCK_SIZE;
    if pad_len == BLOCK_SIZE {
        return Vec::new();
    }
    vec![pad_len as u8; pad_len]
}

/// Build the plaintext frame that gets encrypted
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let padding = custom_padding(payload.len());
    let mut framed = Vec::with_capacity(bnd4::LENGTH_PREFIX + payload.len() + padding.len());
    framed.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    framed.extend_from_slice(payload);
    framed.extend_from_slice(&padding);
    framed
}

/// Strip the length prefix and trailing padding from a decrypted frame.
///
/// Returns `Err((declared, available))` when the prefix claims more bytes than the frame holds.
pub fn unframe(framed: &[u8]) -> std::result::Result<&[u8], (usize, usize)> {
    let available = framed.len().saturating_sub(bnd4::LENGTH_PREFIX);
    let declared = read_u32_le(framed, 0).ok_or((0, available))? as usize;
    if declared > available {
        return Err((declared, available));
    }
    Ok(&framed[bnd4::LENGTH_PREFIX..bnd4::LENGTH_PREFIX + declared])
}

/// Decrypts and re-encrypts entry bodies for one game variant
#[derive(Debug)]
pub struct EntryCodec {
    variant: GameVariant,
    ciphers: CipherChain,
}

impl EntryCodec {
    pub fn new(variant: GameVariant) -> Self {
        Self::with_ciphers(variant, CipherChain::default())
    }

    pub fn with_ciphers(variant: GameVariant, ciphers: CipherChain) -> Self {
        Self { variant, ciphers }
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    fn key(&self) -> Option<&'static AesKey> {
        self.variant.profile().key.as_ref()
    }

    /// Decode `body` (the bytes after the checksum) into the entry's payload
    pub fn decrypt(&self, entry: &Entry, body: &[u8]) -> Result<Vec<u8>> {
        let Some(key) = self.key() else {
            return Ok(body.to_vec());
        };

        let (iv, blocks) = split_iv(entry, body)?;
        debug!(
            "[{}] Decrypting {} bytes; IV: {:02X?}",
            entry.index,
            blocks.len(),
            iv
        );

        let framed = self
            .ciphers
            .decrypt(key, &iv, blocks)
            .map_err(|e| Error::Crypto {
                index: entry.index,
                variant: self.variant,
                primary: e.primary,
                fallback: e.fallback,
            })?;

        let payload = unframe(&framed).map_err(|(declared, available)| Error::LengthPrefix {
            index: entry.index,
            variant: self.variant,
            declared,
            available,
        })?;
        Ok(payload.to_vec())
    }

    /// Encode `payload` into a new body of exactly `original_body.len()` bytes,
    /// reusing the IV stored in `original_body`
    pub fn encrypt(&self, entry: &Entry, original_body: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let Some(key) = self.key() else {
            ensure_len(entry.index, original_body.len(), payload.len())?;
            return Ok(payload.to_vec());
        };

        let (iv, blocks) = split_iv(entry, original_body)?;
        let framed = frame(payload);
        ensure_len(entry.index, blocks.len(), framed.len())?;

        let ciphertext = self
            .ciphers
            .encrypt(key, &iv, &framed)
            .map_err(|e| Error::Crypto {
                index: entry.index,
                variant: self.variant,
                primary: e.primary,
                fallback: e.fallback,
            })?;
        ensure_len(entry.index, blocks.len(), ciphertext.len())?;

        let mut body = Vec::with_capacity(original_body.len());
        body.extend_from_slice(&iv);
        body.extend_from_slice(&ciphertext);
        Ok(body)
    }
}

fn split_iv<'a>(entry: &Entry, body: &'a [u8]) -> Result<(Iv, &'a [u8])> {
    let (iv_bytes, blocks) =
        body.split_at_checked(bnd4::IV_LEN)
            .ok_or(FormatError::EntryTooSmall {
                index: entry.index,
                size: entry.size,
            })?;
    let mut iv: Iv = [0; 16];
    iv.copy_from_slice(iv_bytes);
    Ok((iv, blocks))
}

fn ensure_len(index: usize, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::SizeMismatch {
            index,
            expected,
            actual,
        });
    }
    Ok(())
}
