//! AES-128-CBC and MD5 primitives used by the entry codec.
//!
//! Padding is never applied here; callers hand in block-aligned buffers and
//! take care of the length prefix and padding themselves.

mod blockwise;
mod rust_crypto;

pub use blockwise::BlockwiseCbc;
pub use rust_crypto::RustCryptoCbc;

use md5::{Digest, Md5};
use thiserror::Error;
use tracing::warn;

/// AES-128 key
pub type AesKey = [u8; 16];
/// CBC initialization vector
pub type Iv = [u8; 16];
/// MD5 digest stored in front of every entry
pub type Checksum = [u8; 16];

pub const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("data length {len} is not a multiple of the block size")]
    Misaligned { len: usize },

    #[error("{0}")]
    Rejected(String),
}

/// CBC block cipher without automatic padding
pub trait CbcCipher {
    /// Short implementation name (for logging)
    fn name(&self) -> &'static str;

    fn encrypt(&self, key: &AesKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>, CipherError>;

    fn decrypt(&self, key: &AesKey, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// Failure of both the primary and the fallback implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainError {
    pub primary: CipherError,
    pub fallback: CipherError,
}

/// Primary cipher with a single-level fallback to an independent implementation.
pub struct CipherChain {
    primary: Box<dyn CbcCipher>,
    fallback: Box<dyn CbcCipher>,
}

impl Default for CipherChain {
    fn default() -> Self {
        Self::new(Box::new(RustCryptoCbc), Box::new(BlockwiseCbc))
    }
}

impl std::fmt::Debug for CipherChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherChain")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl CipherChain {
    pub fn new(primary: Box<dyn CbcCipher>, fallback: Box<dyn CbcCipher>) -> Self {
        Self { primary, fallback }
    }

    pub fn encrypt(&self, key: &AesKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>, ChainError> {
        match self.primary.encrypt(key, iv, plaintext) {
            Ok(out) => Ok(out),
            Err(primary) => {
                warn!(
                    "{} failed to encrypt: {}; retrying with {}",
                    self.primary.name(),
                    primary,
                    self.fallback.name()
                );
                self.fallback
                    .encrypt(key, iv, plaintext)
                    .map_err(|fallback| ChainError { primary, fallback })
            }
        }
    }

    pub fn decrypt(&self, key: &AesKey, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>, ChainError> {
        match self.primary.decrypt(key, iv, ciphertext) {
            Ok(out) => Ok(out),
            Err(primary) => {
                warn!(
                    "{} failed to decrypt: {}; retrying with {}",
                    self.primary.name(),
                    primary,
                    self.fallback.name()
                );
                self.fallback
                    .decrypt(key, iv, ciphertext)
                    .map_err(|fallback| ChainError { primary, fallback })
            }
        }
    }
}

/// MD5 digest of `data`
pub fn checksum(data: &[u8]) -> Checksum {
    Md5::digest(data).into()
}

fn ensure_aligned(data: &[u8]) -> Result<(), CipherError> {
    if data.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::Misaligned { len: data.len() });
    }
    Ok(())
}
