use aes::Aes128;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};
use cbc::{Decryptor, Encryptor};

use super::{AesKey, CbcCipher, CipherError, Iv, ensure_aligned};

/// CBC mode from the `cbc` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoCbc;

impl CbcCipher for RustCryptoCbc {
    fn name(&self) -> &'static str {
        "cbc"
    }

    fn encrypt(&self, key: &AesKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        ensure_aligned(plaintext)?;
        let mut buf = plaintext.to_vec();
        let len = buf.len();
        Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CipherError::Rejected("invalid key or IV length".to_string()))?
            .encrypt_padded_mut::<NoPadding>(&mut buf, len)
            .map_err(|_| CipherError::Misaligned { len })?;
        Ok(buf)
    }

    fn decrypt(&self, key: &AesKey, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        ensure_aligned(ciphertext)?;
        let mut buf = ciphertext.to_vec();
        Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CipherError::Rejected("invalid key or IV length".to_string()))?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| CipherError::Misaligned { len: ciphertext.len() })?;
        Ok(buf)
    }
}
