use aes::Aes128;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use super::{AesKey, BLOCK_SIZE, CbcCipher, CipherError, Iv, ensure_aligned};

/// CBC chaining done by hand over the raw AES block cipher.
///
/// Shares no code with [`super::RustCryptoCbc`] beyond the block primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockwiseCbc;

impl CbcCipher for BlockwiseCbc {
    fn name(&self) -> &'static str {
        "blockwise-aes"
    }

    fn encrypt(&self, key: &AesKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        ensure_aligned(plaintext)?;
        let cipher = Aes128::new(GenericArray::from_slice(key));

        let mut out = Vec::with_capacity(plaintext.len());
        let mut prev = *iv;
        for chunk in plaintext.chunks_exact(BLOCK_SIZE) {
            let mut block = GenericArray::clone_from_slice(chunk);
            for (b, p) in block.iter_mut().zip(prev.iter()) {
                *b ^= p;
            }
            cipher.encrypt_block(&mut block);
            prev.copy_from_slice(&block);
            out.extend_from_slice(&block);
        }
        Ok(out)
    }

    fn decrypt(&self, key: &AesKey, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        ensure_aligned(ciphertext)?;
        let cipher = Aes128::new(GenericArray::from_slice(key));

        let mut out = Vec::with_capacity(ciphertext.len());
        let mut prev: &[u8] = iv;
        for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
            let mut block = GenericArray::clone_from_slice(chunk);
            cipher.decrypt_block(&mut block);
            for (b, p) in block.iter_mut().zip(prev) {
                *b ^= p;
            }
            out.extend_from_slice(&block);
            prev = chunk;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fips197_single_block() {
        // FIPS-197 appendix C.1 with a zero IV reduces CBC to a single ECB block
        let key: AesKey = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F,
        ];
        let plaintext = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ];
        let expected = [
            0x69, 0xC4, 0xE0, 0xD8, 0x6A, 0x7B, 0x04, 0x30, 0xD8, 0xCD, 0xB7, 0x80, 0x70, 0xB4,
            0xC5, 0x5A,
        ];
        let ciphertext = BlockwiseCbc.encrypt(&key, &[0; 16], &plaintext).unwrap();
        assert_eq!(ciphertext, expected);
        assert_eq!(
            BlockwiseCbc.decrypt(&key, &[0; 16], &ciphertext).unwrap(),
            plaintext
        );
    }

    #[test]
    fn test_chaining_changes_identical_blocks() {
        let ciphertext = BlockwiseCbc.encrypt(&[7; 16], &[9; 16], &[0; 32]).unwrap();
        assert_ne!(ciphertext[..16], ciphertext[16..]);
    }

    #[test]
    fn test_empty_input() {
        assert!(BlockwiseCbc.encrypt(&[7; 16], &[9; 16], &[]).unwrap().is_empty());
    }
}
