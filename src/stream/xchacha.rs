use std::fmt;

use chacha20::cipher::KeyIvInit;
use chacha20::XChaCha20;

use super::{apply_keystream, check_key_len, iv_or_zero, Keystream};
use crate::error::{Algorithm, Error, Result};

const ALG: Algorithm = Algorithm::ChaCha20;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 24;

/// ChaCha20 with a 192-bit nonce (XChaCha20).
///
/// Only 256-bit keys are accepted. The 128-bit key schedule ("expand 16-byte
/// k") has no XChaCha20 construction in the `chacha20` crate, so 16-byte keys
/// are refused as a precondition violation rather than padded.
pub struct ChaCha20 {
    inner: XChaCha20,
}

impl ChaCha20 {
    /// `key` must be 32 bytes; `iv`, if given, 24. The IV defaults to zeroes.
    pub fn new(key: &[u8], iv: Option<&[u8]>) -> Result<Self> {
        check_key_len(ALG, key, &[KEY_LEN])?;
        let iv = iv_or_zero(ALG, iv, IV_LEN)?;
        let inner = XChaCha20::new_from_slices(key, &iv)
            .map_err(|e| Error::precondition(ALG, e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Keystream for ChaCha20 {
    fn process_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        apply_keystream(&mut self.inner, ALG, buf)
    }
}

impl fmt::Debug for ChaCha20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaCha20").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "1b27556473e985d462cd51197a9a46c76009549eac6474f206c4ee0844f68389";
    const IV: &str = "69696ee955b62b73cd62bda875fc73d68219e0036b7a0b37";

    #[test]
    fn test_known_keystream() {
        let key = hex::decode(KEY).unwrap();
        let iv = hex::decode(IV).unwrap();
        let mut cipher = ChaCha20::new(&key, Some(&iv)).unwrap();
        assert_eq!(
            hex::encode(cipher.process(&[0u8; 32]).unwrap()),
            "4febf2fe4b359c508dc5e8b5980c88e38946d8f18f313465c862a08782648248"
        );

        let mut zero = ChaCha20::new(&[0u8; 32], None).unwrap();
        assert_eq!(
            hex::encode(zero.process(&[0u8; 32]).unwrap()),
            "bcd02a18bf3f01d19292de30a7a8fdaca4b65e50a6002cc72cd6d2f7c91ac3d5"
        );
    }

    #[test]
    fn test_in_place_matches_process() {
        let msg = b"attack at dawn, attack at dusk, attack whenever".to_vec();
        let expected = ChaCha20::new(&[5u8; 32], None).unwrap().process(&msg).unwrap();

        let mut buf = msg.clone();
        let mut cipher = ChaCha20::new(&[5u8; 32], None).unwrap();
        let (head, tail) = buf.split_at_mut(10);
        cipher.process_in_place(head).unwrap();
        cipher.process_in_place(tail).unwrap();
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_preconditions() {
        let err = ChaCha20::new(&[0u8; 16], None).unwrap_err();
        assert!(err.is_precondition_violation());
        assert_eq!(err.algorithm(), Some(Algorithm::ChaCha20));
        let err = ChaCha20::new(&[0u8; 32], Some(&[0u8; 12])).unwrap_err();
        assert!(err.is_precondition_violation());
    }
}
