use std::fmt;

use salsa20::cipher::KeyIvInit;

use super::{apply_keystream, check_key_len, iv_or_zero, Keystream};
use crate::error::{Algorithm, Error, Result};

const ALG: Algorithm = Algorithm::XSalsa20;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 24;

/// XSalsa20: Salsa20 with a 192-bit nonce.
pub struct XSalsa20 {
    inner: salsa20::XSalsa20,
}

impl XSalsa20 {
    /// `key` must be 32 bytes; `iv`, if given, 24. The IV defaults to zeroes.
    pub fn new(key: &[u8], iv: Option<&[u8]>) -> Result<Self> {
        check_key_len(ALG, key, &[KEY_LEN])?;
        let iv = iv_or_zero(ALG, iv, IV_LEN)?;
        let inner = salsa20::XSalsa20::new_from_slices(key, &iv)
            .map_err(|e| Error::precondition(ALG, e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Keystream for XSalsa20 {
    fn process_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        apply_keystream(&mut self.inner, ALG, buf)
    }
}

impl fmt::Debug for XSalsa20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XSalsa20").finish_non_exhaustive()
    }
}
