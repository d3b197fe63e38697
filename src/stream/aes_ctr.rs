use std::fmt;

use aes::cipher::KeyIvInit;
use aes::{Aes128, Aes192, Aes256};
use ctr::Ctr128BE;

use super::{apply_keystream, check_key_len, iv_or_zero, Keystream};
use crate::error::{Algorithm, Error, Result};

const ALG: Algorithm = Algorithm::Aes;

pub const IV_LEN: usize = 16;

enum Inner {
    Aes128(Ctr128BE<Aes128>),
    Aes192(Ctr128BE<Aes192>),
    Aes256(Ctr128BE<Aes256>),
}

/// AES in counter mode with a 128-bit big-endian counter.
///
/// The IV is the initial counter block and defaults to all zeroes.
pub struct Aes {
    inner: Inner,
}

impl Aes {
    /// `key` must be 16, 24 or 32 bytes; `iv`, if given, exactly 16.
    pub fn new(key: &[u8], iv: Option<&[u8]>) -> Result<Self> {
        check_key_len(ALG, key, &[16, 24, 32])?;
        let iv = iv_or_zero(ALG, iv, IV_LEN)?;

        let inner = match key.len() {
            16 => Ctr128BE::<Aes128>::new_from_slices(key, &iv).map(Inner::Aes128),
            24 => Ctr128BE::<Aes192>::new_from_slices(key, &iv).map(Inner::Aes192),
            _ => Ctr128BE::<Aes256>::new_from_slices(key, &iv).map(Inner::Aes256),
        }
        .map_err(|e| Error::precondition(ALG, e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn key_size(&self) -> usize {
        match self.inner {
            Inner::Aes128(_) => 16,
            Inner::Aes192(_) => 24,
            Inner::Aes256(_) => 32,
        }
    }
}

impl Keystream for Aes {
    fn process_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        match &mut self.inner {
            Inner::Aes128(c) => apply_keystream(c, ALG, buf),
            Inner::Aes192(c) => apply_keystream(c, ALG, buf),
            Inner::Aes256(c) => apply_keystream(c, ALG, buf),
        }
    }
}

impl fmt::Debug for Aes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes")
            .field("key_size", &self.key_size())
            .finish_non_exhaustive()
    }
}
