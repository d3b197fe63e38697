//! Stream ciphers: AES in counter mode, XSalsa20 and XChaCha20.
//!
//! Each cipher is stateful. Successive calls continue the keystream, so
//! processing a message in chunks gives the same output as processing it in
//! one call. Encryption and decryption are the same operation.

mod aes_ctr;
mod xchacha;
mod xsalsa;

pub use aes_ctr::Aes;
pub use xchacha::ChaCha20;
pub use xsalsa::XSalsa20;

use aes::cipher::StreamCipher;

use crate::error::{Algorithm, Error, Result};

pub trait Keystream {
    /// XOR the next `buf.len()` keystream bytes into `buf`.
    fn process_in_place(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Return `input` XORed with the next `input.len()` keystream bytes.
    fn process(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve_exact(input.len())?;
        out.extend_from_slice(input);
        self.process_in_place(&mut out)?;
        Ok(out)
    }
}

fn apply_keystream<C: StreamCipher>(
    cipher: &mut C,
    algorithm: Algorithm,
    buf: &mut [u8],
) -> Result<()> {
    cipher
        .try_apply_keystream(buf)
        .map_err(|_| Error::precondition(algorithm, "keystream exhausted"))
}

/// Returns `iv`, or `len` zero bytes when none was given, after checking its length.
fn iv_or_zero(algorithm: Algorithm, iv: Option<&[u8]>, len: usize) -> Result<Vec<u8>> {
    match iv {
        None => Ok(vec![0u8; len]),
        Some(iv) if iv.len() == len => Ok(iv.to_vec()),
        Some(iv) => Err(Error::precondition(
            algorithm,
            format!(
                "if an IV is passed, it is required to be exactly {} bytes, but it was {}",
                len,
                iv.len()
            ),
        )),
    }
}

fn check_key_len(algorithm: Algorithm, key: &[u8], allowed: &[usize]) -> Result<()> {
    if allowed.contains(&key.len()) {
        return Ok(());
    }
    let allowed = allowed
        .iter()
        .map(|len| len.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::precondition(
        algorithm,
        format!(
            "key is required to be of length {}, but it was {}",
            allowed,
            key.len()
        ),
    ))
}
