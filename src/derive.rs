//! Deterministic derivation of P-192 secret exponents from short seeds.
//!
//! A 12-byte seed is hashed with Tiger under a fixed, versioned tag into a
//! 192-bit candidate. Tiger's 24-byte digest is exactly the byte length of
//! the P-192 group order, so no truncation or padding is applied.
//! Candidates outside `[0, n-2]` are re-hashed until one lands in range, and
//! the secret exponent is `candidate + 1`, which puts it in `[1, n-1]`.
//! Re-hashing feeds only the previous digest back in; the tag is mixed in
//! once. Changing either detail changes every derived key, so both are fixed
//! for the lifetime of the wire format.

use p192::elliptic_curve::bigint::{ArrayEncoding, U192};
use p192::elliptic_curve::{Curve, SecretKey};
use p192::NistP192;
use tiger::{Digest, Tiger};
use tracing::debug;

use crate::error::{Algorithm, Error, Result};

/// Length in bytes of a derivation seed.
pub const SEED_LEN: usize = 12;

/// Length in bytes of a derived secret exponent.
pub const SCALAR_LEN: usize = 24;

/// Domain separation tag and salt, as two netstrings.
///
/// Keys derived under this tag match those of the pycryptopp lightweight
/// ECDSA scheme whenever the first candidate is in range.
pub const TAG_AND_SALT: &[u8] =
    b"102:pycryptopp v0.5.3 key derivation algorithm using Tiger hash to generate ECDSA 192-bit secret exponents,16:H1yGNvUONoc0FD1d,";

/// Derive the big-endian secret exponent for `seed`.
pub fn derive_secret_exponent(seed: &[u8]) -> Result<[u8; SCALAR_LEN]> {
    derive_secret_exponent_with(seed, tiger_parts)
}

/// Derive the P-192 secret key for `seed`.
pub fn derive_signing_key(seed: &[u8]) -> Result<SecretKey<NistP192>> {
    let scalar = derive_secret_exponent(seed)?;
    SecretKey::from_slice(&scalar).map_err(|e| Error::backend(Algorithm::EcdsaSeeded, e))
}

/// Derivation with the hash function supplied by the caller.
///
/// `hash` receives the pieces to be hashed in order and returns their
/// digest over the concatenation.
pub(crate) fn derive_secret_exponent_with<H>(seed: &[u8], mut hash: H) -> Result<[u8; SCALAR_LEN]>
where
    H: FnMut(&[&[u8]]) -> [u8; SCALAR_LEN],
{
    if seed.len() != SEED_LEN {
        return Err(Error::precondition(
            Algorithm::EcdsaSeeded,
            format!(
                "seed is required to be of length {}, but it was {}",
                SEED_LEN,
                seed.len()
            ),
        ));
    }

    let n_minus_one = NistP192::ORDER.wrapping_sub(&U192::ONE);

    let mut candidate = hash(&[TAG_AND_SALT, seed]);
    let mut value = U192::from_be_slice(&candidate);
    let mut rejections = 0u32;
    while value >= n_minus_one {
        rejections += 1;
        debug!(rejections, "derived candidate outside the group order, rehashing");
        candidate = hash(&[&candidate[..]]);
        value = U192::from_be_slice(&candidate);
    }

    let exponent = value.wrapping_add(&U192::ONE);
    let mut out = [0u8; SCALAR_LEN];
    out.copy_from_slice(&exponent.to_be_byte_array());
    Ok(out)
}

fn tiger_parts(parts: &[&[u8]]) -> [u8; SCALAR_LEN] {
    let mut hasher = Tiger::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
