//! Compact ECDSA over P-192 with keys derived from 12-byte seeds.
//!
//! Wire sizes: 12-byte seed, 24-byte secret scalar, 25-byte compressed
//! public point, 48-byte `r || s` signature. Messages are hashed with Tiger.
//! The secret scalar is derived from the seed by [`crate::derive`], so a key
//! can be rebuilt from its seed alone.

use std::fmt;

use p192::elliptic_curve::SecretKey;
use p192::NistP192;
use tracing::debug;

use crate::derive::{derive_signing_key, SCALAR_LEN, SEED_LEN};
use crate::ecdsa::{sign_p192_tiger, verify_p192_tiger, DomainParameters, P192_COMPRESSED};
use crate::error::{Algorithm, Error, Result};
use crate::keys::{
    assert_signature_length, check_signature_length, KeySigner, KeyType, KeyVerifier,
};
use crate::random_pool::EntropyPool;

const ALG: Algorithm = Algorithm::EcdsaSeeded;

pub const SIZE_IN_BITS: usize = 192;

/// Length in bytes of a serialized public key.
pub const VERIFYING_KEY_LEN: usize = 25;

pub const SIGNATURE_LEN: usize = 48;

fn check_size(size_in_bits: usize) -> Result<()> {
    if size_in_bits != SIZE_IN_BITS {
        return Err(Error::precondition(
            ALG,
            format!(
                "size in bits is required to be {}, but it was {}",
                SIZE_IN_BITS, size_in_bits
            ),
        ));
    }
    Ok(())
}

/// Generate a key from a fresh random seed.
pub fn generate(size_in_bits: usize) -> Result<SigningKey> {
    check_size(size_in_bits)?;
    let mut pool = EntropyPool::from_os_entropy()?;
    let mut seed = [0u8; SEED_LEN];
    pool.generate_bytes(&mut seed)?;
    SigningKey::from_seed(&seed)
}

/// Derive the key for `seed`, which must be exactly 12 bytes.
pub fn generate_from_seed(size_in_bits: usize, seed: &[u8]) -> Result<SigningKey> {
    check_size(size_in_bits)?;
    SigningKey::from_seed(seed)
}

/// Load a signing key from its 24-byte big-endian secret scalar.
pub fn create_signing_key_from_string(bytes: &[u8]) -> Result<SigningKey> {
    if bytes.len() != SCALAR_LEN {
        return Err(Error::corrupt(
            ALG,
            format!(
                "secret scalar is required to be of length {}, but it was {}",
                SCALAR_LEN,
                bytes.len()
            ),
        ));
    }
    let inner = SecretKey::<NistP192>::from_slice(bytes)
        .map_err(|_| Error::corrupt(ALG, "secret scalar is out of range"))?;
    Ok(SigningKey::new(inner))
}

/// Load a verifying key from its 25-byte compressed point.
pub fn create_verifying_key_from_string(bytes: &[u8]) -> Result<VerifyingKey> {
    if bytes.len() != VERIFYING_KEY_LEN {
        return Err(Error::corrupt(
            ALG,
            format!(
                "verifying key is required to be of length {}, but it was {}",
                VERIFYING_KEY_LEN,
                bytes.len()
            ),
        ));
    }
    let inner = p192::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
        .map_err(|_| Error::corrupt(ALG, "not a valid compressed P-192 point"))?;
    Ok(VerifyingKey::new(inner))
}

/// A seed-derivable P-192 private key.
pub struct SigningKey {
    inner: SecretKey<NistP192>,
    public: VerifyingKey,
}

impl SigningKey {
    /// Derive the key for a 12-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let inner = derive_signing_key(seed)?;
        debug!("derived seeded ECDSA key");
        Ok(Self::new(inner))
    }

    fn new(inner: SecretKey<NistP192>) -> Self {
        let public = VerifyingKey::new(p192::ecdsa::VerifyingKey::from(inner.public_key()));
        Self { inner, public }
    }

    pub fn domain_parameters(&self) -> &'static DomainParameters {
        self.public.params
    }
}

impl KeySigner for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let mut pool = EntropyPool::from_os_entropy()?;
        let sig = sign_p192_tiger(ALG, &self.inner, msg, &mut pool)?;
        assert_signature_length(ALG, SIGNATURE_LEN, &sig);
        Ok(sig)
    }

    fn verifying_key(&self) -> VerifyingKey {
        self.public.clone()
    }

    fn serialize(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }

    fn signature_length(&self) -> usize {
        SIGNATURE_LEN
    }

    fn key_type(&self) -> KeyType {
        KeyType::EcdsaSeededP192
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

/// A compressed-point P-192 public key.
#[derive(Clone)]
pub struct VerifyingKey {
    inner: p192::ecdsa::VerifyingKey,
    params: &'static DomainParameters,
}

impl VerifyingKey {
    fn new(inner: p192::ecdsa::VerifyingKey) -> Self {
        Self {
            inner,
            params: &P192_COMPRESSED,
        }
    }

    pub fn domain_parameters(&self) -> &'static DomainParameters {
        self.params
    }
}

impl KeyVerifier for VerifyingKey {
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool> {
        check_signature_length(ALG, SIGNATURE_LEN, sig)?;
        Ok(verify_p192_tiger(&self.inner, msg, sig))
    }

    fn serialize(&self) -> Vec<u8> {
        self.inner
            .to_encoded_point(self.params.point_compression)
            .as_bytes()
            .to_vec()
    }

    fn signature_length(&self) -> usize {
        SIGNATURE_LEN
    }

    fn key_type(&self) -> KeyType {
        KeyType::EcdsaSeededP192
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerifyingKey")
            .field(&hex::encode(self.serialize()))
            .finish()
    }
}
