//! Ed25519 keys built from 32-byte seeds.
//!
//! The signing key serializes as its 32-byte seed, the verifying key as the
//! 32-byte compressed Edwards point, and signatures are 64 bytes. Ed25519
//! signing is deterministic, so the same key and message always give the same
//! signature.

use std::fmt;

use ed25519_dalek::{Signature, Signer};
use tracing::debug;

use crate::error::{Algorithm, Error, Result};
use crate::keys::{
    assert_signature_length, check_signature_length, KeySigner, KeyType, KeyVerifier,
};
use crate::random_pool::EntropyPool;

const ALG: Algorithm = Algorithm::Ed25519;

pub const SEED_LEN: usize = ed25519_dalek::SECRET_KEY_LENGTH;

pub const VERIFYING_KEY_LEN: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

pub const SIGNATURE_LEN: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Generate a key from a fresh 32-byte seed.
pub fn generate() -> Result<SigningKey> {
    let mut pool = EntropyPool::from_os_entropy()?;
    let mut seed = [0u8; SEED_LEN];
    pool.generate_bytes(&mut seed)?;
    debug!("generating Ed25519 key");
    generate_from_seed(&seed)
}

/// Build the key for `seed`, which must be exactly 32 bytes.
pub fn generate_from_seed(seed: &[u8]) -> Result<SigningKey> {
    let seed: &[u8; SEED_LEN] = seed.try_into().map_err(|_| {
        Error::precondition(
            ALG,
            format!(
                "seed is required to be of length {}, but it was {}",
                SEED_LEN,
                seed.len()
            ),
        )
    })?;
    Ok(SigningKey::new(ed25519_dalek::SigningKey::from_bytes(seed)))
}

/// Load a signing key from its serialized 32-byte seed.
pub fn create_signing_key_from_string(bytes: &[u8]) -> Result<SigningKey> {
    let seed: &[u8; SEED_LEN] = bytes.try_into().map_err(|_| {
        Error::corrupt(
            ALG,
            format!(
                "signing key is required to be of length {}, but it was {}",
                SEED_LEN,
                bytes.len()
            ),
        )
    })?;
    Ok(SigningKey::new(ed25519_dalek::SigningKey::from_bytes(seed)))
}

/// Load a verifying key from its 32-byte compressed point.
pub fn create_verifying_key_from_string(bytes: &[u8]) -> Result<VerifyingKey> {
    let point: &[u8; VERIFYING_KEY_LEN] = bytes.try_into().map_err(|_| {
        Error::corrupt(
            ALG,
            format!(
                "verifying key is required to be of length {}, but it was {}",
                VERIFYING_KEY_LEN,
                bytes.len()
            ),
        )
    })?;
    let inner = ed25519_dalek::VerifyingKey::from_bytes(point)
        .map_err(|_| Error::corrupt(ALG, "not a valid Edwards point"))?;
    Ok(VerifyingKey { inner })
}

/// An Ed25519 private key.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
    public: VerifyingKey,
}

impl SigningKey {
    fn new(inner: ed25519_dalek::SigningKey) -> Self {
        let public = VerifyingKey {
            inner: inner.verifying_key(),
        };
        Self { inner, public }
    }
}

impl KeySigner for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let sig: Signature = self
            .inner
            .try_sign(msg)
            .map_err(|e| Error::backend(ALG, e))?;
        let sig = sig.to_bytes().to_vec();
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
        KeyType::Ed25519
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// An Ed25519 public key.
#[derive(Clone)]
pub struct VerifyingKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl KeyVerifier for VerifyingKey {
    /// Strict verification: non-canonical signatures and small-order keys
    /// verify as `false`.
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool> {
        check_signature_length(ALG, SIGNATURE_LEN, sig)?;
        match Signature::from_slice(sig) {
            Ok(sig) => Ok(self.inner.verify_strict(msg, &sig).is_ok()),
            Err(_) => Ok(false),
        }
    }

    fn serialize(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }

    fn signature_length(&self) -> usize {
        SIGNATURE_LEN
    }

    fn key_type(&self) -> KeyType {
        KeyType::Ed25519
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerifyingKey")
            .field(&hex::encode(self.inner.as_bytes()))
            .finish()
    }
}
