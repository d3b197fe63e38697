//! RSA-PSS signatures with SHA-256 and a 32-byte salt.
//!
//! Keys serialize as PKCS#8 DER (private) and X.509 SubjectPublicKeyInfo DER
//! (public). Generation draws from an [`EntropyPool`]: seeded from the OS for
//! [`generate`], or fed only with the caller's seed for
//! [`generate_from_seed`], in which case the same seed and size always give
//! the same key.

use std::fmt;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::pss;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::RsaPolicy;
use crate::error::{Algorithm, Error, Result};
use crate::keys::{
    assert_signature_length, check_signature_length, KeySigner, KeyType, KeyVerifier,
};
use crate::random_pool::EntropyPool;

const ALG: Algorithm = Algorithm::RsaPss;

/// Generate a fresh key under the default (production) policy.
pub fn generate(size_in_bits: usize) -> Result<SigningKey> {
    generate_with_policy(size_in_bits, &RsaPolicy::default())
}

/// Generate a fresh key, checking `size_in_bits` against `policy`.
pub fn generate_with_policy(size_in_bits: usize, policy: &RsaPolicy) -> Result<SigningKey> {
    check_size(size_in_bits, policy)?;
    let mut pool = EntropyPool::from_os_entropy()?;
    generate_with_pool(size_in_bits, &mut pool)
}

/// Deterministically generate a key from `seed` under the default policy.
pub fn generate_from_seed(size_in_bits: usize, seed: &[u8]) -> Result<SigningKey> {
    generate_from_seed_with_policy(size_in_bits, seed, &RsaPolicy::default())
}

/// Deterministically generate a key from `seed`, checking both the size and
/// the seed length against `policy`.
pub fn generate_from_seed_with_policy(
    size_in_bits: usize,
    seed: &[u8],
    policy: &RsaPolicy,
) -> Result<SigningKey> {
    check_size(size_in_bits, policy)?;
    if seed.len() < policy.min_seed_len {
        return Err(Error::precondition(
            ALG,
            format!(
                "seed is required to be of length >= {}, but it was {}",
                policy.min_seed_len,
                seed.len()
            ),
        ));
    }

    let mut pool = EntropyPool::from_seed(seed);
    generate_with_pool(size_in_bits, &mut pool)
}

/// Parse a PKCS#8 DER private key.
pub fn create_signing_key_from_string(der: &[u8]) -> Result<SigningKey> {
    let key = RsaPrivateKey::from_pkcs8_der(der)
        .map_err(|e| Error::corrupt(ALG, format!("invalid PKCS#8 private key: {}", e)))?;
    SigningKey::from_private_key(key)
}

/// Parse an X.509 SubjectPublicKeyInfo DER public key.
pub fn create_verifying_key_from_string(der: &[u8]) -> Result<VerifyingKey> {
    let key = RsaPublicKey::from_public_key_der(der)
        .map_err(|e| Error::corrupt(ALG, format!("invalid SubjectPublicKeyInfo: {}", e)))?;
    VerifyingKey::from_public_key(key)
}

fn check_size(size_in_bits: usize, policy: &RsaPolicy) -> Result<()> {
    policy.validate().map_err(|e| match e {
        Error::Config(message) => Error::precondition(ALG, message),
        other => other,
    })?;
    if size_in_bits < policy.min_key_size_bits {
        return Err(Error::precondition(
            ALG,
            format!(
                "size in bits is required to be >= {}, but it was {}",
                policy.min_key_size_bits, size_in_bits
            ),
        ));
    }
    if size_in_bits > policy.max_key_size_bits {
        return Err(Error::precondition(
            ALG,
            format!(
                "size in bits is required to be <= {}, but it was {}",
                policy.max_key_size_bits, size_in_bits
            ),
        ));
    }
    if policy.is_insecure() {
        warn!(
            size_in_bits,
            min_key_size_bits = policy.min_key_size_bits,
            "generating RSA key under a policy below the production floor"
        );
    }
    Ok(())
}

fn generate_with_pool(size_in_bits: usize, pool: &mut EntropyPool) -> Result<SigningKey> {
    debug!(size_in_bits, "generating RSA key");
    let key = RsaPrivateKey::new(pool, size_in_bits).map_err(|e| Error::backend(ALG, e))?;
    SigningKey::from_private_key(key)
}

/// An RSA-PSS-SHA256 private key.
pub struct SigningKey {
    inner: pss::BlindedSigningKey<Sha256>,
    der: Zeroizing<Vec<u8>>,
    public: VerifyingKey,
}

impl SigningKey {
    fn from_private_key(key: RsaPrivateKey) -> Result<Self> {
        let der = key.to_pkcs8_der().map_err(|e| Error::backend(ALG, e))?;
        let public = VerifyingKey::from_public_key(key.to_public_key())?;
        Ok(Self {
            der: Zeroizing::new(der.as_bytes().to_vec()),
            inner: pss::BlindedSigningKey::new(key),
            public,
        })
    }

    fn private_key(&self) -> &RsaPrivateKey {
        self.inner.as_ref()
    }

    /// Modulus size in bits.
    pub fn size_in_bits(&self) -> usize {
        self.private_key().n().bits()
    }
}

impl KeySigner for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let mut pool = EntropyPool::from_os_entropy()?;
        let sig = self
            .inner
            .try_sign_with_rng(&mut pool, msg)
            .map_err(|e| Error::backend(ALG, e))?
            .to_vec();
        assert_signature_length(ALG, self.signature_length(), &sig);
        Ok(sig)
    }

    fn verifying_key(&self) -> VerifyingKey {
        self.public.clone()
    }

    fn serialize(&self) -> Vec<u8> {
        self.der.to_vec()
    }

    fn signature_length(&self) -> usize {
        self.private_key().size()
    }

    fn key_type(&self) -> KeyType {
        KeyType::RsaPssSha256
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("size_in_bits", &self.size_in_bits())
            .finish_non_exhaustive()
    }
}

/// An RSA-PSS-SHA256 public key.
#[derive(Clone)]
pub struct VerifyingKey {
    inner: pss::VerifyingKey<Sha256>,
    der: Vec<u8>,
}

impl VerifyingKey {
    fn from_public_key(key: RsaPublicKey) -> Result<Self> {
        let der = key.to_public_key_der().map_err(|e| Error::backend(ALG, e))?;
        Ok(Self {
            der: der.as_bytes().to_vec(),
            inner: pss::VerifyingKey::new(key),
        })
    }

    fn public_key(&self) -> &RsaPublicKey {
        self.inner.as_ref()
    }

    /// Modulus size in bits.
    pub fn size_in_bits(&self) -> usize {
        self.public_key().n().bits()
    }
}

impl KeyVerifier for VerifyingKey {
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool> {
        check_signature_length(ALG, self.signature_length(), sig)?;
        let sig = match pss::Signature::try_from(sig) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        Ok(self.inner.verify(msg, &sig).is_ok())
    }

    fn serialize(&self) -> Vec<u8> {
        self.der.clone()
    }

    fn signature_length(&self) -> usize {
        self.public_key().size()
    }

    fn key_type(&self) -> KeyType {
        KeyType::RsaPssSha256
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("size_in_bits", &self.size_in_bits())
            .field("key_id", &self.key_id())
            .finish()
    }
}
