//! Traits shared by every signing and verifying key in the crate.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::error;

use crate::error::{Algorithm, Error, Result};

/// Algorithm family of a key, as written in key descriptors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum KeyType {
    RsaPssSha256,
    EcdsaP192,
    EcdsaP521,
    EcdsaSeededP192,
    Ed25519,
}

impl KeyType {
    /// The algorithm tag errors for this key type carry.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyType::RsaPssSha256 => Algorithm::RsaPss,
            KeyType::EcdsaP192 | KeyType::EcdsaP521 => Algorithm::Ecdsa,
            KeyType::EcdsaSeededP192 => Algorithm::EcdsaSeeded,
            KeyType::Ed25519 => Algorithm::Ed25519,
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KeyType::RsaPssSha256 => "rsa-pss-sha256",
            KeyType::EcdsaP192 => "ecdsa-p192",
            KeyType::EcdsaP521 => "ecdsa-p521",
            KeyType::EcdsaSeededP192 => "ecdsa-seeded-p192",
            KeyType::Ed25519 => "ed25519",
        };
        write!(f, "{}", s)
    }
}

/// A private key able to produce signatures.
pub trait KeySigner {
    type VerifyingKey: KeyVerifier;

    /// Sign `msg`. The result is always exactly `signature_length()` bytes.
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>>;

    /// The public half of this key.
    fn verifying_key(&self) -> Self::VerifyingKey;

    /// Canonical private key encoding, accepted back by the family's
    /// `create_signing_key_from_string`.
    fn serialize(&self) -> Vec<u8>;

    fn signature_length(&self) -> usize;

    fn key_type(&self) -> KeyType;
}

/// A public key able to check signatures.
pub trait KeyVerifier {
    /// Check `sig` over `msg`.
    ///
    /// A signature of the wrong length is a precondition violation; a
    /// signature of the right length that does not verify is `Ok(false)`.
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool>;

    /// Canonical public key encoding, accepted back by the family's
    /// `create_verifying_key_from_string`.
    fn serialize(&self) -> Vec<u8>;

    fn signature_length(&self) -> usize;

    fn key_type(&self) -> KeyType;

    /// `"sha256:"` followed by the hex SHA-256 of [`serialize`](Self::serialize).
    fn key_id(&self) -> String {
        key_id_for(&self.serialize())
    }
}

/// Key id of a serialized public key.
pub fn key_id_for(serialized: &[u8]) -> String {
    let hash = Sha256::digest(serialized);
    format!("sha256:{}", hex::encode(hash))
}

pub(crate) fn check_signature_length(
    algorithm: Algorithm,
    expected: usize,
    sig: &[u8],
) -> Result<()> {
    if sig.len() != expected {
        return Err(Error::precondition(
            algorithm,
            format!(
                "signature is required to be of length {}, but it was {}",
                expected,
                sig.len()
            ),
        ));
    }
    Ok(())
}

/// Panics if a freshly produced signature is not `expected` bytes long.
pub(crate) fn assert_signature_length(algorithm: Algorithm, expected: usize, sig: &[u8]) {
    if sig.len() != expected {
        error!(
            %algorithm,
            expected,
            actual = sig.len(),
            "signature length does not match the key's signature length"
        );
        panic!(
            "{}: signature length {} does not match expected length {}",
            algorithm,
            sig.len(),
            expected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_serde_matches_display() {
        for key_type in [
            KeyType::RsaPssSha256,
            KeyType::EcdsaP192,
            KeyType::EcdsaP521,
            KeyType::EcdsaSeededP192,
            KeyType::Ed25519,
        ] {
            let json = serde_json::to_string(&key_type).unwrap();
            assert_eq!(json, format!("\"{}\"", key_type));
            let parsed: KeyType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, key_type);
        }
    }

    #[test]
    fn test_key_id_format() {
        // SHA-256("abc")
        assert_eq!(
            key_id_for(b"abc"),
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_check_signature_length() {
        assert!(check_signature_length(Algorithm::Ecdsa, 64, &[0u8; 64]).is_ok());

        let err = check_signature_length(Algorithm::Ecdsa, 64, &[0u8; 63]).unwrap_err();
        assert!(err.is_precondition_violation());
        assert_eq!(err.algorithm(), Some(Algorithm::Ecdsa));
    }

    #[test]
    #[should_panic(expected = "does not match expected length")]
    fn test_assert_signature_length_panics() {
        assert_signature_length(Algorithm::RsaPss, 128, &[0u8; 127]);
    }
}
