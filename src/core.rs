use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keys::{key_id_for, KeyType, KeyVerifier};
use crate::{ecdsa, ecdsa_seeded, ed25519, rsa_pss};

/// Portable description of a public key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    /// Algorithm family of the key
    pub key_type: KeyType,
    /// `"sha256:"` fingerprint of the serialized key
    pub key_id: String,
    /// Base64 of the key's canonical serialization
    pub public_key: String,
}

impl PublicKeyInfo {
    pub fn from_verifying_key(key: &dyn KeyVerifier) -> Self {
        let serialized = key.serialize();
        Self {
            key_type: key.key_type(),
            key_id: key_id_for(&serialized),
            public_key: general_purpose::STANDARD.encode(&serialized),
        }
    }

    /// Rebuild the verifying key this descriptor names.
    ///
    /// Fails with corrupt data if the encoded key does not match `key_type`
    /// or hashes to a different `key_id`.
    pub fn to_verifying_key(&self) -> Result<Box<dyn KeyVerifier>> {
        let bytes = general_purpose::STANDARD.decode(&self.public_key)?;
        let key: Box<dyn KeyVerifier> = match self.key_type {
            KeyType::RsaPssSha256 => Box::new(rsa_pss::create_verifying_key_from_string(&bytes)?),
            KeyType::EcdsaP192 | KeyType::EcdsaP521 => {
                Box::new(ecdsa::create_verifying_key_from_string(&bytes)?)
            }
            KeyType::EcdsaSeededP192 => {
                Box::new(ecdsa_seeded::create_verifying_key_from_string(&bytes)?)
            }
            KeyType::Ed25519 => Box::new(ed25519::create_verifying_key_from_string(&bytes)?),
        };

        let algorithm = self.key_type.algorithm();
        if key.key_type() != self.key_type {
            return Err(Error::corrupt(
                algorithm,
                format!("encoded key is {}, but descriptor says {}", key.key_type(), self.key_type),
            ));
        }
        if key.key_id() != self.key_id {
            return Err(Error::corrupt(
                algorithm,
                format!("key id mismatch: expected {}, computed {}", self.key_id, key.key_id()),
            ));
        }
        Ok(key)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeySigner;

    #[test]
    fn test_seeded_descriptor_round_trip() {
        let key = ecdsa_seeded::SigningKey::from_seed(b"0123456789ab").unwrap();
        let vk = key.verifying_key();
        let info = PublicKeyInfo::from_verifying_key(&vk);

        assert_eq!(info.key_type, KeyType::EcdsaSeededP192);
        assert_eq!(info.key_id, vk.key_id());

        let json = info.to_json().unwrap();
        assert!(json.contains("\"key_type\": \"ecdsa-seeded-p192\""));
        let parsed = PublicKeyInfo::from_json(&json).unwrap();
        assert_eq!(parsed, info);

        let restored = parsed.to_verifying_key().unwrap();
        let sig = key.sign(b"descriptor").unwrap();
        assert!(restored.verify(b"descriptor", &sig).unwrap());
    }

    #[test]
    fn test_ecdsa_descriptor_keeps_curve() {
        let vk = ecdsa::generate(521).unwrap().verifying_key();
        let info = PublicKeyInfo::from_verifying_key(&vk);
        assert_eq!(info.key_type, KeyType::EcdsaP521);

        let restored = info.to_verifying_key().unwrap();
        assert_eq!(restored.key_type(), KeyType::EcdsaP521);
        assert_eq!(restored.signature_length(), 132);
    }

    #[test]
    fn test_rsa_descriptor() {
        let key = rsa_pss::generate_with_policy(522, &crate::config::RsaPolicy::testing()).unwrap();
        let info = PublicKeyInfo::from_verifying_key(&key.verifying_key());
        let restored = info.to_verifying_key().unwrap();

        let sig = key.sign(b"rsa descriptor").unwrap();
        assert!(restored.verify(b"rsa descriptor", &sig).unwrap());
    }

    #[test]
    fn test_key_id_mismatch_is_corrupt() {
        let vk = ecdsa_seeded::generate(192).unwrap().verifying_key();
        let mut info = PublicKeyInfo::from_verifying_key(&vk);
        info.key_id = format!("sha256:{}", "00".repeat(32));

        let err = info.to_verifying_key().err().unwrap();
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn test_key_type_mismatch_is_corrupt() {
        let vk = ecdsa::generate(192).unwrap().verifying_key();
        let mut info = PublicKeyInfo::from_verifying_key(&vk);
        info.key_type = KeyType::EcdsaP521;

        let err = info.to_verifying_key().err().unwrap();
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn test_ed25519_descriptor() {
        let key = ed25519::generate().unwrap();
        let info = PublicKeyInfo::from_verifying_key(&key.verifying_key());
        assert_eq!(info.key_type, KeyType::Ed25519);
        assert!(info.to_json().unwrap().contains("\"key_type\": \"ed25519\""));

        let restored = info.to_verifying_key().unwrap();
        let sig = key.sign(b"ed25519 descriptor").unwrap();
        assert!(restored.verify(b"ed25519 descriptor", &sig).unwrap());
    }

    #[test]
    fn test_truncated_descriptor_key_is_corrupt() {
        let vk = ecdsa_seeded::generate(192).unwrap().verifying_key();
        let mut info = PublicKeyInfo::from_verifying_key(&vk);
        info.public_key = general_purpose::STANDARD.encode(&vk.serialize()[..24]);

        let err = info.to_verifying_key().err().unwrap();
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn test_bad_base64() {
        let info = PublicKeyInfo {
            key_type: KeyType::EcdsaSeededP192,
            key_id: "sha256:".to_string(),
            public_key: "not base64!".to_string(),
        };
        assert!(matches!(info.to_verifying_key(), Err(Error::Base64(_))));
    }

    #[test]
    fn test_unknown_key_type_rejected() {
        let json = r#"{"key_type": "dsa", "key_id": "sha256:00", "public_key": ""}"#;
        assert!(matches!(PublicKeyInfo::from_json(json), Err(Error::Json(_))));
    }
}
