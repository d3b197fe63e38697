//! Key-size policy, loadable from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Recommended minimum RSA modulus (NESSIE, 2003).
pub const RSA_MIN_KEY_SIZE_BITS: usize = 1536;

/// Smallest modulus that can carry PSS with a SHA-256 salt. Totally insecure,
/// allowed only so tests can generate keys quickly.
pub const RSA_MIN_TEST_KEY_SIZE_BITS: usize = 522;

/// Largest modulus the RSA backend will decode.
pub const RSA_MAX_KEY_SIZE_BITS: usize = 4096;

/// Minimum seed length accepted for seeded RSA generation.
pub const RSA_MIN_SEED_LEN: usize = 8;

/// Size limits applied to RSA key generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RsaPolicy {
    pub min_key_size_bits: usize,
    pub max_key_size_bits: usize,
    pub min_seed_len: usize,
}

impl Default for RsaPolicy {
    fn default() -> Self {
        Self {
            min_key_size_bits: RSA_MIN_KEY_SIZE_BITS,
            max_key_size_bits: RSA_MAX_KEY_SIZE_BITS,
            min_seed_len: RSA_MIN_SEED_LEN,
        }
    }
}

impl RsaPolicy {
    /// Policy with the lowered test-only floor.
    pub fn testing() -> Self {
        Self {
            min_key_size_bits: RSA_MIN_TEST_KEY_SIZE_BITS,
            ..Self::default()
        }
    }

    /// Whether this policy permits moduli below the production floor.
    pub fn is_insecure(&self) -> bool {
        self.min_key_size_bits < RSA_MIN_KEY_SIZE_BITS
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.min_key_size_bits < RSA_MIN_TEST_KEY_SIZE_BITS {
            return Err(Error::Config(format!(
                "rsa.min_key_size_bits must be >= {}, but it was {}",
                RSA_MIN_TEST_KEY_SIZE_BITS, self.min_key_size_bits
            )));
        }
        if self.max_key_size_bits > RSA_MAX_KEY_SIZE_BITS {
            return Err(Error::Config(format!(
                "rsa.max_key_size_bits must be <= {}, but it was {}",
                RSA_MAX_KEY_SIZE_BITS, self.max_key_size_bits
            )));
        }
        if self.min_key_size_bits > self.max_key_size_bits {
            return Err(Error::Config(format!(
                "rsa.min_key_size_bits ({}) exceeds rsa.max_key_size_bits ({})",
                self.min_key_size_bits, self.max_key_size_bits
            )));
        }
        if self.min_seed_len < RSA_MIN_SEED_LEN {
            return Err(Error::Config(format!(
                "rsa.min_seed_len must be >= {}, but it was {}",
                RSA_MIN_SEED_LEN, self.min_seed_len
            )));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub rsa: RsaPolicy,
}

impl Config {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.rsa.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_policy_is_production() {
        let policy = RsaPolicy::default();
        assert_eq!(policy.min_key_size_bits, 1536);
        assert_eq!(policy.max_key_size_bits, 4096);
        assert_eq!(policy.min_seed_len, 8);
        assert!(!policy.is_insecure());
        assert!(RsaPolicy::testing().is_insecure());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"rsa": {"min_key_size_bits": 2048}}"#).unwrap();
        assert_eq!(config.rsa.min_key_size_bits, 2048);
        assert_eq!(config.rsa.max_key_size_bits, RSA_MAX_KEY_SIZE_BITS);
        assert_eq!(config.rsa.min_seed_len, RSA_MIN_SEED_LEN);

        let empty = Config::from_json("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_floor_below_pss_minimum_rejected() {
        let err = Config::from_json(r#"{"rsa": {"min_key_size_bits": 521}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_json(r#"{"rsa": {"min_seed_len": 4}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let json = r#"{"rsa": {"min_key_size_bits": 3000, "max_key_size_bits": 2048}}"#;
        let err = Config::from_json(json).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let config = Config {
            rsa: RsaPolicy::testing(),
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
