//! # seedsign
//!
//! Signing keys that can be regenerated from a seed, on top of the RustCrypto
//! primitives.
//!
//! seedsign wraps RSA-PSS, ECDSA and Ed25519 behind one small key API and adds a
//! deterministic generation path: the same seed always yields the same key
//! pair. It also carries thin, validated wrappers for AES-CTR, XSalsa20,
//! XChaCha20 and SHA-256.
//!
//! ## Features
//!
//! - **RSA-PSS-SHA256**: Random or seed-derived keys, PKCS#8 and SPKI DER encodings
//! - **ECDSA P-192 / P-521**: Raw scalar private keys, SPKI DER public keys
//! - **Seeded ECDSA**: 12-byte seeds, 25-byte public keys, 48-byte signatures
//! - **Ed25519**: 32-byte seeds, 32-byte public keys, 64-byte signatures
//! - **Entropy Pool**: AES-256 based generator, reseedable from the OS or a seed
//! - **Key Descriptors**: JSON descriptors with `sha256:` key ids
//! - **Stream Ciphers and Hashing**: AES-CTR, XSalsa20, XChaCha20, SHA-256
//!
//! ## Quick Start
//!
//! ```rust
//! use seedsign::ecdsa_seeded;
//! use seedsign::keys::{KeySigner, KeyVerifier};
//!
//! // The same 12-byte seed always gives the same key
//! let key = ecdsa_seeded::SigningKey::from_seed(b"0123456789ab").unwrap();
//! let verifying_key = key.verifying_key();
//!
//! let signature = key.sign(b"Hello, World!").unwrap();
//! assert!(verifying_key.verify(b"Hello, World!", &signature).unwrap());
//!
//! // Public keys travel as 25 compressed bytes
//! let encoded = verifying_key.serialize();
//! let restored = ecdsa_seeded::create_verifying_key_from_string(&encoded).unwrap();
//! assert_eq!(restored.key_id(), verifying_key.key_id());
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result<T, Error>`](Error). Errors from a
//! primitive carry an [`Algorithm`] tag; out-of-contract input is reported as
//! [`Error::PreconditionViolation`] and malformed encodings as
//! [`Error::CorruptData`].
//!
//! ## Logging
//!
//! Key generation and derivation emit [`tracing`] events. No subscriber is
//! installed by the library.

pub mod config;
pub mod core;
pub mod derive;
pub mod ecdsa;
pub mod ecdsa_seeded;
pub mod ed25519;
pub mod error;
pub mod keys;
pub mod random_pool;
pub mod rsa_pss;
pub mod sha256;
pub mod stream;

pub use config::{Config, RsaPolicy};
pub use crate::core::PublicKeyInfo;
pub use error::{Algorithm, Error, Result};
pub use keys::{KeySigner, KeyType, KeyVerifier};
pub use random_pool::EntropyPool;
