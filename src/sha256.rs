//! Incremental SHA-256.

use sha2::{Digest, Sha256};

use crate::error::{Algorithm, Error, Result};

pub const DIGEST_LEN: usize = 32;

/// SHA-256 of `data` in one call.
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// A SHA-256 hasher that can be fed in pieces.
///
/// Once [`digest`](Self::digest) has been called the hasher is finished:
/// further `update` calls are rejected, and `digest` keeps returning the
/// same value.
#[derive(Debug, Clone, Default)]
pub struct Sha256Hasher {
    hasher: Sha256,
    digest: Option<[u8; DIGEST_LEN]>,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hasher that has already absorbed `msg`.
    pub fn with_message(msg: &[u8]) -> Self {
        let mut hasher = Self::new();
        hasher.hasher.update(msg);
        hasher
    }

    pub fn update(&mut self, msg: &[u8]) -> Result<()> {
        if self.digest.is_some() {
            return Err(Error::precondition(
                Algorithm::Sha256,
                "digest() has been called on this hasher, so update() is no longer allowed",
            ));
        }
        self.hasher.update(msg);
        Ok(())
    }

    pub fn digest(&mut self) -> [u8; DIGEST_LEN] {
        match self.digest {
            Some(digest) => digest,
            None => {
                let digest: [u8; DIGEST_LEN] = self.hasher.finalize_reset().into();
                self.digest = Some(digest);
                digest
            }
        }
    }

    /// Lowercase hex of [`digest`](Self::digest).
    pub fn hexdigest(&mut self) -> String {
        hex::encode(self.digest())
    }
}
