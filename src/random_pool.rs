//! Reseedable pseudo-random byte pool.
//!
//! The pool keeps a 32-byte AES-256 key and a 16-byte seed block. New entropy
//! is folded into the key with SHA-256; output is produced by encrypting the
//! seed block in place, one block at a time, and emitting the ciphertext. The
//! seed block keeps evolving across calls and is never reset, so a pool whose
//! state was captured and replayed (for example by a virtual machine snapshot)
//! only diverges from its earlier output once fresh entropy is incorporated.
//! Callers that must resist rollback therefore reseed from the OS before each
//! independent key generation, which is what [`EntropyPool::from_os_entropy`]
//! does.
//!
//! The same pool fed only with a caller-chosen seed is fully deterministic,
//! which is what seeded key generation relies on.
//!
//! A pool that has never incorporated any entropy refuses to produce output
//! rather than emitting bytes derived from the all-zero key.

use std::fmt;

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes256;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::{Algorithm, Error};

const KEY_LEN: usize = 32;
const BLOCK_LEN: usize = 16;

/// Bytes drawn from the OS when seeding a pool for non-deterministic use.
pub const OS_SEED_LEN: usize = 32;

pub struct EntropyPool {
    key: [u8; KEY_LEN],
    seed: [u8; BLOCK_LEN],
    cipher: Option<Aes256>,
    has_entropy: bool,
}

impl EntropyPool {
    /// An empty pool: zeroed key and seed block, cipher unkeyed.
    ///
    /// [`incorporate_entropy`](Self::incorporate_entropy) must be called at
    /// least once before any bytes can be generated.
    pub fn new() -> Self {
        Self {
            key: [0u8; KEY_LEN],
            seed: [0u8; BLOCK_LEN],
            cipher: None,
            has_entropy: false,
        }
    }

    /// A pool seeded with fresh bytes from the operating system's CSPRNG.
    pub fn from_os_entropy() -> Result<Self, Error> {
        let mut os_seed = [0u8; OS_SEED_LEN];
        OsRng.try_fill_bytes(&mut os_seed).map_err(|e| Error::Rng {
            algorithm: Algorithm::RandomPool,
            message: e.to_string(),
        })?;

        let mut pool = Self::new();
        pool.incorporate_entropy(&os_seed);
        os_seed.zeroize();
        Ok(pool)
    }

    /// A pool whose entire entropy is `seed`.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut pool = Self::new();
        pool.incorporate_entropy(seed);
        pool
    }

    /// Fold `input` into the key: `key = SHA-256(key || input)`.
    ///
    /// The cipher is rescheduled lazily on the next generation.
    pub fn incorporate_entropy(&mut self, input: &[u8]) {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(input);
        self.key.copy_from_slice(&hasher.finalize());
        self.cipher = None;
        self.has_entropy = true;
    }

    /// Whether any entropy has been incorporated yet.
    pub fn has_entropy(&self) -> bool {
        self.has_entropy
    }

    /// Fill `out` with pool output.
    pub fn generate_bytes(&mut self, out: &mut [u8]) -> Result<(), Error> {
        if !self.has_entropy {
            return Err(Error::precondition(
                Algorithm::RandomPool,
                "no entropy has been incorporated into the pool",
            ));
        }
        if out.is_empty() {
            return Ok(());
        }

        let key = &self.key;
        let cipher = self
            .cipher
            .get_or_insert_with(|| Aes256::new(GenericArray::from_slice(key)));

        for chunk in out.chunks_mut(BLOCK_LEN) {
            cipher.encrypt_block(GenericArray::from_mut_slice(&mut self.seed));
            chunk.copy_from_slice(&self.seed[..chunk.len()]);
        }
        Ok(())
    }

    /// Convenience wrapper returning `n` freshly generated bytes.
    pub fn generate_vec(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        out.try_reserve_exact(n)?;
        out.resize(n, 0);
        self.generate_bytes(&mut out)?;
        Ok(out)
    }
}

impl Default for EntropyPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EntropyPool {
    fn drop(&mut self) {
        self.key.zeroize();
        self.seed.zeroize();
    }
}

impl fmt::Debug for EntropyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyPool")
            .field("has_entropy", &self.has_entropy)
            .field("keyed", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

// `fill_bytes` panics when the pool refuses to generate, the same contract
// `OsRng` follows when the OS source fails. Use `try_fill_bytes` to observe
// the error instead.
impl RngCore for EntropyPool {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.generate_bytes(dest) {
            panic!("EntropyPool: {}", err);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.generate_bytes(dest).map_err(rand::Error::new)
    }
}

impl CryptoRng for EntropyPool {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_pool_fails_closed() {
        let mut pool = EntropyPool::new();
        assert!(!pool.has_entropy());

        let mut out = [0u8; 16];
        let err = pool.generate_bytes(&mut out).unwrap_err();
        assert!(err.is_precondition_violation());
        assert_eq!(err.algorithm(), Some(Algorithm::RandomPool));
        assert!(pool.try_fill_bytes(&mut out).is_err());
    }

    #[test]
    #[should_panic(expected = "EntropyPool: ")]
    fn test_fresh_pool_fill_bytes_panics() {
        let mut pool = EntropyPool::new();
        let mut out = [0u8; 8];
        pool.fill_bytes(&mut out);
    }

    #[test]
    fn test_empty_request_still_requires_entropy() {
        let mut pool = EntropyPool::new();
        assert!(pool.generate_bytes(&mut []).is_err());

        pool.incorporate_entropy(b"some seed");
        assert!(pool.generate_bytes(&mut []).is_ok());
    }

    #[test]
    fn test_seeded_pool_is_deterministic() {
        let a = EntropyPool::from_seed(b"01234567").generate_vec(100).unwrap();
        let b = EntropyPool::from_seed(b"01234567").generate_vec(100).unwrap();
        assert_eq!(a, b);

        let c = EntropyPool::from_seed(b"01234568").generate_vec(100).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_first_block_matches_construction() {
        // key = SHA-256(zero key || seed); output = AES-256(key, zero block)
        let seed = b"construction check";
        let mut hasher = Sha256::new();
        hasher.update([0u8; KEY_LEN]);
        hasher.update(seed);
        let key = hasher.finalize();

        let cipher = Aes256::new(GenericArray::from_slice(&key));
        let mut block = GenericArray::clone_from_slice(&[0u8; BLOCK_LEN]);
        cipher.encrypt_block(&mut block);

        let out = EntropyPool::from_seed(seed).generate_vec(BLOCK_LEN).unwrap();
        assert_eq!(out.as_slice(), block.as_slice());
    }

    #[test]
    fn test_chunked_generation_matches_one_shot_on_block_boundaries() {
        let one_shot = EntropyPool::from_seed(b"chunking").generate_vec(64).unwrap();

        let mut pool = EntropyPool::from_seed(b"chunking");
        let mut chunked = Vec::new();
        for _ in 0..4 {
            chunked.extend(pool.generate_vec(16).unwrap());
        }
        assert_eq!(one_shot, chunked);
    }

    #[test]
    fn test_partial_block_discards_remainder() {
        // A 5-byte request consumes a whole block; the next request starts
        // from the following block.
        let full = EntropyPool::from_seed(b"partial").generate_vec(32).unwrap();

        let mut pool = EntropyPool::from_seed(b"partial");
        let head = pool.generate_vec(5).unwrap();
        let next = pool.generate_vec(16).unwrap();
        assert_eq!(head.as_slice(), &full[..5]);
        assert_eq!(next.as_slice(), &full[16..32]);
    }

    #[test]
    fn test_reseeding_changes_stream() {
        let mut a = EntropyPool::from_seed(b"rollback");
        let mut b = EntropyPool::from_seed(b"rollback");
        let _ = a.generate_vec(16).unwrap();
        let _ = b.generate_vec(16).unwrap();

        b.incorporate_entropy(b"fresh");
        assert_ne!(a.generate_vec(16).unwrap(), b.generate_vec(16).unwrap());
    }

    #[test]
    fn test_seed_block_survives_reseed() {
        // Incorporating the same entropy into pools at different stream
        // positions must not make them converge.
        let mut a = EntropyPool::from_seed(b"position");
        let mut b = EntropyPool::from_seed(b"position");
        let _ = b.generate_vec(16).unwrap();

        a.incorporate_entropy(b"extra");
        b.incorporate_entropy(b"extra");
        assert_ne!(a.generate_vec(16).unwrap(), b.generate_vec(16).unwrap());
    }

    #[test]
    fn test_os_pools_differ() {
        let a = EntropyPool::from_os_entropy().unwrap().generate_vec(32).unwrap();
        let b = EntropyPool::from_os_entropy().unwrap().generate_vec(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_redacts_key() {
        let pool = EntropyPool::from_seed(b"secret seed");
        let debug = format!("{:?}", pool);
        assert!(debug.contains("has_entropy: true"));
        assert!(!debug.contains("key:"));
    }
}
