//! ECDSA signatures over NIST P-192 (Tiger) and P-521 (SHA-512).
//!
//! Private keys serialize as the raw big-endian secret scalar, public keys as
//! X.509 SubjectPublicKeyInfo DER, and signatures as fixed-width `r || s`.

use std::fmt;

use ecdsa_core::hazmat::sign_prehashed;
use p192::ecdsa::signature::hazmat::PrehashVerifier;
use p192::elliptic_curve::{NonZeroScalar, PublicKey, SecretKey};
use p192::pkcs8::{DecodePublicKey, EncodePublicKey};
use p192::NistP192;
use p521::ecdsa::signature::{RandomizedSigner, Verifier};
use tiger::{Digest, Tiger};
use tracing::debug;

use crate::error::{Algorithm, Error, Result};
use crate::keys::{
    assert_signature_length, check_signature_length, KeySigner, KeyType, KeyVerifier,
};
use crate::random_pool::EntropyPool;

const ALG: Algorithm = Algorithm::Ecdsa;

/// Supported prime curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    P192,
    P521,
}

impl Curve {
    /// Look up a curve by its size in bits. Only 192 and 521 are supported.
    pub fn from_size_in_bits(size_in_bits: usize) -> Result<Self> {
        match size_in_bits {
            192 => Ok(Curve::P192),
            521 => Ok(Curve::P521),
            other => Err(Error::precondition(
                ALG,
                format!("size in bits is required to be 192 or 521, but it was {}", other),
            )),
        }
    }

    pub fn size_in_bits(&self) -> usize {
        match self {
            Curve::P192 => 192,
            Curve::P521 => 521,
        }
    }

    /// Byte length of a serialized secret scalar.
    pub fn scalar_len(&self) -> usize {
        match self {
            Curve::P192 => 24,
            Curve::P521 => 66,
        }
    }

    /// Byte length of an `r || s` signature.
    pub fn signature_length(&self) -> usize {
        2 * self.scalar_len()
    }

    fn from_scalar_len(len: usize) -> Result<Self> {
        match len {
            24 => Ok(Curve::P192),
            66 => Ok(Curve::P521),
            other => Err(Error::corrupt(
                ALG,
                format!(
                    "secret scalar is required to be of length 24 or 66, but it was {}",
                    other
                ),
            )),
        }
    }
}

/// Curve and point encoding shared by both halves of a key pair.
#[derive(Debug, PartialEq, Eq)]
pub struct DomainParameters {
    pub curve: Curve,
    /// Whether public points are written in compressed SEC1 form.
    pub point_compression: bool,
}

pub static P192: DomainParameters = DomainParameters {
    curve: Curve::P192,
    point_compression: false,
};

pub static P521: DomainParameters = DomainParameters {
    curve: Curve::P521,
    point_compression: false,
};

/// P-192 with compressed points, used by the seeded variant.
pub static P192_COMPRESSED: DomainParameters = DomainParameters {
    curve: Curve::P192,
    point_compression: true,
};

impl DomainParameters {
    fn for_curve(curve: Curve) -> &'static DomainParameters {
        match curve {
            Curve::P192 => &P192,
            Curve::P521 => &P521,
        }
    }
}

/// Sign the Tiger digest of `msg` on P-192 with a nonce drawn from `rng`.
pub(crate) fn sign_p192_tiger(
    algorithm: Algorithm,
    secret: &SecretKey<NistP192>,
    msg: &[u8],
    rng: &mut EntropyPool,
) -> Result<Vec<u8>> {
    let z = p192::FieldBytes::clone_from_slice(&Tiger::digest(msg));
    let d = secret.to_nonzero_scalar();
    let k = NonZeroScalar::<NistP192>::random(rng);
    let (sig, _) =
        sign_prehashed::<NistP192, _>(&*d, *k, &z).map_err(|e| Error::backend(algorithm, e))?;
    Ok(sig.to_bytes().to_vec())
}

/// Check a P-192 `r || s` signature over the Tiger digest of `msg`.
///
/// Encodings that are not a valid pair of scalars verify as `false`.
pub(crate) fn verify_p192_tiger(
    vk: &p192::ecdsa::VerifyingKey,
    msg: &[u8],
    sig: &[u8],
) -> bool {
    match p192::ecdsa::Signature::from_slice(sig) {
        Ok(sig) => vk.verify_prehash(&Tiger::digest(msg), &sig).is_ok(),
        Err(_) => false,
    }
}

/// Generate a new ECDSA key pair on the curve of the given size.
///
/// # Arguments
///
/// * `size_in_bits` - 192 for P-192 or 521 for P-521
///
/// # Errors
///
/// Returns a precondition violation for any other size, or an RNG error if
/// the operating system entropy source fails.
pub fn generate(size_in_bits: usize) -> Result<SigningKey> {
    let curve = Curve::from_size_in_bits(size_in_bits)?;
    debug!(size_in_bits, "generating ECDSA key");

    let mut pool = EntropyPool::from_os_entropy()?;
    let inner = match curve {
        Curve::P192 => SigningInner::P192(SecretKey::random(&mut pool)),
        Curve::P521 => SigningInner::P521(p521::ecdsa::SigningKey::random(&mut pool)),
    };
    SigningKey::new(inner)
}

/// Load a signing key from its raw big-endian secret scalar.
///
/// # Arguments
///
/// * `bytes` - 24 bytes for P-192 or 66 bytes for P-521
///
/// # Errors
///
/// Returns corrupt data for any other length, and if the scalar is zero or
/// not below the group order.
pub fn create_signing_key_from_string(bytes: &[u8]) -> Result<SigningKey> {
    let inner = match Curve::from_scalar_len(bytes.len())? {
        Curve::P192 => SecretKey::<NistP192>::from_slice(bytes)
            .map(SigningInner::P192)
            .map_err(|_| Error::corrupt(ALG, "secret scalar is out of range"))?,
        Curve::P521 => p521::ecdsa::SigningKey::from_slice(bytes)
            .map(SigningInner::P521)
            .map_err(|_| Error::corrupt(ALG, "secret scalar is out of range"))?,
    };
    SigningKey::new(inner)
}

/// Load a verifying key from SubjectPublicKeyInfo DER.
///
/// The curve is taken from the encoding.
///
/// # Errors
///
/// Returns corrupt data if the encoding is not a P-192 or P-521 public key.
pub fn create_verifying_key_from_string(der: &[u8]) -> Result<VerifyingKey> {
    if let Ok(pk) = PublicKey::<NistP192>::from_public_key_der(der) {
        return VerifyingKey::new(VerifyingInner::P192(p192::ecdsa::VerifyingKey::from(pk)));
    }
    if let Ok(pk) = p521::PublicKey::from_public_key_der(der) {
        let vk = p521::ecdsa::VerifyingKey::from_affine(*pk.as_affine())
            .map_err(|e| Error::corrupt(ALG, e.to_string()))?;
        return VerifyingKey::new(VerifyingInner::P521(vk));
    }
    Err(Error::corrupt(ALG, "not a P-192 or P-521 SubjectPublicKeyInfo"))
}

enum SigningInner {
    P192(SecretKey<NistP192>),
    P521(p521::ecdsa::SigningKey),
}

#[derive(Clone)]
enum VerifyingInner {
    P192(p192::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl VerifyingInner {
    fn curve(&self) -> Curve {
        match self {
            VerifyingInner::P192(_) => Curve::P192,
            VerifyingInner::P521(_) => Curve::P521,
        }
    }

    fn to_public_key_der(&self) -> Result<Vec<u8>> {
        let doc = match self {
            VerifyingInner::P192(vk) => PublicKey::<NistP192>::from(vk).to_public_key_der(),
            VerifyingInner::P521(vk) => p521::PublicKey::from_affine(*vk.as_affine())
                .map_err(|e| Error::backend(ALG, e))?
                .to_public_key_der(),
        }
        .map_err(|e| Error::backend(ALG, e))?;
        Ok(doc.as_bytes().to_vec())
    }
}

/// An ECDSA private key on P-192 or P-521.
pub struct SigningKey {
    inner: SigningInner,
    public: VerifyingKey,
}

impl SigningKey {
    fn new(inner: SigningInner) -> Result<Self> {
        let public = match &inner {
            SigningInner::P192(sk) => {
                VerifyingInner::P192(p192::ecdsa::VerifyingKey::from(sk.public_key()))
            }
            SigningInner::P521(sk) => VerifyingInner::P521(p521::ecdsa::VerifyingKey::from(sk)),
        };
        Ok(Self {
            inner,
            public: VerifyingKey::new(public)?,
        })
    }

    pub fn curve(&self) -> Curve {
        self.public.curve()
    }

    pub fn domain_parameters(&self) -> &'static DomainParameters {
        self.public.params
    }
}

impl KeySigner for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        let mut pool = EntropyPool::from_os_entropy()?;
        let sig = match &self.inner {
            SigningInner::P192(sk) => sign_p192_tiger(ALG, sk, msg, &mut pool)?,
            SigningInner::P521(sk) => {
                let sig: p521::ecdsa::Signature = sk
                    .try_sign_with_rng(&mut pool, msg)
                    .map_err(|e| Error::backend(ALG, e))?;
                sig.to_bytes().to_vec()
            }
        };
        assert_signature_length(ALG, self.signature_length(), &sig);
        Ok(sig)
    }

    fn verifying_key(&self) -> VerifyingKey {
        self.public.clone()
    }

    fn serialize(&self) -> Vec<u8> {
        match &self.inner {
            SigningInner::P192(sk) => sk.to_bytes().to_vec(),
            SigningInner::P521(sk) => sk.to_bytes().to_vec(),
        }
    }

    fn signature_length(&self) -> usize {
        self.curve().signature_length()
    }

    fn key_type(&self) -> KeyType {
        self.public.key_type()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("curve", &self.curve())
            .finish_non_exhaustive()
    }
}

/// An ECDSA public key on P-192 or P-521.
#[derive(Clone)]
pub struct VerifyingKey {
    inner: VerifyingInner,
    params: &'static DomainParameters,
    der: Vec<u8>,
}

impl VerifyingKey {
    fn new(inner: VerifyingInner) -> Result<Self> {
        Ok(Self {
            der: inner.to_public_key_der()?,
            params: DomainParameters::for_curve(inner.curve()),
            inner,
        })
    }

    pub fn curve(&self) -> Curve {
        self.params.curve
    }

    pub fn domain_parameters(&self) -> &'static DomainParameters {
        self.params
    }
}

impl KeyVerifier for VerifyingKey {
    fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool> {
        check_signature_length(ALG, self.signature_length(), sig)?;
        let valid = match &self.inner {
            VerifyingInner::P192(vk) => verify_p192_tiger(vk, msg, sig),
            VerifyingInner::P521(vk) => match p521::ecdsa::Signature::from_slice(sig) {
                Ok(sig) => vk.verify(msg, &sig).is_ok(),
                Err(_) => false,
            },
        };
        Ok(valid)
    }

    fn serialize(&self) -> Vec<u8> {
        self.der.clone()
    }

    fn signature_length(&self) -> usize {
        self.curve().signature_length()
    }

    fn key_type(&self) -> KeyType {
        match self.curve() {
            Curve::P192 => KeyType::EcdsaP192,
            Curve::P521 => KeyType::EcdsaP521,
        }
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("curve", &self.curve())
            .field("key_id", &self.key_id())
            .finish()
    }
}
