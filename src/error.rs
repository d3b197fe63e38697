use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{algorithm}: Precondition violation: {message}")]
    PreconditionViolation { algorithm: Algorithm, message: String },

    #[error("{algorithm}: Corrupt data: {message}")]
    CorruptData { algorithm: Algorithm, message: String },

    #[error("Out of memory")]
    OutOfMemory,

    #[error("{algorithm}: Random number generator failure: {message}")]
    Rng { algorithm: Algorithm, message: String },

    #[error("{algorithm}: {message}")]
    Backend { algorithm: Algorithm, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn precondition(algorithm: Algorithm, message: impl Into<String>) -> Self {
        Error::PreconditionViolation {
            algorithm,
            message: message.into(),
        }
    }

    pub(crate) fn corrupt(algorithm: Algorithm, message: impl Into<String>) -> Self {
        Error::CorruptData {
            algorithm,
            message: message.into(),
        }
    }

    pub(crate) fn backend(algorithm: Algorithm, err: impl std::fmt::Display) -> Self {
        Error::Backend {
            algorithm,
            message: err.to_string(),
        }
    }

    /// The algorithm that raised this error, if it came from a primitive.
    pub fn algorithm(&self) -> Option<Algorithm> {
        match self {
            Error::PreconditionViolation { algorithm, .. }
            | Error::CorruptData { algorithm, .. }
            | Error::Rng { algorithm, .. }
            | Error::Backend { algorithm, .. } => Some(*algorithm),
            _ => None,
        }
    }

    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Error::PreconditionViolation { .. })
    }

    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Error::CorruptData { .. })
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Tags an error with the primitive that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Algorithm {
    #[serde(rename = "rsa-pss-sha256")]
    RsaPss,
    #[serde(rename = "ecdsa")]
    Ecdsa,
    #[serde(rename = "ecdsa-seeded")]
    EcdsaSeeded,
    #[serde(rename = "ed25519")]
    Ed25519,
    #[serde(rename = "random-pool")]
    RandomPool,
    #[serde(rename = "aes")]
    Aes,
    #[serde(rename = "xsalsa20")]
    XSalsa20,
    #[serde(rename = "chacha20")]
    ChaCha20,
    #[serde(rename = "sha256")]
    Sha256,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Algorithm::RsaPss => "rsa-pss-sha256",
            Algorithm::Ecdsa => "ecdsa",
            Algorithm::EcdsaSeeded => "ecdsa-seeded",
            Algorithm::Ed25519 => "ed25519",
            Algorithm::RandomPool => "random-pool",
            Algorithm::Aes => "aes",
            Algorithm::XSalsa20 => "xsalsa20",
            Algorithm::ChaCha20 => "chacha20",
            Algorithm::Sha256 => "sha256",
        };
        write!(f, "{}", s)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
