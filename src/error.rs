//! Error types for the classicrypt library.

use thiserror::Error;

/// Errors produced by the classicrypt library.
///
/// Every variant is recoverable; the engine never panics or writes
/// diagnostics on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassiCryptError {
    /// `p` or `q` is not prime, the two are equal, or `p * q` overflows.
    #[error("Invalid prime {value}: {reason}")]
    InvalidPrime { value: u64, reason: &'static str },

    /// The public exponent is out of `(1, phi)` or shares a factor with `phi`.
    #[error("Public exponent {e} is not valid for phi = {phi}")]
    InvalidPublicExponent { e: u64, phi: u64 },

    /// Requested random prime size is outside the supported bit range.
    #[error("Prime size must be between 3 and 32 bits, got {bits}")]
    InvalidPrimeSize { bits: u32 },

    /// Extended Euclid found `gcd(value, modulus) != 1`.
    #[error("{value} has no multiplicative inverse modulo {modulus}")]
    NoInverseExists { value: u64, modulus: u64 },

    /// A character code does not fit below the modulus, or a decoded value
    /// is not a Unicode scalar value.
    #[error("Character code {code} is out of range for modulus {modulus}")]
    CharacterOutOfRange { code: u64, modulus: u64 },

    /// Ciphertext cannot be consumed as given.
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Grid order other than 5 or 6.
    #[error("Grid order must be 5 or 6, got {0}")]
    InvalidGridOrder(usize),

    /// Filler symbol that is not in the grid, or primary equal to alternate.
    #[error("Filler '{0}' cannot be used with this grid")]
    InvalidFiller(char),

    /// Stored key material is inconsistent.
    #[error("Invalid key file: {0}")]
    InvalidKeyFile(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ClassiCryptError {
    fn from(err: std::io::Error) -> Self {
        ClassiCryptError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClassiCryptError {
    fn from(err: serde_json::Error) -> Self {
        ClassiCryptError::Serialization(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClassiCryptError>;
