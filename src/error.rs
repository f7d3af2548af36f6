use thiserror::Error;

use crate::crypto::Algorithm;

/// Errors returned by [`encrypt`](crate::encrypt) and [`decrypt`](crate::decrypt).
///
/// Configuration problems, malformed input and authentication failures are
/// separate variants so callers can decide whether to re-prompt for a
/// password or fix their settings.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("input must not be empty")]
    EmptyInput,

    #[error("unsupported algorithm '{0}'")]
    InvalidAlgorithm(String),

    #[error("{algorithm} requires a {expected}-byte key, got {actual}")]
    KeyLengthMismatch {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    #[error("{algorithm} requires a {expected}-byte IV, got {actual}")]
    IvLengthMismatch {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    #[error("PBKDF2 iteration count must be >= 1")]
    InvalidIterations,

    #[error("salt length must be between 1 and {} bytes", crate::crypto::MAX_SALT_LEN)]
    InvalidSaltLength,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token has no authentication tag")]
    MissingAuthTag,

    #[error("invalid password or corrupted data (authentication failed)")]
    AuthenticationFailed,

    #[error("invalid password or corrupted data (bad padding)")]
    PaddingOrKeyError,

    #[error("OS random generator unavailable")]
    RandomSource,

    #[error("encryption failed: {0}")]
    EncryptionFailed(&'static str),
}

impl CryptoError {
    /// `true` for the two "wrong password or tampered token" outcomes.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            CryptoError::AuthenticationFailed | CryptoError::PaddingOrKeyError
        )
    }

    /// `true` when the settings supplied by the caller are at fault.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidAlgorithm(_)
                | CryptoError::KeyLengthMismatch { .. }
                | CryptoError::IvLengthMismatch { .. }
                | CryptoError::InvalidIterations
                | CryptoError::InvalidSaltLength
        )
    }
}
