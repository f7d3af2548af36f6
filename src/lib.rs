//! Password-based AES encryption into portable hex tokens.
//!
//! A key is stretched from the password with PBKDF2-HMAC-SHA256 over a fresh
//! random salt, the payload is encrypted with AES-CBC or AES-GCM, and salt,
//! IV, ciphertext and (for GCM) the tag are written as colon-separated hex.
//!
//! ```no_run
//! use passcrypt::{CipherSettings, decrypt, encrypt};
//!
//! let settings = CipherSettings::default();
//! let token = encrypt(b"correct-horse", b"hello world", &settings)?;
//! let plaintext = decrypt(b"correct-horse", &token, &settings)?;
//! assert_eq!(&*plaintext, b"hello world");
//! # Ok::<(), passcrypt::CryptoError>(())
//! ```

pub mod crypto;
mod error;
pub mod settings;
mod storage;
pub mod token;

pub use crate::crypto::{Algorithm, Mode};
pub use crate::error::CryptoError;
pub use crate::settings::{CipherSettings, default_settings_storage};
pub use crate::storage::Storage;
pub use crate::token::CipherToken;

use zeroize::Zeroizing;

/// Encrypts `plaintext` and returns the token text.
///
/// Settings are validated before any randomness is drawn.
///
/// # Errors
///
/// [`CryptoError::EmptyInput`] for an empty plaintext, a configuration error if
/// `settings` are inconsistent, or [`CryptoError::RandomSource`].
pub fn encrypt(
    password: &[u8],
    plaintext: &[u8],
    settings: &CipherSettings,
) -> Result<String, CryptoError> {
    if plaintext.is_empty() {
        return Err(CryptoError::EmptyInput);
    }
    settings.validate()?;

    let salt = crypto::random_bytes(settings.salt_length)?;
    let iv = crypto::random_bytes(settings.iv_length)?;

    tracing::debug!(
        algorithm = %settings.algorithm,
        iterations = settings.iterations,
        salt_len = salt.len(),
        "encrypting {} bytes",
        plaintext.len()
    );

    let key = crypto::derive_key(password, &salt, settings.iterations, settings.key_length)?;
    let sealed = crypto::seal(settings.algorithm, &key, &iv, plaintext)?;

    Ok(CipherToken::new(salt, iv, sealed.ciphertext, sealed.tag).to_string())
}

/// Decrypts a token produced by [`encrypt`] with the same password and settings.
///
/// Only `algorithm`, `iterations` and `key_length` are read from `settings`;
/// salt and IV come from the token.
///
/// # Errors
///
/// - [`CryptoError::MalformedToken`] if the token cannot be parsed
/// - a configuration error if the settings or the token's IV do not fit the algorithm
/// - [`CryptoError::MissingAuthTag`] for a GCM token without tag
/// - [`CryptoError::AuthenticationFailed`] / [`CryptoError::PaddingOrKeyError`]
///   for a wrong password or tampered token
pub fn decrypt(
    password: &[u8],
    token: &str,
    settings: &CipherSettings,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let token: CipherToken = token.parse()?;

    if settings.iterations < 1 {
        return Err(CryptoError::InvalidIterations);
    }
    settings
        .algorithm
        .validate(settings.key_length, token.iv().len())?;

    if settings.algorithm.mode() == Mode::Cbc && token.tag().is_some() {
        tracing::debug!(algorithm = %settings.algorithm, "ignoring tag field on CBC token");
    }

    tracing::debug!(
        algorithm = %settings.algorithm,
        iterations = settings.iterations,
        salt_len = token.salt().len(),
        "decrypting {} bytes",
        token.ciphertext().len()
    );

    let key = crypto::derive_key(
        password,
        token.salt(),
        settings.iterations,
        settings.key_length,
    )?;

    crypto::open(
        settings.algorithm,
        &key,
        token.iv(),
        token.ciphertext(),
        token.tag(),
    )
}
