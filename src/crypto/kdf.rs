use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Default PBKDF2 round count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive a `key_len`-byte key from `password` with PBKDF2-HMAC-SHA256.
///
/// Deterministic for identical inputs; every call pays the full iteration cost.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if iterations < 1 {
        return Err(CryptoError::InvalidIterations);
    }

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);

    Ok(key)
}
