use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, block_padding::Pkcs7,
};
use aes_gcm::aead::{self, AeadInPlace, consts::U12};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use getrandom::fill;
use zeroize::Zeroizing;

use super::{Algorithm, TAG_LEN};
use crate::error::CryptoError;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Output of a single encryption.
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    /// Present for GCM only.
    pub tag: Option<Vec<u8>>,
}

/// Fill buffer with cryptographically secure random bytes
pub fn secure_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    fill(buf).map_err(|_| CryptoError::RandomSource)
}

/// Generate `len` random bytes
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; len];
    secure_random(&mut buf)?;
    Ok(buf)
}

/// Encrypt plaintext in one shot.
///
/// `key` and `iv` must already have been checked with [`Algorithm::validate`].
pub fn seal(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, CryptoError> {
    algorithm.validate(key.len(), iv.len())?;

    match algorithm {
        Algorithm::Aes128Cbc => cbc_seal::<Aes128>(algorithm, key, iv, plaintext),
        Algorithm::Aes192Cbc => cbc_seal::<Aes192>(algorithm, key, iv, plaintext),
        Algorithm::Aes256Cbc => cbc_seal::<Aes256>(algorithm, key, iv, plaintext),
        Algorithm::Aes128Gcm => gcm_seal::<Aes128Gcm>(algorithm, key, iv, plaintext),
        Algorithm::Aes192Gcm => gcm_seal::<Aes192Gcm>(algorithm, key, iv, plaintext),
        Algorithm::Aes256Gcm => gcm_seal::<Aes256Gcm>(algorithm, key, iv, plaintext),
    }
}

/// Decrypt ciphertext in one shot.
///
/// GCM requires `tag`; CBC ignores it.
pub fn open(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: Option<&[u8]>,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    algorithm.validate(key.len(), iv.len())?;

    let plaintext = match algorithm {
        Algorithm::Aes128Cbc => cbc_open::<Aes128>(algorithm, key, iv, ciphertext)?,
        Algorithm::Aes192Cbc => cbc_open::<Aes192>(algorithm, key, iv, ciphertext)?,
        Algorithm::Aes256Cbc => cbc_open::<Aes256>(algorithm, key, iv, ciphertext)?,
        Algorithm::Aes128Gcm => gcm_open::<Aes128Gcm>(algorithm, key, iv, ciphertext, tag)?,
        Algorithm::Aes192Gcm => gcm_open::<Aes192Gcm>(algorithm, key, iv, ciphertext, tag)?,
        Algorithm::Aes256Gcm => gcm_open::<Aes256Gcm>(algorithm, key, iv, ciphertext, tag)?,
    };

    Ok(Zeroizing::new(plaintext))
}

fn key_mismatch(algorithm: Algorithm, key: &[u8]) -> CryptoError {
    CryptoError::KeyLengthMismatch {
        algorithm,
        expected: algorithm.key_len(),
        actual: key.len(),
    }
}

fn cbc_seal<C>(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, CryptoError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| key_mismatch(algorithm, key))?;

    Ok(Sealed {
        ciphertext: encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        tag: None,
    })
}

fn cbc_open<C>(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| key_mismatch(algorithm, key))?;

    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::PaddingOrKeyError)
}

fn gcm_seal<C>(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, CryptoError>
where
    C: AeadInPlace + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| key_mismatch(algorithm, key))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(aead::Nonce::<C>::from_slice(iv), b"", &mut buffer)
        .map_err(|_| CryptoError::EncryptionFailed("plaintext too long for GCM"))?;

    Ok(Sealed {
        ciphertext: buffer,
        tag: Some(tag.to_vec()),
    })
}

fn gcm_open<C>(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: Option<&[u8]>,
) -> Result<Vec<u8>, CryptoError>
where
    C: AeadInPlace + KeyInit,
{
    let tag = tag.ok_or(CryptoError::MissingAuthTag)?;
    if tag.len() != TAG_LEN {
        return Err(CryptoError::MalformedToken(format!(
            "authentication tag must be {TAG_LEN} bytes, got {}",
            tag.len()
        )));
    }

    let cipher = C::new_from_slice(key).map_err(|_| key_mismatch(algorithm, key))?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            aead::Nonce::<C>::from_slice(iv),
            b"",
            &mut buffer,
            aead::Tag::<C>::from_slice(tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(buffer)
}
