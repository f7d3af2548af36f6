//! Text framing of encrypted payloads.
//!
//! ```text
//! CBC:  hex(salt) ':' hex(iv) ':' hex(ciphertext)
//! GCM:  hex(salt) ':' hex(iv) ':' hex(ciphertext) ':' hex(tag)
//! ```
//!
//! The token does not name the algorithm or KDF cost; callers keep those in
//! their settings.

use std::fmt;
use std::str::FromStr;

use crate::error::CryptoError;

/// Field separator.
pub const SEPARATOR: char = ':';

const MIN_FIELDS: usize = 3;
const MAX_FIELDS: usize = 4;

/// A parsed or freshly produced token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherToken {
    salt: Vec<u8>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Option<Vec<u8>>,
}

impl CipherToken {
    pub fn new(salt: Vec<u8>, iv: Vec<u8>, ciphertext: Vec<u8>, tag: Option<Vec<u8>>) -> Self {
        Self {
            salt,
            iv,
            ciphertext,
            tag,
        }
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tag(&self) -> Option<&[u8]> {
        self.tag.as_deref()
    }
}

impl fmt::Display for CipherToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(&self.salt),
            hex::encode(&self.iv),
            hex::encode(&self.ciphertext)
        )?;
        if let Some(tag) = &self.tag {
            write!(f, "{SEPARATOR}{}", hex::encode(tag))?;
        }
        Ok(())
    }
}

impl FromStr for CipherToken {
    type Err = CryptoError;

    /// Parses a token.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedToken`] if:
    /// - there are fewer than 3 or more than 4 fields
    /// - a field is not valid hexadecimal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(SEPARATOR).collect();

        if fields.len() < MIN_FIELDS {
            return Err(CryptoError::MalformedToken(format!(
                "expected at least {MIN_FIELDS} fields, found {}",
                fields.len()
            )));
        }
        if fields.len() > MAX_FIELDS {
            return Err(CryptoError::MalformedToken(format!(
                "expected at most {MAX_FIELDS} fields, found {}",
                fields.len()
            )));
        }

        let salt = decode_field("salt", fields[0])?;
        let iv = decode_field("iv", fields[1])?;
        let ciphertext = decode_field("ciphertext", fields[2])?;
        let tag = fields
            .get(3)
            .map(|field| decode_field("tag", field))
            .transpose()?;

        Ok(Self::new(salt, iv, ciphertext, tag))
    }
}

fn decode_field(name: &str, field: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(field).map_err(|e| CryptoError::MalformedToken(format!("{name} field: {e}")))
}
