//! The fixed table of supported ciphers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Block cipher mode of an [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Cbc,
    Gcm,
}

/// One of the six supported AES variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-192-cbc")]
    Aes192Cbc,
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
    #[serde(rename = "aes-128-gcm")]
    Aes128Gcm,
    #[serde(rename = "aes-192-gcm")]
    Aes192Gcm,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Aes128Cbc,
        Algorithm::Aes192Cbc,
        Algorithm::Aes256Cbc,
        Algorithm::Aes128Gcm,
        Algorithm::Aes192Gcm,
        Algorithm::Aes256Gcm,
    ];

    pub fn mode(self) -> Mode {
        match self {
            Algorithm::Aes128Cbc | Algorithm::Aes192Cbc | Algorithm::Aes256Cbc => Mode::Cbc,
            Algorithm::Aes128Gcm | Algorithm::Aes192Gcm | Algorithm::Aes256Gcm => Mode::Gcm,
        }
    }

    /// Required key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Algorithm::Aes128Cbc | Algorithm::Aes128Gcm => 16,
            Algorithm::Aes192Cbc | Algorithm::Aes192Gcm => 24,
            Algorithm::Aes256Cbc | Algorithm::Aes256Gcm => 32,
        }
    }

    /// Required IV length in bytes.
    pub fn iv_len(self) -> usize {
        match self.mode() {
            Mode::Cbc => 16,
            Mode::Gcm => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Aes128Cbc => "aes-128-cbc",
            Algorithm::Aes192Cbc => "aes-192-cbc",
            Algorithm::Aes256Cbc => "aes-256-cbc",
            Algorithm::Aes128Gcm => "aes-128-gcm",
            Algorithm::Aes192Gcm => "aes-192-gcm",
            Algorithm::Aes256Gcm => "aes-256-gcm",
        }
    }

    /// Checks caller-supplied lengths against this algorithm.
    ///
    /// Must pass before any key is derived or cipher built.
    pub fn validate(self, key_len: usize, iv_len: usize) -> Result<(), CryptoError> {
        if key_len != self.key_len() {
            return Err(CryptoError::KeyLengthMismatch {
                algorithm: self,
                expected: self.key_len(),
                actual: key_len,
            });
        }
        if iv_len != self.iv_len() {
            return Err(CryptoError::IvLengthMismatch {
                algorithm: self,
                expected: self.iv_len(),
                actual: iv_len,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CryptoError::InvalidAlgorithm(s.to_string()))
    }
}
