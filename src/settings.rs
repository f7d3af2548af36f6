//! Cipher settings and their on-disk document.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::crypto::{Algorithm, DEFAULT_ITERATIONS, DEFAULT_SALT_LEN, MAX_SALT_LEN};
use crate::error::CryptoError;
use crate::storage::Storage;

/// File name of the settings document inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Parameters shared by [`encrypt`](crate::encrypt) and [`decrypt`](crate::decrypt).
///
/// A token can only be decrypted with the `algorithm`, `iterations` and
/// `key_length` it was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherSettings {
    pub algorithm: Algorithm,
    pub salt_length: usize,
    pub iv_length: usize,
    pub key_length: usize,
    pub iterations: u32,
}

impl Default for CipherSettings {
    fn default() -> Self {
        Self::for_algorithm(Algorithm::Aes256Gcm)
    }
}

impl CipherSettings {
    /// Defaults with key and IV lengths matching `algorithm`.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            salt_length: DEFAULT_SALT_LEN,
            iv_length: algorithm.iv_len(),
            key_length: algorithm.key_len(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Switches algorithm and resets key/IV lengths to its requirements.
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            iv_length: algorithm.iv_len(),
            key_length: algorithm.key_len(),
            ..self
        }
    }

    pub fn with_iterations(self, iterations: u32) -> Self {
        Self { iterations, ..self }
    }

    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.iterations < 1 {
            return Err(CryptoError::InvalidIterations);
        }
        if !(1..=MAX_SALT_LEN).contains(&self.salt_length) {
            return Err(CryptoError::InvalidSaltLength);
        }
        self.algorithm.validate(self.key_length, self.iv_length)
    }

    /// Loads settings from `storage`, falling back to defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or holds
    /// settings that fail [`CipherSettings::validate`].
    pub fn load(storage: &Storage) -> Result<Self> {
        if !storage.exists() {
            tracing::debug!(path = %storage.path().display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let data = storage.load()?;
        let settings: Self = serde_json::from_slice(&data).with_context(|| {
            format!("failed to parse settings file {}", storage.path().display())
        })?;
        settings
            .validate()
            .with_context(|| format!("invalid settings in {}", storage.path().display()))?;

        Ok(settings)
    }

    /// Validates and writes settings to `storage`.
    pub fn save(&self, storage: &Storage) -> Result<()> {
        self.validate().context("refusing to save invalid settings")?;

        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');
        storage.save(&data)?;
        tracing::debug!(path = %storage.path().display(), "settings saved");
        Ok(())
    }
}

/// Storage for the settings document in the platform config directory.
pub fn default_settings_storage() -> Result<Storage> {
    let project_dirs = ProjectDirs::from("", "", "passcrypt")
        .context("could not determine platform directories")?;

    let path = project_dirs.config_dir().join(SETTINGS_FILE);

    Ok(Storage::new(path))
}
