//! Cryptographic primitives.
//!
//! Provides the algorithm table, key derivation, and the AES-CBC / AES-GCM
//! one-shot ciphers.

pub mod algorithm;
pub mod cipher;
pub mod kdf;

pub use algorithm::{Algorithm, Mode};
pub use cipher::{Sealed, open, random_bytes, seal};
pub use kdf::{DEFAULT_ITERATIONS, derive_key};

/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
/// Default salt length (32 bytes).
pub const DEFAULT_SALT_LEN: usize = 32;
/// Largest accepted salt length (1 KiB).
pub const MAX_SALT_LEN: usize = 1024;
