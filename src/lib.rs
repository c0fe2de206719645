//! Kryptor core — chunked authenticated file encryption.
//!
//! The engine behind the Kryptor file encryption utility:
//! - ChaCha20-BLAKE2b chunked streaming with chained nonces
//! - A key-committing ChaCha20-Poly1305 construction for key containers
//! - Argon2id password hardening
//! - Symmetric keys from base64 strings or hashed keyfiles
//! - Versioned, password-protected private-key containers
//!
//! Command-line parsing, console output, directory traversal, and signing
//! live in the surrounding application; this crate consumes paths and key
//! material and moves bytes.

pub mod aead;
pub mod config;
pub mod error;
pub mod file;
pub mod header;
pub mod keys;
pub mod options;
pub mod primitives;
pub mod secret;
pub mod stream;

pub use error::{Error, Result};
pub use options::EngineOptions;
