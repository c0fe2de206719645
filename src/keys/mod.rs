//! # Key Material
//!
//! Everything that turns user-supplied secrets into 32-byte engine keys:
//!
//! - [`private_key`] — the password-protected, versioned private-key
//!   container (Argon2id + committing AEAD)
//! - [`symmetric`] — resolution of a user string into a symmetric key:
//!   base64 key strings, keyfiles, keyfile generation, or a fresh random key
//! - [`asymmetric`] — loading and validation of base64 Curve25519/Ed25519
//!   key files
//!
//! Loaders that merely validate user input log a warning and return
//! `None`; cryptographic failures deeper in propagate as errors.

pub mod asymmetric;
pub mod private_key;
pub mod symmetric;
