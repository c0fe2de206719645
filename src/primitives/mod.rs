//! # Cryptographic Primitives
//!
//! Thin wrappers over the primitive crates, exposing exactly the operations
//! the engine's constructions are built from:
//!
//! - **Randomness**: OS CSPRNG fills, fixed-size draws, random file names
//! - **Hashing**: BLAKE2b — unkeyed (slices and streams), keyed tags, and
//!   salt/personal key derivation
//! - **Stream cipher**: raw ChaCha20/XChaCha20 keystream with explicit block
//!   counter control
//! - **MAC**: the RFC 8439 Poly1305 transcript
//! - **Key derivation**: Argon2id
//! - **Constant time**: equality, little-endian counter increment, wiping
//!
//! Every secret input is taken by reference so the caller keeps ownership
//! and controls when the bytes are wiped. Nothing in this module decides
//! formats or policy; that belongs to the layers above.

pub mod chacha;
pub mod constant_time;
pub mod hash;
pub mod kdf;
pub mod mac;
pub mod random;
