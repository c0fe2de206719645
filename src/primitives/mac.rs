//! Poly1305 message authentication.
//!
//! Implements the RFC 8439 AEAD transcript: the associated data and the
//! ciphertext are each zero-padded to a 16-byte boundary, followed by one
//! final block carrying both lengths as little-endian 64-bit words.

use poly1305::Poly1305;
use poly1305::universal_hash::crypto_common::Block;
use poly1305::universal_hash::{KeyInit, UniversalHash};

use crate::config::{KEY_SIZE, TAG_SIZE};

/// Computes the RFC 8439 Poly1305 tag over `associated_data` and
/// `ciphertext` under a one-time `key`.
///
/// The key must never authenticate more than one message; callers derive a
/// fresh one per `(key, nonce)` pair from the cipher keystream.
#[must_use]
pub fn compute(key: &[u8; KEY_SIZE], associated_data: &[u8], ciphertext: &[u8]) -> [u8; TAG_SIZE] {
    let mut mac = Poly1305::new(key.into());
    mac.update_padded(associated_data);
    mac.update_padded(ciphertext);

    let mut lengths = Block::<Poly1305>::default();
    lengths[..8].copy_from_slice(&(associated_data.len() as u64).to_le_bytes());
    lengths[8..].copy_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    mac.update(&[lengths]);

    mac.finalize().into()
}
