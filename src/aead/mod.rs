//! # Authenticated Encryption Constructions
//!
//! Two purpose-built AEADs assembled from the raw primitives:
//!
//! - [`kc_chacha20_poly1305`] — ChaCha20-Poly1305 with an explicit 32-byte
//!   key commitment. Used for password-protected key containers, where a
//!   ciphertext that opens under two different keys would let an attacker
//!   swap key material undetected.
//! - [`chacha20_blake2b`] — ChaCha20 Encrypt-then-MAC with a keyed BLAKE2b
//!   tag. Used for the encrypted file header and every content chunk.
//!
//! ## Subkey schedule
//!
//! Both constructions draw 96 bytes of ChaCha20 keystream under
//! `(key, nonce)` at block counter 0 and split it into
//! `commitment (32) || mac_key (32) || enc_key (32)`. Payload encryption
//! runs under `enc_key` from block counter 1. The commitment bytes are a
//! pure function of `(key, nonce)` and independent of the plaintext; the
//! committing construction emits them, the Encrypt-then-MAC one discards
//! them.
//!
//! ## Nonce discipline
//!
//! Callers own the nonce and must never reuse one under the same key. The
//! streaming layer chains nonces with a constant-time little-endian
//! increment; the key containers use a fixed zero nonce under a
//! single-use derived key.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{COMMITMENT_SIZE, KEY_SIZE, NONCE_SIZE, X_NONCE_SIZE};
use crate::primitives::chacha;

pub mod chacha20_blake2b;
pub mod kc_chacha20_poly1305;

/// Length of keystream consumed by the subkey schedule.
const SUBKEY_STREAM_SIZE: usize = COMMITMENT_SIZE + 2 * KEY_SIZE;

/// Per-message subkeys carved out of keystream block 0 (and half of
/// block 1). Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct SubKeys {
    pub commitment: [u8; COMMITMENT_SIZE],
    pub mac_key: [u8; KEY_SIZE],
    pub enc_key: [u8; KEY_SIZE],
}

impl SubKeys {
    /// Derives the schedule from the IETF ChaCha20 keystream.
    pub fn derive(nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE]) -> Self {
        let mut stream = [0u8; SUBKEY_STREAM_SIZE];
        chacha::keystream(&mut stream, nonce, key, 0);
        Self::split(&mut stream)
    }

    /// Derives the schedule from the XChaCha20 keystream (legacy container).
    pub fn derive_x(nonce: &[u8; X_NONCE_SIZE], key: &[u8; KEY_SIZE]) -> Self {
        let mut stream = [0u8; SUBKEY_STREAM_SIZE];
        chacha::x_keystream(&mut stream, nonce, key, 0);
        Self::split(&mut stream)
    }

    fn split(stream: &mut [u8; SUBKEY_STREAM_SIZE]) -> Self {
        let mut keys = Self { commitment: [0u8; COMMITMENT_SIZE], mac_key: [0u8; KEY_SIZE], enc_key: [0u8; KEY_SIZE] };
        keys.commitment.copy_from_slice(&stream[..COMMITMENT_SIZE]);
        keys.mac_key.copy_from_slice(&stream[COMMITMENT_SIZE..COMMITMENT_SIZE + KEY_SIZE]);
        keys.enc_key.copy_from_slice(&stream[COMMITMENT_SIZE + KEY_SIZE..]);
        stream.zeroize();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subkeys_depend_on_key_and_nonce() {
        let base = SubKeys::derive(&[0u8; NONCE_SIZE], &[0u8; KEY_SIZE]);
        let other_key = SubKeys::derive(&[0u8; NONCE_SIZE], &[1u8; KEY_SIZE]);
        let other_nonce = SubKeys::derive(&[1u8; NONCE_SIZE], &[0u8; KEY_SIZE]);

        assert_ne!(base.commitment, other_key.commitment);
        assert_ne!(base.commitment, other_nonce.commitment);
    }

    #[test]
    fn test_subkeys_are_pairwise_distinct() {
        let keys = SubKeys::derive(&[7u8; NONCE_SIZE], &[9u8; KEY_SIZE]);
        assert_ne!(keys.commitment, keys.mac_key);
        assert_ne!(keys.mac_key, keys.enc_key);
        assert_ne!(keys.commitment, keys.enc_key);
    }
}
