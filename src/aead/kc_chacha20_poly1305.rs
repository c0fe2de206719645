//! # Key-Committing ChaCha20-Poly1305
//!
//! Standard ChaCha20-Poly1305 leaves a gap: Poly1305 is not collision
//! resistant, so a ciphertext can be crafted that authenticates under more
//! than one key. For password-protected key containers that matters — a
//! container must prove it was sealed under exactly one key.
//!
//! This construction closes the gap by prefixing the ciphertext with the
//! first 32 keystream bytes of `(key, nonce)`. A decryptor recomputes the
//! prefix from its own key and rejects before touching the tag if it
//! differs; only a party holding the original key can produce a matching
//! prefix.
//!
//! ## Format
//!
//! `commitment (32) || ciphertext (|plaintext|) || tag (16)`
//!
//! The tag is the RFC 8439 Poly1305 transcript over the associated data
//! and the ciphertext, keyed with the schedule's `mac_key` slot.

use zeroize::Zeroizing;

use crate::aead::SubKeys;
use crate::config::{COMMITMENT_SIZE, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::{Error, Result};
use crate::primitives::{chacha, constant_time, mac};

/// Bytes added to every sealed message.
pub const OVERHEAD: usize = COMMITMENT_SIZE + TAG_SIZE;

/// Seals `plaintext` under `(key, nonce)`, binding `associated_data`.
///
/// The caller owns `nonce` uniqueness: sealing two messages under the same
/// `(key, nonce)` pair forfeits confidentiality and authenticity.
#[must_use]
pub fn encrypt(plaintext: &[u8], nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE], associated_data: &[u8]) -> Vec<u8> {
    let keys = SubKeys::derive(nonce, key);

    let mut output = vec![0u8; COMMITMENT_SIZE + plaintext.len() + TAG_SIZE];
    output[..COMMITMENT_SIZE].copy_from_slice(&keys.commitment);

    let ciphertext_end = COMMITMENT_SIZE + plaintext.len();
    output[COMMITMENT_SIZE..ciphertext_end].copy_from_slice(plaintext);
    chacha::xor(&mut output[COMMITMENT_SIZE..ciphertext_end], nonce, &keys.enc_key, 1);

    let tag = mac::compute(&keys.mac_key, associated_data, &output[COMMITMENT_SIZE..ciphertext_end]);
    output[ciphertext_end..].copy_from_slice(&tag);
    output
}

/// Opens a sealed message, verifying the commitment and then the tag.
///
/// # Errors
/// Returns `InvalidFormat` when the input cannot even hold the overhead,
/// and `Cryptographic` when either check fails — without revealing which.
pub fn decrypt(input: &[u8], nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE], associated_data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if input.len() < OVERHEAD {
        return Err(Error::InvalidFormat("ciphertext shorter than commitment and tag"));
    }

    let keys = SubKeys::derive(nonce, key);
    let (commitment, rest) = input.split_at(COMMITMENT_SIZE);
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_SIZE);

    // The commitment gate runs first: a wrong key is rejected here, before
    // any MAC computation under subkeys that key could have chosen.
    if !constant_time::eq(commitment, &keys.commitment) {
        return Err(Error::Cryptographic);
    }

    let expected_tag = mac::compute(&keys.mac_key, associated_data, ciphertext);
    if !constant_time::eq(tag, &expected_tag) {
        return Err(Error::Cryptographic);
    }

    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    chacha::xor(&mut plaintext, nonce, &keys.enc_key, 1);
    Ok(plaintext)
}
