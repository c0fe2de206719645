//! # ChaCha20-BLAKE2b Encrypt-then-MAC
//!
//! The workhorse AEAD for file headers and content chunks. It shares the
//! subkey schedule with the committing construction but authenticates with
//! a keyed BLAKE2b tag instead of Poly1305, and emits no commitment
//! prefix: file content is always sealed under a fresh random key that
//! exists nowhere outside its own encrypted header, so multi-key
//! ciphertexts are not a concern there.
//!
//! ## Format
//!
//! `ciphertext (|plaintext|) || tag (16)`
//!
//! The tag covers `associated_data || ciphertext || le64(|associated_data|)
//! || le64(|ciphertext|)`; BLAKE2b needs no block padding, so the lengths
//! alone fix the boundary.

use zeroize::Zeroizing;

use crate::aead::SubKeys;
use crate::config::{KEY_SIZE, NONCE_SIZE, TAG_SIZE, X_NONCE_SIZE};
use crate::error::{Error, Result};
use crate::primitives::{chacha, constant_time, hash};

/// Bytes added to every sealed message.
pub const OVERHEAD: usize = TAG_SIZE;

/// Seals `plaintext` under `(key, nonce)`, binding `associated_data`.
///
/// Nonce uniqueness under a given key is the caller's contract.
///
/// # Errors
/// Returns `InvalidFormat` only if the MAC key schedule is rejected, which
/// cannot happen for the fixed sizes used here.
pub fn encrypt(plaintext: &[u8], nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE], associated_data: &[u8]) -> Result<Vec<u8>> {
    let keys = SubKeys::derive(nonce, key);

    let mut output = vec![0u8; plaintext.len() + TAG_SIZE];
    let ciphertext_end = plaintext.len();
    output[..ciphertext_end].copy_from_slice(plaintext);
    chacha::xor(&mut output[..ciphertext_end], nonce, &keys.enc_key, 1);

    let tag = compute_tag(&keys, associated_data, &output[..ciphertext_end])?;
    output[ciphertext_end..].copy_from_slice(&tag);
    Ok(output)
}

/// Opens a sealed message.
///
/// # Errors
/// Returns `InvalidFormat` when the input cannot hold a tag and
/// `Cryptographic` when verification fails.
pub fn decrypt(input: &[u8], nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE], associated_data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let keys = SubKeys::derive(nonce, key);
    let ciphertext = verify(&keys, input, associated_data)?;

    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    chacha::xor(&mut plaintext, nonce, &keys.enc_key, 1);
    Ok(plaintext)
}

/// Opens a message sealed with the extended-nonce variant. Only the
/// version 1 private-key container ever produced these.
///
/// # Errors
/// Same surface as [`decrypt`].
pub fn x_decrypt(input: &[u8], nonce: &[u8; X_NONCE_SIZE], key: &[u8; KEY_SIZE], associated_data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let keys = SubKeys::derive_x(nonce, key);
    let ciphertext = verify(&keys, input, associated_data)?;

    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    chacha::x_xor(&mut plaintext, nonce, &keys.enc_key, 1);
    Ok(plaintext)
}

/// Test-only producer for the extended-nonce variant; the engine never
/// writes this format anymore.
#[cfg(test)]
pub(crate) fn x_encrypt(plaintext: &[u8], nonce: &[u8; X_NONCE_SIZE], key: &[u8; KEY_SIZE], associated_data: &[u8]) -> Result<Vec<u8>> {
    let keys = SubKeys::derive_x(nonce, key);

    let mut output = vec![0u8; plaintext.len() + TAG_SIZE];
    let ciphertext_end = plaintext.len();
    output[..ciphertext_end].copy_from_slice(plaintext);
    chacha::x_xor(&mut output[..ciphertext_end], nonce, &keys.enc_key, 1);

    let tag = compute_tag(&keys, associated_data, &output[..ciphertext_end])?;
    output[ciphertext_end..].copy_from_slice(&tag);
    Ok(output)
}

fn verify<'a>(keys: &SubKeys, input: &'a [u8], associated_data: &[u8]) -> Result<&'a [u8]> {
    if input.len() < TAG_SIZE {
        return Err(Error::InvalidFormat("ciphertext shorter than its tag"));
    }
    let (ciphertext, tag) = input.split_at(input.len() - TAG_SIZE);

    let expected_tag = compute_tag(keys, associated_data, ciphertext)?;
    if !constant_time::eq(tag, &expected_tag) {
        return Err(Error::Cryptographic);
    }
    Ok(ciphertext)
}

fn compute_tag(keys: &SubKeys, associated_data: &[u8], ciphertext: &[u8]) -> Result<[u8; TAG_SIZE]> {
    hash::keyed_tag(
        &keys.mac_key,
        &[associated_data, ciphertext, &(associated_data.len() as u64).to_le_bytes(), &(ciphertext.len() as u64).to_le_bytes()],
    )
}
