//! # BLAKE2b Hashing
//!
//! BLAKE2b backs three distinct jobs in the engine, kept apart by how the
//! function is keyed:
//!
//! - **Unkeyed digests** turn keyfile contents into key material
//! - **Keyed 16-byte tags** authenticate ciphertext in the
//!   Encrypt-then-MAC construction
//! - **Salt/personal derivation** produces domain-separated subkeys from
//!   input key material
//!
//! The keyed modes use BLAKE2b's native key parameter rather than an HMAC
//! wrapper; the personalization parameter gives derivation contexts their
//! domain separation.

use std::io::Read;

use blake2::digest::consts::{U16, U32};
use blake2::digest::{FixedOutput, Update, VariableOutput};
use blake2::{Blake2bMac, Blake2bVar};

use crate::config::{KEY_SIZE, TAG_SIZE};
use crate::error::{Error, Result};

/// Read granularity for stream hashing.
const STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// Computes an unkeyed BLAKE2b digest of `data` into `out`.
///
/// The digest length is taken from `out.len()` and must be between 1 and
/// 64 bytes.
///
/// # Errors
/// Returns `InvalidFormat` if the requested digest length is out of range.
pub fn digest(data: &[u8], out: &mut [u8]) -> Result<()> {
    let mut hasher = new_unkeyed(out.len())?;
    hasher.update(data);
    hasher.finalize_variable(out).map_err(|_| Error::InvalidFormat("invalid digest length"))
}

/// Computes an unkeyed BLAKE2b digest of everything `reader` yields.
///
/// Reads in fixed-size steps so arbitrarily large files hash in constant
/// memory.
///
/// # Errors
/// Returns `Io` on read failures and `InvalidFormat` for an out-of-range
/// digest length.
pub fn digest_reader<R: Read>(reader: &mut R, out: &mut [u8]) -> Result<()> {
    let mut hasher = new_unkeyed(out.len())?;
    let mut buffer = vec![0u8; STREAM_BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    hasher.finalize_variable(out).map_err(|_| Error::InvalidFormat("invalid digest length"))
}

/// Computes a keyed BLAKE2b tag over the concatenation of `parts`.
///
/// The tag is 16 bytes, the authentication size used by the
/// Encrypt-then-MAC construction. The key may be 1 to 64 bytes.
///
/// # Errors
/// Returns `InvalidFormat` if the key length is out of range.
pub fn keyed_tag(key: &[u8], parts: &[&[u8]]) -> Result<[u8; TAG_SIZE]> {
    let mut mac = Blake2bMac::<U16>::new_with_salt_and_personal(key, &[], &[])
        .map_err(|_| Error::InvalidFormat("invalid mac key length"))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize_fixed().into())
}

/// Derives a 32-byte subkey from `ikm` using BLAKE2b's salt and
/// personalization parameters for domain separation.
///
/// `salt` and `personal` may each be at most 16 bytes.
///
/// # Errors
/// Returns `InvalidFormat` if any parameter length is out of range.
pub fn derive_key(ikm: &[u8], salt: &[u8], personal: &[u8]) -> Result<[u8; KEY_SIZE]> {
    let mac = Blake2bMac::<U32>::new_with_salt_and_personal(ikm, salt, personal)
        .map_err(|_| Error::InvalidFormat("invalid key derivation parameters"))?;
    Ok(mac.finalize_fixed().into())
}

fn new_unkeyed(out_len: usize) -> Result<Blake2bVar> {
    Blake2bVar::new(out_len).map_err(|_| Error::InvalidFormat("invalid digest length"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_vector() {
        // BLAKE2b-256 of the empty input.
        let mut out = [0u8; 32];
        digest(&[], &mut out).unwrap();
        assert_eq!(hex::encode(out), "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8");
    }

    #[test]
    fn test_digest_reader_matches_digest() {
        let data = vec![0xa5u8; 200_000];
        let mut direct = [0u8; 32];
        digest(&data, &mut direct).unwrap();

        let mut streamed = [0u8; 32];
        digest_reader(&mut &data[..], &mut streamed).unwrap();
        assert_eq!(direct, streamed);
    }

    #[test]
    fn test_keyed_tag_differs_from_unkeyed() {
        let mut unkeyed = [0u8; TAG_SIZE];
        digest(b"message", &mut unkeyed).unwrap();
        let keyed = keyed_tag(&[0x42; 32], &[b"message"]).unwrap();
        assert_ne!(unkeyed, keyed);
    }

    #[test]
    fn test_keyed_tag_multipart_equals_concatenated() {
        let key = [7u8; 32];
        let split = keyed_tag(&key, &[b"ab", b"cd"]).unwrap();
        let whole = keyed_tag(&key, &[b"abcd"]).unwrap();
        assert_eq!(split, whole);
    }

    #[test]
    fn test_derive_key_personal_separates_domains() {
        let ikm = [9u8; 32];
        let a = derive_key(&ikm, &[], b"context-a").unwrap();
        let b = derive_key(&ikm, &[], b"context-b").unwrap();
        assert_ne!(a, b);
    }
}
