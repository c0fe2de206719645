//! # Asymmetric Key Loading
//!
//! Public keys and private-key containers travel as base64 text files.
//! These loaders only validate and decode; sealing and opening containers
//! lives in [`crate::keys::private_key`], and the key exchange itself
//! belongs to the protocol layer above the engine.
//!
//! Loaders report problems to the user via a warning and return `None`
//! rather than erroring: a bad path or a mangled key file is an input
//! mistake, not an engine failure.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::warn;

use crate::config::{CURVE25519_KEY_HEADER, ED25519_KEY_HEADER, KEY_SIZE, PRIVATE_KEY_STRING_LENGTHS, PUBLIC_KEY_STRING_LENGTH};

/// Reads and validates a base64 public key file.
///
/// Returns the raw 32-byte public key, or `None` (with a logged warning)
/// when the file is unreadable, has the wrong length, fails to decode, or
/// carries an unknown algorithm header.
#[must_use]
pub fn load_public_key(path: &Path) -> Option<[u8; KEY_SIZE]> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), "unable to read public key file: {e}");
            return None;
        }
    };
    parse_public_key(contents.trim_end())
}

/// Validates base64 public key characters supplied directly (for example
/// pasted on a command line) and returns the raw key.
#[must_use]
pub fn parse_public_key(encoded: &str) -> Option<[u8; KEY_SIZE]> {
    if encoded.len() != PUBLIC_KEY_STRING_LENGTH {
        warn!("public key has the wrong length");
        return None;
    }
    let Ok(decoded) = STANDARD.decode(encoded) else {
        warn!("public key is not valid base64");
        return None;
    };
    if decoded.len() != CURVE25519_KEY_HEADER.len() + KEY_SIZE {
        warn!("public key has the wrong length");
        return None;
    }

    let (header, key) = decoded.split_at(CURVE25519_KEY_HEADER.len());
    if header != CURVE25519_KEY_HEADER.as_slice() && header != ED25519_KEY_HEADER.as_slice() {
        warn!("unrecognized public key header");
        return None;
    }

    let mut public_key = [0u8; KEY_SIZE];
    public_key.copy_from_slice(key);
    Some(public_key)
}

/// Reads and validates a base64 private-key container file, returning the
/// decoded container bytes. The container stays sealed; opening it takes
/// the password and goes through [`crate::keys::private_key::decrypt`].
#[must_use]
pub fn load_private_key(path: &Path) -> Option<Vec<u8>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), "unable to read private key file: {e}");
            return None;
        }
    };

    let encoded = contents.trim_end();
    if !PRIVATE_KEY_STRING_LENGTHS.contains(&encoded.len()) {
        warn!(path = %path.display(), "private key file has the wrong length");
        return None;
    }
    match STANDARD.decode(encoded) {
        Ok(container) => Some(container),
        Err(_) => {
            warn!(path = %path.display(), "private key file is not valid base64");
            None
        }
    }
}

/// Encodes a sealed private-key container for on-disk storage.
#[must_use]
pub fn encode_private_key(container: &[u8]) -> String {
    STANDARD.encode(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn encoded_public_key(header: [u8; 4]) -> String {
        let mut bytes = vec![0u8; 36];
        bytes[..4].copy_from_slice(&header);
        bytes[4..].copy_from_slice(&[0x77; KEY_SIZE]);
        STANDARD.encode(&bytes)
    }

    #[test]
    fn test_parse_public_key_accepts_both_algorithms() {
        for header in [CURVE25519_KEY_HEADER, ED25519_KEY_HEADER] {
            let key = parse_public_key(&encoded_public_key(header)).unwrap();
            assert_eq!(key, [0x77; KEY_SIZE]);
        }
    }

    #[test]
    fn test_parse_public_key_rejects_unknown_header() {
        assert!(parse_public_key(&encoded_public_key([1, 2, 3, 4])).is_none());
    }

    #[test]
    fn test_parse_public_key_rejects_wrong_length() {
        assert!(parse_public_key("dG9vIHNob3J0").is_none());
    }

    #[test]
    fn test_load_public_key_tolerates_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.public");
        std::fs::write(&path, format!("{}\n", encoded_public_key(CURVE25519_KEY_HEADER))).unwrap();

        assert_eq!(load_public_key(&path).unwrap(), [0x77; KEY_SIZE]);
    }

    #[test]
    fn test_load_public_key_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_public_key(&dir.path().join("nope.public")).is_none());
    }

    #[test]
    fn test_private_key_container_encode_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.private");

        // A version 2 Curve25519 container is 104 bytes before encoding.
        let container = vec![0x2cu8; 104];
        std::fs::write(&path, encode_private_key(&container)).unwrap();

        assert_eq!(load_private_key(&path).unwrap(), container);
    }

    #[test]
    fn test_load_private_key_rejects_unexpected_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.private");
        std::fs::write(&path, STANDARD.encode(vec![0u8; 50])).unwrap();

        assert!(load_private_key(&path).is_none());
    }
}
