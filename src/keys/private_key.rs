//! # Password-Protected Private-Key Container
//!
//! Private keys rest on disk inside a password-derived envelope. The
//! current layout (version 2) is:
//!
//! ```text
//! algorithm header (4) || version (4) || salt (16)
//!   || commitment (32) || ciphertext (|private key|) || tag (16)
//! ```
//!
//! The algorithm header and version word double as associated data, so
//! neither can be rewritten without tripping authentication. The nonce is
//! fixed at zero: the sealing key is derived fresh from `(password, salt)`
//! and used exactly once, which is what makes a fixed nonce sound here.
//!
//! Version 1 containers (XChaCha20-BLAKE2b, explicit 24-byte nonce, no
//! commitment, 12 Argon2id passes) are still opened for migration, never
//! written.
//!
//! A failed open reports one fixed message. Whether the password was wrong
//! or the container was modified is exactly the distinction an attacker
//! wants, so nobody gets it.

use secrecy::ExposeSecret;
use tracing::debug;
use zeroize::Zeroizing;

use crate::aead::{chacha20_blake2b, kc_chacha20_poly1305};
use crate::config::{
    CURVE25519_KEY_HEADER, ED25519_KEY_HEADER, KEY_SIZE, KdfParams, NONCE_SIZE, PRIVATE_KEY_VERSION_1, PRIVATE_KEY_VERSION_2, SALT_SIZE, TAG_SIZE, V1_ARGON2_ITERATIONS,
    X_NONCE_SIZE,
};
use crate::error::{Error, Result};
use crate::primitives::{kdf, random};
use crate::secret::Password;

/// Offset of the version word inside a container.
const VERSION_OFFSET: usize = 4;

/// Combined width of the algorithm header and version word; also the
/// associated data length.
const PREFIX_SIZE: usize = 8;

/// Smallest parseable version 2 container: prefix, salt, commitment and
/// tag around a one-byte key.
const MIN_V2_SIZE: usize = PREFIX_SIZE + SALT_SIZE + kc_chacha20_poly1305::OVERHEAD + 1;

/// Smallest parseable version 1 container.
const MIN_V1_SIZE: usize = PREFIX_SIZE + SALT_SIZE + X_NONCE_SIZE + TAG_SIZE + 1;

/// Key algorithm recorded in the container's magic prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Curve25519,
    Ed25519,
}

impl KeyAlgorithm {
    /// The 4-byte magic identifying this algorithm.
    #[must_use]
    pub const fn header(self) -> [u8; 4] {
        match self {
            Self::Curve25519 => CURVE25519_KEY_HEADER,
            Self::Ed25519 => ED25519_KEY_HEADER,
        }
    }
}

/// Seals `private_key` under `password`, producing a version 2 container.
///
/// Both secrets are consumed and wiped inside this call; the caller keeps
/// only the returned container bytes, which are safe to store anywhere.
///
/// # Errors
/// Returns `Cryptographic` if key derivation fails and `Io` if the system
/// random generator does.
pub fn encrypt(private_key: Zeroizing<Vec<u8>>, password: Password, algorithm: KeyAlgorithm, params: &KdfParams) -> Result<Vec<u8>> {
    let salt: [u8; SALT_SIZE] = random::bytes()?;
    let nonce = [0u8; NONCE_SIZE];

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    kdf::derive(&mut key[..], password.expose_secret(), &salt, params)?;
    drop(password);

    let mut associated_data = [0u8; PREFIX_SIZE];
    associated_data[..VERSION_OFFSET].copy_from_slice(&algorithm.header());
    associated_data[VERSION_OFFSET..].copy_from_slice(&PRIVATE_KEY_VERSION_2);

    let encrypted = kc_chacha20_poly1305::encrypt(&private_key, &nonce, &key, &associated_data);
    drop(private_key);
    drop(key);

    let mut container = Vec::with_capacity(PREFIX_SIZE + SALT_SIZE + encrypted.len());
    container.extend_from_slice(&associated_data);
    container.extend_from_slice(&salt);
    container.extend_from_slice(&encrypted);
    Ok(container)
}

/// Opens a container of any supported version and returns the private key.
///
/// # Errors
/// Returns `InvalidFormat` for a malformed container, `PolicyViolation`
/// for an unknown version word, and `Cryptographic` when the password is
/// wrong or the container was tampered with — without saying which.
pub fn decrypt(container: &[u8], password: Password, params: &KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    if container.len() < PREFIX_SIZE {
        return Err(Error::InvalidFormat("private key container too short"));
    }

    let version: [u8; 4] = container[VERSION_OFFSET..PREFIX_SIZE].try_into().map_err(|_| Error::InvalidFormat("private key container too short"))?;
    match version {
        PRIVATE_KEY_VERSION_2 => decrypt_v2(container, password, params),
        PRIVATE_KEY_VERSION_1 => decrypt_v1(container, password, params),
        _ => Err(Error::PolicyViolation("unsupported private key container version")),
    }
}

fn decrypt_v2(container: &[u8], password: Password, params: &KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    if container.len() < MIN_V2_SIZE {
        return Err(Error::InvalidFormat("private key container too short"));
    }

    let associated_data = &container[..PREFIX_SIZE];
    let salt: [u8; SALT_SIZE] = container[PREFIX_SIZE..PREFIX_SIZE + SALT_SIZE].try_into().map_err(|_| Error::InvalidFormat("private key container too short"))?;
    let nonce = [0u8; NONCE_SIZE];

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    kdf::derive(&mut key[..], password.expose_secret(), &salt, params)?;
    drop(password);

    kc_chacha20_poly1305::decrypt(&container[PREFIX_SIZE + SALT_SIZE..], &nonce, &key, associated_data)
}

fn decrypt_v1(container: &[u8], password: Password, params: &KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    if container.len() < MIN_V1_SIZE {
        return Err(Error::InvalidFormat("private key container too short"));
    }
    debug!("opening a version 1 private key container");

    let associated_data = &container[..PREFIX_SIZE];
    let salt: [u8; SALT_SIZE] = container[PREFIX_SIZE..PREFIX_SIZE + SALT_SIZE].try_into().map_err(|_| Error::InvalidFormat("private key container too short"))?;
    let nonce: [u8; X_NONCE_SIZE] =
        container[PREFIX_SIZE + SALT_SIZE..PREFIX_SIZE + SALT_SIZE + X_NONCE_SIZE].try_into().map_err(|_| Error::InvalidFormat("private key container too short"))?;

    // Version 1 pinned its pass count; only the memory figure follows the
    // caller's configuration.
    let v1_params = KdfParams { memory_kib: params.memory_kib, iterations: V1_ARGON2_ITERATIONS };

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    kdf::derive(&mut key[..], password.expose_secret(), &salt, &v1_params)?;
    drop(password);

    chacha20_blake2b::x_decrypt(&container[PREFIX_SIZE + SALT_SIZE + X_NONCE_SIZE..], &nonce, &key, associated_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{COMMITMENT_SIZE, OLD_CURVE25519_KEY_HEADER};

    fn password(bytes: &[u8]) -> Password {
        Password::from(bytes.to_vec())
    }

    fn sample_key() -> Zeroizing<Vec<u8>> {
        Zeroizing::new((0u8..32).collect())
    }

    #[test]
    fn test_v2_round_trip() {
        let params = KdfParams::for_tests();
        let container = encrypt(sample_key(), password(b"correct horse"), KeyAlgorithm::Curve25519, &params).unwrap();

        assert_eq!(&container[..4], &CURVE25519_KEY_HEADER);
        assert_eq!(&container[4..8], &PRIVATE_KEY_VERSION_2);
        assert_eq!(container.len(), 8 + SALT_SIZE + COMMITMENT_SIZE + 32 + TAG_SIZE);

        let recovered = decrypt(&container, password(b"correct horse"), &params).unwrap();
        assert_eq!(&recovered[..], &sample_key()[..]);
    }

    #[test]
    fn test_v2_wrong_password_rejected() {
        let params = KdfParams::for_tests();
        let container = encrypt(sample_key(), password(b"correct horse"), KeyAlgorithm::Curve25519, &params).unwrap();

        assert!(matches!(decrypt(&container, password(b"wrong horse"), &params), Err(Error::Cryptographic)));
    }

    #[test]
    fn test_v2_tampering_is_indistinguishable_from_wrong_password() {
        let params = KdfParams::for_tests();
        let container = encrypt(sample_key(), password(b"correct horse"), KeyAlgorithm::Curve25519, &params).unwrap();

        // Salt, commitment, ciphertext and tag mutations must all collapse
        // into the same error the wrong password produces.
        for position in [8, 8 + SALT_SIZE, 8 + SALT_SIZE + COMMITMENT_SIZE, container.len() - 1] {
            let mut mutated = container.clone();
            mutated[position] ^= 0x01;
            let err = decrypt(&mutated, password(b"correct horse"), &params).unwrap_err();
            assert_eq!(err.to_string(), Error::Cryptographic.to_string());
        }
    }

    #[test]
    fn test_unknown_version_rejected() {
        let params = KdfParams::for_tests();
        let mut container = encrypt(sample_key(), password(b"pw"), KeyAlgorithm::Ed25519, &params).unwrap();
        container[4] = 0x09;

        assert!(matches!(decrypt(&container, password(b"pw"), &params), Err(Error::PolicyViolation(_))));
    }

    #[test]
    fn test_v1_container_still_opens() {
        let params = KdfParams::for_tests();
        let salt = [0x5au8; SALT_SIZE];
        let nonce = [0xc3u8; X_NONCE_SIZE];

        let mut prefix = [0u8; 8];
        prefix[..4].copy_from_slice(&OLD_CURVE25519_KEY_HEADER);
        prefix[4..].copy_from_slice(&PRIVATE_KEY_VERSION_1);

        let v1_params = KdfParams { memory_kib: params.memory_kib, iterations: V1_ARGON2_ITERATIONS };
        let mut key = [0u8; KEY_SIZE];
        kdf::derive(&mut key, b"legacy password", &salt, &v1_params).unwrap();
        let sealed = chacha20_blake2b::x_encrypt(&sample_key(), &nonce, &key, &prefix).unwrap();

        let mut container = Vec::new();
        container.extend_from_slice(&prefix);
        container.extend_from_slice(&salt);
        container.extend_from_slice(&nonce);
        container.extend_from_slice(&sealed);

        let recovered = decrypt(&container, password(b"legacy password"), &params).unwrap();
        assert_eq!(&recovered[..], &sample_key()[..]);

        assert!(matches!(decrypt(&container, password(b"other password"), &params), Err(Error::Cryptographic)));
    }
}
