//! Password-based key derivation with Argon2id.
//!
//! Argon2id (v1.3) turns a password into symmetric key material. The
//! memory and pass counts travel in [`KdfParams`] so legacy container
//! versions can pin their own figures; the lane count is fixed.

use argon2::Algorithm::Argon2id;
use argon2::Version::V0x13;
use argon2::{Argon2, Params};

use crate::config::{ARGON2_PARALLELISM, KdfParams, SALT_SIZE};
use crate::error::{Error, Result};

/// Derives `out.len()` bytes of key material from `password` and `salt`.
///
/// Runs for `params.iterations` passes over `params.memory_kib` KiB of
/// state. This call blocks for as long as the parameters demand; with the
/// recommended figures that is on the order of a second.
///
/// # Errors
/// Returns `Cryptographic` if the parameters are rejected or derivation
/// fails; the message never says which.
pub fn derive(out: &mut [u8], password: &[u8], salt: &[u8; SALT_SIZE], params: &KdfParams) -> Result<()> {
    let argon_params = Params::new(params.memory_kib, params.iterations, ARGON2_PARALLELISM, Some(out.len()))
        .map_err(|_| Error::Cryptographic)?;
    Argon2::new(Argon2id, V0x13, argon_params)
        .hash_password_into(password, salt, out)
        .map_err(|_| Error::Cryptographic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let salt = [0x13u8; SALT_SIZE];
        let params = KdfParams::for_tests();

        let mut a = [0u8; 32];
        derive(&mut a, b"correct horse", &salt, &params).unwrap();
        let mut b = [0u8; 32];
        derive(&mut b, b"correct horse", &salt, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_depends_on_salt() {
        let params = KdfParams::for_tests();

        let mut a = [0u8; 32];
        derive(&mut a, b"correct horse", &[0x01; SALT_SIZE], &params).unwrap();
        let mut b = [0u8; 32];
        derive(&mut b, b"correct horse", &[0x02; SALT_SIZE], &params).unwrap();
        assert_ne!(a, b);
    }
}
