//! CSPRNG access.
//!
//! All randomness in the engine flows through these helpers, which wrap the
//! operating system generator. Key material, salts, nonce seeds, generated
//! keyfile contents, and random file names all come from here.

use rand::TryRng;
use rand::rngs::SysRng;

use crate::error::{Error, Result};

/// Alphabet for generated file names. 62 symbols, filesystem-safe.
const FILE_NAME_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Fills `buf` with cryptographically secure random bytes.
///
/// # Errors
/// Returns an error if the operating system generator fails.
pub fn fill(buf: &mut [u8]) -> Result<()> {
    SysRng.try_fill_bytes(buf).map_err(|e| Error::Io(std::io::Error::other(e)))?;
    Ok(())
}

/// Draws `N` cryptographically secure random bytes.
///
/// # Errors
/// Returns an error if the operating system generator fails.
pub fn bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    fill(&mut bytes)?;
    Ok(bytes)
}

/// Generates `len` random alphanumeric characters for a file name.
///
/// Uses rejection sampling so every symbol of the 62-character alphabet is
/// equally likely. File names are not secret, but a visibly skewed
/// distribution would fingerprint generated keyfiles.
///
/// # Errors
/// Returns an error if the operating system generator fails.
pub fn file_name_chars(len: usize) -> Result<String> {
    // Largest multiple of the alphabet size below 256; bytes at or above
    // this bound are redrawn instead of folded back in.
    const REJECTION_BOUND: u8 = (u8::MAX / 62) * 62;

    let mut name = String::with_capacity(len);
    let mut byte = [0u8; 1];
    while name.len() < len {
        fill(&mut byte)?;
        if byte[0] < REJECTION_BOUND {
            name.push(char::from(FILE_NAME_ALPHABET[usize::from(byte[0]) % FILE_NAME_ALPHABET.len()]));
        }
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_are_random() {
        let a = bytes::<32>().unwrap();
        let b = bytes::<32>().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_file_name_chars_length_and_alphabet() {
        let name = file_name_chars(16).unwrap();
        assert_eq!(name.len(), 16);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
