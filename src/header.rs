//! # Encrypted File Header
//!
//! Every encrypted file carries one sealed header between the protocol's
//! unencrypted prefix and the content chunks. Its plaintext layout:
//!
//! ```text
//! plaintext_length : u64 LE
//! is_directory     : u8  (0x00 or 0x01)
//! file_name_length : i32 LE (0, or 1..=255)
//! padded_file_name : [u8; 255]  (UTF-8, zero padded)
//! spare            : [u8; 32]   (zero, reserved)
//! file_key         : [u8; 32]
//! ```
//!
//! The header is the only place the per-file content key exists on disk.
//! Its associated data binds the total ciphertext length and the
//! protocol's unencrypted prefix, so stripping chunks, appending chunks,
//! or rewriting the prefix is caught the moment the header is opened —
//! before any content is touched.
//!
//! When file-name encryption is off, the length field is written as 0 and
//! the padded field stays all zeros; the name is deliberately not copied.

use zeroize::Zeroizing;

use crate::aead::chacha20_blake2b;
use crate::config::{CIPHERTEXT_CHUNK_SIZE, ENCRYPTED_HEADER_SIZE, FILE_NAME_HEADER_SIZE, INT_SIZE, KEY_SIZE, LONG_SIZE, NONCE_SIZE, SPARE_HEADER_SIZE, TAG_SIZE};
use crate::error::{Error, Result};

/// Plaintext header length, before the seal adds its tag.
const PLAIN_HEADER_SIZE: usize = ENCRYPTED_HEADER_SIZE - TAG_SIZE;

/// Field offsets inside the plaintext header.
const DIRECTORY_OFFSET: usize = LONG_SIZE;
const NAME_LENGTH_OFFSET: usize = DIRECTORY_OFFSET + 1;
const NAME_OFFSET: usize = NAME_LENGTH_OFFSET + INT_SIZE;
const FILE_KEY_OFFSET: usize = NAME_OFFSET + FILE_NAME_HEADER_SIZE + SPARE_HEADER_SIZE;

/// The decrypted header contents.
pub struct FileHeader {
    pub plaintext_length: u64,
    pub is_directory: bool,
    pub file_name: Option<String>,
    file_key: Zeroizing<[u8; KEY_SIZE]>,
}

impl FileHeader {
    /// The per-file content key. Crate-internal: the key feeds the chunk
    /// loop and goes nowhere else.
    pub(crate) fn file_key(&self) -> &[u8; KEY_SIZE] {
        &self.file_key
    }

    /// Discards the key (wiping it) and keeps the describable fields.
    #[must_use]
    pub fn into_metadata(self) -> FileMetadata {
        FileMetadata { plaintext_length: self.plaintext_length, is_directory: self.is_directory, file_name: self.file_name }
    }
}

/// What a decryption reports back to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub plaintext_length: u64,
    pub is_directory: bool,
    pub file_name: Option<String>,
}

/// Builds and seals a file header.
///
/// `chunk_count` fixes the associated ciphertext length; `file_name` is
/// only embedded when `encrypt_file_name` is set. The caller's
/// `header_key` and `file_key` stay caller-owned; the transient plaintext
/// header is wiped before returning.
///
/// # Errors
/// Returns `PolicyViolation` if the UTF-8 file name exceeds the padded
/// field.
pub fn encrypt(
    chunk_count: u64,
    plaintext_length: u64,
    is_directory: bool,
    file_name: &str,
    unencrypted_headers: &[u8],
    file_key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header_key: &[u8; KEY_SIZE],
    encrypt_file_name: bool,
) -> Result<Vec<u8>> {
    let associated_data = associated_data(chunk_count, unencrypted_headers);

    let mut header = Zeroizing::new([0u8; PLAIN_HEADER_SIZE]);
    header[..LONG_SIZE].copy_from_slice(&plaintext_length.to_le_bytes());
    header[DIRECTORY_OFFSET] = u8::from(is_directory);

    if encrypt_file_name {
        let name_bytes = file_name.as_bytes();
        if name_bytes.is_empty() || name_bytes.len() > FILE_NAME_HEADER_SIZE {
            return Err(Error::PolicyViolation("file name does not fit the header field"));
        }
        let name_length = i32::try_from(name_bytes.len()).map_err(|_| Error::PolicyViolation("file name does not fit the header field"))?;
        header[NAME_LENGTH_OFFSET..NAME_OFFSET].copy_from_slice(&name_length.to_le_bytes());
        header[NAME_OFFSET..NAME_OFFSET + name_bytes.len()].copy_from_slice(name_bytes);
    }

    header[FILE_KEY_OFFSET..].copy_from_slice(file_key);

    chacha20_blake2b::encrypt(header.as_ref(), nonce, header_key, &associated_data)
}

/// Opens a sealed file header.
///
/// `chunk_count` must come from the actual bytes on disk; a file that was
/// truncated or extended produces a different associated-data string and
/// fails authentication here.
///
/// # Errors
/// Returns `InvalidFormat` for a wrongly sized header or an undecodable
/// file name, `Cryptographic` when authentication fails, and
/// `PolicyViolation` for an out-of-range name length.
pub fn decrypt(
    sealed: &[u8],
    chunk_count: u64,
    unencrypted_headers: &[u8],
    nonce: &[u8; NONCE_SIZE],
    header_key: &[u8; KEY_SIZE],
) -> Result<FileHeader> {
    if sealed.len() != ENCRYPTED_HEADER_SIZE {
        return Err(Error::InvalidFormat("encrypted header has the wrong length"));
    }

    let associated_data = associated_data(chunk_count, unencrypted_headers);
    let header = chacha20_blake2b::decrypt(sealed, nonce, header_key, &associated_data)?;

    let plaintext_length = u64::from_le_bytes(header[..LONG_SIZE].try_into().map_err(|_| Error::InvalidFormat("encrypted header has the wrong length"))?);
    let is_directory = match header[DIRECTORY_OFFSET] {
        0 => false,
        1 => true,
        _ => return Err(Error::PolicyViolation("directory flag out of range")),
    };

    let name_length = i32::from_le_bytes(header[NAME_LENGTH_OFFSET..NAME_OFFSET].try_into().map_err(|_| Error::InvalidFormat("encrypted header has the wrong length"))?);
    if name_length < 0 || name_length.unsigned_abs() as usize > FILE_NAME_HEADER_SIZE {
        return Err(Error::PolicyViolation("file name length out of range"));
    }

    let file_name = if name_length == 0 {
        None
    } else {
        let end = NAME_OFFSET + name_length.unsigned_abs() as usize;
        Some(String::from_utf8(header[NAME_OFFSET..end].to_vec()).map_err(|_| Error::InvalidFormat("file name is not valid utf-8"))?)
    };

    let mut file_key = Zeroizing::new([0u8; KEY_SIZE]);
    file_key.copy_from_slice(&header[FILE_KEY_OFFSET..]);

    Ok(FileHeader { plaintext_length, is_directory, file_name, file_key })
}

/// `le64(chunk_count * ciphertext_chunk_size) || unencrypted_headers`.
fn associated_data(chunk_count: u64, unencrypted_headers: &[u8]) -> Vec<u8> {
    let ciphertext_length = chunk_count * CIPHERTEXT_CHUNK_SIZE as u64;
    let mut data = Vec::with_capacity(LONG_SIZE + unencrypted_headers.len());
    data.extend_from_slice(&ciphertext_length.to_le_bytes());
    data.extend_from_slice(unencrypted_headers);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_KEY: [u8; KEY_SIZE] = [0xaa; KEY_SIZE];
    const FILE_KEY: [u8; KEY_SIZE] = [0xbb; KEY_SIZE];
    const NONCE: [u8; NONCE_SIZE] = [0x01; NONCE_SIZE];

    fn seal(file_name: &str, encrypt_file_name: bool) -> Vec<u8> {
        encrypt(3, 40_000, false, file_name, b"prefix", &FILE_KEY, &NONCE, &HEADER_KEY, encrypt_file_name).unwrap()
    }

    #[test]
    fn test_sealed_header_has_fixed_size() {
        assert_eq!(seal("a.txt", true).len(), ENCRYPTED_HEADER_SIZE);
        assert_eq!(ENCRYPTED_HEADER_SIZE, 348);
    }

    #[test]
    fn test_round_trip_with_file_name() {
        let sealed = seal("docs/ärchive.tar", true);
        let header = decrypt(&sealed, 3, b"prefix", &NONCE, &HEADER_KEY).unwrap();

        assert_eq!(header.plaintext_length, 40_000);
        assert!(!header.is_directory);
        assert_eq!(header.file_name.as_deref(), Some("docs/ärchive.tar"));
        assert_eq!(header.file_key(), &FILE_KEY);
    }

    #[test]
    fn test_name_not_stored_when_disabled() {
        let sealed = seal("visible-name.txt", false);
        let header = decrypt(&sealed, 3, b"prefix", &NONCE, &HEADER_KEY).unwrap();
        assert_eq!(header.file_name, None);
    }

    #[test]
    fn test_directory_flag_round_trips() {
        let sealed = encrypt(1, 0, true, "bundle", b"", &FILE_KEY, &NONCE, &HEADER_KEY, true).unwrap();
        let header = decrypt(&sealed, 1, b"", &NONCE, &HEADER_KEY).unwrap();
        assert!(header.is_directory);
    }

    #[test]
    fn test_chunk_count_is_bound() {
        let sealed = seal("a.txt", true);
        assert!(matches!(decrypt(&sealed, 4, b"prefix", &NONCE, &HEADER_KEY), Err(Error::Cryptographic)));
    }

    #[test]
    fn test_unencrypted_headers_are_bound() {
        let sealed = seal("a.txt", true);
        assert!(matches!(decrypt(&sealed, 3, b"prefiy", &NONCE, &HEADER_KEY), Err(Error::Cryptographic)));
    }

    #[test]
    fn test_wrong_header_key_rejected() {
        let sealed = seal("a.txt", true);
        assert!(matches!(decrypt(&sealed, 3, b"prefix", &NONCE, &[0xab; KEY_SIZE]), Err(Error::Cryptographic)));
    }

    #[test]
    fn test_overlong_name_rejected() {
        let long_name = "x".repeat(FILE_NAME_HEADER_SIZE + 1);
        let result = encrypt(1, 1, false, &long_name, b"", &FILE_KEY, &NONCE, &HEADER_KEY, true);
        assert!(matches!(result, Err(Error::PolicyViolation(_))));
    }

    #[test]
    fn test_max_length_name_round_trips() {
        let name = "y".repeat(FILE_NAME_HEADER_SIZE);
        let sealed = encrypt(1, 1, false, &name, b"", &FILE_KEY, &NONCE, &HEADER_KEY, true).unwrap();
        let header = decrypt(&sealed, 1, b"", &NONCE, &HEADER_KEY).unwrap();
        assert_eq!(header.file_name.as_deref(), Some(name.as_str()));
    }
}
