//! # Symmetric Key Resolution
//!
//! A single user-supplied string can mean four different things:
//!
//! 1. Nothing (empty) — no symmetric key in play
//! 2. A single space — please generate a fresh random key and show it
//! 3. A base64 key string — decode and validate it
//! 4. A path — an existing keyfile to hash, a directory to create a
//!    keyfile in, or a fresh keyfile path to populate
//!
//! Whatever the route, the result is the same 32 bytes of key material,
//! wiped when the caller drops it. Keyfiles are hashed with BLAKE2b-256,
//! so any file at all can serve as a key.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::info;
use zeroize::Zeroizing;

use crate::config::{HASH_SIZE, KEY_SIZE, KEYFILE_EXTENSION, KEYFILE_SIZE, RANDOM_FILE_NAME_LENGTH, SYMMETRIC_KEY_HEADER, SYMMETRIC_KEY_STRING_LENGTH};
use crate::error::{Error, Result};
use crate::file;
use crate::primitives::{constant_time, hash, random};

/// The sentinel meaning "generate a key for me".
const GENERATE_SENTINEL: &str = " ";

/// Resolves a user string to a 32-byte symmetric key.
///
/// An empty string resolves to `None`. The generate sentinel draws a
/// fresh key and logs its base64 form for the user to store. Key strings
/// are validated strictly; paths are hashed as keyfiles, creating one
/// first when the path does not exist yet.
///
/// # Errors
/// Returns `InvalidFormat` for a malformed key string and `Io` for
/// keyfile access failures.
pub fn resolve(input: &str) -> Result<Option<Zeroizing<[u8; KEY_SIZE]>>> {
    if input.is_empty() {
        return Ok(None);
    }
    if input == GENERATE_SENTINEL {
        let (key, encoded) = generate_key()?;
        info!(key = %encoded, "generated a new symmetric key; store it somewhere safe");
        return Ok(Some(key));
    }
    // Key strings end with base64 padding or hit the exact encoded length;
    // the 36-byte payload encodes without padding, so the length test is
    // what recognizes keys this tool generated itself.
    if input.ends_with('=') || input.len() == SYMMETRIC_KEY_STRING_LENGTH {
        return key_from_string(input).map(Some);
    }

    let path = Path::new(input);
    if path.is_file() {
        return read_keyfile(path).map(Some);
    }

    let mut path = PathBuf::from(input);
    if path.is_dir() {
        path.push(file::random_file_name(RANDOM_FILE_NAME_LENGTH, KEYFILE_EXTENSION)?);
    } else if !has_keyfile_extension(&path) {
        path = PathBuf::from(format!("{input}{KEYFILE_EXTENSION}"));
    }

    if !path.exists() {
        generate_keyfile(&path)?;
    }
    read_keyfile(&path).map(Some)
}

/// Draws a fresh random key and returns it with its displayable base64
/// form: `SYMMETRIC_KEY_HEADER || key`, encoded.
///
/// # Errors
/// Returns an error if the system random generator fails.
pub fn generate_key() -> Result<(Zeroizing<[u8; KEY_SIZE]>, String)> {
    let key = Zeroizing::new(random::bytes::<KEY_SIZE>()?);

    let mut bytes = Zeroizing::new(Vec::with_capacity(SYMMETRIC_KEY_HEADER.len() + KEY_SIZE));
    bytes.extend_from_slice(&SYMMETRIC_KEY_HEADER);
    bytes.extend_from_slice(key.as_ref());
    let encoded = STANDARD.encode(bytes.as_slice());

    Ok((key, encoded))
}

/// Validates a base64 key string and extracts the key.
///
/// # Errors
/// Returns `InvalidFormat` for a wrong length, undecodable base64, or an
/// unrecognized magic prefix.
pub fn key_from_string(input: &str) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    if input.len() != SYMMETRIC_KEY_STRING_LENGTH {
        return Err(Error::InvalidFormat("symmetric key string has the wrong length"));
    }

    let decoded = Zeroizing::new(STANDARD.decode(input).map_err(|_| Error::InvalidFormat("symmetric key string is not valid base64"))?);
    if decoded.len() != SYMMETRIC_KEY_HEADER.len() + KEY_SIZE {
        return Err(Error::InvalidFormat("symmetric key string has the wrong length"));
    }
    if !constant_time::eq(&decoded[..SYMMETRIC_KEY_HEADER.len()], &SYMMETRIC_KEY_HEADER) {
        return Err(Error::InvalidFormat("unrecognized symmetric key header"));
    }

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&decoded[SYMMETRIC_KEY_HEADER.len()..]);
    Ok(key)
}

/// Hashes a keyfile's entire contents into key material.
///
/// # Errors
/// Returns `Io` if the file cannot be read.
pub fn read_keyfile(path: &Path) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let mut reader = file::open_read(path)?;
    let mut key = Zeroizing::new([0u8; HASH_SIZE]);
    hash::digest_reader(&mut reader, &mut key[..])?;
    Ok(key)
}

fn generate_keyfile(path: &Path) -> Result<()> {
    let contents = Zeroizing::new(random::bytes::<KEYFILE_SIZE>()?);
    file::write_read_only(path, contents.as_ref())?;
    info!(path = %path.display(), "generated a new keyfile; back it up and keep it secret");
    Ok(())
}

fn has_keyfile_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).map(|ext| format!(".{ext}") == KEYFILE_EXTENSION).unwrap_or(false)
}
