//! # Chunked AEAD Streaming
//!
//! Files are encrypted as a fixed prefix followed by independent 16 KiB
//! records:
//!
//! ```text
//! [ unencrypted headers (protocol-supplied, opaque here) ]
//! [ encrypted header    (348 bytes)                      ]
//! [ ciphertext chunk 0  (16400 bytes)                    ]
//! ...
//! [ ciphertext chunk N-1                                 ]
//! ```
//!
//! The header is sealed under the protocol's header key with the starting
//! nonce; each following chunk is sealed under the file's own random key
//! with the nonce incremented once per record. The keys differ, so the
//! overlapping counter ranges never reuse a `(key, nonce)` pair, and the
//! strictly increasing nonce fixes every record to its position.
//!
//! An empty input still produces exactly one all-zero chunk; the
//! authenticated `plaintext_length` of 0 is what makes decryption emit an
//! empty file again. The final chunk of any input is zero-padded the same
//! way, and decryption truncates back to `plaintext_length`.
//!
//! Every failure path — I/O, authentication, cancellation — deletes the
//! partial output and wipes key material before the error surfaces.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use zeroize::Zeroizing;

use crate::aead::chacha20_blake2b;
use crate::config::{CIPHERTEXT_CHUNK_SIZE, ENCRYPTED_HEADER_SIZE, FILE_CHUNK_SIZE, KEY_SIZE, NONCE_SIZE};
use crate::error::{Error, Result};
use crate::file;
use crate::header::{self, FileMetadata};
use crate::options::EngineOptions;
use crate::primitives::{constant_time, random};
use crate::secret::SecretBuffer;

/// Streams one file through the chunked AEAD layout, in either direction.
///
/// The header key, starting nonce, and unencrypted header bytes come from
/// the surrounding protocol; the stream treats them as opaque inputs. One
/// instance serves one `(file, nonce)` pairing — reusing the same starting
/// nonce under the same header key for two files is a protocol error this
/// layer cannot detect.
pub struct FileStream<'a> {
    header_key: &'a [u8; KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
    unencrypted_headers: &'a [u8],
    options: EngineOptions,
}

impl<'a> FileStream<'a> {
    #[must_use]
    pub fn new(header_key: &'a [u8; KEY_SIZE], nonce: [u8; NONCE_SIZE], unencrypted_headers: &'a [u8], options: EngineOptions) -> Self {
        Self { header_key, nonce, unencrypted_headers, options }
    }

    /// Encrypts `input` into `output`.
    ///
    /// `is_directory` marks inputs that are packed directory archives; the
    /// flag rides inside the encrypted header, and such temporaries are
    /// deleted after a successful run. With the overwrite option set, the
    /// input is shredded instead. The output ends up read-only.
    ///
    /// `cancel` is observed between chunks and aborts through the normal
    /// cleanup path.
    ///
    /// # Errors
    /// Returns `Io` for filesystem failures and `PolicyViolation` for an
    /// oversized file name; on any error the partial output is removed.
    pub fn encrypt(&self, input: &Path, output: &Path, is_directory: bool, cancel: &AtomicBool) -> Result<()> {
        let plaintext_length = fs::metadata(input)?.len();
        let chunk_count = chunk_count_for(plaintext_length);
        debug!(input = %input.display(), chunks = chunk_count, "encrypting file");

        if let Err(e) = self.write_chunks(input, output, is_directory, plaintext_length, chunk_count, cancel) {
            let _ = file::remove(output);
            return Err(e);
        }

        if self.options.overwrite {
            file::shred(input)?;
        } else if is_directory {
            file::remove(input)?;
        }
        file::set_read_only(output)?;
        Ok(())
    }

    /// Decrypts `input` into `output` and reports the recovered metadata.
    ///
    /// # Errors
    /// Returns `InvalidFormat` when the file cannot hold the declared
    /// layout, `Cryptographic` when any record fails authentication, and
    /// `Io` for filesystem failures; on any error the partial output is
    /// removed.
    pub fn decrypt(&self, input: &Path, output: &Path, cancel: &AtomicBool) -> Result<FileMetadata> {
        match self.read_chunks(input, output, cancel) {
            Ok(metadata) => Ok(metadata),
            Err(e) => {
                let _ = file::remove(output);
                Err(e)
            }
        }
    }

    fn write_chunks(&self, input: &Path, output: &Path, is_directory: bool, plaintext_length: u64, chunk_count: u64, cancel: &AtomicBool) -> Result<()> {
        let file_name = input.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        let file_key = Zeroizing::new(random::bytes::<KEY_SIZE>()?);
        let mut nonce = Zeroizing::new(self.nonce);

        let sealed_header = header::encrypt(
            chunk_count,
            plaintext_length,
            is_directory,
            &file_name,
            self.unencrypted_headers,
            &file_key,
            &nonce,
            self.header_key,
            self.options.encrypt_file_names,
        )?;

        let total_length = self.unencrypted_headers.len() as u64 + ENCRYPTED_HEADER_SIZE as u64 + chunk_count * CIPHERTEXT_CHUNK_SIZE as u64;
        let mut writer = file::create_write(output, total_length)?;
        writer.write_all(self.unencrypted_headers)?;
        writer.write_all(&sealed_header)?;

        constant_time::increment_le(&mut nonce[..]);

        let mut reader = file::open_read(input)?;
        let mut plaintext = SecretBuffer::new(FILE_CHUNK_SIZE);
        let mut remaining = plaintext_length;

        // An empty input runs this loop exactly once with a zero-length
        // read, sealing the single all-zero chunk the layout requires.
        for _ in 0..chunk_count {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::cancelled());
            }

            let step = usize::try_from(remaining.min(FILE_CHUNK_SIZE as u64)).unwrap_or(FILE_CHUNK_SIZE);
            reader.read_exact(&mut plaintext[..step])?;
            if step < FILE_CHUNK_SIZE {
                constant_time::wipe(&mut plaintext[step..]);
            }

            let sealed = chacha20_blake2b::encrypt(&plaintext, &nonce, &file_key, &[])?;
            writer.write_all(&sealed)?;
            constant_time::increment_le(&mut nonce[..]);
            remaining -= step as u64;
        }

        writer.flush()?;
        Ok(())
    }

    fn read_chunks(&self, input: &Path, output: &Path, cancel: &AtomicBool) -> Result<FileMetadata> {
        let file_length = fs::metadata(input)?.len();
        let prefix_length = self.unencrypted_headers.len() as u64 + ENCRYPTED_HEADER_SIZE as u64;
        if file_length < prefix_length + CIPHERTEXT_CHUNK_SIZE as u64 {
            return Err(Error::InvalidFormat("encrypted file is too short for its layout"));
        }
        let ciphertext_length = file_length - prefix_length;
        if ciphertext_length % CIPHERTEXT_CHUNK_SIZE as u64 != 0 {
            return Err(Error::InvalidFormat("ciphertext is not a whole number of chunks"));
        }
        let chunk_count = ciphertext_length / CIPHERTEXT_CHUNK_SIZE as u64;

        let mut reader = file::open_read(input)?;
        reader.seek(SeekFrom::Start(self.unencrypted_headers.len() as u64))?;
        let mut sealed_header = [0u8; ENCRYPTED_HEADER_SIZE];
        reader.read_exact(&mut sealed_header)?;

        let mut nonce = Zeroizing::new(self.nonce);
        let opened = header::decrypt(&sealed_header, chunk_count, self.unencrypted_headers, &nonce, self.header_key)?;
        if chunk_count != chunk_count_for(opened.plaintext_length) {
            return Err(Error::PolicyViolation("header length fields are inconsistent"));
        }
        debug!(input = %input.display(), chunks = chunk_count, "decrypting file");

        let mut writer = file::create_write(output, opened.plaintext_length)?;
        constant_time::increment_le(&mut nonce[..]);

        let mut sealed_chunk = vec![0u8; CIPHERTEXT_CHUNK_SIZE];
        let mut remaining = opened.plaintext_length;

        for _ in 0..chunk_count {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::cancelled());
            }

            reader.read_exact(&mut sealed_chunk)?;
            let plaintext = chacha20_blake2b::decrypt(&sealed_chunk, &nonce, opened.file_key(), &[])?;

            let step = usize::try_from(remaining.min(FILE_CHUNK_SIZE as u64)).unwrap_or(FILE_CHUNK_SIZE);
            writer.write_all(&plaintext[..step])?;
            constant_time::increment_le(&mut nonce[..]);
            remaining -= step as u64;
        }

        writer.flush()?;
        Ok(opened.into_metadata())
    }
}

/// Number of ciphertext chunks a plaintext of the given length occupies.
/// Empty files still carry one chunk.
fn chunk_count_for(plaintext_length: u64) -> u64 {
    plaintext_length.div_ceil(FILE_CHUNK_SIZE as u64).max(1)
}
