//! Application configuration and cryptographic constants.
//!
//! This module defines the core constants used throughout the engine, including:
//! - Cryptographic parameters (key sizes, nonce sizes, KDF costs)
//! - The on-disk file format dimensions (chunk sizes, header field widths)
//! - Magic bytes identifying key material kinds and container versions
//!
//! These constants are the single source of truth for the file format
//! specification; changing any of them breaks compatibility with existing
//! encrypted files and key containers.

/// The file extension appended to generated keyfiles.
pub const KEYFILE_EXTENSION: &str = ".key";

/// Size of a plaintext chunk in bytes.
///
/// Each chunk is sealed as an independent authenticated record, so this
/// bounds the memory held per encryption step. 16 KiB keeps the per-chunk
/// overhead below 0.1% while staying small enough to pin in locked memory.
pub const FILE_CHUNK_SIZE: usize = 16 * 1024;

/// Size of an authentication tag in bytes (Poly1305 and keyed BLAKE2b).
pub const TAG_SIZE: usize = 16;

/// Size of the key-commitment prefix emitted by the committing AEAD.
pub const COMMITMENT_SIZE: usize = 32;

/// Size of one ciphertext chunk on disk: a full plaintext chunk plus its tag.
pub const CIPHERTEXT_CHUNK_SIZE: usize = FILE_CHUNK_SIZE + TAG_SIZE;

/// Size of a ChaCha20 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of a ChaCha20 (IETF) nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of an XChaCha20 nonce in bytes. Only read by the version 1
/// private-key container, which sealed with the extended-nonce cipher.
pub const X_NONCE_SIZE: usize = 24;

/// Size of the Argon2id salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Size of a BLAKE2b digest used for key material (keyfile hashing).
pub const HASH_SIZE: usize = 32;

/// Number of random bytes written into a generated keyfile.
pub const KEYFILE_SIZE: usize = 64;

/// Number of alphanumeric characters in generated file names
/// (keyfiles created inside a directory, shred temp names).
pub const RANDOM_FILE_NAME_LENGTH: usize = 16;

/// Width of the padded file-name field inside the encrypted header.
pub const FILE_NAME_HEADER_SIZE: usize = 255;

/// Width of the reserved (all-zero) field inside the encrypted header.
pub const SPARE_HEADER_SIZE: usize = 32;

/// Width of a little-endian integer field.
pub const INT_SIZE: usize = 4;

/// Width of a little-endian long field.
pub const LONG_SIZE: usize = 8;

/// Total size of the encrypted file header on disk:
/// `plaintext_length (8) || is_directory (1) || file_name_length (4) ||
/// padded_file_name (255) || spare (32) || file_key (32)` plus the tag.
pub const ENCRYPTED_HEADER_SIZE: usize = LONG_SIZE + 1 + INT_SIZE + FILE_NAME_HEADER_SIZE + SPARE_HEADER_SIZE + KEY_SIZE + TAG_SIZE;

/// Argon2id lanes. Fixed at 1 to stay interoperable with the
/// libsodium-style single-lane derivation used by every container version.
pub const ARGON2_PARALLELISM: u32 = 1;

/// Argon2id pass count baked into version 1 private-key containers.
/// Kept literal for compatibility; new containers never use it.
pub const V1_ARGON2_ITERATIONS: u32 = 12;

/// Magic prefix identifying a base64 symmetric key string.
pub const SYMMETRIC_KEY_HEADER: [u8; 4] = [0x3f, 0x19, 0xbb, 0x74];

/// Magic prefix identifying Curve25519 key material.
pub const CURVE25519_KEY_HEADER: [u8; 4] = [0x0a, 0x4d, 0x31, 0x9c];

/// Magic prefix identifying Ed25519 key material.
pub const ED25519_KEY_HEADER: [u8; 4] = [0x4f, 0xe0, 0x85, 0x21];

/// Curve25519 magic used by version 1 private-key containers.
pub const OLD_CURVE25519_KEY_HEADER: [u8; 4] = [0x09, 0x11, 0x29, 0xf1];

/// Ed25519 magic used by version 1 private-key containers.
pub const OLD_ED25519_KEY_HEADER: [u8; 4] = [0x4c, 0x8a, 0x17, 0xd0];

/// Version word of the legacy private-key container (decrypt only).
pub const PRIVATE_KEY_VERSION_1: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// Version word of the current private-key container.
pub const PRIVATE_KEY_VERSION_2: [u8; 4] = [0x02, 0x00, 0x00, 0x00];

/// Length of a base64 symmetric key string:
/// `SYMMETRIC_KEY_HEADER (4) || key (32)` encoded without padding.
pub const SYMMETRIC_KEY_STRING_LENGTH: usize = 48;

/// Length of a base64 public key string:
/// `algorithm header (4) || public key (32)` encoded without padding.
pub const PUBLIC_KEY_STRING_LENGTH: usize = 48;

/// Accepted lengths of a base64 private-key container file, in characters.
/// Covers Curve25519 and Ed25519 payloads in both container versions.
pub const PRIVATE_KEY_STRING_LENGTHS: [usize; 4] = [128, 140, 172, 184];

/// Argon2id tuning parameters.
///
/// The cost figures are policy, not format: containers do not record them,
/// so every caller of the key-container API passes the same params it
/// encrypted with. [`KdfParams::recommended`] is the production default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl KdfParams {
    /// Production parameters: 256 MiB, 3 passes.
    ///
    /// Memory hardness carries most of the cracking resistance here; the
    /// pass count keeps derivation around a second on current hardware.
    #[must_use]
    pub const fn recommended() -> Self {
        Self { memory_kib: 256 * 1024, iterations: 3 }
    }

    /// Reduced parameters so KDF-heavy tests stay fast.
    #[must_use]
    pub const fn for_tests() -> Self {
        Self { memory_kib: 8 * 1024, iterations: 1 }
    }
}
