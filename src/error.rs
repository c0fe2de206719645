//! Engine error surface.
//!
//! Four kinds cover every failure the engine can report. The
//! [`Error::Cryptographic`] variant deliberately carries a single fixed
//! message: an attacker must not be able to tell a wrong password apart
//! from a tampered ciphertext, so neither can the caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Wrong length, bad base64, or unrecognized magic bytes.
    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),

    /// AEAD tag or commitment mismatch, or Argon2id failure. The message
    /// is fixed; it never reveals which check rejected the input.
    #[error("incorrect password/key, or this file has been tampered with")]
    Cryptographic,

    /// File open/read/write failures and permission errors.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported container version or out-of-range header fields.
    #[error("policy violation: {0}")]
    PolicyViolation(&'static str),
}

impl Error {
    /// Cancellation surfaces as an interrupted I/O error so it rides the
    /// same cleanup path as any other mid-stream failure.
    pub(crate) fn cancelled() -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::Interrupted, "operation cancelled"))
    }
}
