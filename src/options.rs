//! Engine options.
//!
//! A process-scope configuration record, set once by the driver at startup
//! and passed by value into the engine. The engine itself holds no mutable
//! global state.

/// User-facing switches that change what the streaming layer does around
/// the cryptography, not the cryptography itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// After a successful encryption, overwrite the plaintext input with
    /// random bytes and delete it.
    pub overwrite: bool,

    /// Store the input file name inside the encrypted header. When off,
    /// the header's name field stays zeroed and its length field is 0.
    pub encrypt_file_names: bool,
}
