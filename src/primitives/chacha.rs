//! Raw ChaCha20 keystream access.
//!
//! The engine's authenticated constructions are assembled from the bare
//! stream cipher: subkeys are carved out of the keystream at block 0 and
//! payload encryption starts at block 1, so explicit control of the block
//! counter is required. The standard AEAD crates hide the counter; the raw
//! cipher does not.

use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use chacha20::{ChaCha20, XChaCha20};

use crate::config::{KEY_SIZE, NONCE_SIZE, X_NONCE_SIZE};

/// Bytes produced per ChaCha20 block.
pub const BLOCK_SIZE: usize = 64;

/// Fills `out` with ChaCha20 keystream under `(key, nonce)`, starting at
/// the given block counter.
pub fn keystream(out: &mut [u8], nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE], counter: u32) {
    out.fill(0);
    xor(out, nonce, key, counter);
}

/// XORs ChaCha20 keystream into `buf` in place, starting at the given
/// block counter. Applying it twice with the same parameters restores the
/// original bytes.
pub fn xor(buf: &mut [u8], nonce: &[u8; NONCE_SIZE], key: &[u8; KEY_SIZE], counter: u32) {
    let mut cipher = ChaCha20::new(key.into(), nonce.into());
    cipher.seek(u64::from(counter) * BLOCK_SIZE as u64);
    cipher.apply_keystream(buf);
}

/// Fills `out` with XChaCha20 keystream under `(key, nonce)`, starting at
/// the given block counter. Extended-nonce variant, kept for the legacy
/// container format.
pub fn x_keystream(out: &mut [u8], nonce: &[u8; X_NONCE_SIZE], key: &[u8; KEY_SIZE], counter: u32) {
    out.fill(0);
    x_xor(out, nonce, key, counter);
}

/// XORs XChaCha20 keystream into `buf` in place, starting at the given
/// block counter.
pub fn x_xor(buf: &mut [u8], nonce: &[u8; X_NONCE_SIZE], key: &[u8; KEY_SIZE], counter: u32) {
    let mut cipher = XChaCha20::new(key.into(), nonce.into());
    cipher.seek(u64::from(counter) * BLOCK_SIZE as u64);
    cipher.apply_keystream(buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_round_trips() {
        let key = [0x11u8; KEY_SIZE];
        let nonce = [0x22u8; NONCE_SIZE];
        let mut buf = *b"attack at dawn";
        xor(&mut buf, &nonce, &key, 1);
        assert_ne!(&buf, b"attack at dawn");
        xor(&mut buf, &nonce, &key, 1);
        assert_eq!(&buf, b"attack at dawn");
    }

    #[test]
    fn test_counter_offsets_are_contiguous() {
        let key = [0x33u8; KEY_SIZE];
        let nonce = [0x44u8; NONCE_SIZE];

        let mut two_blocks = [0u8; 2 * BLOCK_SIZE];
        keystream(&mut two_blocks, &nonce, &key, 0);

        let mut second = [0u8; BLOCK_SIZE];
        keystream(&mut second, &nonce, &key, 1);
        assert_eq!(&two_blocks[BLOCK_SIZE..], &second);
    }

    #[test]
    fn test_keystream_ietf_vector() {
        // RFC 8439 §2.4.2: key 00..1f, nonce 000000000000004a00000000, counter 1.
        let mut key = [0u8; KEY_SIZE];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = u8::try_from(i).unwrap();
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce[7] = 0x4a;

        let mut out = [0u8; BLOCK_SIZE];
        keystream(&mut out, &nonce, &key, 1);
        assert_eq!(hex::encode(&out[..16]), "224f51f3401bd9e12fde276fb8631ded");
    }
}
