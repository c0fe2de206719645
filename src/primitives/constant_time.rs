//! Constant-time helpers for secret-dependent data.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Compares two byte slices without data-dependent branches.
///
/// A length mismatch returns `false` immediately; lengths are not secret
/// here, only contents are.
#[must_use]
pub fn eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Increments `counter` as a little-endian integer, without branching on
/// its value. Wraps around silently at the maximum.
///
/// Used for nonce chaining, where the counter value itself must not leak
/// through timing.
pub fn increment_le(counter: &mut [u8]) {
    let mut carry = 1u16;
    for byte in counter.iter_mut() {
        carry += u16::from(*byte);
        *byte = carry as u8;
        carry >>= 8;
    }
}

/// Overwrites `buf` with zeros through a compiler fence, so the wipe is
/// not optimized away.
pub fn wipe(buf: &mut [u8]) {
    buf.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_accepts_equal() {
        assert!(eq(b"same bytes", b"same bytes"));
        assert!(eq(&[], &[]));
    }

    #[test]
    fn test_eq_rejects_length_mismatch() {
        assert!(!eq(b"short", b"longer bytes"));
    }

    #[test]
    fn test_eq_rejects_every_single_byte_difference() {
        let reference = [0x5au8; 48];
        for position in 0..reference.len() {
            for delta in 1..=u8::MAX {
                let mut mutated = reference;
                mutated[position] ^= delta;
                assert!(!eq(&reference, &mutated));
            }
        }
    }

    #[test]
    fn test_increment_le_counts_up() {
        let mut counter = [0u8; 12];
        increment_le(&mut counter);
        assert_eq!(counter[0], 1);
        assert!(counter[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_increment_le_carries() {
        let mut counter = [0xff, 0xff, 0x00];
        increment_le(&mut counter);
        assert_eq!(counter, [0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_increment_le_wraps() {
        let mut counter = [0xff; 4];
        increment_le(&mut counter);
        assert_eq!(counter, [0x00; 4]);
    }

    #[test]
    fn test_wipe_zeroes() {
        let mut buf = [0xaau8; 64];
        wipe(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
