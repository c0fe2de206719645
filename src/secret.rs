use std::fmt::{Debug, Formatter, Result};
use std::ops::{Deref, DerefMut};

use secrecy::SecretSlice;
use zeroize::Zeroize;

/// A password as handed over by the driver. Zeroized on drop; the engine
/// consumes it by value so the bytes die inside the operation that used them.
pub type Password = SecretSlice<u8>;

/// A heap buffer for secret material that must not be swapped to disk or
/// survive its operation.
///
/// The allocation is fixed for the lifetime of the buffer (boxed slice, never
/// grown), locked into RAM where the platform allows it, and zeroized on drop.
pub struct SecretBuffer {
    data: Box<[u8]>,
}

impl SecretBuffer {
    /// Allocates a zero-filled buffer of `len` bytes and pins it.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let buffer = Self { data: vec![0u8; len].into_boxed_slice() };
        buffer.lock_memory();
        buffer
    }

    /// Lock the buffer's pages to keep them out of swap. On Unix this uses
    /// `mlock()`; elsewhere it is a no-op. Failure is not fatal: the kernel
    /// may refuse without `CAP_IPC_LOCK` or under a low `RLIMIT_MEMLOCK`,
    /// and the buffer is still zeroized on drop either way.
    fn lock_memory(&self) {
        #[cfg(unix)]
        unsafe {
            if libc::mlock(self.data.as_ptr().cast::<libc::c_void>(), self.data.len()) != 0 {
                tracing::warn!("could not lock secret buffer memory; it may be swapped to disk");
            }
        }
    }

    fn unlock_memory(&self) {
        #[cfg(unix)]
        unsafe {
            libc::munlock(self.data.as_ptr().cast::<libc::c_void>(), self.data.len());
        }
    }
}

impl Deref for SecretBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for SecretBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
        self.unlock_memory();
    }
}

impl Debug for SecretBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = SecretBuffer::new(64);
        assert_eq!(buffer.len(), 64);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_buffer_is_writable() {
        let mut buffer = SecretBuffer::new(4);
        buffer.copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&buffer[..], &[1, 2, 3, 4]);
    }
}
