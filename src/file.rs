//! File I/O policy.
//!
//! All filesystem touching goes through here: buffered sequential reads,
//! pre-sized writes, read-only flagging, and shredding (overwrite with
//! random bytes, then delete). The streaming layer decides *when* these
//! happen; this module only knows *how*.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::FILE_CHUNK_SIZE;
use crate::error::Result;
use crate::primitives::random;

/// Opens `path` for buffered sequential reading.
///
/// # Errors
/// Returns `Io` if the file cannot be opened.
pub fn open_read(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::with_capacity(FILE_CHUNK_SIZE, file))
}

/// Creates (or truncates) `path` for buffered writing, pre-sized to
/// `size` bytes so the filesystem can allocate contiguously.
///
/// # Errors
/// Returns `Io` if the file cannot be created or sized.
pub fn create_write(path: &Path, size: u64) -> Result<BufWriter<File>> {
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
    file.set_len(size)?;
    Ok(BufWriter::with_capacity(FILE_CHUNK_SIZE, file))
}

/// Removes a file, ignoring a file that is already gone.
///
/// # Errors
/// Returns `Io` on any other removal failure.
pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Marks `path` read-only.
///
/// # Errors
/// Returns `Io` if the permissions cannot be read or changed.
pub fn set_read_only(path: &Path) -> Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions)
        .map_err(Into::into)
}

/// Writes `contents` to a new file and immediately flags it read-only.
/// Used for generated keyfiles, which must never be edited afterwards.
///
/// # Errors
/// Returns `Io` on write or permission failures.
pub fn write_read_only(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)?;
    set_read_only(path)
}

/// Overwrites the file with random bytes of the same length, forces the
/// write to disk, then deletes it.
///
/// One pass is the honest best effort on modern storage; the point is to
/// not leave the plaintext trivially readable, not to defeat forensics on
/// wear-leveled flash.
///
/// # Errors
/// Returns `Io` if any step fails; the file is left in place on failure.
pub fn shred(path: &Path) -> Result<()> {
    let length = fs::metadata(path)?.len();
    let mut remaining = length;

    let mut file = OpenOptions::new().write(true).open(path)?;
    let mut noise = vec![0u8; FILE_CHUNK_SIZE];
    while remaining > 0 {
        let step = usize::try_from(remaining.min(FILE_CHUNK_SIZE as u64)).unwrap_or(FILE_CHUNK_SIZE);
        random::fill(&mut noise[..step])?;
        file.write_all(&noise[..step])?;
        remaining -= step as u64;
    }
    file.flush()?;
    file.sync_all()?;
    drop(file);

    remove(path)
}

/// Produces a random alphanumeric file name with the given extension,
/// for keyfiles generated inside a directory.
///
/// # Errors
/// Returns an error if the system random generator fails.
pub fn random_file_name(length: usize, extension: &str) -> Result<String> {
    Ok(format!("{}{extension}", random::file_name_chars(length)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_create_write_presizes_and_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        {
            let mut writer = create_write(&path, 4).unwrap();
            writer.write_all(&[9, 8, 7, 6]).unwrap();
            writer.flush().unwrap();
        }

        let mut contents = Vec::new();
        open_read(&path).unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(contents, [9, 8, 7, 6]);
    }

    #[test]
    fn test_set_read_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        fs::write(&path, b"x").unwrap();

        set_read_only(&path).unwrap();
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[test]
    fn test_shred_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, vec![0x41u8; 40_000]).unwrap();

        shred(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        assert!(remove(&dir.path().join("never-existed")).is_ok());
    }

    #[test]
    fn test_random_file_name_shape() {
        let name = random_file_name(16, ".key").unwrap();
        assert_eq!(name.len(), 20);
        assert!(name.ends_with(".key"));
    }
}
