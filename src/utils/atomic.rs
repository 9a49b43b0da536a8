//! Atomic file operations
//!
//! The attempt log is rewritten in full on every append. Writing it in
//! place would let a concurrent reader (or a crash) see a truncated
//! array, so every write goes through a temp file:
//!
//! 1. Write to a temporary file (`<name>.tmp` next to the target)
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on most filesystems)

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Temp file used while rewriting `path`
///
/// The suffix is appended to the full file name, so the temp file never
/// coincides with `path` itself or with the temp file of a sibling that
/// differs only by extension.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replace the contents of `path`
///
/// Parent directories are created as needed.
pub async fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Remove a temp file left behind by an interrupted write
///
/// Returns `true` if a file was removed.
pub async fn cleanup_temp_file<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    match fs::remove_file(temp_path_for(path.as_ref())).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("attempts.json");

        atomic_write(&path, b"[]").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[]");

        // Temp file should not exist
        assert!(!temp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("attempts.json");
        std::fs::write(&path, "old content").unwrap();

        atomic_write(&path, b"new content").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new content");
    }

    #[tokio::test]
    async fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("subdir").join("nested").join("attempts.json");

        atomic_write(&path, b"nested content").await.unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_temp_path_keeps_full_file_name() {
        let dir = Path::new("/var/lib/recorder");

        assert_eq!(
            temp_path_for(&dir.join("attempts.json")),
            dir.join("attempts.json.tmp")
        );
        assert_ne!(
            temp_path_for(&dir.join("attempts.json")),
            temp_path_for(&dir.join("attempts.log"))
        );

        let tmp_named = dir.join("attempts.tmp");
        assert_ne!(temp_path_for(&tmp_named), tmp_named);
    }

    #[tokio::test]
    async fn test_cleanup_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("attempts.json");
        std::fs::write(temp_path_for(&path), "partial").unwrap();

        assert!(cleanup_temp_file(&path).await.unwrap());
        assert!(!temp_path_for(&path).exists());

        // Nothing left to clean
        assert!(!cleanup_temp_file(&path).await.unwrap());
    }
}
