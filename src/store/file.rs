//! Local file backend
//!
//! Writes go to a uniquely named temp file in the target directory and are
//! renamed into place, so a crash mid-write never leaves a truncated
//! collection behind and concurrent writers never share a temp file.

use super::backend::{StorageBackend, StorageError, StorageErrorCode, StorageInfo};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn write_atomic(path: &Path, content: &str) -> Result<(), StorageError> {
        let dir = Self::parent_dir(path);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(&e))?;

        let target = path.to_path_buf();
        let content = content.to_owned();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(content.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::new(StorageErrorCode::Io, e.to_string()))?
        .map_err(|e| StorageError::io(&e))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn info(&self) -> StorageInfo {
        StorageInfo {
            provider: "local",
            kind: "file",
            location: self.path.display().to_string(),
        }
    }

    async fn get(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&e)),
        }
    }

    async fn put(&self, document: &str) -> Result<(), StorageError> {
        Self::write_atomic(&self.path, document).await
    }

    async fn put_backup(&self, stamp: &str, document: &str) -> Result<String, StorageError> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".backup.{stamp}"));
        let backup = PathBuf::from(name);
        Self::write_atomic(&backup, document).await?;
        Ok(backup.display().to_string())
    }

    async fn probe(&self) -> Result<(), StorageError> {
        let dir = Self::parent_dir(&self.path);
        let meta = fs::metadata(&dir).await.map_err(|e| StorageError::io(&e))?;
        if meta.permissions().readonly() {
            return Err(StorageError::new(
                StorageErrorCode::Io,
                format!("{} is read-only", dir.display()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("words.txt"));
        assert_eq!(backend.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested").join("words.txt"));

        backend.put("cat\ndog\n").await.unwrap();
        assert_eq!(backend.get().await.unwrap().as_deref(), Some("cat\ndog\n"));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("words.txt")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        let first = FileBackend::new(&path);
        let second = FileBackend::new(&path);

        for _ in 0..50 {
            let (a, b) = tokio::join!(first.put("cat\n"), second.put("dog\n"));
            a.unwrap();
            b.unwrap();
            let content = first.get().await.unwrap().unwrap();
            assert!(content == "cat\n" || content == "dog\n", "torn write: {content:?}");
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn backup_lands_next_to_primary() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("words.txt"));

        let location = backend.put_backup("20240101T000000", "cat\n").await.unwrap();
        assert!(location.ends_with("words.txt.backup.20240101T000000"));
        assert_eq!(std::fs::read_to_string(&location).unwrap(), "cat\n");
    }

    #[tokio::test]
    async fn probe_succeeds_for_writable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("words.txt"));
        assert!(backend.probe().await.is_ok());
        assert_eq!(backend.info().kind, "file");
    }
}
