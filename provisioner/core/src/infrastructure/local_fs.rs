// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local Filesystem Adapter
//!
//! Implements [`VolumeFilesystem`] on the NFS export as mounted into this
//! process. All paths are absolute paths below the mount root; this adapter
//! does no path translation of its own.

use async_trait::async_trait;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::domain::filesystem::{FilesystemError, FsOperation, VolumeFilesystem};

/// Unix filesystem operations via tokio
#[derive(Debug, Clone, Default)]
pub struct LocalVolumeFilesystem;

impl LocalVolumeFilesystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VolumeFilesystem for LocalVolumeFilesystem {
    async fn exists(&self, path: &Path) -> Result<bool, FilesystemError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| FilesystemError::new(FsOperation::Stat, path, e))
    }

    async fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), FilesystemError> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true).mode(mode);
        builder
            .create(path)
            .await
            .map_err(|e| FilesystemError::new(FsOperation::CreateDir, path, e))
    }

    async fn set_mode(&self, path: &Path, mode: u32) -> Result<(), FilesystemError> {
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .await
            .map_err(|e| FilesystemError::new(FsOperation::Chmod, path, e))
    }

    async fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<(), FilesystemError> {
        let target: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || std::os::unix::fs::chown(&target, Some(uid), Some(gid)))
            .await
            .map_err(|e| FilesystemError::new(FsOperation::Chown, path, std::io::Error::other(e)))?
            .map_err(|e| FilesystemError::new(FsOperation::Chown, path, e))
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<(), FilesystemError> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FilesystemError::new(FsOperation::Remove, path, e)),
        }
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FilesystemError> {
        tokio::fs::rename(from, to)
            .await
            .map_err(|e| FilesystemError::new(FsOperation::Rename, from, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;
    use tempfile::TempDir;

    fn mode_of(path: &Path) -> u32 {
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[tokio::test]
    async fn test_create_nested_directory_and_set_mode() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalVolumeFilesystem::new();
        let target = temp_dir.path().join("gold").join("data");

        fs.create_dir_all(&target, 0o700).await.unwrap();
        assert!(fs.exists(&target).await.unwrap());

        fs.set_mode(&target, 0o777).await.unwrap();
        assert_eq!(mode_of(&target), 0o777);

        fs.set_mode(&target, 0o750).await.unwrap();
        assert_eq!(mode_of(&target), 0o750);
    }

    #[tokio::test]
    async fn test_create_existing_directory_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalVolumeFilesystem::new();
        let target = temp_dir.path().join("vol");

        fs.create_dir_all(&target, 0o755).await.unwrap();
        fs.create_dir_all(&target, 0o755).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_over_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalVolumeFilesystem::new();
        let target = temp_dir.path().join("occupied");
        std::fs::write(&target, b"not a directory").unwrap();

        let err = fs.create_dir_all(&target, 0o755).await.unwrap_err();
        assert_eq!(err.operation, FsOperation::CreateDir);
    }

    #[tokio::test]
    async fn test_chown_to_current_owner() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalVolumeFilesystem::new();
        let target = temp_dir.path().join("owned");
        fs.create_dir_all(&target, 0o755).await.unwrap();

        let meta = std::fs::metadata(&target).unwrap();
        fs.chown(&target, meta.uid(), meta.gid()).await.unwrap();

        let after = std::fs::metadata(&target).unwrap();
        assert_eq!((after.uid(), after.gid()), (meta.uid(), meta.gid()));
    }

    #[tokio::test]
    async fn test_chown_missing_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalVolumeFilesystem::new();

        let err = fs.chown(&temp_dir.path().join("missing"), 0, 0).await.unwrap_err();
        assert_eq!(err.operation, FsOperation::Chown);
    }

    #[tokio::test]
    async fn test_remove_and_rename() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalVolumeFilesystem::new();

        let doomed = temp_dir.path().join("doomed");
        fs.create_dir_all(&doomed.join("nested"), 0o755).await.unwrap();
        std::fs::write(doomed.join("nested").join("file.txt"), b"data").unwrap();
        fs.remove_dir_all(&doomed).await.unwrap();
        assert!(!fs.exists(&doomed).await.unwrap());

        // Already gone
        fs.remove_dir_all(&doomed).await.unwrap();

        let from = temp_dir.path().join("vol");
        let to = temp_dir.path().join("archived-vol");
        fs.create_dir_all(&from, 0o755).await.unwrap();
        fs.rename(&from, &to).await.unwrap();
        assert!(!from.exists());
        assert!(to.exists());
    }
}
