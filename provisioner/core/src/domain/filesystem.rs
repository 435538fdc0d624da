// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Volume Filesystem Trait - Anti-Corruption Layer for the mounted export
//!
//! Abstracts the handful of directory operations the provisioner performs on
//! the locally mounted export, so provisioning decisions can be tested
//! without touching real ownership or permissions.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    Stat,
    CreateDir,
    Chmod,
    Chown,
    Remove,
    Rename,
}

impl std::fmt::Display for FsOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Stat => "stat",
            Self::CreateDir => "create directory",
            Self::Chmod => "chmod",
            Self::Chown => "chown",
            Self::Remove => "remove",
            Self::Rename => "rename",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("unable to {operation} {}: {source}", .path.display())]
pub struct FilesystemError {
    pub operation: FsOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl FilesystemError {
    pub fn new(operation: FsOperation, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Directory operations on the mounted export
#[async_trait]
pub trait VolumeFilesystem: Send + Sync {
    /// Whether `path` exists
    async fn exists(&self, path: &Path) -> Result<bool, FilesystemError>;

    /// Create `path` and any missing parents with `mode` (subject to umask)
    async fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), FilesystemError>;

    /// Set the permission bits of `path` to exactly `mode`
    async fn set_mode(&self, path: &Path, mode: u32) -> Result<(), FilesystemError>;

    /// Change the owner of `path`
    async fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<(), FilesystemError>;

    /// Remove `path` and everything below it
    async fn remove_dir_all(&self, path: &Path) -> Result<(), FilesystemError>;

    /// Move `from` to `to`
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FilesystemError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_operation_and_path() {
        let err = FilesystemError::new(
            FsOperation::Chown,
            "/persistentvolumes/default-data-pvc-1",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        let message = err.to_string();
        assert!(message.starts_with("unable to chown /persistentvolumes/default-data-pvc-1:"));
    }
}
