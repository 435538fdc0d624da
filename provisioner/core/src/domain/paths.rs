// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Volume Path Layout
//!
//! Every provisioned volume lives at the same suffix under two roots: the
//! export base path as seen by the NFS server, and the mount root where the
//! export is mounted inside this process.
//!
//! ```text
//! server: <export_path>/<suffix>
//! local:  <mount_root>/<suffix>
//! ```
//!
//! The suffix is the resolved `pathPattern` when that is non-empty, and
//! `<namespace>-<claim>-<volume>` otherwise.

use std::path::{Component, Path, PathBuf};

use crate::domain::claim::PvcMetadata;
use crate::domain::parameters::ParameterError;
use crate::domain::path_template::PathTemplate;

/// Default mount point of the export inside the provisioner container
pub const DEFAULT_MOUNT_ROOT: &str = "/persistentvolumes";

/// Prefix given to directories moved aside on archive
pub const ARCHIVE_PREFIX: &str = "archived-";

/// Server-visible and process-local locations of one volume directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumePaths {
    pub server_path: String,
    pub local_path: PathBuf,
}

/// Builds [`VolumePaths`] from the two configured roots
#[derive(Debug, Clone)]
pub struct PathBuilder {
    export_path: PathBuf,
    mount_root: PathBuf,
    template: PathTemplate,
}

impl PathBuilder {
    pub fn new(export_path: impl AsRef<Path>, mount_root: impl AsRef<Path>) -> Self {
        Self {
            export_path: clean(export_path.as_ref()),
            mount_root: clean(mount_root.as_ref()),
            template: PathTemplate::new(),
        }
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn mount_root(&self) -> &Path {
        &self.mount_root
    }

    /// Default suffix: `<namespace>-<claim>-<volume>`
    pub fn default_suffix(metadata: &PvcMetadata, volume_name: &str) -> String {
        [metadata.namespace(), metadata.name(), volume_name].join("-")
    }

    /// Compute both paths for a new volume.
    ///
    /// A pattern that expands to the empty string falls back to the default
    /// suffix.
    pub fn build(
        &self,
        metadata: &PvcMetadata,
        volume_name: &str,
        path_pattern: Option<&str>,
    ) -> Result<VolumePaths, ParameterError> {
        let custom = path_pattern
            .map(|pattern| self.template.resolve(pattern, metadata))
            .filter(|resolved| !resolved.is_empty());

        let suffix = match custom {
            Some(resolved) => resolved,
            None => {
                if path_pattern.is_some() {
                    tracing::debug!(
                        claim = %metadata.name(),
                        namespace = %metadata.namespace(),
                        "pathPattern resolved to an empty path, using default naming"
                    );
                }
                Self::default_suffix(metadata, volume_name)
            }
        };

        Ok(VolumePaths {
            server_path: join_suffix(&self.export_path, &suffix)?.display().to_string(),
            local_path: join_suffix(&self.mount_root, &suffix)?,
        })
    }

    /// Map a server-visible path back under the mount root.
    pub fn local_path_for(&self, server_path: &str) -> PathBuf {
        let export = self.export_path.to_string_lossy();
        if let Some(rest) = server_path.strip_prefix(export.as_ref()) {
            if export == "/" || rest.is_empty() || rest.starts_with('/') {
                return clean(&self.mount_root.join(rest.trim_start_matches('/')));
            }
        }
        PathBuf::from(server_path.replacen(export.as_ref(), &self.mount_root.to_string_lossy(), 1))
    }

    /// Destination of an archived volume: `<mount_root>/archived-<basename>`
    pub fn archive_path_for(&self, server_path: &str) -> PathBuf {
        let base = Path::new(server_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.mount_root.join(format!("{ARCHIVE_PREFIX}{base}"))
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into its parent.
fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Append a relative suffix below `root`. Leading separators never escape the
/// root; `..` folds into its parent but may not climb above `root`.
fn join_suffix(root: &Path, suffix: &str) -> Result<PathBuf, ParameterError> {
    let mut parts = Vec::new();
    for component in Path::new(suffix).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(ParameterError::PathTraversal(suffix.to_string()));
                }
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }

    let mut joined = root.to_path_buf();
    joined.extend(parts);
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::claim::PersistentVolumeClaim;

    fn builder() -> PathBuilder {
        PathBuilder::new("/export/k8s", DEFAULT_MOUNT_ROOT)
    }

    fn metadata() -> PvcMetadata {
        PersistentVolumeClaim::new("default", "data")
            .with_label("tier", "gold")
            .snapshot()
    }

    #[test]
    fn test_default_naming() {
        let paths = builder().build(&metadata(), "pvc-123", None).unwrap();
        assert_eq!(paths.server_path, "/export/k8s/default-data-pvc-123");
        assert_eq!(
            paths.local_path,
            PathBuf::from("/persistentvolumes/default-data-pvc-123")
        );
    }

    #[test]
    fn test_custom_pattern_applies_to_both_roots() {
        let paths = builder()
            .build(&metadata(), "pvc-123", Some("${.PVC.labels.tier}/${.PVC.name}"))
            .unwrap();
        assert_eq!(paths.server_path, "/export/k8s/gold/data");
        assert_eq!(paths.local_path, PathBuf::from("/persistentvolumes/gold/data"));
    }

    #[test]
    fn test_empty_pattern_result_falls_back_to_default() {
        let paths = builder()
            .build(&metadata(), "pvc-123", Some("${.PVC.labels.missing}"))
            .unwrap();
        assert_eq!(paths.server_path, "/export/k8s/default-data-pvc-123");
    }

    #[test]
    fn test_suffixes_match_across_roots() {
        let builder = builder();
        let paths = builder
            .build(&metadata(), "pvc-1", Some("/${.PVC.namespace}//./${.PVC.name}/"))
            .unwrap();
        let server_suffix = paths.server_path.strip_prefix("/export/k8s").unwrap();
        let local = paths.local_path.to_string_lossy();
        let local_suffix = local.strip_prefix(DEFAULT_MOUNT_ROOT).unwrap();
        assert_eq!(server_suffix, local_suffix);
        assert_eq!(server_suffix, "/default/data");
    }

    #[test]
    fn test_parent_segments_inside_root_are_folded() {
        let paths = builder()
            .build(&metadata(), "pvc-1", Some("${.PVC.namespace}/../${.PVC.name}"))
            .unwrap();
        assert_eq!(paths.server_path, "/export/k8s/data");
        assert_eq!(paths.local_path, PathBuf::from("/persistentvolumes/data"));
    }

    #[test]
    fn test_parent_segments_above_root_are_rejected() {
        let builder = builder();
        let result = builder.build(&metadata(), "pvc-1", Some("../${.PVC.name}"));
        assert!(matches!(result, Err(ParameterError::PathTraversal(_))));

        let result = builder.build(&metadata(), "pvc-1", Some("${.PVC.namespace}/../../etc"));
        assert_eq!(
            result,
            Err(ParameterError::PathTraversal("default/../../etc".to_string()))
        );
    }

    #[test]
    fn test_local_path_for_server_path() {
        let builder = builder();
        assert_eq!(
            builder.local_path_for("/export/k8s/default-data-pvc-1"),
            PathBuf::from("/persistentvolumes/default-data-pvc-1")
        );
        assert_eq!(
            builder.local_path_for("/export/k8s/gold/data"),
            PathBuf::from("/persistentvolumes/gold/data")
        );
    }

    #[test]
    fn test_local_path_for_root_export() {
        let builder = PathBuilder::new("/", "/mnt/nfs");
        assert_eq!(
            builder.local_path_for("/default-data-pvc-1"),
            PathBuf::from("/mnt/nfs/default-data-pvc-1")
        );
    }

    #[test]
    fn test_trailing_separator_in_export_path() {
        let builder = PathBuilder::new("/export/k8s/", DEFAULT_MOUNT_ROOT);
        let paths = builder.build(&metadata(), "pvc-9", None).unwrap();
        assert_eq!(paths.server_path, "/export/k8s/default-data-pvc-9");
        assert_eq!(builder.local_path_for(&paths.server_path), paths.local_path);
    }

    #[test]
    fn test_archive_path_uses_basename() {
        let builder = builder();
        assert_eq!(
            builder.archive_path_for("/export/k8s/gold/data"),
            PathBuf::from("/persistentvolumes/archived-data")
        );
        assert_eq!(
            builder.archive_path_for("/export/k8s/default-data-pvc-1"),
            PathBuf::from("/persistentvolumes/archived-default-data-pvc-1")
        );
    }
}
