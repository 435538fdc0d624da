// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage Class model and lookup port
//!
//! A storage class bundles the parameters that steer provisioning
//! (`pathPattern`) and deletion (`onDelete`, `archiveOnDelete`). Storage
//! classes are owned by the cluster; the provisioner only reads them through
//! [`StorageClassLookup`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Parameter key holding the directory path template
pub const PATH_PATTERN_PARAM: &str = "pathPattern";

/// Parameter key selecting `delete` or `retain` on volume deletion
pub const ON_DELETE_PARAM: &str = "onDelete";

/// Parameter key toggling archive-instead-of-delete
pub const ARCHIVE_ON_DELETE_PARAM: &str = "archiveOnDelete";

/// Reclaim policy copied onto provisioned volumes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReclaimPolicy {
    #[default]
    Delete,
    Retain,
}

/// Free-form storage-class parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageClassParameters(BTreeMap<String, String>);

impl StorageClassParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn path_pattern(&self) -> Option<&str> {
        self.get(PATH_PATTERN_PARAM)
    }

    pub fn on_delete(&self) -> Option<&str> {
        self.get(ON_DELETE_PARAM)
    }

    pub fn archive_on_delete(&self) -> Option<&str> {
        self.get(ARCHIVE_ON_DELETE_PARAM)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StorageClassParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A cluster storage class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClass {
    pub name: String,

    /// Provisioner identity this class is served by
    #[serde(default)]
    pub provisioner: String,

    #[serde(default)]
    pub parameters: StorageClassParameters,

    #[serde(default)]
    pub reclaim_policy: ReclaimPolicy,

    #[serde(default)]
    pub mount_options: Vec<String>,
}

impl StorageClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters = self.parameters.with(key, value);
        self
    }
}

/// Storage class lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageClassLookupError {
    #[error("volume has no storage class")]
    MissingClassName,

    #[error("storage class {0} not found")]
    NotFound(String),

    #[error("storage class lookup unavailable: {0}")]
    Unavailable(String),
}

/// Read access to cluster storage classes
#[async_trait]
pub trait StorageClassLookup: Send + Sync {
    /// Fetch a storage class by name
    async fn get_storage_class(&self, name: &str) -> Result<StorageClass, StorageClassLookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_accessors() {
        let params: StorageClassParameters = [
            (PATH_PATTERN_PARAM, "${.PVC.name}"),
            (ON_DELETE_PARAM, "retain"),
        ]
        .into_iter()
        .collect();

        assert_eq!(params.path_pattern(), Some("${.PVC.name}"));
        assert_eq!(params.on_delete(), Some("retain"));
        assert_eq!(params.archive_on_delete(), None);
    }

    #[test]
    fn test_storage_class_yaml() {
        let yaml = r#"
name: nfs-client
provisioner: k8s-sigs.io/nfs-subdir-external-provisioner
reclaimPolicy: Retain
mountOptions: [nfsvers=4.1]
parameters:
  archiveOnDelete: "false"
"#;
        let class: StorageClass = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(class.name, "nfs-client");
        assert_eq!(class.reclaim_policy, ReclaimPolicy::Retain);
        assert_eq!(class.mount_options, vec!["nfsvers=4.1".to_string()]);
        assert_eq!(class.parameters.archive_on_delete(), Some("false"));
    }

    #[test]
    fn test_reclaim_policy_defaults_to_delete() {
        let class: StorageClass = serde_yaml::from_str("name: plain").unwrap();
        assert_eq!(class.reclaim_policy, ReclaimPolicy::Delete);
        assert!(class.parameters.path_pattern().is_none());
    }
}
