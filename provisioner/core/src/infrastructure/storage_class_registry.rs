// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Static Storage Class Registry
//!
//! In-memory [`StorageClassLookup`] loaded from a YAML list of storage
//! classes. Stands in for the cluster API when the provisioner is driven
//! from the command line or from tests.
//!
//! ```yaml
//! - name: nfs-client
//!   provisioner: k8s-sigs.io/nfs-subdir-external-provisioner
//!   parameters:
//!     archiveOnDelete: "false"
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::storage_class::{StorageClass, StorageClassLookup, StorageClassLookupError};

#[derive(Debug, Clone, Default)]
pub struct StaticStorageClassRegistry {
    classes: HashMap<String, StorageClass>,
}

impl StaticStorageClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the classes served by `provisioner_name`.
    ///
    /// Classes with an empty `provisioner` are assumed to belong to this
    /// provisioner.
    pub fn from_classes(
        classes: impl IntoIterator<Item = StorageClass>,
        provisioner_name: &str,
    ) -> Self {
        let mut registry = Self::new();
        for class in classes {
            if class.provisioner.is_empty() || class.provisioner == provisioner_name {
                registry.insert(class);
            } else {
                tracing::debug!(
                    class = %class.name,
                    provisioner = %class.provisioner,
                    "Ignoring storage class served by another provisioner"
                );
            }
        }
        registry
    }

    pub fn from_yaml_str(yaml: &str, provisioner_name: &str) -> anyhow::Result<Self> {
        let classes: Vec<StorageClass> = serde_yaml::from_str(yaml)?;
        Ok(Self::from_classes(classes, provisioner_name))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>, provisioner_name: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content, provisioner_name)
    }

    pub fn insert(&mut self, class: StorageClass) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StorageClass> {
        self.classes.get(name)
    }
}

#[async_trait]
impl StorageClassLookup for StaticStorageClassRegistry {
    async fn get_storage_class(&self, name: &str) -> Result<StorageClass, StorageClassLookupError> {
        if name.is_empty() {
            return Err(StorageClassLookupError::MissingClassName);
        }
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| StorageClassLookupError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSES: &str = r#"
- name: nfs-client
  provisioner: example.com/nfs
  parameters:
    archiveOnDelete: "false"
- name: nfs-retain
  parameters:
    onDelete: retain
- name: other
  provisioner: example.com/other
"#;

    #[tokio::test]
    async fn test_lookup_by_name() {
        let registry = StaticStorageClassRegistry::from_yaml_str(CLASSES, "example.com/nfs").unwrap();
        assert_eq!(registry.len(), 2);

        let class = registry.get_storage_class("nfs-client").await.unwrap();
        assert_eq!(class.parameters.archive_on_delete(), Some("false"));

        let class = registry.get_storage_class("nfs-retain").await.unwrap();
        assert_eq!(class.parameters.on_delete(), Some("retain"));
    }

    #[tokio::test]
    async fn test_foreign_classes_are_not_served() {
        let registry = StaticStorageClassRegistry::from_yaml_str(CLASSES, "example.com/nfs").unwrap();
        assert_eq!(
            registry.get_storage_class("other").await,
            Err(StorageClassLookupError::NotFound("other".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let registry = StaticStorageClassRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get_storage_class("").await,
            Err(StorageClassLookupError::MissingClassName)
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(StaticStorageClassRegistry::from_yaml_str("not: [a list", "x").is_err());
    }
}
