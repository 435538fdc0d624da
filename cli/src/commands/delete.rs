// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Delete command
//!
//! Applies the storage class deletion policy to a previously provisioned
//! volume. The input is the descriptor printed by `provision`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use nfs_subdir_core::domain::provisioner::Provisioner;
use nfs_subdir_core::domain::volume::ProvisionedVolume;

use crate::bootstrap::ProvisionerContext;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Volume descriptor (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub volume: PathBuf,
}

pub fn read_volume(path: &Path) -> Result<ProvisionedVolume> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read volume {:?}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Invalid volume {:?}", path))
}

pub async fn execute(args: DeleteArgs, context: &mut ProvisionerContext) -> Result<()> {
    let volume = read_volume(&args.volume)?;

    let result = context.provisioner.delete(&volume).await;
    context.flush_events();
    result.with_context(|| format!("Failed to delete volume {}", volume.name))?;

    println!("{}", format!("✓ Volume {} released", volume.name).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_volume_descriptor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("volume.yaml");
        std::fs::write(
            &path,
            r#"
name: pvc-abc
storageClassName: nfs-client
reclaimPolicy: Delete
accessModes: [ReadWriteMany]
mountOptions: []
nfs:
  server: 10.0.0.5
  path: /export/k8s/default-data-pvc-abc
  readOnly: false
"#,
        )
        .unwrap();

        let volume = read_volume(&path).unwrap();
        assert_eq!(volume.name, "pvc-abc");
        assert_eq!(volume.storage_class_name.as_deref(), Some("nfs-client"));
        assert_eq!(volume.path(), "/export/k8s/default-data-pvc-abc");
    }

    #[test]
    fn test_missing_descriptor() {
        let dir = tempdir().unwrap();
        assert!(read_volume(&dir.path().join("absent.yaml")).is_err());
    }
}
