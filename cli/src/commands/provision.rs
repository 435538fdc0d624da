// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Provision command
//!
//! Realizes one claim as a volume directory and prints the resulting volume
//! descriptor as YAML. The request file holds the claim and, optionally, the
//! storage class and volume name the host would have chosen.
//!
//! ```yaml
//! claim:
//!   metadata: { name: data, namespace: default }
//!   spec: { accessModes: [ReadWriteMany], storageRequest: 1Gi }
//! storageClassName: nfs-client
//! volumeName: pvc-0d3c6f0e
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use nfs_subdir_core::domain::claim::PersistentVolumeClaim;
use nfs_subdir_core::domain::provisioner::{ProvisionOptions, Provisioner};

use crate::bootstrap::ProvisionerContext;

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Provision request (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub request: PathBuf,

    /// Write the volume descriptor here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    pub claim: PersistentVolumeClaim,

    /// Overrides the claim's own storage class name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,
}

impl ProvisionRequest {
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request {:?}", path))?;
        serde_yaml::from_str(&content).with_context(|| format!("Invalid request {:?}", path))
    }

    pub fn storage_class_name(&self) -> Option<&str> {
        self.storage_class_name
            .as_deref()
            .or(self.claim.spec.storage_class_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Requested volume name, or a fresh `pvc-<uuid>`
    pub fn volume_name(&self) -> String {
        match self.volume_name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("pvc-{}", uuid::Uuid::new_v4()),
        }
    }
}

pub async fn execute(args: ProvisionArgs, context: &mut ProvisionerContext) -> Result<()> {
    let request = ProvisionRequest::from_file(&args.request)?;

    let class_name = request
        .storage_class_name()
        .context("Request names no storage class")?;
    let storage_class = context
        .storage_classes
        .get(class_name)
        .cloned()
        .with_context(|| format!("Storage class {} is not served by this provisioner", class_name))?;

    let options = ProvisionOptions {
        volume_name: request.volume_name(),
        claim: request.claim,
        storage_class,
    };

    let result = context.provisioner.provision(options).await;
    context.flush_events();
    let volume = result.context("Provisioning failed")?;

    let yaml = serde_yaml::to_string(&volume)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, yaml)
                .with_context(|| format!("Failed to write volume to {:?}", path))?;
            eprintln!(
                "{}",
                format!("✓ Provisioned {} ({})", volume.name, path.display()).green()
            );
        }
        None => {
            print!("{}", yaml);
            eprintln!("{}", format!("✓ Provisioned {}", volume.name).green());
        }
    }

    Ok(())
}
