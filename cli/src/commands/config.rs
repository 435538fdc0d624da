// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use nfs_subdir_core::domain::config::CONFIG_PATH_ENV;

use crate::bootstrap::{load_config, ProcessArgs};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show effective configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file and environment
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
    process: &ProcessArgs,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, process, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override), process).await,
    }
}

fn or_unset(value: &str) -> String {
    if value.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        value.to_string()
    }
}

async fn show(config_override: Option<PathBuf>, process: &ProcessArgs, show_paths: bool) -> Result<()> {
    let config = load_config(config_override.clone(), process)
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./nfs-provisioner.yaml");
        println!("  4. /etc/nfs-subdir-provisioner/config.yaml");
        println!();
    }

    println!("{}", "NFS Export:".bold());
    println!("  Server: {}", or_unset(&config.server));
    println!("  Path: {}", or_unset(&config.path));
    println!("  Mount root: {}", or_unset(&config.mount_root));
    println!();

    println!("{}", "Provisioner:".bold());
    println!("  Name: {}", or_unset(&config.provisioner_name));
    println!("  Leader election: {}", or_unset(&config.leader_election));
    println!();

    println!("{}", "Directory Defaults:".bold());
    println!("  Mode: {}", or_unset(&config.default_mode));
    println!("  UID: {}", or_unset(&config.default_uid));
    println!("  GID: {}", or_unset(&config.default_gid));
    println!();

    if let Err(e) = config.settings() {
        println!("{}", format!("⚠ {}", e).yellow());
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>, process: &ProcessArgs) -> Result<()> {
    println!("Validating configuration...");

    let config = load_config(config_path, process)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}
