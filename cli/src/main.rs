// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # NFS Subdirectory Provisioner
//!
//! The `nfs-subdir-provisioner` binary carves per-claim directories out of a
//! single NFS export that is mounted locally.
//!
//! ## Commands
//!
//! - `nfs-subdir-provisioner provision --request FILE` - Create a volume directory
//! - `nfs-subdir-provisioner delete --volume FILE` - Release a volume directory
//! - `nfs-subdir-provisioner config show|validate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::error;

use nfs_subdir_provisioner::bootstrap::{self, ProcessArgs, ProvisionerContext};
use nfs_subdir_provisioner::commands::{self, ConfigCommand, DeleteArgs, ProvisionArgs};

/// NFS subdirectory provisioner - dynamic volumes on a shared export
#[derive(Parser)]
#[command(name = "nfs-subdir-provisioner")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "NFS_PROVISIONER_CONFIG",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Storage classes served by this provisioner (YAML list)
    #[arg(long, global = true, env = "NFS_STORAGE_CLASSES", value_name = "FILE")]
    storage_classes: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        global = true,
        env = "NFS_PROVISIONER_LOG_LEVEL",
        default_value = "info"
    )]
    log_level: String,

    #[command(flatten)]
    process: ProcessArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a volume for a claim
    #[command(name = "provision")]
    Provision(ProvisionArgs),

    /// Delete a provisioned volume according to its storage class
    #[command(name = "delete")]
    Delete(DeleteArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Provision(args)) => {
            let mut context = startup(cli.config, &cli.process, cli.storage_classes.as_deref());
            commands::provision::execute(args, &mut context).await
        }
        Some(Commands::Delete(args)) => {
            let mut context = startup(cli.config, &cli.process, cli.storage_classes.as_deref());
            commands::delete::execute(args, &mut context).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config, &cli.process).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Build the provisioner. Invalid configuration is fatal.
fn startup(
    config: Option<PathBuf>,
    process: &ProcessArgs,
    storage_classes: Option<&std::path::Path>,
) -> ProvisionerContext {
    let settings = match bootstrap::load_settings(config, process) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let registry = match bootstrap::load_storage_classes(storage_classes, &settings.provisioner_name) {
        Ok(registry) => registry,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    ProvisionerContext::new(settings, registry)
}

/// Initialize tracing subscriber for logging. Output goes to stderr so that
/// volume descriptors on stdout stay machine-readable.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
