//! Target command for the zmgr CLI.
//!
//! Manages cross-compilation target sysroot directories.
//!
//! ## Usage
//!
//! ```bash
//! zmgr target add aarch64-linux-musl
//! zmgr target remove aarch64-linux-musl
//! zmgr target list
//! zmgr target info x86_64-windows-gnu
//! ```
//!
//! ## Output Format
//!
//! ```text
//! Installed targets:
//!   aarch64-linux-musl
//! * x86_64-linux-gnu     (host)
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::toolchain::{AddOutcome, TargetDescriptor, TargetRegistry, ToolchainPaths};

/// Arguments for the target command.
#[derive(Args)]
pub struct TargetArgs {
    #[command(subcommand)]
    pub command: TargetCommand,
}

/// Target subcommands.
#[derive(Subcommand)]
pub enum TargetCommand {
    /// Register a target sysroot directory.
    ///
    /// Creates an empty sysroot directory for the target. Nothing is
    /// downloaded; populate the directory yourself.
    Add {
        /// Target identifier (ARCH-OS[-ABI], e.g. "aarch64-linux-musl").
        target: String,
    },

    /// Remove an installed target and its sysroot.
    Remove {
        /// Target identifier to remove.
        target: String,
    },

    /// List installed targets.
    List,

    /// Show how a target identifier is parsed and whether it is installed.
    Info {
        /// Target identifier to inspect.
        target: String,
    },
}

/// Executes the target command.
///
/// # Errors
///
/// Returns an error if the identifier is malformed, a removed target is not
/// installed, or the registry cannot be read or written.
pub fn execute(args: &TargetArgs, paths: &ToolchainPaths) -> Result<()> {
    let registry = TargetRegistry::new(&paths.targets);
    match &args.command {
        TargetCommand::Add { target } => add(&registry, target),
        TargetCommand::Remove { target } => remove(&registry, target),
        TargetCommand::List => list(&registry),
        TargetCommand::Info { target } => info(&registry, target),
    }
}

fn add(registry: &TargetRegistry, target: &str) -> Result<()> {
    let sysroot = registry.sysroot(target);
    match registry.add(target)? {
        AddOutcome::Added => {
            println!("Added target {target}.");
            println!();
            println!("Sysroot directory: {}", sysroot.display());
            println!("Populate it with the target's headers and libraries; zmgr does not download sysroots.");
        }
        AddOutcome::AlreadyInstalled => {
            println!("Target {target} is already installed at {}.", sysroot.display());
        }
    }
    Ok(())
}

fn remove(registry: &TargetRegistry, target: &str) -> Result<()> {
    registry
        .remove(target)
        .with_context(|| format!("Cannot remove target {target}"))?;
    println!("Removed target {target}.");
    Ok(())
}

fn list(registry: &TargetRegistry) -> Result<()> {
    let targets = registry.list()?;

    if targets.is_empty() {
        println!("No targets installed.");
        println!();
        println!("Run 'zmgr target add <ARCH-OS[-ABI]>' to register one.");
        return Ok(());
    }

    println!("Installed targets:");
    println!();

    for target in &targets {
        let is_host = TargetDescriptor::parse(target).is_ok_and(|d| d.is_host());
        if is_host {
            println!("* {target:<20} (host)");
        } else {
            println!("  {target}");
        }
    }

    Ok(())
}

fn info(registry: &TargetRegistry, target: &str) -> Result<()> {
    let descriptor = TargetDescriptor::parse(target)?;

    println!("Target:           {descriptor}");
    println!("Architecture:     {}", descriptor.architecture());
    println!("Operating system: {}", descriptor.operating_system());
    println!("ABI:              {}", descriptor.abi().unwrap_or("(none)"));
    println!("Host:             {}", if descriptor.is_host() { "yes" } else { "no" });
    if registry.is_installed(target) {
        println!("Installed:        yes ({})", registry.sysroot(target).display());
    } else {
        println!("Installed:        no");
    }
    Ok(())
}
