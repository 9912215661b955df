#![warn(clippy::pedantic)]

//! # zmgr
//!
//! `zmgr` tracks cross-compilation targets, reports which compiler and
//! language server binaries are active, and generates editor integration
//! config.
//!
//! ## Subcommands
//!
//! - `target add|remove|list|info` - Manage target sysroot directories
//! - `status` - Show the active `zig` and `zls`, with provenance
//! - `config` - Write `zls.json`
//! - `doctor` - Check setup health
//! - `version` - Display version information
//!
//! ## Examples
//!
//! Register a target:
//! ```bash
//! zmgr target add aarch64-linux-musl
//! ```
//!
//! Show what is active:
//! ```bash
//! zmgr status
//! ```

mod commands;
mod errors;
mod toolchain;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, doctor, status, target, version};
use errors::ZmgrError;
use toolchain::ToolchainPaths;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "ZMGR_LOG";

/// Toolchain and target manager.
#[derive(Parser)]
#[command(
    name = "zmgr",
    author,
    version,
    about = "Manage cross-compilation targets and inspect the zig toolchain",
    after_help = "\
TOOL RESOLUTION:
    zig and zls are located using the following priority order:
    1. Managed binaries (ZMGR_HOME/bin/zig, ZMGR_HOME/bin/zls)
    2. System PATH

ENVIRONMENT VARIABLES:
    ZMGR_HOME               Root directory (default: ~/.zmgr)
    ZMGR_LOG                Log filter, e.g. 'debug' (default: warn)"
)]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the zmgr CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage cross-compilation targets.
    Target(target::TargetArgs),

    /// Show the active compiler and language server.
    ///
    /// A managed binary always takes precedence over one on PATH.
    Status(status::StatusArgs),

    /// Generate zls.json for editor integration.
    ///
    /// Overwrites any existing zls.json in the directory.
    Config(config::ConfigArgs),

    /// Check setup health.
    ///
    /// Reports any issues with suggested remediation steps.
    Doctor,

    /// Display version information.
    Version(version::VersionArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(&cli) {
        let exit_code = handle_error(&e);
        std::process::exit(exit_code);
    }
}

/// Installs the stderr log subscriber.
///
/// `ZMGR_LOG` wins when set; otherwise `--debug` selects `debug` and the
/// default is `warn`.
fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Prints an error and returns the appropriate exit code.
///
/// Typed toolchain errors carry their own exit code; everything else exits
/// with 1.
fn handle_error(e: &anyhow::Error) -> i32 {
    eprintln!("Error: {e:#}");
    e.downcast_ref::<ZmgrError>().map_or(1, ZmgrError::exit_code)
}

fn run(cli: &Cli) -> Result<()> {
    let paths = ToolchainPaths::new();
    tracing::debug!(root = %paths.root.display(), "using zmgr home");

    match &cli.command {
        Commands::Target(args) => target::execute(args, &paths),
        Commands::Status(args) => status::execute(args, &paths),
        Commands::Config(args) => config::execute(args, &paths),
        Commands::Doctor => doctor::execute(&paths),
        Commands::Version(args) => version::execute(args, &paths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn typed_errors_map_to_their_exit_code() {
        let err = anyhow::Error::new(ZmgrError::target_not_installed("x86_64-linux"));
        assert_eq!(handle_error(&err), 3);

        let err = anyhow::Error::new(ZmgrError::invalid_identifier("x", "r"))
            .context("while adding target");
        assert_eq!(handle_error(&err), 2);
    }

    #[test]
    fn untyped_errors_exit_with_one() {
        assert_eq!(handle_error(&anyhow::anyhow!("boom")), 1);
    }
}
