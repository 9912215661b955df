//! Config command for the zmgr CLI.
//!
//! Writes `zls.json` for editor integration, pointing the language server at
//! the active compiler.
//!
//! ## Usage
//!
//! ```bash
//! zmgr config                 # Write ./zls.json
//! zmgr config --dir ~/proj    # Write ~/proj/zls.json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::toolchain::lsp_config::generate_config;
use crate::toolchain::{Settings, Tool, ToolchainDetector, ToolchainPaths};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    /// Directory to write zls.json into. Must already exist.
    #[clap(long, short = 'd', default_value = ".")]
    pub dir: PathBuf,
}

/// Executes the config command.
///
/// Any existing `zls.json` in the directory is replaced.
///
/// # Errors
///
/// Returns an error if `config.toml` is malformed or the file cannot be
/// written.
pub fn execute(args: &ConfigArgs, paths: &ToolchainPaths) -> Result<()> {
    let settings = Settings::load(&paths.settings_file())?;
    let detector = ToolchainDetector::new(Tool::Compiler);

    let written = generate_config(&args.dir, &paths.root, &detector, &settings.lsp)
        .with_context(|| format!("Cannot generate config in {}", args.dir.display()))?;

    println!("Wrote {}", written.display());
    Ok(())
}
