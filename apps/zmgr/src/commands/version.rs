//! Version command for the zmgr CLI.
//!
//! Displays version information for zmgr. In verbose mode, shows the
//! build commit, host platform, and home directory.

use anyhow::Result;
use clap::Args;

use crate::toolchain::{Platform, ToolchainPaths};

/// Arguments for the version command.
#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information.
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Executes the version command.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(args: &VersionArgs, paths: &ToolchainPaths) -> Result<()> {
    println!("zmgr {}", env!("CARGO_PKG_VERSION"));
    if args.verbose {
        println!();
        println!("Build Information:");
        println!("  Version:  {}", env!("CARGO_PKG_VERSION"));
        println!("  Commit:   {}", git_commit());
        println!("  Platform: {}", Platform::detect());
        println!("  Home:     {}", paths.root.display());
    }
    Ok(())
}

/// Returns the git commit hash from the build environment or a fallback.
fn git_commit() -> &'static str {
    option_env!("ZMGR_GIT_COMMIT").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn execute_succeeds_in_both_modes() {
        let paths = ToolchainPaths::with_root(PathBuf::from("/tmp/zmgr-version-test"));
        assert!(execute(&VersionArgs { verbose: false }, &paths).is_ok());
        assert!(execute(&VersionArgs { verbose: true }, &paths).is_ok());
    }

    #[test]
    fn git_commit_returns_value() {
        assert!(!git_commit().is_empty());
    }
}
