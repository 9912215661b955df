//! Doctor command for the zmgr CLI.
//!
//! Verifies the health of the toolchain setup and reports any issues with
//! suggested remediation steps.
//!
//! ## Usage
//!
//! ```bash
//! zmgr doctor
//! ```

use anyhow::Result;

use crate::toolchain::ToolchainPaths;
use crate::toolchain::doctor::{DoctorCheckStatus, run_all_checks};
use crate::toolchain::paths::host_search_path;

/// Executes the doctor command.
///
/// Runs all health checks and displays the results. Failing checks do not
/// make the command fail.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(paths: &ToolchainPaths) -> Result<()> {
    println!("Checking toolchain setup...");
    println!();

    let checks = run_all_checks(paths, host_search_path());

    let mut has_errors = false;
    let mut has_warnings = false;

    for check in &checks {
        let prefix = check.prefix();
        println!("  {prefix} {}: {}", check.name, check.message);
        match check.status {
            DoctorCheckStatus::Ok => {}
            DoctorCheckStatus::Warning => has_warnings = true,
            DoctorCheckStatus::Error => has_errors = true,
        }
    }

    println!();

    if has_errors {
        println!(
            "Some checks failed. Put zig on PATH or install it into {}.",
            paths.bin.display()
        );
    } else if has_warnings {
        println!("Some warnings were found. The toolchain may work but could have issues.");
    } else {
        println!("All checks passed. The toolchain is ready to use.");
    }

    Ok(())
}
