//! Status command for the zmgr CLI.
//!
//! Shows which compiler and language server are active and where they came
//! from.
//!
//! ## Usage
//!
//! ```bash
//! zmgr status          # Human-readable report
//! zmgr status --json   # Machine-readable report
//! ```
//!
//! ## Output Format
//!
//! ```text
//! zig  0.13.0  /home/user/.zmgr/bin/zig  (managed)
//! zls  not found
//! ```

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::toolchain::{Provenance, Tool, ToolchainDetector, ToolchainInfo, ToolchainPaths};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Output in JSON format.
    #[clap(long, short = 'j')]
    pub json: bool,
}

/// One tool's entry in JSON output.
#[derive(Debug, Serialize)]
struct ToolStatus {
    tool: Tool,
    binary: &'static str,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<std::path::PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provenance: Option<Provenance>,
}

impl ToolStatus {
    fn new(tool: Tool, active: Option<&ToolchainInfo>) -> Self {
        Self {
            tool,
            binary: tool.binary_name(),
            found: active.is_some(),
            path: active.map(|info| info.path.clone()),
            version: active.map(|info| info.version.clone()),
            provenance: active.map(|info| info.provenance),
        }
    }
}

/// Executes the status command.
///
/// # Errors
///
/// Returns `VersionQueryFailed` if a found binary cannot report its version.
/// Missing tools are reported, not treated as errors.
pub fn execute(args: &StatusArgs, paths: &ToolchainPaths) -> Result<()> {
    let mut report = Vec::with_capacity(Tool::ALL.len());
    for tool in Tool::ALL {
        let active = ToolchainDetector::new(tool).resolve_active(&paths.root)?;
        report.push((tool, active));
    }

    if args.json {
        let entries: Vec<ToolStatus> = report
            .iter()
            .map(|(tool, active)| ToolStatus::new(*tool, active.as_ref()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (tool, active) in &report {
        match active {
            Some(info) => println!(
                "{tool:<4} {}  {}  ({})",
                info.version,
                info.path.display(),
                info.provenance
            ),
            None => println!("{tool:<4} not found"),
        }
    }
    Ok(())
}
