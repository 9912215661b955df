//! Build script for the zmgr CLI.
//!
//! Embeds the short git commit as `ZMGR_GIT_COMMIT` for `zmgr version -v`.

use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let commit = git_output(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=ZMGR_GIT_COMMIT={commit}");

    let manifest_dir = PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    if let Some(head) = find_git_head(&manifest_dir) {
        println!("cargo:rerun-if-changed={}", head.display());
    }
}

/// Runs git and returns trimmed stdout, or `None` on any failure.
fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Walks up from `start` to the nearest `.git/HEAD`.
fn find_git_head(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".git").join("HEAD"))
        .find(|head| head.is_file())
}
