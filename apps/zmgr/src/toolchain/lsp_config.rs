//! Editor integration config generation.
//!
//! Writes `zls.json` into a caller-supplied directory. The file is always
//! regenerated from current state: an existing file is overwritten, never
//! merged with.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::errors::{Result, ZmgrError};
use crate::toolchain::detector::{Tool, ToolchainDetector};
use crate::toolchain::settings::LspSettings;

/// File name of the generated config.
pub const CONFIG_FILE_NAME: &str = "zls.json";

/// Contents of `zls.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZlsConfig {
    pub enable_snippets: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_build_on_save: Option<bool>,

    /// Compiler the language server should use. Left out when no compiler
    /// was resolved so that zls falls back to its own `PATH` lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zig_exe_path: Option<PathBuf>,
}

impl ZlsConfig {
    /// Builds a config from settings and an optional compiler path.
    #[must_use]
    pub fn new(settings: &LspSettings, zig_exe_path: Option<PathBuf>) -> Self {
        Self {
            enable_snippets: settings.enable_snippets,
            enable_build_on_save: settings.enable_build_on_save,
            zig_exe_path,
        }
    }
}

/// Writes `config` as `<dir>/zls.json`, replacing any existing file.
///
/// The directory is not created.
///
/// # Errors
///
/// Returns `ConfigWriteFailed` if the directory is missing or the file cannot
/// be written.
pub fn write_config(dir: &Path, config: &ZlsConfig) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    let mut content = serde_json::to_string_pretty(config)
        .map_err(|e| ZmgrError::config_write_failed(&path, std::io::Error::other(e)))?;
    content.push('\n');

    if !dir.is_dir() {
        return Err(ZmgrError::config_write_failed(
            &path,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("directory does not exist: {}", dir.display()),
            ),
        ));
    }

    std::fs::write(&path, content).map_err(|e| ZmgrError::config_write_failed(&path, e))?;
    tracing::info!(path = %path.display(), "wrote language server config");
    Ok(path)
}

/// Resolves the compiler and writes `zls.json` into `dir`.
///
/// The compiler is located with the usual managed-over-system precedence but
/// is not executed: the config only needs its path.
///
/// # Errors
///
/// Returns `ConfigWriteFailed` if the file cannot be written.
pub fn generate_config(
    dir: &Path,
    managed_root: &Path,
    detector: &ToolchainDetector,
    settings: &LspSettings,
) -> Result<PathBuf> {
    debug_assert_eq!(detector.tool(), Tool::Compiler);

    let zig_exe_path = detector.locate(managed_root).map(|(path, provenance)| {
        tracing::debug!(path = %path.display(), %provenance, "using compiler for zls.json");
        path
    });
    if zig_exe_path.is_none() {
        tracing::warn!("no zig compiler found; zls.json will not pin zig_exe_path");
    }

    write_config(dir, &ZlsConfig::new(settings, zig_exe_path))
}
