//! Path management for zmgr.
//!
//! The default root directory is `~/.zmgr/` on Unix and
//! `%LOCALAPPDATA%\zmgr` on Windows. Setting `ZMGR_HOME` overrides it.
//!
//! ## Directory Structure
//!
//! ```text
//! ~/.zmgr/                    # Root directory (or ZMGR_HOME)
//!   bin/                      # Managed binaries
//!     zig
//!     zls
//!   targets/                  # One directory per installed target
//!     x86_64-linux-gnu/
//!     wasm32-wasi/
//!   config.toml               # Optional user settings
//! ```
//!
//! The environment is read once by [`RootEnv::capture`]; everything after
//! that is a pure function of the captured values, so tests construct
//! `RootEnv` or call [`ToolchainPaths::with_root`] directly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable to override the default root directory.
pub const ZMGR_HOME_ENV: &str = "ZMGR_HOME";

/// Settings file name under the root.
const SETTINGS_FILE: &str = "config.toml";

/// Root used when neither an override nor a base directory is available.
#[cfg(windows)]
pub const FALLBACK_ROOT: &str = r"C:\Temp\zmgr";
#[cfg(not(windows))]
pub const FALLBACK_ROOT: &str = "/tmp/zmgr";

/// Environment values that determine the default root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootEnv {
    /// Value of `ZMGR_HOME`, if set and non-empty.
    pub home_override: Option<PathBuf>,
    /// Platform base directory: the home directory on Unix, local app data on
    /// Windows.
    pub base_dir: Option<PathBuf>,
}

impl RootEnv {
    /// Reads the process environment.
    #[must_use]
    pub fn capture() -> Self {
        let home_override = std::env::var_os(ZMGR_HOME_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        #[cfg(windows)]
        let base_dir = dirs::data_local_dir();
        #[cfg(not(windows))]
        let base_dir = dirs::home_dir();

        Self {
            home_override,
            base_dir,
        }
    }
}

/// Computes the root directory from captured environment values.
///
/// Priority: `ZMGR_HOME`, then the platform base directory, then
/// [`FALLBACK_ROOT`]. Never fails.
#[must_use]
pub fn default_root(env: &RootEnv) -> PathBuf {
    if let Some(root) = &env.home_override {
        return root.clone();
    }
    match &env.base_dir {
        #[cfg(windows)]
        Some(base) => base.join("zmgr"),
        #[cfg(not(windows))]
        Some(base) => base.join(".zmgr"),
        None => PathBuf::from(FALLBACK_ROOT),
    }
}

/// Manages paths under the zmgr root.
#[derive(Debug, Clone)]
pub struct ToolchainPaths {
    /// Root directory (`~/.zmgr` or `ZMGR_HOME`).
    pub root: PathBuf,
    /// Registry root for installed targets.
    pub targets: PathBuf,
    /// Directory holding managed binaries.
    pub bin: PathBuf,
}

impl ToolchainPaths {
    /// Creates paths from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::from_env(&RootEnv::capture())
    }

    /// Creates paths from already captured environment values.
    ///
    /// A relative `ZMGR_HOME` is anchored to the current directory so that
    /// every path handed out (and written into `zls.json`) is absolute.
    #[must_use]
    pub fn from_env(env: &RootEnv) -> Self {
        Self::with_root(absolute_path(&default_root(env)))
    }

    /// Creates paths for a specific root directory.
    #[must_use = "returns new paths instance without side effects"]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            targets: root.join("targets"),
            bin: root.join("bin"),
            root,
        }
    }

    /// Returns the path to the settings file.
    #[must_use = "returns the path without side effects"]
    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Returns the managed location of a binary under `managed_root`.
    ///
    /// `binary_name` must already carry the platform executable extension.
    #[must_use]
    pub fn managed_binary(managed_root: &Path, binary_name: &str) -> PathBuf {
        managed_root.join("bin").join(binary_name)
    }

}

impl Default for ToolchainPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Anchors a relative path to the current directory.
///
/// Falls back to `path` unchanged if the current directory is unavailable.
#[must_use]
pub fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Returns the host search path, if any.
#[must_use]
pub fn host_search_path() -> Option<OsString> {
    std::env::var_os("PATH")
}
