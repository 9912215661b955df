//! Toolchain binary detection.
//!
//! Locates the compiler (`zig`) or the language server (`zls`) and reports
//! where it came from. The lookup order is:
//!
//! 1. Managed installation at `<managed_root>/bin/<binary>`
//! 2. Host search path via `which::which_in`
//!
//! A managed installation always shadows a system one. Each detection starts
//! from scratch: nothing is cached because the host environment can change
//! between invocations.
//!
//! "Not found" is never an error here. Once a binary is found, failing to
//! query its version is: a present-but-broken tool is reported as
//! `VersionQueryFailed`, never silently treated as absent.

use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{Result, ZmgrError};
use crate::toolchain::Platform;
use crate::toolchain::paths::{ToolchainPaths, absolute_path, host_search_path};

/// A tool zmgr knows how to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// The `zig` compiler.
    Compiler,
    /// The `zls` language server.
    LanguageServer,
}

impl Tool {
    /// All detectable tools, in reporting order.
    pub const ALL: [Tool; 2] = [Tool::Compiler, Tool::LanguageServer];

    /// Binary name without extension.
    #[must_use]
    pub fn binary_name(self) -> &'static str {
        match self {
            Self::Compiler => "zig",
            Self::LanguageServer => "zls",
        }
    }

    /// Arguments that make the binary print its version on stdout.
    #[must_use]
    pub fn version_args(self) -> &'static [&'static str] {
        match self {
            Self::Compiler => &["version"],
            Self::LanguageServer => &["--version"],
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Compiler => "Compiler",
            Self::LanguageServer => "Language server",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.binary_name())
    }
}

/// Where an active binary was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Under the zmgr-managed directory.
    Managed,
    /// On the host search path.
    System,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed => f.write_str("managed"),
            Self::System => f.write_str("system"),
        }
    }
}

/// A resolved, healthy tool binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainInfo {
    pub tool: Tool,
    pub path: PathBuf,
    pub version: String,
    pub provenance: Provenance,
}

impl ToolchainInfo {
    /// Parses the version as semver.
    ///
    /// Takes the first whitespace-separated token and strips a leading `v`,
    /// so `0.14.0-dev.3+abc123` and `v0.13.0` both parse.
    #[must_use]
    pub fn semver(&self) -> Option<semver::Version> {
        parse_version(&self.version)
    }
}

fn parse_version(raw: &str) -> Option<semver::Version> {
    let token = raw.split_whitespace().next()?;
    semver::Version::parse(token.strip_prefix('v').unwrap_or(token)).ok()
}

/// Terminal state of one detection cycle.
#[derive(Debug)]
pub enum Detection {
    /// Neither a managed nor a system binary exists.
    Absent,
    /// A binary was found and reported its version.
    Healthy(ToolchainInfo),
    /// A binary was found but its version query failed.
    Broken {
        path: PathBuf,
        provenance: Provenance,
        error: ZmgrError,
    },
}

/// Detects one tool across the managed root and the search path.
#[derive(Debug, Clone)]
pub struct ToolchainDetector {
    tool: Tool,
    search_path: Option<OsString>,
    platform: Platform,
}

impl ToolchainDetector {
    /// Creates a detector that searches the host `PATH`.
    #[must_use]
    pub fn new(tool: Tool) -> Self {
        Self::with_search_path(tool, host_search_path())
    }

    /// Creates a detector with an explicit search path (`PATH` syntax).
    #[must_use]
    pub fn with_search_path(tool: Tool, search_path: Option<OsString>) -> Self {
        Self {
            tool,
            search_path,
            platform: Platform::detect(),
        }
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Checks the managed location for an executable.
    ///
    /// The returned path is absolute even when `managed_root` is relative.
    #[must_use]
    pub fn detect_managed(&self, managed_root: &Path) -> Option<PathBuf> {
        let name = format!(
            "{}{}",
            self.tool.binary_name(),
            self.platform.executable_extension()
        );
        let candidate = ToolchainPaths::managed_binary(&absolute_path(managed_root), &name);
        if is_executable(&candidate) {
            tracing::debug!(tool = %self.tool, path = %candidate.display(), "managed binary found");
            Some(candidate)
        } else {
            tracing::debug!(tool = %self.tool, path = %candidate.display(), "no managed binary");
            None
        }
    }

    /// Searches the search path for the tool's binary.
    #[must_use]
    pub fn detect_system(&self) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match which::which_in(self.tool.binary_name(), Some(search_path), cwd) {
            Ok(path) => {
                tracing::debug!(tool = %self.tool, path = %path.display(), "system binary found");
                Some(path)
            }
            Err(e) => {
                tracing::debug!(tool = %self.tool, error = %e, "no system binary");
                None
            }
        }
    }

    /// Finds the binary that would be active, without running it.
    ///
    /// A system binary that happens to live under `managed_root` (for example
    /// when the managed `bin/` directory is on `PATH`) is classified as
    /// managed.
    #[must_use]
    pub fn locate(&self, managed_root: &Path) -> Option<(PathBuf, Provenance)> {
        if let Some(path) = self.detect_managed(managed_root) {
            return Some((path, Provenance::Managed));
        }
        let managed_root = absolute_path(managed_root);
        self.detect_system().map(|path| {
            let provenance = if path.starts_with(&managed_root) {
                Provenance::Managed
            } else {
                Provenance::System
            };
            (path, provenance)
        })
    }

    /// Resolves the active binary and its version.
    ///
    /// # Errors
    ///
    /// Returns `VersionQueryFailed` if a binary was found but could not
    /// report its version. Absence is `Ok(None)`.
    pub fn resolve_active(&self, managed_root: &Path) -> Result<Option<ToolchainInfo>> {
        let Some((path, provenance)) = self.locate(managed_root) else {
            return Ok(None);
        };
        let version = self.get_version(&path)?;
        Ok(Some(ToolchainInfo {
            tool: self.tool,
            path,
            version,
            provenance,
        }))
    }

    /// Runs one detection cycle and returns its terminal state.
    #[must_use]
    pub fn detect(&self, managed_root: &Path) -> Detection {
        let Some((path, provenance)) = self.locate(managed_root) else {
            return Detection::Absent;
        };
        match self.get_version(&path) {
            Ok(version) => Detection::Healthy(ToolchainInfo {
                tool: self.tool,
                path,
                version,
                provenance,
            }),
            Err(error) => Detection::Broken {
                path,
                provenance,
                error,
            },
        }
    }

    /// Returns a system binary hidden by a managed one, if any.
    #[must_use]
    pub fn shadowed_system(&self, managed_root: &Path) -> Option<PathBuf> {
        self.detect_managed(managed_root)?;
        let managed_root = absolute_path(managed_root);
        self.detect_system()
            .filter(|path| !path.starts_with(&managed_root))
    }

    /// Invokes `path` with the tool's version arguments.
    ///
    /// # Errors
    ///
    /// Returns `VersionQueryFailed` if the process cannot be spawned, exits
    /// non-zero, or prints nothing on stdout.
    pub fn get_version(&self, path: &Path) -> Result<String> {
        let output = Command::new(path)
            .args(self.tool.version_args())
            .output()
            .map_err(|e| ZmgrError::version_query_failed(path, format!("failed to run: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().next().unwrap_or_default().trim();
            let reason = if detail.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {detail}", output.status)
            };
            return Err(ZmgrError::version_query_failed(path, reason));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(ZmgrError::version_query_failed(
                path,
                "printed no version output",
            ));
        }
        Ok(version)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}


#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn tool_names_and_version_args() {
        assert_eq!(Tool::Compiler.binary_name(), "zig");
        assert_eq!(Tool::Compiler.version_args(), &["version"]);
        assert_eq!(Tool::LanguageServer.binary_name(), "zls");
        assert_eq!(Tool::LanguageServer.version_args(), &["--version"]);
    }

    #[test]
    fn missing_everything_is_absent() {
        let temp = TempDir::new().unwrap();
        let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
        assert_eq!(detector.detect_managed(temp.path()), None);
        assert_eq!(detector.detect_system(), None);
        assert_eq!(detector.resolve_active(temp.path()).unwrap(), None);
        assert!(matches!(detector.detect(temp.path()), Detection::Absent));
    }

    #[test]
    fn empty_search_directory_is_absent() {
        let temp = TempDir::new().unwrap();
        let detector = ToolchainDetector::with_search_path(
            Tool::LanguageServer,
            Some(temp.path().as_os_str().to_owned()),
        );
        assert_eq!(detector.detect_system(), None);
    }

    #[test]
    fn semver_parses_dev_builds_and_prefixes() {
        assert_eq!(
            parse_version("0.14.0-dev.3+abc123"),
            Some(semver::Version::parse("0.14.0-dev.3+abc123").unwrap())
        );
        assert_eq!(
            parse_version("v0.13.0\n"),
            Some(semver::Version::new(0, 13, 0))
        );
        assert_eq!(parse_version("unknown"), None);
    }

    #[test]
    #[serial_test::serial]
    fn get_version_on_missing_binary_fails() {
        let temp = TempDir::new().unwrap();
        let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
        let err = detector.get_version(&temp.path().join("zig")).unwrap_err();
        assert!(matches!(err, ZmgrError::VersionQueryFailed { .. }));
    }

    // Tests that write and then exec scripts are serialized: a concurrent fork
    // can hold the script's write descriptor and make exec fail with ETXTBSY.
    #[cfg(unix)]
    mod unix {
        use super::super::test_support::{fake_tool, write_script};
        use super::*;

        fn search_path(dir: &Path) -> Option<OsString> {
            Some(dir.as_os_str().to_owned())
        }

        #[test]
        #[serial_test::serial]
        fn detect_managed_finds_executable() {
            let temp = TempDir::new().unwrap();
            let zig = fake_tool(&temp.path().join("bin"), "zig", "0.13.0");
            let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
            assert_eq!(detector.detect_managed(temp.path()), Some(zig));
        }

        #[test]
        #[serial_test::serial]
        fn detect_managed_ignores_non_executable_file() {
            let temp = TempDir::new().unwrap();
            let bin = temp.path().join("bin");
            std::fs::create_dir_all(&bin).unwrap();
            std::fs::write(bin.join("zig"), b"not executable").unwrap();
            let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
            assert_eq!(detector.detect_managed(temp.path()), None);
        }

        #[test]
        #[serial_test::serial]
        fn system_binary_resolves_with_system_provenance() {
            let managed = TempDir::new().unwrap();
            let system = TempDir::new().unwrap();
            let zig = fake_tool(system.path(), "zig", "0.13.0");

            let detector =
                ToolchainDetector::with_search_path(Tool::Compiler, search_path(system.path()));
            let info = detector.resolve_active(managed.path()).unwrap().unwrap();

            assert_eq!(info.path, zig);
            assert_eq!(info.version, "0.13.0");
            assert_eq!(info.provenance, Provenance::System);
            assert_eq!(info.tool, Tool::Compiler);
        }

        #[test]
        #[serial_test::serial]
        fn managed_shadows_system() {
            let managed = TempDir::new().unwrap();
            let system = TempDir::new().unwrap();
            let managed_zig = fake_tool(&managed.path().join("bin"), "zig", "0.14.0");
            let system_zig = fake_tool(system.path(), "zig", "0.12.0");

            let detector =
                ToolchainDetector::with_search_path(Tool::Compiler, search_path(system.path()));
            let info = detector.resolve_active(managed.path()).unwrap().unwrap();

            assert_eq!(info.path, managed_zig);
            assert_eq!(info.version, "0.14.0");
            assert_eq!(info.provenance, Provenance::Managed);
            assert_eq!(detector.shadowed_system(managed.path()), Some(system_zig));
        }

        #[test]
        #[serial_test::serial]
        fn managed_bin_on_search_path_counts_as_managed() {
            let managed = TempDir::new().unwrap();
            let zls = fake_tool(&managed.path().join("bin"), "zls", "0.13.0");
            let detector = ToolchainDetector::with_search_path(
                Tool::LanguageServer,
                search_path(&managed.path().join("bin")),
            );

            assert_eq!(
                detector.locate(managed.path()),
                Some((zls, Provenance::Managed))
            );
            assert_eq!(detector.shadowed_system(managed.path()), None);
        }

        #[test]
        #[serial_test::serial]
        fn relative_managed_root_yields_absolute_paths() {
            let temp = TempDir::new().unwrap();
            let bin = temp.path().join("home").join("bin");
            fake_tool(&bin, "zig", "0.13.0");
            let detector =
                ToolchainDetector::with_search_path(Tool::Compiler, search_path(&bin));

            let previous = std::env::current_dir().unwrap();
            std::env::set_current_dir(temp.path()).unwrap();
            let active = detector.resolve_active(Path::new("home"));
            let shadowed = detector.shadowed_system(Path::new("home"));
            std::env::set_current_dir(previous).unwrap();

            let info = active.unwrap().unwrap();
            assert!(info.path.is_absolute(), "{}", info.path.display());
            assert!(info.path.ends_with("home/bin/zig"));
            assert_eq!(info.provenance, Provenance::Managed);
            assert_eq!(shadowed, None);
        }

        #[test]
        #[serial_test::serial]
        fn version_output_is_trimmed() {
            let temp = TempDir::new().unwrap();
            let zls = write_script(temp.path(), "zls", "printf '  0.13.0  \\n\\n'");
            let detector = ToolchainDetector::with_search_path(Tool::LanguageServer, None);
            assert_eq!(detector.get_version(&zls).unwrap(), "0.13.0");
        }

        #[test]
        #[serial_test::serial]
        fn version_args_are_passed() {
            let temp = TempDir::new().unwrap();
            let zig = write_script(
                temp.path(),
                "zig",
                "if [ \"$1\" = version ]; then echo 0.13.0; else exit 3; fi",
            );
            let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
            assert_eq!(detector.get_version(&zig).unwrap(), "0.13.0");
        }

        #[test]
        #[serial_test::serial]
        fn non_zero_exit_is_version_query_failure() {
            let temp = TempDir::new().unwrap();
            let zig = write_script(temp.path(), "zig", "echo 'corrupt install' >&2\nexit 1");
            let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
            let err = detector.get_version(&zig).unwrap_err();
            assert!(err.to_string().contains("corrupt install"));
        }

        #[test]
        #[serial_test::serial]
        fn empty_output_is_version_query_failure() {
            let temp = TempDir::new().unwrap();
            let zig = write_script(temp.path(), "zig", "exit 0");
            let detector = ToolchainDetector::with_search_path(Tool::Compiler, None);
            assert!(matches!(
                detector.get_version(&zig),
                Err(ZmgrError::VersionQueryFailed { .. })
            ));
        }

        #[test]
        #[serial_test::serial]
        fn broken_managed_binary_fails_instead_of_falling_back() {
            let managed = TempDir::new().unwrap();
            let system = TempDir::new().unwrap();
            write_script(&managed.path().join("bin"), "zig", "exit 2");
            fake_tool(system.path(), "zig", "0.13.0");

            let detector =
                ToolchainDetector::with_search_path(Tool::Compiler, search_path(system.path()));
            assert!(matches!(
                detector.resolve_active(managed.path()),
                Err(ZmgrError::VersionQueryFailed { .. })
            ));
            assert!(matches!(
                detector.detect(managed.path()),
                Detection::Broken {
                    provenance: Provenance::Managed,
                    ..
                }
            ));
        }
    }
}
