//! Doctor checks for toolchain health verification.
//!
//! Used by the `doctor` command. Every check produces a [`DoctorCheck`];
//! none of them fail the process.
//!
//! ## Checks Performed
//!
//! - Platform detection
//! - zmgr home directory existence
//! - Settings file validity
//! - Compiler (`zig`) presence and health
//! - Language server (`zls`) presence and health
//! - Compiler / language server version compatibility
//! - System binaries shadowed by managed ones
//! - Installed targets

use std::ffi::OsString;

use super::{
    Detection, Platform, Settings, TargetRegistry, Tool, ToolchainDetector, ToolchainInfo,
    ToolchainPaths,
};

/// Status of a doctor check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorCheckStatus {
    /// Check passed.
    Ok,
    /// Check passed with warnings.
    Warning,
    /// Check failed.
    Error,
}

/// Result of a single doctor check.
#[derive(Debug, Clone)]
pub struct DoctorCheck {
    /// Name of the check.
    pub name: String,
    /// Status of the check.
    pub status: DoctorCheckStatus,
    /// Descriptive message.
    pub message: String,
}

impl DoctorCheck {
    /// Creates a new check with Ok status.
    #[must_use]
    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DoctorCheckStatus::Ok,
            message: message.into(),
        }
    }

    /// Creates a new check with Warning status.
    #[must_use]
    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DoctorCheckStatus::Warning,
            message: message.into(),
        }
    }

    /// Creates a new check with Error status.
    #[must_use]
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DoctorCheckStatus::Error,
            message: message.into(),
        }
    }

    /// Returns the CLI prefix for this check status.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self.status {
            DoctorCheckStatus::Ok => "[OK]",
            DoctorCheckStatus::Warning => "[WARN]",
            DoctorCheckStatus::Error => "[FAIL]",
        }
    }
}

/// Runs all doctor checks against `paths`, searching `search_path` for
/// system binaries.
#[must_use]
pub fn run_all_checks(paths: &ToolchainPaths, search_path: Option<OsString>) -> Vec<DoctorCheck> {
    let compiler = ToolchainDetector::with_search_path(Tool::Compiler, search_path.clone());
    let language_server = ToolchainDetector::with_search_path(Tool::LanguageServer, search_path);

    let compiler_state = compiler.detect(&paths.root);
    let language_server_state = language_server.detect(&paths.root);

    vec![
        check_platform(),
        check_home_directory(paths),
        check_settings(paths),
        check_tool(Tool::Compiler, &compiler_state),
        check_tool(Tool::LanguageServer, &language_server_state),
        check_compatibility(&compiler_state, &language_server_state),
        check_shadowing(paths, &[&compiler, &language_server]),
        check_targets(paths),
    ]
}

/// Checks platform detection.
#[must_use]
pub fn check_platform() -> DoctorCheck {
    DoctorCheck::ok("Platform", format!("Detected {}", Platform::detect()))
}

/// Checks if the zmgr home directory exists.
#[must_use]
pub fn check_home_directory(paths: &ToolchainPaths) -> DoctorCheck {
    if paths.root.is_dir() {
        DoctorCheck::ok("Home directory", format!("Found at {}", paths.root.display()))
    } else {
        DoctorCheck::warning(
            "Home directory",
            format!(
                "Not found at {}. It is created by 'zmgr target add'.",
                paths.root.display()
            ),
        )
    }
}

/// Checks that the settings file, if present, parses.
#[must_use]
pub fn check_settings(paths: &ToolchainPaths) -> DoctorCheck {
    let file = paths.settings_file();
    match Settings::load(&file) {
        Ok(_) if file.exists() => DoctorCheck::ok("Settings", format!("Loaded {}", file.display())),
        Ok(_) => DoctorCheck::ok("Settings", "Using defaults (no config.toml)"),
        Err(e) => DoctorCheck::error("Settings", format!("{e:#}")),
    }
}

/// Reports one tool's detection outcome.
///
/// A missing compiler is an error; a missing language server only a warning.
#[must_use]
pub fn check_tool(tool: Tool, detection: &Detection) -> DoctorCheck {
    match detection {
        Detection::Healthy(info) => DoctorCheck::ok(
            tool.label(),
            format!(
                "{tool} {} at {} ({})",
                info.version,
                info.path.display(),
                info.provenance
            ),
        ),
        Detection::Broken {
            path,
            provenance,
            error,
        } => DoctorCheck::error(
            tool.label(),
            format!("{} binary at {} is broken: {error}", provenance, path.display()),
        ),
        Detection::Absent => {
            let message = format!("{tool} not found in the managed directory or on PATH");
            match tool {
                Tool::Compiler => DoctorCheck::error(tool.label(), message),
                Tool::LanguageServer => DoctorCheck::warning(tool.label(), message),
            }
        }
    }
}

/// Checks that `zls` was built for the same `major.minor` as `zig`.
#[must_use]
pub fn check_compatibility(compiler: &Detection, language_server: &Detection) -> DoctorCheck {
    const NAME: &str = "Version compatibility";

    let (Detection::Healthy(zig), Detection::Healthy(zls)) = (compiler, language_server) else {
        return DoctorCheck::warning(NAME, "Skipped: needs a healthy zig and zls");
    };
    compare_versions(zig, zls)
}

fn compare_versions(zig: &ToolchainInfo, zls: &ToolchainInfo) -> DoctorCheck {
    const NAME: &str = "Version compatibility";

    match (zig.semver(), zls.semver()) {
        (Some(zig_version), Some(zls_version))
            if zig_version.major == zls_version.major && zig_version.minor == zls_version.minor =>
        {
            DoctorCheck::ok(NAME, format!("zig {zig_version} and zls {zls_version} match"))
        }
        (Some(zig_version), Some(zls_version)) => DoctorCheck::warning(
            NAME,
            format!(
                "zls {zls_version} targets a different zig release than zig {zig_version}"
            ),
        ),
        _ => DoctorCheck::warning(
            NAME,
            format!(
                "Cannot compare non-semver versions '{}' and '{}'",
                zig.version, zls.version
            ),
        ),
    }
}

/// Warns about system binaries hidden by managed ones.
#[must_use]
pub fn check_shadowing(paths: &ToolchainPaths, detectors: &[&ToolchainDetector]) -> DoctorCheck {
    const NAME: &str = "Shadowed binaries";

    let shadowed: Vec<String> = detectors
        .iter()
        .filter_map(|detector| {
            detector
                .shadowed_system(&paths.root)
                .map(|path| format!("{} ({})", detector.tool(), path.display()))
        })
        .collect();

    if shadowed.is_empty() {
        DoctorCheck::ok(NAME, "None")
    } else {
        DoctorCheck::warning(
            NAME,
            format!("Managed binaries take precedence over {}", shadowed.join(", ")),
        )
    }
}

/// Reports installed targets.
#[must_use]
pub fn check_targets(paths: &ToolchainPaths) -> DoctorCheck {
    const NAME: &str = "Installed targets";

    match TargetRegistry::new(&paths.targets).list() {
        Ok(targets) if targets.is_empty() => DoctorCheck::ok(
            NAME,
            format!(
                "None (host target {} needs no sysroot)",
                Platform::detect().target_identifier()
            ),
        ),
        Ok(targets) => DoctorCheck::ok(NAME, format!("{}: {}", targets.len(), targets.join(", "))),
        Err(e) => DoctorCheck::error(NAME, format!("Cannot read targets: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ZmgrError;
    use crate::toolchain::detector::Provenance;
    use assert_fs::TempDir;
    use std::path::PathBuf;

    fn info(tool: Tool, version: &str) -> ToolchainInfo {
        ToolchainInfo {
            tool,
            path: PathBuf::from(format!("/usr/bin/{tool}")),
            version: version.to_string(),
            provenance: Provenance::System,
        }
    }

    #[test]
    fn doctor_check_constructors_set_correct_status() {
        assert_eq!(DoctorCheck::ok("t", "m").status, DoctorCheckStatus::Ok);
        assert_eq!(
            DoctorCheck::warning("t", "m").status,
            DoctorCheckStatus::Warning
        );
        assert_eq!(DoctorCheck::error("t", "m").status, DoctorCheckStatus::Error);
    }

    #[test]
    fn doctor_check_prefix_returns_correct_strings() {
        assert_eq!(DoctorCheck::ok("t", "m").prefix(), "[OK]");
        assert_eq!(DoctorCheck::warning("t", "m").prefix(), "[WARN]");
        assert_eq!(DoctorCheck::error("t", "m").prefix(), "[FAIL]");
    }

    #[test]
    #[serial_test::serial]
    fn run_all_checks_on_empty_home() {
        let temp = TempDir::new().unwrap();
        let paths = ToolchainPaths::with_root(temp.path().join("home"));

        let checks = run_all_checks(&paths, None);

        assert_eq!(checks.len(), 8);
        let by_name = |name: &str| checks.iter().find(|c| c.name == name).unwrap();
        assert_eq!(by_name("Home directory").status, DoctorCheckStatus::Warning);
        assert_eq!(by_name("Compiler").status, DoctorCheckStatus::Error);
        assert_eq!(
            by_name("Language server").status,
            DoctorCheckStatus::Warning
        );
        assert_eq!(by_name("Installed targets").status, DoctorCheckStatus::Ok);
    }

    #[test]
    fn broken_tool_is_error() {
        let detection = Detection::Broken {
            path: PathBuf::from("/opt/zig"),
            provenance: Provenance::Managed,
            error: ZmgrError::version_query_failed("/opt/zig", "exited with 1"),
        };
        let check = check_tool(Tool::LanguageServer, &detection);
        assert_eq!(check.status, DoctorCheckStatus::Error);
        assert!(check.message.contains("managed"));
    }

    #[test]
    fn matching_minor_versions_are_compatible() {
        let check = check_compatibility(
            &Detection::Healthy(info(Tool::Compiler, "0.13.0")),
            &Detection::Healthy(info(Tool::LanguageServer, "0.13.1")),
        );
        assert_eq!(check.status, DoctorCheckStatus::Ok);
    }

    #[test]
    fn differing_minor_versions_warn() {
        let check = check_compatibility(
            &Detection::Healthy(info(Tool::Compiler, "0.14.0-dev.3+abc")),
            &Detection::Healthy(info(Tool::LanguageServer, "0.13.0")),
        );
        assert_eq!(check.status, DoctorCheckStatus::Warning);
    }

    #[test]
    fn compatibility_skipped_without_both_tools() {
        let check = check_compatibility(
            &Detection::Healthy(info(Tool::Compiler, "0.13.0")),
            &Detection::Absent,
        );
        assert_eq!(check.status, DoctorCheckStatus::Warning);
        assert!(check.message.starts_with("Skipped"));
    }

    #[test]
    fn targets_are_listed() {
        let temp = TempDir::new().unwrap();
        let paths = ToolchainPaths::with_root(temp.path().to_path_buf());
        let registry = TargetRegistry::new(&paths.targets);
        registry.add("wasm32-wasi").unwrap();
        registry.add("aarch64-linux-musl").unwrap();

        let check = check_targets(&paths);
        assert_eq!(check.status, DoctorCheckStatus::Ok);
        assert_eq!(check.message, "2: aarch64-linux-musl, wasm32-wasi");
    }

    #[test]
    fn malformed_settings_fail() {
        let temp = TempDir::new().unwrap();
        let paths = ToolchainPaths::with_root(temp.path().to_path_buf());
        std::fs::write(paths.settings_file(), "lsp = 3").unwrap();

        assert_eq!(check_settings(&paths).status, DoctorCheckStatus::Error);
    }
}
