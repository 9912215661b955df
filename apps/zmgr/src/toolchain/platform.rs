//! Host platform detection for zmgr.
//!
//! Maps the compile-time host description onto the spelling used in target
//! identifiers (`x86_64-linux`, `aarch64-macos`, ...) and provides the
//! executable extension for binary lookups.

use std::fmt;

/// The platform zmgr is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    arch: &'static str,
    os: &'static str,
}

impl Platform {
    /// Detects the current platform from compile-time configuration.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_consts(std::env::consts::ARCH, std::env::consts::OS)
    }

    /// Builds a platform from `std::env::consts`-style names.
    ///
    /// Architecture names already match target identifier spelling. Android
    /// is a Linux ABI in target identifiers (`aarch64-linux-android`).
    #[must_use]
    pub fn from_consts(arch: &'static str, os: &'static str) -> Self {
        let os = match os {
            "android" => "linux",
            other => other,
        };
        Self { arch, os }
    }

    /// Returns the architecture component, e.g. `x86_64`.
    #[must_use = "returns the architecture without side effects"]
    pub fn arch(self) -> &'static str {
        self.arch
    }

    /// Returns the operating system component, e.g. `linux`.
    #[must_use = "returns the OS string without side effects"]
    pub fn os(self) -> &'static str {
        self.os
    }

    /// Returns the `ARCH-OS` identifier of the host target.
    #[must_use]
    pub fn target_identifier(self) -> String {
        format!("{}-{}", self.arch, self.os)
    }

    /// Returns whether this platform is Windows.
    #[must_use = "returns platform check result without side effects"]
    pub fn is_windows(self) -> bool {
        self.os == "windows"
    }

    /// Returns the executable file extension for this platform.
    ///
    /// Returns `.exe` on Windows, empty string elsewhere.
    #[must_use = "returns the extension string without side effects"]
    pub fn executable_extension(self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_target_identifier() {
        let platform = Platform::from_consts("x86_64", "linux");
        assert_eq!(platform.to_string(), "x86_64-linux");
        assert_eq!(platform.target_identifier(), "x86_64-linux");
    }

    #[test]
    fn executable_extension_correct_for_each_os() {
        assert_eq!(
            Platform::from_consts("x86_64", "linux").executable_extension(),
            ""
        );
        assert_eq!(
            Platform::from_consts("aarch64", "macos").executable_extension(),
            ""
        );
        assert_eq!(
            Platform::from_consts("x86_64", "windows").executable_extension(),
            ".exe"
        );
    }

    #[test]
    fn is_windows_only_true_for_windows() {
        assert!(!Platform::from_consts("x86_64", "linux").is_windows());
        assert!(Platform::from_consts("x86_64", "windows").is_windows());
    }

    #[test]
    fn android_maps_to_linux() {
        assert_eq!(
            Platform::from_consts("aarch64", "android").target_identifier(),
            "aarch64-linux"
        );
    }

    #[test]
    fn detect_uses_host_consts() {
        let platform = Platform::detect();
        assert_eq!(platform.arch(), std::env::consts::ARCH);
        assert!(!platform.os().is_empty());
    }
}
