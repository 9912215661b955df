//! Target identifier parsing.
//!
//! A target identifier names a compilation target as `ARCH-OS[-ABI]`, for
//! example `x86_64-linux-gnu` or `wasm32-wasi`. Components past the third are
//! accepted and ignored, matching common triple conventions where extra fields
//! are not distinguished further.

use std::fmt;

use crate::errors::{Result, ZmgrError};
use crate::toolchain::Platform;

/// Separator between identifier components.
pub const DELIMITER: char = '-';

/// A parsed target identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetDescriptor {
    identifier: String,
    architecture: String,
    operating_system: String,
    abi: Option<String>,
}

impl TargetDescriptor {
    /// Parses a target identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the architecture or operating system
    /// component is missing or empty.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let target = TargetDescriptor::parse("x86_64-linux-gnu")?;
    /// assert_eq!(target.architecture(), "x86_64");
    /// assert_eq!(target.abi(), Some("gnu"));
    /// ```
    pub fn parse(identifier: &str) -> Result<Self> {
        let mut parts = identifier.split(DELIMITER);

        let architecture = parts.next().unwrap_or_default();
        if architecture.is_empty() {
            return Err(ZmgrError::invalid_identifier(
                identifier,
                "missing architecture component",
            ));
        }

        let operating_system = match parts.next() {
            Some(os) if !os.is_empty() => os,
            _ => {
                return Err(ZmgrError::invalid_identifier(
                    identifier,
                    "expected at least ARCH-OS",
                ));
            }
        };

        let abi = parts.next().filter(|abi| !abi.is_empty());

        Ok(Self {
            identifier: identifier.to_string(),
            architecture: architecture.to_string(),
            operating_system: operating_system.to_string(),
            abi: abi.map(str::to_string),
        })
    }

    /// The identifier exactly as supplied.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    #[must_use]
    pub fn operating_system(&self) -> &str {
        &self.operating_system
    }

    #[must_use]
    pub fn abi(&self) -> Option<&str> {
        self.abi.as_deref()
    }

    /// Returns whether this target's architecture and OS match the host.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.matches_platform(Platform::detect())
    }

    /// Returns whether this target's architecture and OS match `platform`.
    #[must_use]
    pub fn matches_platform(&self, platform: Platform) -> bool {
        self.architecture == platform.arch() && self.operating_system == platform.os()
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}
