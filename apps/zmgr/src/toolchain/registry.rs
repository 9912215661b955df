//! Installed target registry.
//!
//! Each installed cross-compilation target is a directory directly under the
//! registry root, named exactly by its identifier. The directory's existence
//! is the only record: there is no index file to drift out of sync.
//!
//! Adding a target only creates the directory. Populating the sysroot is left
//! to the user or external tooling.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, ZmgrError};
use crate::toolchain::target::TargetDescriptor;

/// Outcome of [`TargetRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new target directory was created.
    Added,
    /// The target was already installed; nothing changed.
    AlreadyInstalled,
}

/// Filesystem-backed set of installed targets.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    root: PathBuf,
}

impl TargetRegistry {
    /// Creates a registry rooted at `root`. Nothing is touched on disk.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[cfg(test)]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the sysroot directory for `identifier`, installed or not.
    #[must_use]
    pub fn sysroot(&self, identifier: &str) -> PathBuf {
        self.root.join(identifier)
    }

    /// Registers a target.
    ///
    /// Repeated adds are a successful no-op reported as
    /// [`AddOutcome::AlreadyInstalled`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` for malformed identifiers or identifiers
    /// that would resolve outside the root, and `Io` if directories cannot be
    /// created.
    pub fn add(&self, identifier: &str) -> Result<AddOutcome> {
        let target = TargetDescriptor::parse(identifier)?;
        ensure_single_component(target.identifier())?;

        create_dir_tolerant(&self.root).map_err(|e| {
            ZmgrError::io(
                format!("failed to create registry root {}", self.root.display()),
                e,
            )
        })?;

        let dir = self.sysroot(target.identifier());
        if dir.is_dir() {
            tracing::debug!(identifier = %target, "target already installed");
            return Ok(AddOutcome::AlreadyInstalled);
        }

        match std::fs::create_dir(&dir) {
            Ok(()) => {
                tracing::info!(identifier = %target, path = %dir.display(), "target added");
                Ok(AddOutcome::Added)
            }
            // Lost a race with another process adding the same target.
            Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => {
                Ok(AddOutcome::AlreadyInstalled)
            }
            Err(e) => Err(ZmgrError::io(
                format!("failed to create target directory {}", dir.display()),
                e,
            )),
        }
    }

    /// Deletes an installed target and everything under it.
    ///
    /// Not idempotent: removing a target that is not installed is an error so
    /// callers learn that nothing was removed. A failure part way through the
    /// recursive delete is not rolled back.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` for identifiers `add` would reject,
    /// `TargetNotInstalled` if the target is absent, and `Io` if the target
    /// directory cannot be inspected or deleted.
    pub fn remove(&self, identifier: &str) -> Result<()> {
        let target = TargetDescriptor::parse(identifier)?;
        ensure_single_component(target.identifier())?;

        let dir = self.sysroot(target.identifier());
        match std::fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ZmgrError::target_not_installed(identifier)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ZmgrError::target_not_installed(identifier));
            }
            Err(e) => {
                return Err(ZmgrError::io(
                    format!("failed to inspect target directory {}", dir.display()),
                    e,
                ));
            }
        }

        std::fs::remove_dir_all(&dir).map_err(|e| {
            ZmgrError::io(
                format!("failed to remove target directory {}", dir.display()),
                e,
            )
        })?;
        tracing::info!(identifier, "target removed");
        Ok(())
    }

    /// Lists installed target identifiers, sorted.
    ///
    /// A missing registry root means nothing is installed. Regular files
    /// under the root are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the root exists but cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ZmgrError::io(
                    format!("failed to read registry root {}", self.root.display()),
                    e,
                ));
            }
        };

        let mut targets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ZmgrError::io("failed to read directory entry", e))?;
            let path = entry.path();
            if path.is_dir()
                && let Some(name) = path.file_name()
                && let Some(name_str) = name.to_str()
            {
                targets.push(name_str.to_string());
            }
        }

        targets.sort();
        Ok(targets)
    }

    /// Returns whether `identifier` is installed. Never fails.
    ///
    /// Identifiers that `add` would reject are never installed.
    #[must_use]
    pub fn is_installed(&self, identifier: &str) -> bool {
        if TargetDescriptor::parse(identifier).is_err()
            || ensure_single_component(identifier).is_err()
        {
            return false;
        }
        self.sysroot(identifier).is_dir()
    }
}

/// Rejects identifiers that are not a single normal path component.
fn ensure_single_component(identifier: &str) -> Result<()> {
    let mut components = Path::new(identifier).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == identifier => Ok(()),
        _ => Err(ZmgrError::invalid_identifier(
            identifier,
            "identifier must be a single path component",
        )),
    }
}

fn create_dir_tolerant(dir: &Path) -> std::io::Result<()> {
    match std::fs::create_dir_all(dir) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        other => other,
    }
}
