//! Toolchain and target state for the zmgr CLI.
//!
//! Nothing in this module prints. It computes state and returns it, or a
//! typed [`ZmgrError`](crate::errors::ZmgrError); the command layer owns
//! presentation.
//!
//! ## Module Structure
//!
//! - [`platform`] - Host architecture and OS detection
//! - [`paths`] - Root directory policy and layout
//! - [`settings`] - `config.toml` user settings
//! - [`target`] - Target identifier parsing
//! - [`registry`] - Installed target directories
//! - [`detector`] - Compiler and language server detection
//! - [`lsp_config`] - `zls.json` generation
//! - [`doctor`] - Health checks

pub mod detector;
pub mod doctor;
pub mod lsp_config;
pub mod paths;
pub mod platform;
pub mod registry;
pub mod settings;
pub mod target;

pub use detector::{Detection, Provenance, Tool, ToolchainDetector, ToolchainInfo};
pub use paths::ToolchainPaths;
pub use platform::Platform;
pub use registry::{AddOutcome, TargetRegistry};
pub use settings::Settings;
pub use target::TargetDescriptor;
