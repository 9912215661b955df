//! Command modules for the zmgr CLI.
//!
//! ## Target Commands
//!
//! - [`target`] - Add, remove, list, and inspect cross-compilation targets
//!
//! ## Toolchain Commands
//!
//! - [`status`] - Show the active compiler and language server
//! - [`config`] - Generate `zls.json`
//! - [`doctor`] - Check setup health
//! - [`version`] - Display version information

pub mod config;
pub mod doctor;
pub mod status;
pub mod target;
pub mod version;
