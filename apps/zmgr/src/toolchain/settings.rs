//! User settings stored in `config.toml` under the zmgr root.
//!
//! ```toml
//! [lsp]
//! enable_snippets = true
//! enable_build_on_save = false
//! ```
//!
//! Every key is optional. A missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Language server integration options.
    #[serde(default)]
    pub lsp: LspSettings,
}

/// Options copied into the generated `zls.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LspSettings {
    /// Whether completions may insert snippets.
    #[serde(default = "default_enable_snippets")]
    pub enable_snippets: bool,

    /// Run `zig build` on save. Left out of `zls.json` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_build_on_save: Option<bool>,
}

impl Default for LspSettings {
    fn default() -> Self {
        Self {
            enable_snippets: default_enable_snippets(),
            enable_build_on_save: None,
        }
    }
}

fn default_enable_snippets() -> bool {
    true
}

impl Settings {
    /// Loads settings from `path`, returning defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings: {}", path.display()));
            }
        };
        Self::parse(&content).with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse settings TOML")
    }
}
