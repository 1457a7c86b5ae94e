//! Check configuration.
//!
//! The configuration is produced outside the engine (settings file or the
//! embedding tool); the engine only consumes it to decide which detectors
//! run. Correctness detectors always run; everything else is behind the
//! coding-style toggle, and any detector can be disabled by name.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::diagnostics::CheckId;

/// Named toggles gating the detector set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Enable coding-style detectors (scope narrowing, redundant code,
    /// old-style casts, ...). Off by default.
    #[serde(default)]
    pub style_checks: bool,
    /// Identifiers of detectors to skip regardless of tier or severity.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl CheckConfig {
    /// Configuration with every detector enabled.
    pub fn all() -> Self {
        CheckConfig {
            style_checks: true,
            disabled: Vec::new(),
        }
    }

    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: CheckConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Whether the detector behind `id` should run.
    pub fn is_enabled(&self, id: CheckId) -> bool {
        !self.disabled.iter().any(|d| d == id.as_str())
    }
}
