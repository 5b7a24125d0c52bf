//! Check configuration loading and per-file severity lookup.
//!
//! A check configuration selects the target device revision and the level
//! each diagnostic rule is reported at. Overrides adjust levels for files
//! under a path prefix (for instance, silencing the rule in test code).
//!
//! ```yaml
//! apiVersion: devcap/v1
//! kind: CheckConfig
//! device: v1
//! rules:
//!   reportMicrobitV2ApiUse: error
//! overrides:
//!   - path: tests/
//!     rules:
//!       reportMicrobitV2ApiUse: none
//! ```

use std::path::Path;

use devcap_foundation::DiagnosticLevel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::denylist::DeviceRevision;
use crate::error::DiagnosticRule;

const API_VERSION: &str = "devcap/v1";
const KIND: &str = "CheckConfig";

/// Errors that can occur when loading a check configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the configuration YAML.
    #[error("failed to parse config YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid API version.
    #[error("invalid apiVersion: expected '{}', got '{}'", API_VERSION, .0)]
    InvalidApiVersion(String),

    /// Invalid kind.
    #[error("invalid kind: expected '{}', got '{}'", KIND, .0)]
    InvalidKind(String),

    /// A rule name that no diagnostic uses.
    #[error("unknown diagnostic rule '{rule}'")]
    UnknownRule { rule: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Target revision plus rule levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    /// Device revision whose denylist applies.
    #[serde(default)]
    pub device: DeviceRevision,

    /// Level per rule name. Rules not listed report at `warning`.
    #[serde(default)]
    pub rules: IndexMap<String, DiagnosticLevel>,

    /// Path-prefix overrides, applied in order; later entries win.
    #[serde(default)]
    pub overrides: Vec<PathOverride>,
}

/// Rule levels for files under `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathOverride {
    pub path: String,
    #[serde(default)]
    pub rules: IndexMap<String, DiagnosticLevel>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self::new(DeviceRevision::default())
    }
}

impl CheckConfig {
    /// A configuration targeting `device` with every rule at its default.
    pub fn new(device: DeviceRevision) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            device,
            rules: IndexMap::new(),
            overrides: Vec::new(),
        }
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: CheckConfig = serde_yaml::from_str(yaml)?;
        config.validate_schema()?;
        Ok(config)
    }

    /// Validate API version, kind and rule names.
    fn validate_schema(&self) -> ConfigResult<()> {
        if self.api_version != API_VERSION {
            return Err(ConfigError::InvalidApiVersion(self.api_version.clone()));
        }
        if self.kind != KIND {
            return Err(ConfigError::InvalidKind(self.kind.clone()));
        }
        let rule_names = self
            .rules
            .keys()
            .chain(self.overrides.iter().flat_map(|o| o.rules.keys()));
        for name in rule_names {
            if name.parse::<DiagnosticRule>().is_err() {
                return Err(ConfigError::UnknownRule { rule: name.clone() });
            }
        }
        Ok(())
    }

    /// Level for `rule` in the file at `file_path`.
    ///
    /// Starts from `warning`, applies the top-level `rules`, then every
    /// override whose path is a leading run of `file_path`'s components,
    /// in order.
    pub fn severity_for(
        &self,
        rule: DiagnosticRule,
        file_path: impl AsRef<Path>,
    ) -> DiagnosticLevel {
        let file_path = file_path.as_ref();
        let mut level = self.rules.get(rule.name()).copied().unwrap_or_default();

        for entry in &self.overrides {
            if !file_path.starts_with(&entry.path) {
                continue;
            }
            if let Some(overridden) = entry.rules.get(rule.name()) {
                level = *overridden;
            }
        }

        level
    }

    /// Builder method: set the level of a rule.
    pub fn with_rule(mut self, rule: DiagnosticRule, level: DiagnosticLevel) -> Self {
        self.rules.insert(rule.name().to_string(), level);
        self
    }

    /// Builder method: override a rule's level under a path prefix.
    pub fn with_override(
        mut self,
        path: impl Into<String>,
        rule: DiagnosticRule,
        level: DiagnosticLevel,
    ) -> Self {
        let mut rules = IndexMap::new();
        rules.insert(rule.name().to_string(), level);
        self.overrides.push(PathOverride {
            path: path.into(),
            rules,
        });
        self
    }
}
