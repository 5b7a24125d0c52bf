//! Configured diagnostic levels
//!
//! A `DiagnosticLevel` is the severity a host configures for a diagnostic
//! rule, usually per file. The checker never computes one; it receives the
//! level from its caller and forwards it to the diagnostic sink.
//!
//! This module is the single place where level strings (as written in
//! configuration files) are converted to the enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity configured for a diagnostic rule.
///
/// `None` is the disabled sentinel: a rule configured at this level must not
/// produce diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum DiagnosticLevel {
    /// Rule disabled
    None,
    /// Informational hint
    Information,
    /// Warning (the default for compatibility rules)
    #[default]
    Warning,
    /// Error
    Error,
}

/// A level string that is not one of the accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagnostic level '{found}', valid values: {}", valid_level_strings().join(", "))]
pub struct LevelParseError {
    /// The rejected input, lowercased
    pub found: String,
}

impl DiagnosticLevel {
    /// Canonical configuration spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticLevel::None => "none",
            DiagnosticLevel::Information => "information",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
        }
    }

    /// Returns `true` unless this is the disabled sentinel.
    pub fn is_enabled(self) -> bool {
        self != DiagnosticLevel::None
    }
}

/// Parse a diagnostic level string.
///
/// Accepts:
/// - `"none"` → `DiagnosticLevel::None`
/// - `"information"` or `"info"` → `DiagnosticLevel::Information`
/// - `"warning"` or `"warn"` → `DiagnosticLevel::Warning`
/// - `"error"` → `DiagnosticLevel::Error`
///
/// Comparison is case-insensitive.
///
/// # Examples
///
/// ```
/// use devcap_foundation::{parse_level, DiagnosticLevel};
///
/// assert_eq!(parse_level("warning").unwrap(), DiagnosticLevel::Warning);
/// assert_eq!(parse_level("INFO").unwrap(), DiagnosticLevel::Information);
/// assert!(parse_level("loud").unwrap_err().to_string().contains("loud"));
/// ```
pub fn parse_level(s: &str) -> Result<DiagnosticLevel, LevelParseError> {
    match s.to_lowercase().as_str() {
        "none" => Ok(DiagnosticLevel::None),
        "information" | "info" => Ok(DiagnosticLevel::Information),
        "warning" | "warn" => Ok(DiagnosticLevel::Warning),
        "error" => Ok(DiagnosticLevel::Error),
        unknown => Err(LevelParseError {
            found: unknown.to_string(),
        }),
    }
}

/// All accepted level spellings, canonical names first.
pub fn valid_level_strings() -> &'static [&'static str] {
    &["none", "information", "warning", "error", "info", "warn"]
}

impl FromStr for DiagnosticLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_level(s)
    }
}

impl TryFrom<String> for DiagnosticLevel {
    type Error = LevelParseError;

    fn try_from(value: String) -> Result<Self, LevelParseError> {
        parse_level(&value)
    }
}

impl From<DiagnosticLevel> for String {
    fn from(level: DiagnosticLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
