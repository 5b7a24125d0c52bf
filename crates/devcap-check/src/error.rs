//! Diagnostic values, sinks and formatting.
//!
//! The checker does not own diagnostic storage. It hands a level, a rule,
//! a message and a span to a `DiagnosticSink` supplied by the host. This
//! module defines that seam plus a collecting sink and a terminal formatter
//! for hosts that do not bring their own.
//!
//! # Design
//!
//! - `DiagnosticRule`: the configurable rule a diagnostic belongs to
//! - `DiagnosticSink`: injected sink; may suppress and return nothing
//! - `Diagnostic` / `DiagnosticCollector`: default in-memory sink
//! - `DiagnosticFormatter`: renders diagnostics with source snippets

use devcap_foundation::{DiagnosticLevel, SourceMap, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configurable diagnostic rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticRule {
    /// Use of an API the target device revision does not support
    #[serde(rename = "reportMicrobitV2ApiUse")]
    ReportMicrobitV2ApiUse,
}

impl DiagnosticRule {
    /// Rule name as written in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticRule::ReportMicrobitV2ApiUse => "reportMicrobitV2ApiUse",
        }
    }

    pub fn all() -> &'static [DiagnosticRule] {
        &[DiagnosticRule::ReportMicrobitV2ApiUse]
    }
}

impl FromStr for DiagnosticRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagnosticRule::all()
            .iter()
            .copied()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| format!("unknown diagnostic rule '{s}'"))
    }
}

impl fmt::Display for DiagnosticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives diagnostics from the checker.
///
/// Returning `None` means the sink suppressed the diagnostic; the checker
/// ignores the return value either way.
pub trait DiagnosticSink {
    type Handle;

    fn add_diagnostic(
        &mut self,
        level: DiagnosticLevel,
        rule: DiagnosticRule,
        message: String,
        span: Span,
    ) -> Option<Self::Handle>;
}

impl<F, H> DiagnosticSink for F
where
    F: FnMut(DiagnosticLevel, DiagnosticRule, String, Span) -> Option<H>,
{
    type Handle = H;

    fn add_diagnostic(
        &mut self,
        level: DiagnosticLevel,
        rule: DiagnosticRule,
        message: String,
        span: Span,
    ) -> Option<H> {
        self(level, rule, message, span)
    }
}

/// A diagnostic recorded by `DiagnosticCollector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: DiagnosticRule,
    pub level: DiagnosticLevel,
    pub span: Span,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(rule: DiagnosticRule, level: DiagnosticLevel, span: Span, message: String) -> Self {
        Self {
            rule,
            level,
            span,
            message,
            notes: Vec::new(),
        }
    }

    /// Builder method: attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.level, self.rule, self.message)
    }
}

/// In-memory sink.
///
/// Drops diagnostics at `DiagnosticLevel::None`; the handle of a recorded
/// diagnostic is its index.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    type Handle = usize;

    fn add_diagnostic(
        &mut self,
        level: DiagnosticLevel,
        rule: DiagnosticRule,
        message: String,
        span: Span,
    ) -> Option<usize> {
        if !level.is_enabled() {
            return None;
        }
        self.diagnostics
            .push(Diagnostic::new(rule, level, span, message));
        Some(self.diagnostics.len() - 1)
    }
}

/// Renders diagnostics with source context.
///
/// ```text
/// warning: reportMicrobitV2ApiUse: "log.add" is not supported on a micro:bit V1
///   --> test2.py:2:5
///    |
///  2 | log.add()
///    |     ^^^
/// ```
///
/// Spans whose file is not in the source map render as the header line only;
/// spans outside their file's text render without line and column.
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format!("{diagnostic}\n");

        let Some(file) = self.sources.file(&diagnostic.span) else {
            return output;
        };
        let Some((line, col)) = self.sources.line_col(&diagnostic.span) else {
            output.push_str(&format!("  --> {}\n", file.path.display()));
            return output;
        };

        output.push_str(&format!("  --> {}:{}:{}\n", file.path.display(), line, col));

        if let Some(source_line) = file.line_text(line).filter(|text| !text.is_empty()) {
            let start = col as usize;
            let width = (diagnostic.span.len() as usize)
                .min(source_line.len().saturating_sub(start - 1))
                .max(1);
            output.push_str("   |\n");
            output.push_str(&format!("{line:3} | {source_line}\n"));
            output.push_str(&format!(
                "   | {}{}\n",
                " ".repeat(start - 1),
                "^".repeat(width)
            ));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = note: {note}\n"));
        }

        output
    }

    /// Format several diagnostics separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
