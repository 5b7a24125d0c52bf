// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Foundation types for the device capability checker
//!
//! This crate holds the vocabulary shared by the compatibility checker and
//! the API documentation protocol:
//! - source locations (`Span`, `SourceMap`) and syntax references (`NodeRef`)
//! - resolved symbol descriptors (`Symbol`) and their classification
//! - configured diagnostic levels (`DiagnosticLevel`)
//!
//! Symbols are produced by an external type-resolution engine. Nothing in
//! this crate resolves types; it only describes what the engine hands over.

pub mod severity;
pub mod span;
pub mod symbol;

pub use severity::{parse_level, valid_level_strings, DiagnosticLevel, LevelParseError};
pub use span::{NodeRef, SourceFile, SourceMap, Span};
pub use symbol::{
    CanonicalIdentity, ClassSymbol, FunctionSymbol, ModuleSymbol, OverloadedSymbol, Symbol,
    SymbolKind, VariableSymbol,
};
