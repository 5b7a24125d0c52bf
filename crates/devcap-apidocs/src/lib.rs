// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! API documentation tree protocol
//!
//! A custom LSP request (`pyright/apidocs`) lets an editor ask the analysis
//! engine for the public API surface of a set of modules. Each module comes
//! back as a tree of classified entries (module, class, function, variable)
//! with names, dotted paths, docstrings and type strings.
//!
//! This crate defines the wire shape, the entry invariants, and a response
//! builder that assigns response-unique ids. Populating entries from a live
//! symbol table is the analysis engine's job.

pub mod builder;
pub mod protocol;

pub use builder::{find_entry, ApiDocsResponseBuilder};
pub use protocol::{
    ApiDocsBaseClass, ApiDocsEntry, ApiDocsError, ApiDocsKind, ApiDocsParams, ApiDocsRequest,
    ApiDocsResponse, ApiDocsResult, validate_response,
};
