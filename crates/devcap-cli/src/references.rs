//! Resolved symbol references read from JSON.
//!
//! The checker does not parse Python. A host that has already bound names
//! writes one record per reference:
//!
//! ```json
//! [
//!   {
//!     "file": "main.py",
//!     "start": 11,
//!     "end": 14,
//!     "name": "log",
//!     "symbol": { "kind": "module", "moduleName": "log" }
//!   }
//! ]
//! ```
//!
//! `name` is present when the node is a plain name; `memberName` when the
//! symbol is a module reached through attribute access.

use std::path::{Path, PathBuf};

use devcap_foundation::{NodeRef, Span, Symbol};
use serde::Deserialize;

use crate::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolReference {
    pub file: PathBuf,
    pub start: u32,
    pub end: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    pub symbol: Symbol,
}

impl SymbolReference {
    /// The node this reference points at, in the source file `file_id`.
    pub fn node(&self, file_id: u16) -> NodeRef {
        let span = Span::new(file_id, self.start, self.end);
        match &self.name {
            Some(name) => NodeRef::name(span, name.clone()),
            None => NodeRef::expr(span),
        }
    }
}

pub fn load_references(path: &Path) -> CliResult<Vec<SymbolReference>> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
