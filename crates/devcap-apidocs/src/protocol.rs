//! Wire types for the `pyright/apidocs` request.
//!
//! Field names follow the JSON the editor client expects (camelCase, with
//! optional fields omitted rather than sent as `null`).

use devcap_foundation::{Symbol, SymbolKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tower_lsp::lsp_types::request::Request;

/// Request parameters: which modules, as seen from which file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDocsParams {
    pub modules: Vec<String>,
    pub path: String,
}

/// A base class reference on a class entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocsBaseClass {
    pub name: String,
    pub full_name: String,
}

/// Classification of a documented symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiDocsKind {
    Function,
    Module,
    Class,
    Variable,
}

impl ApiDocsKind {
    /// Entry kind for a symbol classification.
    ///
    /// Overloaded functions document as functions; unclassified symbols are
    /// not documentable.
    pub fn from_symbol_kind(kind: SymbolKind) -> Option<Self> {
        match kind {
            SymbolKind::Module => Some(ApiDocsKind::Module),
            SymbolKind::Class => Some(ApiDocsKind::Class),
            SymbolKind::Function | SymbolKind::OverloadedFunction => Some(ApiDocsKind::Function),
            SymbolKind::Variable => Some(ApiDocsKind::Variable),
            SymbolKind::Other => None,
        }
    }

    pub fn from_symbol(symbol: &Symbol) -> Option<Self> {
        Self::from_symbol_kind(symbol.kind())
    }

    /// Only modules and classes contain other entries.
    pub fn allows_children(self) -> bool {
        matches!(self, ApiDocsKind::Module | ApiDocsKind::Class)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApiDocsKind::Function => "function",
            ApiDocsKind::Module => "module",
            ApiDocsKind::Class => "class",
            ApiDocsKind::Variable => "variable",
        }
    }
}

impl fmt::Display for ApiDocsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a documentation tree.
///
/// Children are owned by their parent; a tree never shares or cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocsEntry {
    /// Unique within one response
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    /// Full dotted path, e.g. `microbit.audio.SoundEffect`
    pub full_name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_string: Option<String>,
    pub kind: ApiDocsKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ApiDocsEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_classes: Option<Vec<ApiDocsBaseClass>>,
}

/// Response: one tree per requested key (usually the module name).
pub type ApiDocsResponse = IndexMap<String, ApiDocsEntry>;

/// Check every tree of a response, with ids unique across all of them.
pub fn validate_response(response: &ApiDocsResponse) -> ApiDocsResult<()> {
    let mut ids = HashSet::new();
    for entry in response.values() {
        entry.validate_into(&mut ids)?;
    }
    Ok(())
}

/// The custom LSP request descriptor.
#[derive(Debug)]
pub enum ApiDocsRequest {}

impl Request for ApiDocsRequest {
    type Params = ApiDocsParams;
    type Result = ApiDocsResponse;
    const METHOD: &'static str = "pyright/apidocs";
}

/// Shape violations in a documentation tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiDocsError {
    #[error("{kind} entry '{full_name}' cannot have children")]
    ChildrenNotAllowed {
        full_name: String,
        kind: ApiDocsKind,
    },

    #[error("{kind} entry '{full_name}' cannot have base classes")]
    BaseClassesNotAllowed {
        full_name: String,
        kind: ApiDocsKind,
    },

    #[error("duplicate entry id '{id}'")]
    DuplicateId { id: String },
}

/// Result type for documentation tree operations.
pub type ApiDocsResult<T> = Result<T, ApiDocsError>;

impl ApiDocsEntry {
    /// A new entry for `full_name`.
    ///
    /// The name is the last dotted segment and the id defaults to the full
    /// name until a response builder assigns the final one.
    pub fn new(kind: ApiDocsKind, full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit('.')
            .next()
            .unwrap_or(&full_name)
            .to_string();
        Self {
            id: full_name.clone(),
            name,
            doc_string: None,
            full_name,
            type_string: None,
            kind,
            children: None,
            base_classes: None,
        }
    }

    pub fn module(full_name: impl Into<String>) -> Self {
        Self::new(ApiDocsKind::Module, full_name)
    }

    pub fn class(full_name: impl Into<String>) -> Self {
        Self::new(ApiDocsKind::Class, full_name)
    }

    pub fn function(full_name: impl Into<String>) -> Self {
        Self::new(ApiDocsKind::Function, full_name)
    }

    pub fn variable(full_name: impl Into<String>) -> Self {
        Self::new(ApiDocsKind::Variable, full_name)
    }

    /// Builder method: set the docstring.
    pub fn with_doc_string(mut self, doc: impl Into<String>) -> Self {
        self.doc_string = Some(doc.into());
        self
    }

    /// Builder method: set the type string.
    pub fn with_type(mut self, type_string: impl Into<String>) -> Self {
        self.type_string = Some(type_string.into());
        self
    }

    /// Append a child entry; only module and class entries accept one.
    pub fn add_child(&mut self, child: ApiDocsEntry) -> ApiDocsResult<()> {
        if !self.kind.allows_children() {
            return Err(ApiDocsError::ChildrenNotAllowed {
                full_name: self.full_name.clone(),
                kind: self.kind,
            });
        }
        self.children.get_or_insert_with(Vec::new).push(child);
        Ok(())
    }

    /// Append a base class; only class entries accept one.
    pub fn add_base_class(
        &mut self,
        name: impl Into<String>,
        full_name: impl Into<String>,
    ) -> ApiDocsResult<()> {
        if self.kind != ApiDocsKind::Class {
            return Err(ApiDocsError::BaseClassesNotAllowed {
                full_name: self.full_name.clone(),
                kind: self.kind,
            });
        }
        self.base_classes
            .get_or_insert_with(Vec::new)
            .push(ApiDocsBaseClass {
                name: name.into(),
                full_name: full_name.into(),
            });
        Ok(())
    }

    pub fn children(&self) -> &[ApiDocsEntry] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Depth-first iterator over this entry and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &ApiDocsEntry> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let entry = stack.pop()?;
            stack.extend(entry.children().iter().rev());
            Some(entry)
        })
    }

    /// Check the shape invariants of the whole tree.
    ///
    /// - `children` only on module and class entries
    /// - `baseClasses` only on class entries
    /// - ids unique across the tree
    pub fn validate(&self) -> ApiDocsResult<()> {
        let mut ids = HashSet::new();
        self.validate_into(&mut ids)
    }

    fn validate_into<'a>(&'a self, ids: &mut HashSet<&'a str>) -> ApiDocsResult<()> {
        for entry in self.walk() {
            if entry.children.is_some() && !entry.kind.allows_children() {
                return Err(ApiDocsError::ChildrenNotAllowed {
                    full_name: entry.full_name.clone(),
                    kind: entry.kind,
                });
            }
            if entry.base_classes.is_some() && entry.kind != ApiDocsKind::Class {
                return Err(ApiDocsError::BaseClassesNotAllowed {
                    full_name: entry.full_name.clone(),
                    kind: entry.kind,
                });
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(ApiDocsError::DuplicateId {
                    id: entry.id.clone(),
                });
            }
        }
        Ok(())
    }
}
