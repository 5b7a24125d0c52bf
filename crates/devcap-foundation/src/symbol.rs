//! Resolved symbol descriptors
//!
//! The type-resolution engine resolves every name reference to one of the
//! `Symbol` variants below. Descriptors are immutable snapshots: the engine
//! builds them per analysis pass and this crate never modifies them.
//!
//! # Canonical Identity
//!
//! Capability lookups are keyed by `(module_name, name)`. How that pair is
//! derived depends on the variant:
//!
//! | Variant              | Identity                          |
//! |----------------------|-----------------------------------|
//! | `Function`           | its own module and name           |
//! | `OverloadedFunction` | the first overload's module/name  |
//! | `Class`              | its own module and name           |
//! | everything else      | none                              |
//!
//! A class symbol also stands for instances of that class, which is how pin
//! objects (`microbit.pin_logo`) reach the checker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved symbol handed over by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Symbol {
    Module(ModuleSymbol),
    Class(ClassSymbol),
    Function(FunctionSymbol),
    OverloadedFunction(OverloadedSymbol),
    Variable(VariableSymbol),
    /// Anything the engine could not classify (unknown, union, literal...)
    Other,
}

/// A module object, e.g. the `log` in `import log`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSymbol {
    pub module_name: String,
}

/// A class, or an instance of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSymbol {
    pub module_name: String,
    pub name: String,
}

/// A function or method.
///
/// `bound_to` is a back-reference to the owning class when the function was
/// accessed through a class or instance. A bound function is a method, never
/// a free function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSymbol {
    pub module_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_to: Option<ClassSymbol>,
}

/// An overloaded function.
///
/// Holds at least one overload; the first one is representative for the
/// whole set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OverloadList", into = "OverloadList")]
pub struct OverloadedSymbol {
    overloads: Vec<FunctionSymbol>,
}

/// Wire form of `OverloadedSymbol`, checked for emptiness on the way in.
#[derive(Serialize, Deserialize)]
struct OverloadList {
    overloads: Vec<FunctionSymbol>,
}

/// A variable whose declared type did not resolve to anything more specific.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSymbol {
    pub name: String,
}

/// Coarse classification shared by the checker and the documentation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    OverloadedFunction,
    Variable,
    Other,
}

/// The `(module_name, name)` lookup key of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalIdentity {
    pub module_name: String,
    pub name: String,
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Module(_) => SymbolKind::Module,
            Symbol::Class(_) => SymbolKind::Class,
            Symbol::Function(_) => SymbolKind::Function,
            Symbol::OverloadedFunction(_) => SymbolKind::OverloadedFunction,
            Symbol::Variable(_) => SymbolKind::Variable,
            Symbol::Other => SymbolKind::Other,
        }
    }

    /// Derive the capability lookup key.
    ///
    /// Returns `None` when the variant carries no identity, or when both the
    /// module and the name are empty.
    pub fn canonical_identity(&self) -> Option<CanonicalIdentity> {
        let (module_name, name) = match self {
            Symbol::Function(function) => (&function.module_name, &function.name),
            Symbol::OverloadedFunction(overloaded) => {
                let first = overloaded.first();
                (&first.module_name, &first.name)
            }
            Symbol::Class(class) => (&class.module_name, &class.name),
            Symbol::Module(_) | Symbol::Variable(_) | Symbol::Other => return None,
        };

        if module_name.is_empty() && name.is_empty() {
            return None;
        }

        Some(CanonicalIdentity {
            module_name: module_name.clone(),
            name: name.clone(),
        })
    }

    /// The owning class when this symbol is a bound method.
    pub fn bound_class(&self) -> Option<&ClassSymbol> {
        match self {
            Symbol::Function(function) => function.bound_to.as_ref(),
            _ => None,
        }
    }

    pub fn module(module_name: impl Into<String>) -> Self {
        Symbol::Module(ModuleSymbol {
            module_name: module_name.into(),
        })
    }

    pub fn class(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        Symbol::Class(ClassSymbol::new(module_name, name))
    }

    pub fn function(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        Symbol::Function(FunctionSymbol::new(module_name, name))
    }

    /// A method `name` defined in `module_name` and bound to `class`.
    pub fn method(
        module_name: impl Into<String>,
        name: impl Into<String>,
        class: ClassSymbol,
    ) -> Self {
        Symbol::Function(FunctionSymbol::new(module_name, name).bound_to(class))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Symbol::Variable(VariableSymbol { name: name.into() })
    }
}

impl ClassSymbol {
    pub fn new(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            name: name.into(),
        }
    }
}

impl FunctionSymbol {
    pub fn new(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            name: name.into(),
            bound_to: None,
        }
    }

    /// Builder method: bind this function to its owning class.
    pub fn bound_to(mut self, class: ClassSymbol) -> Self {
        self.bound_to = Some(class);
        self
    }

    pub fn is_method(&self) -> bool {
        self.bound_to.is_some()
    }
}

impl OverloadedSymbol {
    pub fn new(first: FunctionSymbol, rest: impl IntoIterator<Item = FunctionSymbol>) -> Self {
        let mut overloads = vec![first];
        overloads.extend(rest);
        Self { overloads }
    }

    /// Build from a list, rejecting an empty one.
    pub fn from_overloads(overloads: Vec<FunctionSymbol>) -> Option<Self> {
        if overloads.is_empty() {
            None
        } else {
            Some(Self { overloads })
        }
    }

    /// The representative overload.
    pub fn first(&self) -> &FunctionSymbol {
        &self.overloads[0]
    }

    pub fn overloads(&self) -> &[FunctionSymbol] {
        &self.overloads
    }
}

impl TryFrom<OverloadList> for OverloadedSymbol {
    type Error = &'static str;

    fn try_from(list: OverloadList) -> Result<Self, Self::Error> {
        Self::from_overloads(list.overloads).ok_or("overloaded function without overloads")
    }
}

impl From<OverloadedSymbol> for OverloadList {
    fn from(symbol: OverloadedSymbol) -> Self {
        Self {
            overloads: symbol.overloads,
        }
    }
}

impl From<OverloadedSymbol> for Symbol {
    fn from(symbol: OverloadedSymbol) -> Self {
        Symbol::OverloadedFunction(symbol)
    }
}

impl fmt::Display for CanonicalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module_name.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.module_name, self.name)
        }
    }
}
