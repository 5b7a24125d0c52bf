//! Device compatibility check
//!
//! Decides whether a resolved symbol reference names an API the target
//! device revision lacks, and reports it.
//!
//! # What This Check Does
//!
//! 1. **Module objects**: a reference to a module (or a member looked up on
//!    it) is tested at module granularity and reported as a module use.
//! 2. **Canonical identity**: functions, overloaded functions and classes are
//!    reduced to `(module_name, name)`.
//! 3. **Alias correction**: pin objects whose declared type is shared by
//!    several pins get the written attribute name instead.
//! 4. **Denylist test**: the identity is looked up in the revision's table.
//! 5. **Report**: bound methods are reported against their class, everything
//!    else against its module.
//!
//! Steps 1 and 2–5 are independent; a single reference can produce both a
//! module use and a member use.
//!
//! # Examples
//!
//! ```
//! use devcap_check::{CompatibilityChecker, DeviceRevision, DiagnosticCollector};
//! use devcap_foundation::{DiagnosticLevel, NodeRef, Span, Symbol};
//!
//! let checker = CompatibilityChecker::new(DeviceRevision::V1);
//! let mut sink = DiagnosticCollector::new();
//! let node = NodeRef::name(Span::new(0, 0, 9), "run_every");
//!
//! checker.report_if_incompatible(
//!     &Symbol::function("microbit", "run_every"),
//!     &node,
//!     &mut sink,
//!     DiagnosticLevel::Warning,
//!     None,
//! );
//!
//! assert_eq!(
//!     sink.messages(),
//!     vec!["\"microbit.run_every\" is not supported on a micro:bit V1"]
//! );
//! ```

use devcap_foundation::{DiagnosticLevel, NodeRef, Symbol};
use tracing::{debug, trace};

use crate::alias::AliasTable;
use crate::denylist::{Denylist, DeviceRevision};
use crate::error::{DiagnosticRule, DiagnosticSink};
use crate::messages::{self, MessageTemplate};


/// Rule every compatibility diagnostic is filed under.
pub const COMPAT_RULE: DiagnosticRule = DiagnosticRule::ReportMicrobitV2ApiUse;

/// One reason a reference is incompatible with the target revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Incompatibility {
    /// The module itself is unavailable
    ModuleUse { module_name: String },
    /// A function, overloaded function or class of a module is unavailable
    ModuleMemberUse { name: String, module_name: String },
    /// A method reached through a class or instance is unavailable
    ClassMethodUse {
        method_name: String,
        class_name: String,
    },
}

impl Incompatibility {
    pub fn template(&self) -> MessageTemplate {
        match self {
            Incompatibility::ModuleUse { .. } => MessageTemplate::ModuleUse,
            Incompatibility::ModuleMemberUse { .. } => MessageTemplate::ModuleMemberUse,
            Incompatibility::ClassMethodUse { .. } => MessageTemplate::ClassMethodUse,
        }
    }

    /// Render the message for `device`.
    pub fn message(&self, device: &str) -> String {
        match self {
            Incompatibility::ModuleUse { module_name } => messages::module_use(module_name, device),
            Incompatibility::ModuleMemberUse { name, module_name } => {
                messages::module_member_use(name, module_name, device)
            }
            Incompatibility::ClassMethodUse {
                method_name,
                class_name,
            } => messages::class_method_use(method_name, class_name, device),
        }
    }
}

/// Checks symbol references against one revision's denylist.
///
/// Holds only shared, immutable tables; one checker can serve any number of
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityChecker<'a> {
    denylist: &'a Denylist,
    aliases: AliasTable,
}

impl CompatibilityChecker<'static> {
    /// Checker for `revision` with the standard pin aliases.
    pub fn new(revision: DeviceRevision) -> Self {
        Self::with_tables(Denylist::for_revision(revision), AliasTable::pins())
    }
}

impl<'a> CompatibilityChecker<'a> {
    pub fn with_tables(denylist: &'a Denylist, aliases: AliasTable) -> Self {
        Self { denylist, aliases }
    }

    pub fn denylist(&self) -> &'a Denylist {
        self.denylist
    }

    /// Device label used in messages.
    pub fn device(&self) -> &'static str {
        self.denylist.revision().label()
    }

    /// Decide which incompatibilities a reference exhibits.
    ///
    /// `member_name` is the member being looked up when `symbol` is a module
    /// reached through attribute access; it only affects the module-level
    /// test. Findings are returned in report order, module use first.
    pub fn evaluate(
        &self,
        symbol: &Symbol,
        node: &NodeRef,
        member_name: Option<&str>,
    ) -> Vec<Incompatibility> {
        let mut findings = Vec::new();

        if let Symbol::Module(module) = symbol {
            if self
                .denylist
                .is_denylisted(&module.module_name, member_name)
            {
                findings.push(Incompatibility::ModuleUse {
                    module_name: module.module_name.clone(),
                });
            }
        }

        let Some(identity) = symbol.canonical_identity() else {
            return findings;
        };

        let name = self
            .aliases
            .effective_name(&identity.name, node.written_name())
            .map(str::to_string)
            .unwrap_or(identity.name);

        if !self
            .denylist
            .is_denylisted(&identity.module_name, Some(&name))
        {
            return findings;
        }

        match symbol.bound_class() {
            Some(class) => findings.push(Incompatibility::ClassMethodUse {
                method_name: name,
                class_name: class.name.clone(),
            }),
            None => findings.push(Incompatibility::ModuleMemberUse {
                name,
                module_name: identity.module_name,
            }),
        }

        findings
    }

    /// Report every incompatibility of a reference through `sink`.
    ///
    /// `level` comes from the host's per-file configuration and is passed
    /// through unchanged. At `DiagnosticLevel::None` the sink is not called.
    pub fn report_if_incompatible<S>(
        &self,
        symbol: &Symbol,
        node: &NodeRef,
        sink: &mut S,
        level: DiagnosticLevel,
        member_name: Option<&str>,
    ) where
        S: DiagnosticSink + ?Sized,
    {
        for finding in self.evaluate(symbol, node, member_name) {
            let message = finding.message(self.device());
            if !level.is_enabled() {
                trace!(rule = %COMPAT_RULE, %message, "compatibility diagnostic disabled");
                continue;
            }
            debug!(
                rule = %COMPAT_RULE,
                %level,
                template = finding.template().id(),
                kind = ?symbol.kind(),
                %message,
                "compatibility diagnostic"
            );
            sink.add_diagnostic(level, COMPAT_RULE, message, node.span);
        }
    }

    /// Module-only test for import statements.
    pub fn check_module_import(&self, module_name: &str) -> bool {
        self.denylist.is_denylisted(module_name, None)
    }

    /// Run `callback` when `module_name` is unavailable as a whole.
    ///
    /// For callers that build the diagnostic themselves, such as a binder
    /// reporting on an `import` statement.
    pub fn if_module_denylisted(&self, module_name: &str, callback: impl FnOnce()) {
        if self.check_module_import(module_name) {
            callback();
        }
    }
}

impl Default for CompatibilityChecker<'static> {
    fn default() -> Self {
        Self::new(DeviceRevision::default())
    }
}
