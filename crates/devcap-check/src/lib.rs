// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Device capability compatibility checking
//!
//! Given a resolved symbol and the syntax node it was referenced from, this
//! crate decides whether the reference names an API the target device
//! revision lacks, and if so emits a diagnostic through a caller-supplied
//! sink.
//!
//! # Pipeline Position
//!
//! ```text
//! type resolution → binder/checker walk → compatibility check → diagnostic sink
//!                                           ^^^^^^^^^^^^^^^^^^^
//! ```
//!
//! The walk decides *when* to ask; this crate only answers *whether* and
//! *what to say*.

pub mod alias;
pub mod compat;
pub mod config;
pub mod denylist;
pub mod error;
pub mod messages;

pub use alias::{AliasRule, AliasTable};
pub use compat::{CompatibilityChecker, Incompatibility};
pub use config::{CheckConfig, ConfigError, ConfigResult, PathOverride};
pub use denylist::{Denylist, DeviceRevision, MemberRule, ModuleRule};
pub use error::{Diagnostic, DiagnosticCollector, DiagnosticFormatter, DiagnosticRule, DiagnosticSink};
