//! Capability denylists per device revision
//!
//! Each device revision has one table of module rules. A rule either
//! disallows a whole module (the module itself is the capability) or only a
//! named subset of its members (the module mostly works, a few members do
//! not).
//!
//! Tables are static data, indexed once on first use and shared by every
//! check in the process. Supporting another revision means adding a table,
//! not another copy of the matching logic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A hardware/runtime variant with its own supported API surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRevision {
    /// Original board: no microphone, speaker, logo touch or sound effects
    #[default]
    V1,
    /// Current board: supports the full API
    V2,
}

impl DeviceRevision {
    /// Device label used in diagnostic messages.
    pub const fn label(self) -> &'static str {
        match self {
            DeviceRevision::V1 => "micro:bit V1",
            DeviceRevision::V2 => "micro:bit V2",
        }
    }

    pub const fn all() -> &'static [DeviceRevision] {
        &[DeviceRevision::V1, DeviceRevision::V2]
    }
}

impl fmt::Display for DeviceRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which members of a module are disallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRule {
    /// The whole module is unavailable
    All,
    /// Only these members are unavailable
    Only(&'static [&'static str]),
}

/// One row of a denylist table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRule {
    pub module: &'static str,
    pub members: MemberRule,
}

impl ModuleRule {
    pub const fn all(module: &'static str) -> Self {
        Self {
            module,
            members: MemberRule::All,
        }
    }

    pub const fn only(module: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            module,
            members: MemberRule::Only(members),
        }
    }
}

const V1_RULES: &[ModuleRule] = &[
    ModuleRule::all("log"),
    ModuleRule::all("microbit.microphone"),
    ModuleRule::all("microbit.speaker"),
    ModuleRule::all("power"),
    ModuleRule::only(
        "microbit",
        &["run_every", "set_volume", "Sound", "pin_logo", "pin_speaker"],
    ),
    ModuleRule::only("microbit.audio", &["SoundEffect"]),
    ModuleRule::only("neopixel", &["fill", "write"]),
];

const V2_RULES: &[ModuleRule] = &[];

static V1_DENYLIST: LazyLock<Denylist> =
    LazyLock::new(|| Denylist::from_rules(DeviceRevision::V1, V1_RULES));

static V2_DENYLIST: LazyLock<Denylist> =
    LazyLock::new(|| Denylist::from_rules(DeviceRevision::V2, V2_RULES));

/// Indexed denylist for one device revision.
#[derive(Debug, Clone)]
pub struct Denylist {
    revision: DeviceRevision,
    rules: IndexMap<&'static str, MemberRule>,
}

impl Denylist {
    /// The process-wide table for a revision.
    pub fn for_revision(revision: DeviceRevision) -> &'static Denylist {
        match revision {
            DeviceRevision::V1 => LazyLock::force(&V1_DENYLIST),
            DeviceRevision::V2 => LazyLock::force(&V2_DENYLIST),
        }
    }

    /// Index a rule table.
    ///
    /// A module listed twice keeps its last rule.
    pub fn from_rules(revision: DeviceRevision, rules: &[ModuleRule]) -> Self {
        Self {
            revision,
            rules: rules.iter().map(|r| (r.module, r.members)).collect(),
        }
    }

    pub fn revision(&self) -> DeviceRevision {
        self.revision
    }

    /// Rules in table order.
    pub fn rules(&self) -> impl Iterator<Item = ModuleRule> + '_ {
        self.rules.iter().map(|(module, members)| ModuleRule {
            module: *module,
            members: *members,
        })
    }

    /// Whether `module_name`, or `member_name` within it, is unavailable.
    ///
    /// A fully disallowed module matches regardless of `member_name`. A
    /// partially disallowed module matches only when `member_name` is one of
    /// its listed members; with no member name it never matches.
    pub fn is_denylisted(&self, module_name: &str, member_name: Option<&str>) -> bool {
        match self.rules.get(module_name) {
            Some(MemberRule::All) => true,
            Some(MemberRule::Only(members)) => {
                member_name.is_some_and(|member| members.iter().any(|m| *m == member))
            }
            None => false,
        }
    }
}
