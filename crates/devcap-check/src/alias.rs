//! Pin name aliasing
//!
//! The stub library declares several physically distinct pins with one
//! shared type (`pin_speaker` is a `MicroBitAnalogDigitalPin` like `pin0`).
//! After resolution only the declared type name is left, which would make
//! every analog/digital pin look like the same symbol. The alias table maps
//! `(declared type, written attribute)` back to the name the denylist is
//! keyed by.

/// One alias correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasRule {
    /// Declared type name the resolver reports
    pub declared_type: &'static str,
    /// Identifier the user wrote at the reference site
    pub written_name: &'static str,
    /// Name to use for the denylist lookup
    pub effective_name: &'static str,
}

const PIN_ALIASES: &[AliasRule] = &[
    AliasRule {
        declared_type: "MicroBitAnalogDigitalPin",
        written_name: "pin_speaker",
        effective_name: "pin_speaker",
    },
    AliasRule {
        declared_type: "MicroBitTouchPin",
        written_name: "pin_logo",
        effective_name: "pin_logo",
    },
];

/// Declarative table of alias corrections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasTable {
    rules: &'static [AliasRule],
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::pins()
    }
}

impl AliasTable {
    /// Pin aliases for the micro:bit stub library.
    pub const fn pins() -> Self {
        Self {
            rules: PIN_ALIASES,
        }
    }

    pub const fn new(rules: &'static [AliasRule]) -> Self {
        Self { rules }
    }

    /// A table that never rewrites names.
    pub const fn empty() -> Self {
        Self { rules: &[] }
    }

    pub fn rules(&self) -> &'static [AliasRule] {
        self.rules
    }

    /// Name override for a resolved `declared_type` written as `written_name`.
    ///
    /// Returns `None` when no rule applies, including when the reference
    /// site is not a plain name.
    pub fn effective_name(
        &self,
        declared_type: &str,
        written_name: Option<&str>,
    ) -> Option<&'static str> {
        let written_name = written_name?;
        self.rules
            .iter()
            .find(|rule| rule.declared_type == declared_type && rule.written_name == written_name)
            .map(|rule| rule.effective_name)
    }
}
