//! Diagnostic message templates
//!
//! Exactly three templates exist. Which one is used depends only on the
//! branch of the check that fired, never on caller input.

/// Message template selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTemplate {
    /// A module object that is unavailable as a whole
    ModuleUse,
    /// A free function, overloaded function or class inside a module
    ModuleMemberUse,
    /// A method reached through a class or instance
    ClassMethodUse,
}

impl MessageTemplate {
    /// Stable message identifier, usable as a localization key.
    pub fn id(self) -> &'static str {
        match self {
            MessageTemplate::ModuleUse => "microbitV2ModuleUse",
            MessageTemplate::ModuleMemberUse => "microbitV2ModuleMemberUse",
            MessageTemplate::ClassMethodUse => "microbitV2ClassMethodUse",
        }
    }
}

/// `"{module_name}" is not supported on a {device}`
pub fn module_use(module_name: &str, device: &str) -> String {
    format!("\"{module_name}\" is not supported on a {device}")
}

/// `"{module_name}.{name}" is not supported on a {device}`
pub fn module_member_use(name: &str, module_name: &str, device: &str) -> String {
    format!("\"{module_name}.{name}\" is not supported on a {device}")
}

/// `"{class_name}.{method_name}" is not supported on a {device}`
pub fn class_method_use(method_name: &str, class_name: &str, device: &str) -> String {
    format!("\"{class_name}.{method_name}\" is not supported on a {device}")
}
