//! Rule system modules and the composition layer over them.
//!
//! Each supported game system lives in its own submodule and plugs into the
//! shared composition contract: a character or card opts into a system by
//! carrying that system's mechanics payload under its key, and the
//! composition layer wires a controller for every opted-in system that
//! defines one. Modules never know about each other.
//!
//! # Supported Systems
//!
//! - Generic (`generic`): no mechanics, no controller -- the identity case.
//! - Arcane Rift (`arcaneRift`): the full rule module.

pub mod arcane_rift;
mod cards;
mod character;

pub use cards::{default_card_mechanics, CardMechanics};
pub use character::{
    default_character_mechanics, default_character_rules, CharacterController, CharacterMechanics,
    CharacterRules,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Key selecting a rule module.
///
/// The set of keys is closed and known at compile time; it indexes every
/// per-system slice of character and card mechanics. On the wire a key is
/// its literal string (`"generic"`, `"arcaneRift"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemKey {
    /// Basic mechanics that fit with any game system; carries no rule module.
    Generic,
    /// The Arcane Rift home-brew system.
    ArcaneRift,
}

impl SystemKey {
    /// All keys, generic first.
    pub const ALL: [SystemKey; 2] = [SystemKey::Generic, SystemKey::ArcaneRift];

    /// The wire literal for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            SystemKey::Generic => "generic",
            SystemKey::ArcaneRift => "arcaneRift",
        }
    }
}

impl fmt::Display for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SystemKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown system key: {s}")))
    }
}

/// Mechanics payload of the generic module: deliberately empty.
///
/// The generic key is always present on characters and cards, proving the
/// composition model works with zero rule modules active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMechanics {}

/// Human-readable metadata describing a rule system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub name: String,
    pub description: String,
    /// Icon identifier in the UI's icon-set notation (e.g. `mdi:dice-multiple`).
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Locked systems cannot be deselected in the UI.
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One registry row: a system key with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEntry {
    pub key: SystemKey,
    pub info: SystemInfo,
}

/// Process-wide catalog of rule systems.
///
/// Pure data, read-only after construction. Default payloads and rules are
/// exposed as constructors ([`default_character_mechanics`],
/// [`default_character_rules`], [`default_card_mechanics`]) that return a
/// fresh owned value on every call -- there is no shared default object for
/// two characters to alias.
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRegistry {
    /// Create a registry with all built-in systems.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(SystemEntry {
            key: SystemKey::Generic,
            info: generic_system_info(),
        });
        registry.register(SystemEntry {
            key: SystemKey::ArcaneRift,
            info: arcane_rift::system_info(),
        });
        registry
    }

    /// Create an empty registry without built-in systems.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a system entry.
    pub fn register(&mut self, entry: SystemEntry) {
        self.entries.push(entry);
    }

    /// Get the entry for a system key.
    pub fn get(&self, key: SystemKey) -> Option<&SystemEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// List all registered keys.
    pub fn keys(&self) -> Vec<SystemKey> {
        self.entries.iter().map(|entry| entry.key).collect()
    }

    /// List all registered systems with their display names.
    pub fn list(&self) -> Vec<(SystemKey, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.key, entry.info.name.as_str()))
            .collect()
    }
}

fn generic_system_info() -> SystemInfo {
    SystemInfo {
        name: "Generic".to_string(),
        description: "Basic mechanics that fit with any game system.".to_string(),
        icon: "mdi:dice-multiple".to_string(),
        url: None,
        creator: None,
        locked: true,
        version: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_includes_all_builtin_systems() {
        let registry = SystemRegistry::new();
        assert_eq!(registry.keys(), vec![SystemKey::Generic, SystemKey::ArcaneRift]);
        assert!(registry.get(SystemKey::ArcaneRift).is_some());
    }

    #[test]
    fn registry_list_with_names() {
        let registry = SystemRegistry::new();
        let listed = registry.list();
        assert!(listed
            .iter()
            .any(|(key, name)| *key == SystemKey::Generic && *name == "Generic"));
        assert!(listed
            .iter()
            .any(|(key, name)| *key == SystemKey::ArcaneRift && *name == "Arcane Rift"));
    }

    #[test]
    fn empty_registry_has_no_systems() {
        assert!(SystemRegistry::empty().keys().is_empty());
    }

    #[test]
    fn generic_system_is_locked() {
        let registry = SystemRegistry::new();
        let generic = registry.get(SystemKey::Generic).expect("registered");
        assert!(generic.info.locked);
        let arcane = registry.get(SystemKey::ArcaneRift).expect("registered");
        assert!(!arcane.info.locked);
        assert_eq!(arcane.info.version.as_deref(), Some("0.1.0"));
    }

    #[test]
    fn system_key_wire_literals() {
        assert_eq!(
            serde_json::to_value(SystemKey::ArcaneRift).expect("serialize"),
            serde_json::json!("arcaneRift")
        );
        assert_eq!(
            serde_json::to_value(SystemKey::Generic).expect("serialize"),
            serde_json::json!("generic")
        );
        assert_eq!(
            "arcaneRift".parse::<SystemKey>().expect("known key"),
            SystemKey::ArcaneRift
        );
        assert!("arcane_rift".parse::<SystemKey>().is_err());
    }

    #[test]
    fn generic_mechanics_serializes_to_empty_object() {
        assert_eq!(
            serde_json::to_value(GenericMechanics::default()).expect("serialize"),
            serde_json::json!({})
        );
    }
}
