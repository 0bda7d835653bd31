//! Playdeck domain: rule-system mechanics and the controllers that enforce
//! them.
//!
//! The crate is a pure, synchronous transformation engine: controllers read
//! a character's mechanics through an injected closure, validate, and write
//! a complete replacement back through another -- no I/O, no storage, no
//! framework ties. Persistence, routing, permissions, and rendering live
//! elsewhere and exchange the plain serde-able types defined here.

pub mod error;
pub mod game_systems;

pub use error::DomainError;

// Re-export the composition layer and registry
pub use game_systems::{
    default_card_mechanics, default_character_mechanics, default_character_rules, CardMechanics,
    CharacterController, CharacterMechanics, CharacterRules, GenericMechanics, SystemEntry,
    SystemInfo, SystemKey, SystemRegistry,
};

// Re-export the Arcane Rift module surface
pub use game_systems::arcane_rift::{
    ArcaneRiftCardMechanics, ArcaneRiftCharacterController, ArcaneRiftCharacterMechanics,
    ArcaneRiftCharacterRules, Aspect, AspectKind, Consequence, ConsequenceRoll,
    ConsequenceVariant, DemoteCheck, RollPlacement, VariantPlacement,
};
