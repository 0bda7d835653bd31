//! Arcane Rift rule module.
//!
//! A custom home-brew system based on Fate and Genesys: characteristics
//! with linked skills, an ordered aspect list, bounded stress tracks, and a
//! fixed ladder of consequence slots. `character` defines the mechanics and
//! rules shapes, `controller` the operation surface that enforces them, and
//! `cards` the card-side payload.

pub mod cards;
pub mod character;
pub mod controller;

pub use cards::{
    characteristic_names, skill_names, skills_for, ArcaneRiftCardMechanics, CardAspect, CardField,
    SkillCheck, SKILL_GROUPS,
};
pub use character::{
    ArcaneRiftCharacterMechanics, ArcaneRiftCharacterRules, Aspect, AspectKind, AspectRules,
    CharacterStats, Characteristic, CharacteristicRules, CharacteristicTemplate, Consequence,
    ConsequenceRoll, ConsequenceSlotRule, ConsequenceVariant, Skill, SkillRules, SkillTemplate,
    StatTemplates, StressTrack, StressTrackRules,
};
pub use controller::{
    ArcaneRiftCharacterController, AspectTarget, ConsequenceTarget, DemoteCheck, MechanicsReader,
    MechanicsWriter, RollPlacement, VariantPlacement,
};

use super::SystemInfo;

/// Display metadata for the Arcane Rift system.
pub fn system_info() -> SystemInfo {
    SystemInfo {
        name: "Arcane Rift".to_string(),
        description: "A custom home-brew RPG system based on Fate and Genesys".to_string(),
        icon: "game-icons:portal".to_string(),
        url: None,
        creator: None,
        locked: false,
        version: Some("0.1.0".to_string()),
    }
}
