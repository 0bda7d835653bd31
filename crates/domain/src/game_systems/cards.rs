//! Card-side composition over rule modules.
//!
//! Cards share the character map's system-key contract -- generic always
//! present, other keys present iff opted in -- over a smaller, data-only
//! payload with no controller.

use serde::{Deserialize, Serialize};

use super::arcane_rift::ArcaneRiftCardMechanics;
use super::{GenericMechanics, SystemKey};
use crate::error::DomainError;

/// Combined mechanics of one card, keyed by system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMechanics {
    pub generic: GenericMechanics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcane_rift: Option<ArcaneRiftCardMechanics>,
}

impl CardMechanics {
    /// The keys present in this mechanics map.
    pub fn systems(&self) -> Vec<SystemKey> {
        SystemKey::ALL
            .into_iter()
            .filter(|key| self.has_system(*key))
            .collect()
    }

    /// Whether the given system is active for this card.
    pub fn has_system(&self, key: SystemKey) -> bool {
        match key {
            SystemKey::Generic => true,
            SystemKey::ArcaneRift => self.arcane_rift.is_some(),
        }
    }

    /// Opt into a system by installing its default payload. A no-op when
    /// already present.
    pub fn enable_system(&mut self, key: SystemKey) {
        match key {
            SystemKey::Generic => {}
            SystemKey::ArcaneRift => {
                if self.arcane_rift.is_none() {
                    self.arcane_rift = Some(ArcaneRiftCardMechanics::default());
                }
            }
        }
    }

    /// Opt out of a system, dropping its payload.
    pub fn disable_system(&mut self, key: SystemKey) -> Result<(), DomainError> {
        match key {
            SystemKey::Generic => Err(DomainError::validation(
                "The generic system cannot be removed",
            )),
            SystemKey::ArcaneRift => {
                self.arcane_rift = None;
                Ok(())
            }
        }
    }
}

/// Default card mechanics per system key, every system included.
///
/// Returns a fresh value on each call; customizing one card never affects
/// another.
pub fn default_card_mechanics() -> CardMechanics {
    CardMechanics {
        generic: GenericMechanics::default(),
        arcane_rift: Some(ArcaneRiftCardMechanics::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::arcane_rift::SkillCheck;
    use super::*;

    #[test]
    fn systems_list_mirrors_present_keys() {
        let mut mechanics = CardMechanics::default();
        assert_eq!(mechanics.systems(), vec![SystemKey::Generic]);

        mechanics.enable_system(SystemKey::ArcaneRift);
        assert_eq!(
            mechanics.systems(),
            vec![SystemKey::Generic, SystemKey::ArcaneRift]
        );

        mechanics.disable_system(SystemKey::ArcaneRift).expect("removable");
        assert!(!mechanics.has_system(SystemKey::ArcaneRift));
        assert!(matches!(
            mechanics.disable_system(SystemKey::Generic),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn card_map_serializes_under_system_key_literals() {
        let mechanics = default_card_mechanics();
        let value = serde_json::to_value(&mechanics).expect("serialize");
        assert_eq!(value["generic"], serde_json::json!({}));
        assert!(value.get("arcaneRift").is_some());

        let generic_only: CardMechanics =
            serde_json::from_value(serde_json::json!({ "generic": {} })).expect("deserialize");
        assert!(generic_only.arcane_rift.is_none());
    }

    #[test]
    fn card_check_is_not_validated_against_any_character() {
        // Intentional decoupling: any names round-trip, even ones no stat
        // set defines.
        let mut mechanics = default_card_mechanics();
        if let Some(arcane) = mechanics.arcane_rift.as_mut() {
            arcane.check = SkillCheck {
                characteristic: Some("Moxie".to_string()),
                skill: Some("Juggling".to_string()),
            };
        }
        let json = serde_json::to_string(&mechanics).expect("serialize");
        let back: CardMechanics = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, mechanics);
    }
}
