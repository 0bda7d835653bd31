//! Arcane Rift card mechanics.
//!
//! Cards are data-only records: no controller, no invariants beyond shape.
//! A card references the characteristic/skill pair its use calls for by
//! name only -- nothing ties the reference back to a live character's stat
//! set, so a card is system-flavored but not character-bound.

use serde::{Deserialize, Serialize};

/// Free-form labelled field printed on a card face.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

/// Aspect printed on a card. Unlike character aspects, card aspects carry
/// no structural role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAspect {
    pub short: String,
    pub description: String,
}

/// The skill check a card's use calls for, as display references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
}

/// The Arcane Rift slice of a card's mechanics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcaneRiftCardMechanics {
    pub aspects: Vec<CardAspect>,
    pub fields: Vec<CardField>,
    pub check: SkillCheck,
}

/// Characteristics with their linked skills, the picker source for card
/// skill checks. Mirrors the default character stat templates.
pub const SKILL_GROUPS: [(&str, [&str; 3]); 6] = [
    ("Brawn", ["Muscle", "Toughness", "Athletics"]),
    ("Agility", ["Precision", "Reflex", "Coordination"]),
    ("Intellect", ["Arcana", "Lore", "Medicine"]),
    ("Cunning", ["Investigation", "Stealth", "Ingenuity"]),
    ("Willpower", ["Intuition", "Composure", "Vigilance"]),
    ("Presence", ["Charm", "Insight", "Persuasion"]),
];

/// All characteristic names, in display order.
pub fn characteristic_names() -> [&'static str; 6] {
    SKILL_GROUPS.map(|(characteristic, _)| characteristic)
}

/// The skills linked to a characteristic, or `None` for an unknown name.
pub fn skills_for(characteristic: &str) -> Option<&'static [&'static str]> {
    SKILL_GROUPS
        .iter()
        .find(|(name, _)| *name == characteristic)
        .map(|(_, skills)| &skills[..])
}

/// All skill names, grouped by characteristic in display order.
pub fn skill_names() -> Vec<&'static str> {
    SKILL_GROUPS
        .iter()
        .flat_map(|(_, skills)| skills.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::character::ArcaneRiftCharacterRules;
    use super::*;

    #[test]
    fn skill_groups_mirror_the_character_stat_templates() {
        let rules = ArcaneRiftCharacterRules::default();
        for (characteristic, skills) in SKILL_GROUPS {
            assert!(
                rules
                    .stats
                    .characteristics
                    .iter()
                    .any(|c| c.name == characteristic),
                "unknown characteristic {characteristic}"
            );
            for skill in skills {
                let template = rules
                    .stats
                    .skills
                    .iter()
                    .find(|s| s.name == skill)
                    .unwrap_or_else(|| panic!("unknown skill {skill}"));
                assert_eq!(template.characteristic, characteristic);
            }
        }
        assert_eq!(skill_names().len(), rules.stats.skills.len());
    }

    #[test]
    fn skills_for_looks_up_by_characteristic() {
        assert_eq!(
            skills_for("Agility"),
            Some(&["Precision", "Reflex", "Coordination"][..])
        );
        assert_eq!(skills_for("Fortune"), None);
        assert_eq!(characteristic_names()[0], "Brawn");
    }

    #[test]
    fn empty_check_serializes_to_empty_object() {
        let mechanics = ArcaneRiftCardMechanics::default();
        let value = serde_json::to_value(&mechanics).expect("serialize");
        assert_eq!(value["check"], serde_json::json!({}));
        assert_eq!(value["aspects"], serde_json::json!([]));
    }

    #[test]
    fn check_round_trips_references_by_name() {
        let mechanics = ArcaneRiftCardMechanics {
            check: SkillCheck {
                characteristic: Some("Agility".to_string()),
                skill: Some("Precision".to_string()),
            },
            ..ArcaneRiftCardMechanics::default()
        };
        let json = serde_json::to_string(&mechanics).expect("serialize");
        let back: ArcaneRiftCardMechanics = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, mechanics);
    }
}
