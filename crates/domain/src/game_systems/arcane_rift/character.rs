//! Arcane Rift character mechanics model.
//!
//! Defines the shape of an Arcane Rift character sheet (characteristics,
//! skills, aspects, consequences, stress tracks) and the rules that bound
//! it (min/max values, slot counts, severity orderings). The types here are
//! the interchange format between the rule engine and persistence: plain
//! nested records and arrays, JSON-compatible, round-tripped losslessly.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Consequences
// =============================================================================

/// Severity label attached to consequences and to rule slots.
///
/// The ordering of severities is NOT fixed by this enum: it is derived at
/// runtime from the roll values in the active rules (ascending numeric roll,
/// Despair last). See `ArcaneRiftCharacterController::sorted_consequence_variants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsequenceVariant {
    Mild,
    Moderate,
    Severe,
    Extreme,
}

impl ConsequenceVariant {
    /// All severity labels, in canonical declaration order.
    pub const ALL: [ConsequenceVariant; 4] = [
        ConsequenceVariant::Mild,
        ConsequenceVariant::Moderate,
        ConsequenceVariant::Severe,
        ConsequenceVariant::Extreme,
    ];

    /// The wire literal for this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            ConsequenceVariant::Mild => "mild",
            ConsequenceVariant::Moderate => "moderate",
            ConsequenceVariant::Severe => "severe",
            ConsequenceVariant::Extreme => "extreme",
        }
    }

    /// Example consequence texts for this severity, used as UI placeholders.
    pub fn examples(self) -> &'static [&'static str] {
        match self {
            ConsequenceVariant::Mild => &["Bruised ribs", "Cut hand", "Fatigued"],
            ConsequenceVariant::Moderate => &["Sprained ankle", "Deep cut", "Temporary blindness"],
            ConsequenceVariant::Severe => &["Cracked ribs", "Torn muscle", "Concussion"],
            ConsequenceVariant::Extreme => &["Broken bone", "Internal bleeding", "Severe trauma"],
        }
    }
}

impl fmt::Display for ConsequenceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a consequence roll: a positive number, or `Despair`.
///
/// `Despair` is unbounded: a Despair slot can absorb a roll of any size, and
/// a Despair roll only fits into a Despair slot. The derived `Ord` places
/// every numeric roll before `Despair`, which is exactly the slot-ladder
/// ordering the consequence subsystem relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConsequenceRoll {
    Numeric(u32),
    Despair,
}

impl ConsequenceRoll {
    /// Wire literal used for the unbounded roll.
    pub const DESPAIR_LABEL: &'static str = "Despair";

    /// The numeric value, if this roll is bounded.
    pub fn numeric(self) -> Option<u32> {
        match self {
            ConsequenceRoll::Numeric(n) => Some(n),
            ConsequenceRoll::Despair => None,
        }
    }
}

impl fmt::Display for ConsequenceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsequenceRoll::Numeric(n) => write!(f, "{n}"),
            ConsequenceRoll::Despair => write!(f, "{}", Self::DESPAIR_LABEL),
        }
    }
}

impl From<u32> for ConsequenceRoll {
    fn from(value: u32) -> Self {
        ConsequenceRoll::Numeric(value)
    }
}

// On the wire a roll is either a JSON number or the literal string "Despair".
impl Serialize for ConsequenceRoll {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConsequenceRoll::Numeric(n) => serializer.serialize_u32(*n),
            ConsequenceRoll::Despair => serializer.serialize_str(Self::DESPAIR_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for ConsequenceRoll {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Numeric(u32),
            Label(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Numeric(n) => Ok(ConsequenceRoll::Numeric(n)),
            Repr::Label(s) if s == ConsequenceRoll::DESPAIR_LABEL => Ok(ConsequenceRoll::Despair),
            Repr::Label(s) => Err(serde::de::Error::custom(format!(
                "invalid consequence roll \"{s}\""
            ))),
        }
    }
}

/// A consequence occupying one slot of the consequence ladder.
///
/// Lives in exactly one slot; the `roll` and `variant` always match the rule
/// entry of the slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequence {
    pub text: String,
    pub roll: ConsequenceRoll,
    pub variant: ConsequenceVariant,
}

/// One rung of the consequence ladder: the maximum severity a slot can hold
/// and the label written into it when occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsequenceSlotRule {
    pub roll: ConsequenceRoll,
    pub variant: ConsequenceVariant,
}

impl ConsequenceSlotRule {
    pub fn new(roll: impl Into<ConsequenceRoll>, variant: ConsequenceVariant) -> Self {
        Self {
            roll: roll.into(),
            variant,
        }
    }
}

// =============================================================================
// Aspects
// =============================================================================

/// Structural role of an aspect, beyond its position in the ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AspectKind {
    HighConcept,
    Trouble,
}

/// A short named descriptor with free-text elaboration.
///
/// Aspects live in an ordered, capacity-limited list; order is display
/// priority and is user-reorderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub short: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<AspectKind>,
}

impl Aspect {
    pub fn new(short: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            description: description.into(),
            variant: None,
        }
    }
}

// =============================================================================
// Stats
// =============================================================================

/// A characteristic with its current allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub value: i32,
    pub description: String,
}

/// A skill with its current mastery. Each skill references exactly one
/// characteristic by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub value: i32,
    pub description: String,
    pub characteristic: String,
}

/// Characteristic template: name and description without a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicTemplate {
    pub name: String,
    pub description: String,
}

impl CharacteristicTemplate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Skill template: name, description, and characteristic linkage without a
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTemplate {
    pub name: String,
    pub description: String,
    pub characteristic: String,
}

impl SkillTemplate {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        characteristic: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            characteristic: characteristic.into(),
        }
    }
}

/// Current stat allocations, keyed by stat name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub characteristics: HashMap<String, Characteristic>,
    pub skills: HashMap<String, Skill>,
}

// =============================================================================
// Stress tracks
// =============================================================================

/// A named stress counter with an independently adjustable ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressTrack {
    pub variant: String,
    pub value: i32,
    pub max: i32,
}

// =============================================================================
// Rules
// =============================================================================

/// Aspect configuration: structural flags plus the total aspect cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectRules {
    pub high_concept: bool,
    pub trouble: bool,
    pub max_amount: usize,
}

/// Per-characteristic bounds and the total-points budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicRules {
    pub min_value: i32,
    pub max_value: i32,
    pub max_sum: i32,
}

/// Per-skill cap and the total-mastery budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRules {
    pub max_mastery: i32,
    pub max_sum: i32,
}

/// Which stress-track variants exist, and the absolute ceiling any track's
/// maximum may reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressTrackRules {
    pub variants: Vec<String>,
    pub max_allowed: i32,
}

/// Template lists defining which stats exist, independent of numeric values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTemplates {
    pub characteristics: Vec<CharacteristicTemplate>,
    pub skills: Vec<SkillTemplate>,
}

/// Campaign-level configuration bounding what mechanics values are legal.
///
/// Normally shared per campaign; associated 1:1 with a character's mechanics
/// and swappable via `ArcaneRiftCharacterController::apply_rules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcaneRiftCharacterRules {
    /// The consequence-slot ladder, ascending severity (lower index = milder).
    pub consequences: Vec<ConsequenceSlotRule>,
    pub aspects: AspectRules,
    pub characteristics: CharacteristicRules,
    pub skills: SkillRules,
    pub stress_tracks: StressTrackRules,
    pub stats: StatTemplates,
}

impl Default for ArcaneRiftCharacterRules {
    fn default() -> Self {
        Self {
            consequences: vec![
                ConsequenceSlotRule::new(1, ConsequenceVariant::Mild),
                ConsequenceSlotRule::new(2, ConsequenceVariant::Moderate),
                ConsequenceSlotRule::new(3, ConsequenceVariant::Moderate),
                ConsequenceSlotRule::new(ConsequenceRoll::Despair, ConsequenceVariant::Severe),
                ConsequenceSlotRule::new(ConsequenceRoll::Despair, ConsequenceVariant::Extreme),
            ],
            aspects: AspectRules {
                high_concept: true,
                trouble: true,
                max_amount: 5,
            },
            characteristics: CharacteristicRules {
                min_value: 0,
                max_value: 5,
                max_sum: 18,
            },
            skills: SkillRules {
                max_mastery: 3,
                max_sum: 8,
            },
            stress_tracks: StressTrackRules {
                variants: vec!["Physical".to_string(), "Mental".to_string()],
                max_allowed: 5,
            },
            stats: StatTemplates {
                characteristics: vec![
                    CharacteristicTemplate::new("Brawn", "Raw physical strength and toughness"),
                    CharacteristicTemplate::new(
                        "Agility",
                        "Speed, nimbleness and accuracy of movements",
                    ),
                    CharacteristicTemplate::new("Intellect", "Wits and knowledge of the world"),
                    CharacteristicTemplate::new("Cunning", "Intuitive knowledge and creativity"),
                    CharacteristicTemplate::new("Willpower", "Mental sharpness and resilience"),
                    CharacteristicTemplate::new("Presence", "Charisma and social skills"),
                ],
                skills: vec![
                    SkillTemplate::new("Muscle", "Physical strength and power", "Brawn"),
                    SkillTemplate::new("Toughness", "Physical resilience and endurance", "Brawn"),
                    SkillTemplate::new("Athletics", "Effectiveness of physical strength", "Brawn"),
                    SkillTemplate::new("Precision", "Precision of finesse movements", "Agility"),
                    SkillTemplate::new("Reflex", "Ability to react quickly", "Agility"),
                    SkillTemplate::new("Coordination", "Control over physical movement", "Agility"),
                    SkillTemplate::new(
                        "Arcana",
                        "Knowledge of all things magical and otherworldly",
                        "Intellect",
                    ),
                    SkillTemplate::new("Lore", "Book-knowledge of the known world", "Intellect"),
                    SkillTemplate::new(
                        "Medicine",
                        "Ability to diagnose and treat illness",
                        "Intellect",
                    ),
                    SkillTemplate::new(
                        "Investigation",
                        "Active spotting of hidden things like clues and traps",
                        "Cunning",
                    ),
                    SkillTemplate::new(
                        "Stealth",
                        "Ability to vanish and remain undetected",
                        "Cunning",
                    ),
                    SkillTemplate::new("Ingenuity", "Creativity and ability to craft", "Cunning"),
                    SkillTemplate::new(
                        "Intuition",
                        "Ability to subconsciously pick up subtle cues",
                        "Willpower",
                    ),
                    SkillTemplate::new(
                        "Composure",
                        "Remaining calm under pressure",
                        "Willpower",
                    ),
                    SkillTemplate::new(
                        "Vigilance",
                        "Reaction speed to unexpected threats",
                        "Willpower",
                    ),
                    SkillTemplate::new(
                        "Charm",
                        "Ability to charm, butter up or seduce",
                        "Presence",
                    ),
                    SkillTemplate::new(
                        "Insight",
                        "Empathy and ability to understand others",
                        "Presence",
                    ),
                    SkillTemplate::new(
                        "Persuasion",
                        "Being convincing and persuasive",
                        "Presence",
                    ),
                ],
            },
        }
    }
}

// =============================================================================
// Mechanics payload
// =============================================================================

/// The full Arcane Rift slice of a character's mechanics.
///
/// Owned by the character aggregate; the controller never stores it, reading
/// and writing through injected closures instead.
///
/// # Invariants
///
/// - `consequences.len()` equals `rules.consequences.len()`, and every
///   occupied slot carries the roll and variant of its rule entry.
/// - `stats` contains one entry per template in `rules.stats`.
/// - `stress_tracks` contains one entry per variant in `rules.stress_tracks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcaneRiftCharacterMechanics {
    pub rules: ArcaneRiftCharacterRules,
    pub stats: CharacterStats,
    pub aspects: Vec<Aspect>,
    pub shortlist: Vec<String>,
    pub stress_tracks: Vec<StressTrack>,
    pub consequences: Vec<Option<Consequence>>,
}

impl ArcaneRiftCharacterMechanics {
    /// Build a fresh character sheet from the given rules.
    ///
    /// Characteristics start at the average allocation (total budget divided
    /// evenly), skills at 0, stress tracks at half the allowed ceiling plus
    /// one, and the consequence ladder entirely empty.
    pub fn from_rules(rules: ArcaneRiftCharacterRules) -> Self {
        let average = if rules.stats.characteristics.is_empty() {
            rules.characteristics.min_value
        } else {
            rules.characteristics.max_sum / rules.stats.characteristics.len() as i32
        };

        let characteristics = rules
            .stats
            .characteristics
            .iter()
            .map(|template| {
                (
                    template.name.clone(),
                    Characteristic {
                        name: template.name.clone(),
                        value: average,
                        description: template.description.clone(),
                    },
                )
            })
            .collect();

        let skills = rules
            .stats
            .skills
            .iter()
            .map(|template| {
                (
                    template.name.clone(),
                    Skill {
                        name: template.name.clone(),
                        value: 0,
                        description: template.description.clone(),
                        characteristic: template.characteristic.clone(),
                    },
                )
            })
            .collect();

        let stress_tracks = rules
            .stress_tracks
            .variants
            .iter()
            .map(|variant| StressTrack {
                variant: variant.clone(),
                value: 0,
                max: rules.stress_tracks.max_allowed / 2 + 1,
            })
            .collect();

        let consequences = vec![None; rules.consequences.len()];

        Self {
            stats: CharacterStats {
                characteristics,
                skills,
            },
            aspects: Vec::new(),
            shortlist: Vec::new(),
            stress_tracks,
            consequences,
            rules,
        }
    }
}

impl Default for ArcaneRiftCharacterMechanics {
    fn default() -> Self {
        Self::from_rules(ArcaneRiftCharacterRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_shape() {
        let rules = ArcaneRiftCharacterRules::default();
        assert_eq!(rules.consequences.len(), 5);
        assert_eq!(rules.stats.characteristics.len(), 6);
        assert_eq!(rules.stats.skills.len(), 18);
        assert_eq!(rules.aspects.max_amount, 5);
        assert_eq!(rules.characteristics.max_sum, 18);
        assert_eq!(rules.skills.max_sum, 8);
        assert_eq!(rules.stress_tracks.max_allowed, 5);
    }

    #[test]
    fn every_skill_template_references_a_characteristic() {
        let rules = ArcaneRiftCharacterRules::default();
        for skill in &rules.stats.skills {
            assert!(
                rules
                    .stats
                    .characteristics
                    .iter()
                    .any(|c| c.name == skill.characteristic),
                "skill {} references unknown characteristic {}",
                skill.name,
                skill.characteristic
            );
        }
    }

    #[test]
    fn default_mechanics_match_rules() {
        let mechanics = ArcaneRiftCharacterMechanics::default();
        let rules = &mechanics.rules;
        assert_eq!(mechanics.consequences.len(), rules.consequences.len());
        assert!(mechanics.consequences.iter().all(Option::is_none));
        assert_eq!(
            mechanics.stats.characteristics.len(),
            rules.stats.characteristics.len()
        );
        assert_eq!(mechanics.stats.skills.len(), rules.stats.skills.len());
        // 18 points over 6 characteristics: everyone starts at the average
        assert!(mechanics
            .stats
            .characteristics
            .values()
            .all(|c| c.value == 3));
        assert!(mechanics.stats.skills.values().all(|s| s.value == 0));
        // Ceiling 5: tracks default to max 3
        assert!(mechanics
            .stress_tracks
            .iter()
            .all(|t| t.value == 0 && t.max == 3));
    }

    #[test]
    fn roll_ordering_treats_despair_as_unbounded() {
        assert!(ConsequenceRoll::Numeric(1) < ConsequenceRoll::Numeric(3));
        assert!(ConsequenceRoll::Numeric(9999) < ConsequenceRoll::Despair);
        assert!(ConsequenceRoll::Despair <= ConsequenceRoll::Despair);
    }

    #[test]
    fn roll_serde_round_trip() {
        let numeric = serde_json::to_value(ConsequenceRoll::Numeric(2)).expect("serialize");
        assert_eq!(numeric, serde_json::json!(2));
        let despair = serde_json::to_value(ConsequenceRoll::Despair).expect("serialize");
        assert_eq!(despair, serde_json::json!("Despair"));

        let parsed: ConsequenceRoll =
            serde_json::from_value(serde_json::json!("Despair")).expect("deserialize");
        assert_eq!(parsed, ConsequenceRoll::Despair);
        let parsed: ConsequenceRoll =
            serde_json::from_value(serde_json::json!(4)).expect("deserialize");
        assert_eq!(parsed, ConsequenceRoll::Numeric(4));
        assert!(serde_json::from_value::<ConsequenceRoll>(serde_json::json!("Dread")).is_err());
    }

    #[test]
    fn variant_serializes_lowercase() {
        let value = serde_json::to_value(ConsequenceVariant::Moderate).expect("serialize");
        assert_eq!(value, serde_json::json!("moderate"));
        let parsed: ConsequenceVariant =
            serde_json::from_value(serde_json::json!("extreme")).expect("deserialize");
        assert_eq!(parsed, ConsequenceVariant::Extreme);
    }

    #[test]
    fn mechanics_json_uses_camel_case_keys() {
        let mechanics = ArcaneRiftCharacterMechanics::default();
        let value = serde_json::to_value(&mechanics).expect("serialize");
        assert!(value.get("stressTracks").is_some());
        assert!(value.get("consequences").is_some());
        let rules = value.get("rules").expect("rules present");
        assert!(rules.get("stressTracks").is_some());
        assert!(rules["characteristics"].get("maxSum").is_some());
        assert!(rules["skills"].get("maxMastery").is_some());
        assert!(rules["aspects"].get("highConcept").is_some());
        // Empty slots serialize as nulls, keeping the ladder positional
        assert_eq!(value["consequences"][0], serde_json::Value::Null);
    }

    #[test]
    fn mechanics_round_trip_is_lossless() {
        let mut mechanics = ArcaneRiftCharacterMechanics::default();
        mechanics.aspects.push(Aspect {
            short: "Reluctant hero".to_string(),
            description: "Never wanted any of this".to_string(),
            variant: Some(AspectKind::HighConcept),
        });
        mechanics.consequences[0] = Some(Consequence {
            text: "Cut hand".to_string(),
            roll: ConsequenceRoll::Numeric(1),
            variant: ConsequenceVariant::Mild,
        });
        let json = serde_json::to_string(&mechanics).expect("serialize");
        let back: ArcaneRiftCharacterMechanics =
            serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, mechanics);
    }

    #[test]
    fn severity_examples_cover_all_variants() {
        for variant in ConsequenceVariant::ALL {
            assert_eq!(variant.examples().len(), 3);
        }
    }
}
