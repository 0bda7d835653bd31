//! Arcane Rift character controller.
//!
//! The stateful-operation surface over one character's Arcane Rift
//! mechanics: point-budget validation, consequence-slot search, placement
//! and demotion, aspect reordering, and stress-track resizing.
//!
//! The controller owns no mechanics of its own. Every operation reads the
//! current payload through an injected reader closure, computes a complete
//! replacement value, and commits it through an injected writer closure --
//! exactly once, and only after all validation has passed. A failed
//! operation never writes, so the payload is never observable in a
//! partially updated state. The call site decides what backs the closures:
//! a plain variable, a reactive cell, or a message-passing actor.

use tracing::debug;

use super::character::{
    Aspect, ArcaneRiftCharacterMechanics, ArcaneRiftCharacterRules, Characteristic, Consequence,
    ConsequenceRoll, ConsequenceVariant, Skill, StressTrack,
};
use crate::error::DomainError;

/// Reader closure handed to a controller at construction.
pub type MechanicsReader<'a> = Box<dyn Fn() -> ArcaneRiftCharacterMechanics + 'a>;

/// Writer closure handed to a controller at construction.
pub type MechanicsWriter<'a> = Box<dyn FnMut(ArcaneRiftCharacterMechanics) + 'a>;

/// Selector for an aspect: by position, or by description text.
///
/// Matching by value compares `description` equality only, not full
/// identity -- two aspects with the same description are indistinguishable
/// to this selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AspectTarget {
    Index(usize),
    Description(String),
}

impl AspectTarget {
    fn resolve(&self, aspects: &[Aspect]) -> Option<usize> {
        match self {
            AspectTarget::Index(index) => (*index < aspects.len()).then_some(*index),
            AspectTarget::Description(description) => {
                aspects.iter().position(|a| a.description == *description)
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            AspectTarget::Index(index) => index.to_string(),
            AspectTarget::Description(description) => description.clone(),
        }
    }
}

impl From<usize> for AspectTarget {
    fn from(index: usize) -> Self {
        AspectTarget::Index(index)
    }
}

impl From<&Aspect> for AspectTarget {
    fn from(aspect: &Aspect) -> Self {
        AspectTarget::Description(aspect.description.clone())
    }
}

impl From<&str> for AspectTarget {
    fn from(description: &str) -> Self {
        AspectTarget::Description(description.to_string())
    }
}

/// Selector for a consequence: by slot index, or by text.
///
/// Matching by value compares `text` equality only (the same loose match
/// as [`AspectTarget`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsequenceTarget {
    Index(usize),
    Text(String),
}

impl ConsequenceTarget {
    fn resolve(&self, consequences: &[Option<Consequence>]) -> Option<usize> {
        match self {
            ConsequenceTarget::Index(index) => (*index < consequences.len()).then_some(*index),
            ConsequenceTarget::Text(text) => consequences
                .iter()
                .position(|slot| slot.as_ref().is_some_and(|c| c.text == *text)),
        }
    }

    fn describe(&self) -> String {
        match self {
            ConsequenceTarget::Index(index) => index.to_string(),
            ConsequenceTarget::Text(text) => text.clone(),
        }
    }
}

impl From<usize> for ConsequenceTarget {
    fn from(index: usize) -> Self {
        ConsequenceTarget::Index(index)
    }
}

impl From<&Consequence> for ConsequenceTarget {
    fn from(consequence: &Consequence) -> Self {
        ConsequenceTarget::Text(consequence.text.clone())
    }
}

impl From<&str> for ConsequenceTarget {
    fn from(text: &str) -> Self {
        ConsequenceTarget::Text(text.to_string())
    }
}

/// Result of searching the ladder for a slot that can hold a given roll.
///
/// When `can_place` is false the `variant`/`index` report the last (most
/// severe) slot as a hint; they are `None` only when the ladder itself is
/// empty. Callers must check `can_place` before using them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollPlacement {
    pub can_place: bool,
    pub variant: Option<ConsequenceVariant>,
    pub index: Option<usize>,
}

/// Result of searching the ladder for an empty slot of a given variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantPlacement {
    pub can_place: bool,
    pub index: Option<usize>,
}

/// Result of a demotion feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoteCheck {
    pub can_demote: bool,
    pub next_variant: Option<ConsequenceVariant>,
    pub next_index: Option<usize>,
}

impl DemoteCheck {
    const CANNOT: DemoteCheck = DemoteCheck {
        can_demote: false,
        next_variant: None,
        next_index: None,
    };
}

/// Controller enforcing the Arcane Rift character invariants.
pub struct ArcaneRiftCharacterController<'a> {
    get_mechanics: MechanicsReader<'a>,
    set_mechanics: MechanicsWriter<'a>,
    rules: ArcaneRiftCharacterRules,
}

impl<'a> ArcaneRiftCharacterController<'a> {
    /// Create a controller over externally owned mechanics.
    ///
    /// Passing `None` for `rules` selects the canonical Arcane Rift
    /// defaults.
    pub fn new(
        get_mechanics: impl Fn() -> ArcaneRiftCharacterMechanics + 'a,
        set_mechanics: impl FnMut(ArcaneRiftCharacterMechanics) + 'a,
        rules: Option<ArcaneRiftCharacterRules>,
    ) -> Self {
        debug!("Arcane Rift character controller initialized");
        Self {
            get_mechanics: Box::new(get_mechanics),
            set_mechanics: Box::new(set_mechanics),
            rules: rules.unwrap_or_default(),
        }
    }

    /// The rules currently bounding this character.
    pub fn rules(&self) -> &ArcaneRiftCharacterRules {
        &self.rules
    }

    fn mechanics(&self) -> ArcaneRiftCharacterMechanics {
        (self.get_mechanics)()
    }

    fn commit(&mut self, mechanics: ArcaneRiftCharacterMechanics) {
        (self.set_mechanics)(mechanics);
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Replace the active rules and resync the stat set.
    ///
    /// Every stat is rebuilt from the new rules' templates: stats absent
    /// from the templates are dropped, stats present are reset
    /// (characteristics to the minimum value, skills to 0). This is a
    /// destructive resync, not a merge. The consequence ladder is resized
    /// to the new slot count; the payload's embedded rules copy is swapped
    /// so mechanics and rules stay 1:1.
    pub fn apply_rules(&mut self, rules: ArcaneRiftCharacterRules) {
        let mut m = self.mechanics();

        m.stats.characteristics = rules
            .stats
            .characteristics
            .iter()
            .map(|template| {
                (
                    template.name.clone(),
                    Characteristic {
                        name: template.name.clone(),
                        value: rules.characteristics.min_value,
                        description: template.description.clone(),
                    },
                )
            })
            .collect();

        m.stats.skills = rules
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

        m.consequences.resize(rules.consequences.len(), None);
        m.rules = rules.clone();
        self.rules = rules;
        self.commit(m);
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Set a characteristic's value.
    ///
    /// The value must stay within the configured min/max, and an increase
    /// must not push the sum of all characteristics over the total budget.
    /// A decrease (or unchanged value) always succeeds: it cannot make an
    /// already over-budget sheet worse.
    pub fn update_characteristic(&mut self, name: &str, value: i32) -> Result<(), DomainError> {
        let mut m = self.mechanics();
        let current = m
            .stats
            .characteristics
            .get(name)
            .ok_or_else(|| DomainError::not_found("Characteristic", name))?
            .value;

        let bounds = &self.rules.characteristics;
        if value < bounds.min_value {
            return Err(DomainError::constraint(format!(
                "Value for {name} below minimum ({})",
                bounds.min_value
            )));
        }
        if value > bounds.max_value {
            return Err(DomainError::constraint(format!(
                "Value for {name} above maximum ({})",
                bounds.max_value
            )));
        }
        let sum: i32 = m.stats.characteristics.values().map(|c| c.value).sum();
        if value > current && sum - current + value > bounds.max_sum {
            return Err(DomainError::constraint(format!(
                "Sum of characteristics above maximum ({})",
                bounds.max_sum
            )));
        }

        if let Some(characteristic) = m.stats.characteristics.get_mut(name) {
            characteristic.value = value;
        }
        self.commit(m);
        Ok(())
    }

    /// Set a skill's mastery.
    ///
    /// Unlike characteristics, the total-mastery budget is enforced on
    /// every change, decreases included -- a decrease that still leaves the
    /// sum over budget is rejected. The asymmetry with
    /// [`update_characteristic`](Self::update_characteristic) is inherited
    /// behavior, kept for product review rather than silently unified.
    pub fn update_skill(&mut self, name: &str, mastery: i32) -> Result<(), DomainError> {
        let mut m = self.mechanics();
        let current = m
            .stats
            .skills
            .get(name)
            .ok_or_else(|| DomainError::not_found("Skill", name))?
            .value;

        let bounds = &self.rules.skills;
        if mastery > bounds.max_mastery {
            return Err(DomainError::constraint(format!(
                "Mastery for {name} above maximum ({})",
                bounds.max_mastery
            )));
        }
        let sum: i32 = m.stats.skills.values().map(|s| s.value).sum();
        if sum - current + mastery > bounds.max_sum {
            return Err(DomainError::constraint("Max total mastery reached"));
        }

        if let Some(skill) = m.stats.skills.get_mut(name) {
            skill.value = mastery;
        }
        self.commit(m);
        Ok(())
    }

    // =========================================================================
    // Aspects
    // =========================================================================

    /// Append an aspect to the end of the ordered list.
    pub fn add_aspect(&mut self, aspect: Aspect) -> Result<(), DomainError> {
        let mut m = self.mechanics();
        if m.aspects.len() >= self.rules.aspects.max_amount {
            return Err(DomainError::capacity("Max number of aspects reached"));
        }
        if aspect.short.is_empty() {
            return Err(DomainError::validation("Aspect short name cannot be empty"));
        }

        m.aspects.push(aspect);
        self.commit(m);
        Ok(())
    }

    /// Remove a single aspect, preserving the relative order of the rest.
    pub fn remove_aspect(&mut self, target: impl Into<AspectTarget>) -> Result<(), DomainError> {
        let target = target.into();
        let mut m = self.mechanics();
        let index = target
            .resolve(&m.aspects)
            .ok_or_else(|| DomainError::not_found("Aspect", target.describe()))?;

        m.aspects.remove(index);
        self.commit(m);
        Ok(())
    }

    /// Move an aspect to a new position.
    ///
    /// Remove-then-insert, not a swap: elements between the two positions
    /// shift by one.
    pub fn move_aspect(
        &mut self,
        target: impl Into<AspectTarget>,
        new_index: usize,
    ) -> Result<(), DomainError> {
        let target = target.into();
        let mut m = self.mechanics();
        let index = target
            .resolve(&m.aspects)
            .ok_or_else(|| DomainError::not_found("Aspect", target.describe()))?;
        if m.aspects.is_empty() || new_index > m.aspects.len() - 1 {
            return Err(DomainError::constraint("New index out of bounds"));
        }

        let aspect = m.aspects.remove(index);
        m.aspects.insert(new_index, aspect);
        self.commit(m);
        Ok(())
    }

    // =========================================================================
    // Consequences
    // =========================================================================

    /// Minimum and maximum numeric rolls in the ladder, `None` when every
    /// slot is Despair (or the ladder is empty).
    pub fn min_max_consequence_rolls(&self) -> Option<(u32, u32)> {
        let mut rolls = self
            .rules
            .consequences
            .iter()
            .filter_map(|slot| slot.roll.numeric());
        let first = rolls.next()?;
        Some(rolls.fold((first, first), |(min, max), roll| {
            (min.min(roll), max.max(roll))
        }))
    }

    /// The severity ordering in effect, mildest first.
    ///
    /// Always recomputed from the current ladder: unique variants, ordered
    /// by ascending roll with Despair last. Never hardcoded.
    pub fn sorted_consequence_variants(&self) -> Vec<ConsequenceVariant> {
        let mut ladder = self.rules.consequences.clone();
        ladder.sort_by(|a, b| a.roll.cmp(&b.roll));

        let mut variants = Vec::new();
        for slot in ladder {
            if !variants.contains(&slot.variant) {
                variants.push(slot.variant);
            }
        }
        variants
    }

    // A slot index past the stored array counts as empty: stored state may
    // lag the ladder until the next mutating operation normalizes it.
    fn slot_is_empty(mechanics: &ArcaneRiftCharacterMechanics, index: usize) -> bool {
        mechanics
            .consequences
            .get(index)
            .is_none_or(|slot| slot.is_none())
    }

    fn normalize_slot_count(&self, mechanics: &mut ArcaneRiftCharacterMechanics) {
        mechanics
            .consequences
            .resize(self.rules.consequences.len(), None);
    }

    /// Find the first empty slot whose cap can hold the given roll.
    ///
    /// Never errors: if no slot is large enough, or every slot large enough
    /// is occupied, returns `can_place: false` with the last slot as a
    /// hint. Callers check `can_place` rather than relying on errors.
    pub fn find_consequence_slot_from_roll(&self, roll: ConsequenceRoll) -> RollPlacement {
        let m = self.mechanics();
        let ladder = &self.rules.consequences;
        let Some(last) = ladder.len().checked_sub(1) else {
            return RollPlacement {
                can_place: false,
                variant: None,
                index: None,
            };
        };
        let no_room = RollPlacement {
            can_place: false,
            variant: Some(ladder[last].variant),
            index: Some(last),
        };

        let Some(first_fitting) = ladder.iter().position(|slot| roll <= slot.roll) else {
            return no_room;
        };
        for index in first_fitting..ladder.len() {
            if Self::slot_is_empty(&m, index) {
                return RollPlacement {
                    can_place: true,
                    variant: Some(ladder[index].variant),
                    index: Some(index),
                };
            }
        }
        no_room
    }

    /// Find the first empty slot of the given variant.
    ///
    /// A variant that appears nowhere in the rules is a configuration
    /// error; a variant whose slots are all occupied is a legitimate
    /// "no room" state reported via `can_place: false`.
    pub fn find_consequence_slot_from_variant(
        &self,
        variant: ConsequenceVariant,
    ) -> Result<VariantPlacement, DomainError> {
        let m = self.mechanics();
        let ladder = &self.rules.consequences;
        if !ladder.iter().any(|slot| slot.variant == variant) {
            return Err(DomainError::configuration(format!(
                "Consequence variant \"{variant}\" does not exist in rules"
            )));
        }

        let index = ladder
            .iter()
            .enumerate()
            .position(|(i, slot)| slot.variant == variant && Self::slot_is_empty(&m, i));
        Ok(VariantPlacement {
            can_place: index.is_some(),
            index,
        })
    }

    /// Place a consequence by roll severity.
    ///
    /// The recorded roll is normalized to the slot's rule roll: two input
    /// rolls landing in the same slot both record that slot's canonical
    /// roll.
    pub fn add_consequence_by_roll(
        &mut self,
        text: impl Into<String>,
        roll: impl Into<ConsequenceRoll>,
    ) -> Result<(), DomainError> {
        let text = text.into();
        let roll = roll.into();
        if text.is_empty() {
            return Err(DomainError::validation("Consequence text cannot be empty"));
        }
        if matches!(roll, ConsequenceRoll::Numeric(n) if n < 1) {
            return Err(DomainError::validation("Consequence roll must be at least 1"));
        }

        let placement = self.find_consequence_slot_from_roll(roll);
        let (true, Some(index), Some(variant)) =
            (placement.can_place, placement.index, placement.variant)
        else {
            return Err(DomainError::capacity(
                "Consequence of this roll cannot be placed, all slots are full",
            ));
        };

        let mut m = self.mechanics();
        self.normalize_slot_count(&mut m);
        m.consequences[index] = Some(Consequence {
            text,
            roll: self.rules.consequences[index].roll,
            variant,
        });
        self.commit(m);
        Ok(())
    }

    /// Place a consequence by severity variant.
    pub fn add_consequence_by_variant(
        &mut self,
        text: impl Into<String>,
        variant: ConsequenceVariant,
    ) -> Result<(), DomainError> {
        let text = text.into();
        if text.is_empty() {
            return Err(DomainError::validation("Consequence text cannot be empty"));
        }

        let placement = self.find_consequence_slot_from_variant(variant)?;
        let (true, Some(index)) = (placement.can_place, placement.index) else {
            return Err(DomainError::capacity(format!(
                "No available slot for consequence variant \"{variant}\""
            )));
        };

        let mut m = self.mechanics();
        self.normalize_slot_count(&mut m);
        m.consequences[index] = Some(Consequence {
            text,
            roll: self.rules.consequences[index].roll,
            variant,
        });
        self.commit(m);
        Ok(())
    }

    /// Check whether a consequence can move to the next lower severity.
    ///
    /// Never errors and never mutates. Reports "cannot demote" when the
    /// target is missing or empty, already at the lowest severity, or no
    /// empty slot exists at the next-lower variant.
    pub fn check_demote_consequence_slot(
        &self,
        target: impl Into<ConsequenceTarget>,
    ) -> DemoteCheck {
        let m = self.mechanics();
        let Some(index) = target.into().resolve(&m.consequences) else {
            return DemoteCheck::CANNOT;
        };
        let Some(occupant) = m.consequences.get(index).and_then(|slot| slot.as_ref()) else {
            return DemoteCheck::CANNOT;
        };

        let variants = self.sorted_consequence_variants();
        let Some(position) = variants.iter().position(|v| *v == occupant.variant) else {
            return DemoteCheck::CANNOT;
        };
        if position == 0 {
            return DemoteCheck::CANNOT;
        }
        let next_variant = variants[position - 1];
        let Ok(placement) = self.find_consequence_slot_from_variant(next_variant) else {
            return DemoteCheck::CANNOT;
        };
        if !placement.can_place {
            return DemoteCheck::CANNOT;
        }
        DemoteCheck {
            can_demote: true,
            next_variant: Some(next_variant),
            next_index: placement.index,
        }
    }

    /// Move a consequence into the next lower severity slot, optionally
    /// replacing its text.
    pub fn demote_consequence(
        &mut self,
        target: impl Into<ConsequenceTarget>,
        new_text: Option<&str>,
    ) -> Result<(), DomainError> {
        let target = target.into();
        let mut m = self.mechanics();
        let index = target
            .resolve(&m.consequences)
            .ok_or_else(|| DomainError::not_found("Consequence", target.describe()))?;
        let occupant = m
            .consequences
            .get(index)
            .and_then(|slot| slot.clone())
            .ok_or_else(|| DomainError::validation("Cannot demote empty consequence slot"))?;

        let check = self.check_demote_consequence_slot(index);
        let (true, Some(next_index), Some(next_variant)) =
            (check.can_demote, check.next_index, check.next_variant)
        else {
            return Err(DomainError::constraint(
                "Consequence cannot be demoted, no available lower slot",
            ));
        };

        self.normalize_slot_count(&mut m);
        m.consequences[index] = None;
        m.consequences[next_index] = Some(Consequence {
            text: new_text.map_or(occupant.text, str::to_string),
            roll: self.rules.consequences[next_index].roll,
            variant: next_variant,
        });
        self.commit(m);
        Ok(())
    }

    /// Clear a consequence slot. The slot stays in place (empty): the
    /// ladder never shrinks.
    pub fn remove_consequence(
        &mut self,
        target: impl Into<ConsequenceTarget>,
    ) -> Result<(), DomainError> {
        let target = target.into();
        let mut m = self.mechanics();
        let index = target
            .resolve(&m.consequences)
            .ok_or_else(|| DomainError::not_found("Consequence", target.describe()))?;

        m.consequences[index] = None;
        self.commit(m);
        Ok(())
    }

    // =========================================================================
    // Stress tracks
    // =========================================================================

    /// Rebuild the track list to exactly match the rules' variants.
    ///
    /// Tracks whose variant is still valid keep their value and max; new
    /// variants start at 0 with a default ceiling of half the allowed
    /// maximum plus one.
    pub fn update_stress_tracks(&mut self) {
        let mut m = self.mechanics();
        m.stress_tracks = self
            .rules
            .stress_tracks
            .variants
            .iter()
            .map(|variant| {
                m.stress_tracks
                    .iter()
                    .find(|track| track.variant == *variant)
                    .cloned()
                    .unwrap_or_else(|| StressTrack {
                        variant: variant.clone(),
                        value: 0,
                        max: self.rules.stress_tracks.max_allowed / 2 + 1,
                    })
            })
            .collect();
        self.commit(m);
    }

    /// Set a track's current value, bounded by the track's own max and the
    /// global ceiling.
    pub fn set_stress_track_value(&mut self, variant: &str, value: i32) -> Result<(), DomainError> {
        let mut m = self.mechanics();
        if value < 0 {
            return Err(DomainError::constraint("Stress value cannot be negative"));
        }
        let max_allowed = self.rules.stress_tracks.max_allowed;
        if value > max_allowed {
            return Err(DomainError::constraint(format!(
                "Stress value cannot be higher than {max_allowed}"
            )));
        }
        let track = m
            .stress_tracks
            .iter_mut()
            .find(|track| track.variant == variant)
            .ok_or_else(|| DomainError::not_found("Stress track", variant))?;
        if value > track.max {
            return Err(DomainError::constraint(format!(
                "Stress value for {variant} cannot be higher than track maximum ({})",
                track.max
            )));
        }

        track.value = value;
        self.commit(m);
        Ok(())
    }

    /// Set a track's maximum, clamping its current value down if the new
    /// maximum undercuts it. The clamp is silent, not an error.
    pub fn set_stress_track_max(&mut self, variant: &str, max: i32) -> Result<(), DomainError> {
        let mut m = self.mechanics();
        if max < 1 {
            return Err(DomainError::constraint(
                "Stress track maximum must be at least 1",
            ));
        }
        let max_allowed = self.rules.stress_tracks.max_allowed;
        if max > max_allowed {
            return Err(DomainError::constraint(format!(
                "Stress track maximum cannot be higher than {max_allowed}"
            )));
        }
        let track = m
            .stress_tracks
            .iter_mut()
            .find(|track| track.variant == variant)
            .ok_or_else(|| DomainError::not_found("Stress track", variant))?;

        track.max = max;
        if track.value > max {
            track.value = max;
        }
        self.commit(m);
        Ok(())
    }
}
