//! Character-side composition over rule modules.
//!
//! A character's combined mechanics is a mapping from system key to that
//! system's payload; the generic key is always present, every other key is
//! present exactly when the character has opted in. [`CharacterController`]
//! aggregates one sub-controller per opted-in module, routing each module's
//! reads and writes through closures onto that module's slice of the
//! combined mechanics. This layer is wiring only -- the business logic
//! lives in the module controllers.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::arcane_rift::{
    ArcaneRiftCharacterController, ArcaneRiftCharacterMechanics, ArcaneRiftCharacterRules,
};
use super::{GenericMechanics, SystemKey};
use crate::error::DomainError;

/// Combined mechanics of one character, keyed by system.
///
/// A character's `systems` list is always exactly the set of present keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMechanics {
    pub generic: GenericMechanics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcane_rift: Option<ArcaneRiftCharacterMechanics>,
}

impl CharacterMechanics {
    /// The keys present in this mechanics map.
    pub fn systems(&self) -> Vec<SystemKey> {
        SystemKey::ALL
            .into_iter()
            .filter(|key| self.has_system(*key))
            .collect()
    }

    /// Whether the given system is active for this character.
    pub fn has_system(&self, key: SystemKey) -> bool {
        match key {
            SystemKey::Generic => true,
            SystemKey::ArcaneRift => self.arcane_rift.is_some(),
        }
    }

    /// Opt into a system by installing its default payload.
    ///
    /// A no-op when the system is already present: re-enabling must not
    /// wipe existing data.
    pub fn enable_system(&mut self, key: SystemKey) {
        match key {
            SystemKey::Generic => {}
            SystemKey::ArcaneRift => {
                if self.arcane_rift.is_none() {
                    self.arcane_rift = Some(ArcaneRiftCharacterMechanics::default());
                }
            }
        }
    }

    /// Opt out of a system, dropping all of its mechanics data.
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

/// Per-system rules, keyed like the mechanics map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRules {
    pub generic: GenericMechanics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcane_rift: Option<ArcaneRiftCharacterRules>,
}

impl Default for CharacterRules {
    fn default() -> Self {
        default_character_rules()
    }
}

/// Default mechanics payload per system key, every system included.
///
/// Returns a fresh value on each call; callers may customize it freely
/// without affecting any other character.
pub fn default_character_mechanics() -> CharacterMechanics {
    CharacterMechanics {
        generic: GenericMechanics::default(),
        arcane_rift: Some(ArcaneRiftCharacterMechanics::default()),
    }
}

/// Default rules payload per system key.
pub fn default_character_rules() -> CharacterRules {
    CharacterRules {
        generic: GenericMechanics::default(),
        arcane_rift: Some(ArcaneRiftCharacterRules::default()),
    }
}

/// Aggregate of rule-module controllers for one character.
///
/// A sub-controller exists exactly for the systems that are present in the
/// character's mechanics AND define a controller. The generic system is
/// exposed as an empty placeholder. New modules plug in here without
/// touching existing ones.
pub struct CharacterController<'a> {
    generic: GenericMechanics,
    arcane_rift: Option<ArcaneRiftCharacterController<'a>>,
}

impl<'a> CharacterController<'a> {
    /// Build the controller set over externally owned combined mechanics.
    ///
    /// `get_mechanics`/`set_mechanics` read and replace the WHOLE mechanics
    /// map; each sub-controller gets closures scoped to its own slice,
    /// re-wrapping the map on write.
    pub fn new(
        get_mechanics: impl Fn() -> CharacterMechanics + 'a,
        set_mechanics: impl FnMut(CharacterMechanics) + 'a,
        rules: Option<CharacterRules>,
    ) -> Self {
        let get_mechanics = Rc::new(get_mechanics);
        let set_mechanics = Rc::new(RefCell::new(set_mechanics));
        let mechanics = (*get_mechanics)();

        let mut controller = Self {
            generic: GenericMechanics::default(),
            arcane_rift: None,
        };
        for key in SystemKey::ALL {
            if !mechanics.has_system(key) {
                continue;
            }
            match key {
                // The generic module registers no controller factory.
                SystemKey::Generic => {}
                SystemKey::ArcaneRift => {
                    let read = {
                        let get = Rc::clone(&get_mechanics);
                        // The slice exists at construction; if a caller
                        // drops it behind our back, reads fall back to the
                        // default payload instead of panicking.
                        move || (*get)().arcane_rift.unwrap_or_default()
                    };
                    let write = {
                        let get = Rc::clone(&get_mechanics);
                        let set = Rc::clone(&set_mechanics);
                        move |slice: ArcaneRiftCharacterMechanics| {
                            let mut all = (*get)();
                            all.arcane_rift = Some(slice);
                            (*set.borrow_mut())(all);
                        }
                    };
                    let module_rules = rules.as_ref().and_then(|r| r.arcane_rift.clone());
                    controller.arcane_rift = Some(ArcaneRiftCharacterController::new(
                        read,
                        write,
                        module_rules,
                    ));
                }
            }
        }
        controller
    }

    /// The generic module's placeholder: no operations.
    pub fn generic(&self) -> &GenericMechanics {
        &self.generic
    }

    /// The Arcane Rift sub-controller, present iff the character has opted
    /// into Arcane Rift mechanics.
    pub fn arcane_rift(&mut self) -> Option<&mut ArcaneRiftCharacterController<'a>> {
        self.arcane_rift.as_mut()
    }

    /// Whether a controller is wired for the given system.
    pub fn has_controller(&self, key: SystemKey) -> bool {
        match key {
            SystemKey::Generic => false,
            SystemKey::ArcaneRift => self.arcane_rift.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::arcane_rift::Aspect;

    type SharedMechanics = Rc<RefCell<CharacterMechanics>>;

    fn controller(
        state: &SharedMechanics,
        rules: Option<CharacterRules>,
    ) -> CharacterController<'static> {
        let read = Rc::clone(state);
        let write = Rc::clone(state);
        CharacterController::new(
            move || read.borrow().clone(),
            move |m| *write.borrow_mut() = m,
            rules,
        )
    }

    #[test]
    fn systems_list_mirrors_present_keys() {
        let mut mechanics = CharacterMechanics::default();
        assert_eq!(mechanics.systems(), vec![SystemKey::Generic]);

        mechanics.enable_system(SystemKey::ArcaneRift);
        assert_eq!(
            mechanics.systems(),
            vec![SystemKey::Generic, SystemKey::ArcaneRift]
        );

        mechanics.disable_system(SystemKey::ArcaneRift).expect("removable");
        assert_eq!(mechanics.systems(), vec![SystemKey::Generic]);
    }

    #[test]
    fn generic_system_cannot_be_disabled() {
        let mut mechanics = CharacterMechanics::default();
        assert!(matches!(
            mechanics.disable_system(SystemKey::Generic),
            Err(DomainError::Validation(_))
        ));
        assert!(mechanics.has_system(SystemKey::Generic));
    }

    #[test]
    fn enabling_twice_keeps_existing_data() {
        let mut mechanics = CharacterMechanics::default();
        mechanics.enable_system(SystemKey::ArcaneRift);
        mechanics
            .arcane_rift
            .as_mut()
            .expect("enabled")
            .shortlist
            .push("Iron dagger".to_string());

        mechanics.enable_system(SystemKey::ArcaneRift);
        assert_eq!(
            mechanics.arcane_rift.expect("still enabled").shortlist,
            vec!["Iron dagger"]
        );
    }

    #[test]
    fn no_sub_controller_without_opt_in() {
        let state = Rc::new(RefCell::new(CharacterMechanics::default()));
        let mut ctrl = controller(&state, None);
        assert!(ctrl.arcane_rift().is_none());
        assert!(!ctrl.has_controller(SystemKey::ArcaneRift));
        assert!(!ctrl.has_controller(SystemKey::Generic));
        assert_eq!(ctrl.generic(), &GenericMechanics::default());
    }

    #[test]
    fn sub_controller_writes_re_wrap_into_the_combined_map() {
        let state = Rc::new(RefCell::new(default_character_mechanics()));
        let mut ctrl = controller(&state, None);

        let arcane = ctrl.arcane_rift().expect("opted in");
        arcane
            .update_characteristic("Brawn", 1)
            .expect("valid update");
        arcane
            .add_aspect(Aspect::new("Reluctant hero", "Never wanted any of this"))
            .expect("under cap");

        let m = state.borrow();
        let slice = m.arcane_rift.as_ref().expect("slice still present");
        assert_eq!(slice.stats.characteristics["Brawn"].value, 1);
        assert_eq!(slice.aspects.len(), 1);
        assert_eq!(m.generic, GenericMechanics::default());
    }

    #[test]
    fn sub_controller_uses_supplied_rules() {
        let mut rules = default_character_rules();
        if let Some(arcane) = rules.arcane_rift.as_mut() {
            arcane.aspects.max_amount = 1;
        }
        let state = Rc::new(RefCell::new(default_character_mechanics()));
        let mut ctrl = controller(&state, Some(rules));

        let arcane = ctrl.arcane_rift().expect("opted in");
        arcane
            .add_aspect(Aspect::new("Only one", "aspect"))
            .expect("cap of 1");
        assert!(matches!(
            arcane.add_aspect(Aspect::new("Too many", "aspects")),
            Err(DomainError::Capacity(_))
        ));
    }

    #[test]
    fn mechanics_map_serializes_under_system_key_literals() {
        let mechanics = default_character_mechanics();
        let value = serde_json::to_value(&mechanics).expect("serialize");
        assert_eq!(value["generic"], serde_json::json!({}));
        assert!(value.get("arcaneRift").is_some());

        let generic_only: CharacterMechanics =
            serde_json::from_value(serde_json::json!({ "generic": {} })).expect("deserialize");
        assert!(generic_only.arcane_rift.is_none());
        let round: CharacterMechanics =
            serde_json::from_value(value).expect("deserialize");
        assert_eq!(round, mechanics);
    }

    #[test]
    fn default_rules_cover_every_rule_module() {
        let rules = default_character_rules();
        assert!(rules.arcane_rift.is_some());
    }
}
