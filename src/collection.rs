//! Per-character collection of installed bionics
//!
//! Owns the ordered `BionicInstance` list, assigns inventory hotkeys, and
//! runs the install/uninstall workflows including upgrade replacement and
//! cascading installs of included bionics.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::character::{Anatomy, TraitSet};
use crate::error::BionicError;
use crate::instance::BionicInstance;
use crate::registry::BionicRegistry;
use crate::slots;
use crate::types::BionicId;

/// Placeholder hotkey assigned when the letter namespace is exhausted.
/// Exempt from the uniqueness invariant.
pub const NO_INVLET: char = ' ';

/// Ordered set of one character's installed bionics.
///
/// Insertion order is meaningful only for display. No two instances share
/// an assigned hotkey, and no two instances share an id unless the
/// definition permits duplicates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BionicCollection {
    bionics: Vec<BionicInstance>,
}

impl BionicCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bionics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bionics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BionicInstance> {
        self.bionics.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut BionicInstance> {
        self.bionics.iter_mut()
    }

    /// First instance of this bionic, if installed.
    pub fn get(&self, id: &BionicId) -> Option<&BionicInstance> {
        self.bionics.iter().find(|inst| &inst.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &BionicId) -> Option<&mut BionicInstance> {
        self.bionics.iter_mut().find(|inst| &inst.id == id)
    }

    pub fn has_bionic(&self, id: &BionicId) -> bool {
        self.get(id).is_some()
    }

    fn uses_invlet(&self, invlet: char) -> bool {
        self.bionics.iter().any(|inst| inst.invlet == invlet)
    }

    /// First unused hotkey, scanning `a..z` then `A..Z` across both this
    /// collection and the caller's wider hotkey namespace (`taken`).
    /// Falls back to [`NO_INVLET`] when every letter is spoken for.
    pub fn get_free_invlet(&self, taken: &HashSet<char>) -> char {
        (b'a'..=b'z')
            .chain(b'A'..=b'Z')
            .map(char::from)
            .find(|c| !self.uses_invlet(*c) && !taken.contains(c))
            .unwrap_or(NO_INVLET)
    }

    /// Total power-bank capacity contributed by installed power sources.
    ///
    /// Recompute after every membership change and hand the sum to
    /// `PowerBank::set_capacity`; summation makes the contribution
    /// order-independent.
    pub fn power_capacity(&self, registry: &BionicRegistry) -> u32 {
        self.bionics
            .iter()
            .filter_map(|inst| registry.get_opt(&inst.id))
            .filter(|def| def.power_source)
            .map(|def| def.capacity)
            .sum()
    }

    /// Install a bionic on this character.
    ///
    /// Validates before mutating: the id must resolve, must not already be
    /// installed (unless the definition permits duplicates), and the slot
    /// demand must fit the anatomy. A definition that upgrades an installed
    /// predecessor replaces it atomically, inheriting its freed hotkey.
    ///
    /// On success the definition's canceled mutations are removed from
    /// `traits` and every included bionic is installed as well; those
    /// cascading installs are granted without their own slot or duplicate
    /// checks, keeping bundled bionics atomic with their parent.
    ///
    /// Returns the new instance's hotkey.
    pub fn install(
        &mut self,
        id: &BionicId,
        registry: &BionicRegistry,
        anatomy: &Anatomy,
        traits: &mut TraitSet,
        taken_invlets: &HashSet<char>,
    ) -> Result<char, BionicError> {
        let def = registry.get(id)?;

        if self.has_bionic(id) && !def.dupes_ok {
            return Err(BionicError::AlreadyInstalled(id.clone()));
        }

        // Upgrade transition: this definition supersedes an installed bionic.
        let replacing = def
            .upgraded_bionic
            .as_ref()
            .filter(|pred| self.has_bionic(pred))
            .cloned();

        // Slot feasibility over the candidate set: current occupants, minus
        // the one predecessor instance being replaced, plus the new bionic.
        {
            let mut skip_one = replacing.is_some();
            let installed_defs = self
                .bionics
                .iter()
                .filter(|inst| {
                    if skip_one && Some(&inst.id) == replacing.as_ref() {
                        skip_one = false;
                        return false;
                    }
                    true
                })
                .filter_map(|inst| registry.get_opt(&inst.id));
            slots::check_installation(def, installed_defs, anatomy)?;
        }

        // All checks passed; mutate.
        let freed = replacing
            .and_then(|pred| self.remove_first(&pred))
            .map(|inst| inst.invlet);
        let invlet = match freed {
            Some(c) if c != NO_INVLET && !taken_invlets.contains(&c) => c,
            _ => self.get_free_invlet(taken_invlets),
        };
        self.bionics.push(BionicInstance::new(id.clone(), invlet));
        for trait_id in &def.canceled_mutations {
            traits.remove(trait_id);
        }

        let mut visited: HashSet<BionicId> = HashSet::new();
        visited.insert(id.clone());
        for included in &def.included_bionics {
            self.install_granted(included, registry, traits, taken_invlets, &mut visited);
        }

        Ok(invlet)
    }

    /// Cascading install of an included bionic: granted, not re-validated.
    /// The visited set bounds content whose include graph escaped `check`.
    fn install_granted(
        &mut self,
        id: &BionicId,
        registry: &BionicRegistry,
        traits: &mut TraitSet,
        taken_invlets: &HashSet<char>,
        visited: &mut HashSet<BionicId>,
    ) {
        if !visited.insert(id.clone()) {
            return;
        }
        let def = match registry.get_opt(id) {
            Some(def) => def,
            None => return, // dangling include, flagged by check
        };
        if self.has_bionic(id) && !def.dupes_ok {
            return;
        }
        let invlet = self.get_free_invlet(taken_invlets);
        self.bionics.push(BionicInstance::new(id.clone(), invlet));
        for trait_id in &def.canceled_mutations {
            traits.remove(trait_id);
        }
        for included in &def.included_bionics {
            self.install_granted(included, registry, traits, taken_invlets, visited);
        }
    }

    /// Remove the first installed instance of this bionic.
    ///
    /// Included bionics installed alongside it deliberately remain; each is
    /// independently usable once present.
    pub fn uninstall(&mut self, id: &BionicId) -> Result<BionicInstance, BionicError> {
        self.remove_first(id)
            .ok_or_else(|| BionicError::NotInstalled(id.clone()))
    }

    fn remove_first(&mut self, id: &BionicId) -> Option<BionicInstance> {
        let pos = self.bionics.iter().position(|inst| &inst.id == id)?;
        Some(self.bionics.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::BionicRecord;
    use crate::types::{BodyPart, TraitId};

    fn registry_of(records: &[&str]) -> BionicRegistry {
        let mut registry = BionicRegistry::new();
        for json in records {
            let record: BionicRecord = serde_json::from_str(json).unwrap();
            registry.load(record).unwrap();
        }
        registry.finalize();
        registry
    }

    fn id(s: &str) -> BionicId {
        BionicId::new(s)
    }

    fn install(
        collection: &mut BionicCollection,
        bionic: &str,
        registry: &BionicRegistry,
    ) -> Result<char, BionicError> {
        collection.install(
            &id(bionic),
            registry,
            &Anatomy::humanoid(),
            &mut TraitSet::new(),
            &HashSet::new(),
        )
    }

    #[test]
    fn test_invlets_assigned_in_scan_order() {
        let registry = registry_of(&[
            r#"{ "id": "bio_a" }"#,
            r#"{ "id": "bio_b" }"#,
            r#"{ "id": "bio_c" }"#,
        ]);
        let mut collection = BionicCollection::new();
        assert_eq!(install(&mut collection, "bio_a", &registry), Ok('a'));
        assert_eq!(install(&mut collection, "bio_b", &registry), Ok('b'));
        assert_eq!(install(&mut collection, "bio_c", &registry), Ok('c'));
    }

    #[test]
    fn test_invlet_skips_taken_namespace() {
        let registry = registry_of(&[r#"{ "id": "bio_a" }"#]);
        let mut collection = BionicCollection::new();
        let taken: HashSet<char> = ['a', 'b'].into_iter().collect();
        let invlet = collection
            .install(
                &id("bio_a"),
                &registry,
                &Anatomy::humanoid(),
                &mut TraitSet::new(),
                &taken,
            )
            .unwrap();
        assert_eq!(invlet, 'c');
    }

    #[test]
    fn test_invlet_exhaustion_falls_back_to_placeholder() {
        let collection = BionicCollection::new();
        let taken: HashSet<char> = (b'a'..=b'z')
            .chain(b'A'..=b'Z')
            .map(char::from)
            .collect();
        assert_eq!(collection.get_free_invlet(&taken), NO_INVLET);
    }

    #[test]
    fn test_install_uninstall_returns_to_empty() {
        let registry = registry_of(&[r#"{ "id": "bio_a" }"#, r#"{ "id": "bio_b" }"#]);
        let mut collection = BionicCollection::new();
        install(&mut collection, "bio_a", &registry).unwrap();
        collection.uninstall(&id("bio_a")).unwrap();
        assert!(collection.is_empty());
        // hotkey pool fully released
        assert_eq!(install(&mut collection, "bio_b", &registry), Ok('a'));
    }

    #[test]
    fn test_duplicate_install_rejected() {
        let registry = registry_of(&[r#"{ "id": "bio_a" }"#]);
        let mut collection = BionicCollection::new();
        install(&mut collection, "bio_a", &registry).unwrap();
        assert_eq!(
            install(&mut collection, "bio_a", &registry),
            Err(BionicError::AlreadyInstalled(id("bio_a")))
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_dupes_ok_allows_copies() {
        let registry = registry_of(&[r#"{ "id": "bio_storage", "dupes_ok": true }"#]);
        let mut collection = BionicCollection::new();
        assert_eq!(install(&mut collection, "bio_storage", &registry), Ok('a'));
        assert_eq!(install(&mut collection, "bio_storage", &registry), Ok('b'));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_unknown_definition_rejected() {
        let registry = registry_of(&[]);
        let mut collection = BionicCollection::new();
        assert_eq!(
            install(&mut collection, "bio_ghost", &registry),
            Err(BionicError::UnknownDefinition(id("bio_ghost")))
        );
    }

    #[test]
    fn test_slot_overflow_leaves_collection_unchanged() {
        let registry = registry_of(&[
            r#"{ "id": "bio_big", "occupied_bodyparts": [["torso", 8]] }"#,
            r#"{ "id": "bio_more", "occupied_bodyparts": [["torso", 5]] }"#,
        ]);
        let mut anatomy = Anatomy::new();
        anatomy.set_capacity(BodyPart::Torso, 10);
        let mut collection = BionicCollection::new();
        let mut traits = TraitSet::new();
        collection
            .install(&id("bio_big"), &registry, &anatomy, &mut traits, &HashSet::new())
            .unwrap();
        let err = collection
            .install(&id("bio_more"), &registry, &anatomy, &mut traits, &HashSet::new())
            .unwrap_err();
        assert!(matches!(err, BionicError::SlotsExceeded { .. }));
        assert_eq!(collection.len(), 1);
        assert!(!collection.has_bionic(&id("bio_more")));
    }

    #[test]
    fn test_canceled_mutations_removed_and_stay_removed() {
        let registry = registry_of(&[
            r#"{ "id": "bio_eye_optic", "canceled_mutations": ["HYPEROPIC"] }"#,
        ]);
        let mut collection = BionicCollection::new();
        let mut traits: TraitSet = [TraitId::new("HYPEROPIC"), TraitId::new("FAST_HEALER")]
            .into_iter()
            .collect();
        collection
            .install(
                &id("bio_eye_optic"),
                &registry,
                &Anatomy::humanoid(),
                &mut traits,
                &HashSet::new(),
            )
            .unwrap();
        assert!(!traits.contains(&TraitId::new("HYPEROPIC")));
        assert!(traits.contains(&TraitId::new("FAST_HEALER")));

        // uninstalling does not restore the trait
        collection.uninstall(&id("bio_eye_optic")).unwrap();
        assert!(!traits.contains(&TraitId::new("HYPEROPIC")));
    }

    #[test]
    fn test_included_bionics_cascade_on_install() {
        let registry = registry_of(&[
            r#"{ "id": "bio_armor_eyes", "included_bionics": ["bio_blindfold"] }"#,
            r#"{ "id": "bio_blindfold" }"#,
        ]);
        let mut collection = BionicCollection::new();
        install(&mut collection, "bio_armor_eyes", &registry).unwrap();
        assert!(collection.has_bionic(&id("bio_blindfold")));
        assert_eq!(collection.get(&id("bio_blindfold")).unwrap().invlet, 'b');
    }

    #[test]
    fn test_cascade_bypasses_slot_checks() {
        // the included bionic alone would not fit, but cascades are granted
        let registry = registry_of(&[
            r#"{ "id": "bio_parent", "included_bionics": ["bio_bulky"] }"#,
            r#"{ "id": "bio_bulky", "occupied_bodyparts": [["torso", 99]] }"#,
        ]);
        let mut anatomy = Anatomy::new();
        anatomy.set_capacity(BodyPart::Torso, 10);
        let mut collection = BionicCollection::new();
        collection
            .install(
                &id("bio_parent"),
                &registry,
                &anatomy,
                &mut TraitSet::new(),
                &HashSet::new(),
            )
            .unwrap();
        assert!(collection.has_bionic(&id("bio_bulky")));
    }

    #[test]
    fn test_include_cycle_bounded_at_runtime() {
        // content that escaped check() must not hang the install
        let registry = registry_of(&[
            r#"{ "id": "bio_a", "included_bionics": ["bio_b"] }"#,
            r#"{ "id": "bio_b", "included_bionics": ["bio_a"] }"#,
        ]);
        let mut collection = BionicCollection::new();
        install(&mut collection, "bio_a", &registry).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_uninstall_does_not_cascade() {
        let registry = registry_of(&[
            r#"{ "id": "bio_armor_eyes", "included_bionics": ["bio_blindfold"] }"#,
            r#"{ "id": "bio_blindfold" }"#,
        ]);
        let mut collection = BionicCollection::new();
        install(&mut collection, "bio_armor_eyes", &registry).unwrap();
        collection.uninstall(&id("bio_armor_eyes")).unwrap();
        assert!(!collection.has_bionic(&id("bio_armor_eyes")));
        assert!(collection.has_bionic(&id("bio_blindfold"))); // independently usable
    }

    #[test]
    fn test_uninstall_absent_fails() {
        let mut collection = BionicCollection::new();
        assert_eq!(
            collection.uninstall(&id("bio_a")),
            Err(BionicError::NotInstalled(id("bio_a")))
        );
    }

    #[test]
    fn test_upgrade_replaces_predecessor_and_keeps_invlet() {
        let registry = registry_of(&[
            r#"{ "id": "bio_storage" }"#,
            r#"{ "id": "bio_other" }"#,
            r#"{ "id": "bio_storage_mkII", "upgraded_bionic": "bio_storage" }"#,
        ]);
        let mut collection = BionicCollection::new();
        install(&mut collection, "bio_storage", &registry).unwrap(); // 'a'
        install(&mut collection, "bio_other", &registry).unwrap(); // 'b'
        let invlet = install(&mut collection, "bio_storage_mkII", &registry).unwrap();
        assert_eq!(invlet, 'a'); // predecessor's hotkey preserved
        assert!(!collection.has_bionic(&id("bio_storage")));
        assert!(collection.has_bionic(&id("bio_storage_mkII")));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_upgrade_slot_math_excludes_predecessor() {
        // capacity 10: the upgrade (7 slots) only fits because the
        // predecessor's 6 are released by the replacement
        let registry = registry_of(&[
            r#"{ "id": "bio_plating", "occupied_bodyparts": [["torso", 6]] }"#,
            r#"{ "id": "bio_plating_mkII", "upgraded_bionic": "bio_plating",
                 "occupied_bodyparts": [["torso", 7]] }"#,
        ]);
        let mut anatomy = Anatomy::new();
        anatomy.set_capacity(BodyPart::Torso, 10);
        let mut collection = BionicCollection::new();
        let mut traits = TraitSet::new();
        collection
            .install(&id("bio_plating"), &registry, &anatomy, &mut traits, &HashSet::new())
            .unwrap();
        collection
            .install(
                &id("bio_plating_mkII"),
                &registry,
                &anatomy,
                &mut traits,
                &HashSet::new(),
            )
            .unwrap();
        assert!(collection.has_bionic(&id("bio_plating_mkII")));
        assert!(!collection.has_bionic(&id("bio_plating")));
    }

    #[test]
    fn test_power_capacity_is_order_independent() {
        let registry = registry_of(&[
            r#"{ "id": "bio_storage", "power_source": true, "capacity": 100 }"#,
            r#"{ "id": "bio_cells", "power_source": true, "capacity": 50 }"#,
            r#"{ "id": "bio_flashlight", "capacity": 10 }"#,
        ]);
        let mut forward = BionicCollection::new();
        install(&mut forward, "bio_storage", &registry).unwrap();
        install(&mut forward, "bio_cells", &registry).unwrap();
        install(&mut forward, "bio_flashlight", &registry).unwrap();

        let mut reverse = BionicCollection::new();
        install(&mut reverse, "bio_flashlight", &registry).unwrap();
        install(&mut reverse, "bio_cells", &registry).unwrap();
        install(&mut reverse, "bio_storage", &registry).unwrap();

        // non-power-source capacity does not count
        assert_eq!(forward.power_capacity(&registry), 150);
        assert_eq!(reverse.power_capacity(&registry), 150);
    }
}
