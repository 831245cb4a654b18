//! Bionic definition registry
//!
//! Loads authored records, resolves the upgrade graph (finalize), and
//! validates cross-references (check). Defaults are embedded in the binary
//! via `include_str!`; an optional data directory can override them.
//!
//! Content problems never crash the registry: they are collected as
//! warnings and the offending definitions stay loaded, so the game keeps
//! running with degraded content (mods are hot-swappable).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::definition::{BionicDefinition, BionicRecord, BionicsFile};
use crate::error::BionicError;
use crate::types::{BionicId, BodyPart, TraitId};

/// Embedded default content file.
const DEFAULT_BIONICS_JSON: &str = include_str!("../data/defaults/bionics.json");

/// A content-integrity problem found while loading or checking definitions.
///
/// Warnings are collected, never thrown; the registry keeps serving the
/// flagged definitions.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentWarning {
    /// `upgraded_bionic` names an id that is not loaded.
    DanglingUpgrade { bionic: BionicId, target: BionicId },
    /// An `included_bionics` entry names an id that is not loaded.
    DanglingInclude { bionic: BionicId, target: BionicId },
    /// A `canceled_mutations` entry names an unknown trait.
    UnknownTrait { bionic: BionicId, trait_id: TraitId },
    /// Following `upgraded_bionic` edges from here loops forever.
    UpgradeCycle { bionic: BionicId },
    /// Following `included_bionics` edges from here loops forever.
    IncludeCycle { bionic: BionicId },
    /// `power_over_time` is set but `charge_time` is zero, so it never fires.
    DeadChargeConfig { bionic: BionicId },
    /// A gun/weapon bionic has no `fake_item`; it was degraded to passive.
    MissingFakeItem { bionic: BionicId },
    /// One record listed the same body part twice; the demands were merged.
    DuplicateBodyPart { bionic: BionicId, part: BodyPart },
    /// A mod record collided with an id already loaded from the same source.
    DuplicateId { id: BionicId },
    /// A content file failed to parse and was skipped.
    UnreadableFile { path: String, reason: String },
}

impl fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentWarning::DanglingUpgrade { bionic, target } => {
                write!(f, "{} upgrades unknown bionic {}", bionic, target)
            }
            ContentWarning::DanglingInclude { bionic, target } => {
                write!(f, "{} includes unknown bionic {}", bionic, target)
            }
            ContentWarning::UnknownTrait { bionic, trait_id } => {
                write!(f, "{} cancels unknown trait {}", bionic, trait_id)
            }
            ContentWarning::UpgradeCycle { bionic } => {
                write!(f, "upgrade chain through {} is a cycle", bionic)
            }
            ContentWarning::IncludeCycle { bionic } => {
                write!(f, "included bionics of {} form a cycle", bionic)
            }
            ContentWarning::DeadChargeConfig { bionic } => {
                write!(
                    f,
                    "{} has power_over_time but zero charge_time; it will never draw",
                    bionic
                )
            }
            ContentWarning::MissingFakeItem { bionic } => {
                write!(f, "{} is a gun/weapon bionic without a fake_item", bionic)
            }
            ContentWarning::DuplicateBodyPart { bionic, part } => {
                write!(f, "{} lists {} twice; slot demands merged", bionic, part.token())
            }
            ContentWarning::DuplicateId { id } => {
                write!(f, "duplicate bionic id {} skipped", id)
            }
            ContentWarning::UnreadableFile { path, reason } => {
                write!(f, "failed to parse {}: {}", path, reason)
            }
        }
    }
}

/// Error from loading a single record directly.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadError {
    /// The record's id is already registered.
    DuplicateId(BionicId),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::DuplicateId(id) => write!(f, "bionic {} is already loaded", id),
        }
    }
}

impl std::error::Error for LoadError {}

/// All loaded bionic definitions, keyed by id.
///
/// Lifecycle: `load` each record, then `finalize` once, then `check`.
/// Lookup is O(1) and iteration follows load order. `reset` supports
/// content reloads and test isolation.
#[derive(Clone, Debug, Default)]
pub struct BionicRegistry {
    defs: HashMap<BionicId, BionicDefinition>,
    /// Ids in load order, for deterministic iteration.
    ids: Vec<BionicId>,
    /// Warnings produced while loading records, reported by `check`.
    load_warnings: Vec<ContentWarning>,
}

impl BionicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the embedded default content, finalized.
    pub fn defaults() -> Self {
        let file: BionicsFile = serde_json::from_str(DEFAULT_BIONICS_JSON)
            .expect("Failed to parse embedded bionics.json");
        let mut registry = Self::new();
        for record in file.bionics {
            registry
                .load(record)
                .expect("Duplicate id in embedded bionics.json");
        }
        registry.finalize();
        registry
    }

    /// Load from a directory, merging with embedded defaults.
    ///
    /// A `bionics.json` in the directory overrides defaults id-by-id and
    /// may add new bionics. Bad mod data degrades instead of aborting:
    /// an unparseable file or an id repeated within it becomes a warning.
    pub fn load_from(dir: &Path) -> Self {
        let mut registry = Self::defaults();

        let path = dir.join("bionics.json");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<BionicsFile>(&contents) {
                    Ok(file) => {
                        let mut seen: HashSet<BionicId> = HashSet::new();
                        for record in file.bionics {
                            if !seen.insert(record.id.clone()) {
                                registry.load_warnings.push(ContentWarning::DuplicateId {
                                    id: record.id,
                                });
                                continue;
                            }
                            registry.insert(record, true);
                        }
                    }
                    Err(e) => {
                        eprintln!("Warning: failed to parse {}", path.display());
                        registry.load_warnings.push(ContentWarning::UnreadableFile {
                            path: path.display().to_string(),
                            reason: e.to_string(),
                        });
                    }
                },
                Err(e) => {
                    eprintln!("Warning: failed to read {}", path.display());
                    registry.load_warnings.push(ContentWarning::UnreadableFile {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        registry.finalize();
        registry
    }

    /// Load one record. Referenced ids stay symbolic until `finalize`/`check`.
    pub fn load(&mut self, record: BionicRecord) -> Result<(), LoadError> {
        if self.defs.contains_key(&record.id) {
            return Err(LoadError::DuplicateId(record.id));
        }
        self.insert(record, false);
        Ok(())
    }

    fn insert(&mut self, record: BionicRecord, replace: bool) {
        let def = BionicDefinition::from_record(record, &mut self.load_warnings);
        let id = def.id.clone();
        if self.defs.insert(id.clone(), def).is_none() {
            self.ids.push(id);
        } else {
            debug_assert!(replace);
        }
    }

    /// Rebuild every `available_upgrades` set from the collected
    /// `upgraded_bionic` edges, overwriting whatever was there.
    ///
    /// Must run after all loads and before gameplay use. Dangling edges are
    /// skipped here; `check` reports them.
    pub fn finalize(&mut self) {
        let edges: Vec<(BionicId, BionicId)> = self
            .defs
            .values()
            .filter_map(|def| {
                def.upgraded_bionic
                    .clone()
                    .map(|target| (target, def.id.clone()))
            })
            .collect();

        for def in self.defs.values_mut() {
            def.available_upgrades.clear();
        }
        for (target, successor) in edges {
            if let Some(def) = self.defs.get_mut(&target) {
                def.available_upgrades.insert(successor);
            }
        }
    }

    /// Validate every loaded definition.
    ///
    /// Returns all content-integrity warnings: dangling references, cycles
    /// in the upgrade and include graphs, and dead configurations. The
    /// known-trait set comes from the external trait registry.
    pub fn check(&self, known_traits: &HashSet<TraitId>) -> Vec<ContentWarning> {
        let mut warnings = self.load_warnings.clone();

        for id in &self.ids {
            let def = &self.defs[id];
            if let Some(target) = &def.upgraded_bionic {
                if !self.defs.contains_key(target) {
                    warnings.push(ContentWarning::DanglingUpgrade {
                        bionic: id.clone(),
                        target: target.clone(),
                    });
                }
            }
            for target in &def.included_bionics {
                if !self.defs.contains_key(target) {
                    warnings.push(ContentWarning::DanglingInclude {
                        bionic: id.clone(),
                        target: target.clone(),
                    });
                }
            }
            for trait_id in &def.canceled_mutations {
                if !known_traits.contains(trait_id) {
                    warnings.push(ContentWarning::UnknownTrait {
                        bionic: id.clone(),
                        trait_id: trait_id.clone(),
                    });
                }
            }
            if def.charge_time == 0 && def.power_over_time > 0 {
                warnings.push(ContentWarning::DeadChargeConfig { bionic: id.clone() });
            }
            if (def.gun_bionic || def.weapon_bionic) && def.fake_item.is_none() {
                warnings.push(ContentWarning::MissingFakeItem { bionic: id.clone() });
            }
        }

        self.check_upgrade_cycles(&mut warnings);
        self.check_include_cycles(&mut warnings);
        warnings
    }

    /// Walk `upgraded_bionic` chains with a visited set bounded by the
    /// registry size; revisiting a node signals a cycle.
    fn check_upgrade_cycles(&self, warnings: &mut Vec<ContentWarning>) {
        let mut cleared: HashSet<BionicId> = HashSet::new();
        for id in &self.ids {
            if cleared.contains(id) {
                continue;
            }
            let mut visited: HashSet<BionicId> = HashSet::new();
            let mut current = id.clone();
            visited.insert(current.clone());
            loop {
                let next = match self.defs.get(&current).and_then(|d| d.upgraded_bionic.clone()) {
                    Some(next) if self.defs.contains_key(&next) => next,
                    _ => break, // end of chain, or dangling (reported above)
                };
                if cleared.contains(&next) {
                    break; // chain already diagnosed from another entry point
                }
                if visited.contains(&next) {
                    warnings.push(ContentWarning::UpgradeCycle { bionic: next });
                    break;
                }
                visited.insert(next.clone());
                current = next;
            }
            cleared.extend(visited);
        }
    }

    /// The include graph must be a tree: cascading installs are granted
    /// without re-validation, so a cycle here must be caught at check time.
    fn check_include_cycles(&self, warnings: &mut Vec<ContentWarning>) {
        let mut acyclic: HashSet<BionicId> = HashSet::new();
        let mut flagged: HashSet<BionicId> = HashSet::new();
        for id in &self.ids {
            let mut path: Vec<BionicId> = Vec::new();
            self.walk_includes(id, &mut path, &mut acyclic, &mut flagged, warnings);
        }
    }

    fn walk_includes(
        &self,
        id: &BionicId,
        path: &mut Vec<BionicId>,
        acyclic: &mut HashSet<BionicId>,
        flagged: &mut HashSet<BionicId>,
        warnings: &mut Vec<ContentWarning>,
    ) {
        if acyclic.contains(id) || flagged.contains(id) {
            return;
        }
        if path.contains(id) {
            if flagged.insert(id.clone()) {
                warnings.push(ContentWarning::IncludeCycle { bionic: id.clone() });
            }
            return;
        }
        let def = match self.defs.get(id) {
            Some(def) => def,
            None => return, // dangling include, reported separately
        };
        path.push(id.clone());
        for target in &def.included_bionics {
            self.walk_includes(target, path, acyclic, flagged, warnings);
        }
        path.pop();
        if !flagged.contains(id) {
            acyclic.insert(id.clone());
        }
    }

    /// Clear all loaded definitions and warnings.
    pub fn reset(&mut self) {
        self.defs.clear();
        self.ids.clear();
        self.load_warnings.clear();
    }

    /// Resolve an id. Valid for any id that passed `check`.
    pub fn get(&self, id: &BionicId) -> Result<&BionicDefinition, BionicError> {
        self.defs
            .get(id)
            .ok_or_else(|| BionicError::UnknownDefinition(id.clone()))
    }

    pub fn get_opt(&self, id: &BionicId) -> Option<&BionicDefinition> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &BionicId) -> bool {
        self.defs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Ids in load order.
    pub fn ids(&self) -> impl Iterator<Item = &BionicId> {
        self.ids.iter()
    }

    /// Definitions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &BionicDefinition> {
        self.ids.iter().map(move |id| &self.defs[id])
    }
}
