//! Static bionic definitions and the content records they load from
//!
//! A `BionicRecord` is the authored JSON form; `BionicDefinition` is the
//! resolved in-memory form, immutable once the registry is finalized. The
//! activation mode is derived once here from the behavior flags instead of
//! being re-derived from booleans on every activation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::registry::ContentWarning;
use crate::types::{BionicId, BodyPart, ItemId, TraitId};

/// How a bionic responds to activation, resolved from the behavior flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationMode {
    /// Activation fires the carried gun item; no power/charge state changes.
    Gun(ItemId),
    /// Activation manifests or stows the carried weapon item in the
    /// character's hands; `powered` tracks manifestation.
    Weapon(ItemId),
    /// Activation toggles a sustained effect with periodic power draw.
    Toggled,
    /// Activation is a one-shot pulse; the instance is never observably active.
    Pulse,
    /// Always on while installed; activation is meaningless.
    Passive,
}

impl ActivationMode {
    pub fn label(&self) -> &'static str {
        match self {
            ActivationMode::Gun(_) => "gun",
            ActivationMode::Weapon(_) => "weapon",
            ActivationMode::Toggled => "toggled",
            ActivationMode::Pulse => "pulse",
            ActivationMode::Passive => "passive",
        }
    }
}

/// A single bionic definition as authored in a content file.
///
/// Every field but `id` falls back to its default when absent, so sparse
/// or partially-written mod records still load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BionicRecord {
    pub id: BionicId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub power_activate: u32,
    #[serde(default)]
    pub power_deactivate: u32,
    #[serde(default)]
    pub power_over_time: u32,
    #[serde(default)]
    pub charge_time: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub npc_usable: bool,
    #[serde(default)]
    pub faulty: bool,
    #[serde(default)]
    pub power_source: bool,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub toggled: bool,
    #[serde(default)]
    pub gun_bionic: bool,
    #[serde(default)]
    pub weapon_bionic: bool,
    #[serde(default)]
    pub armor_interface: bool,
    #[serde(default)]
    pub dupes_ok: bool,
    #[serde(default)]
    pub occupied_bodyparts: Vec<(BodyPart, u32)>,
    #[serde(default)]
    pub fake_item: Option<ItemId>,
    #[serde(default)]
    pub canceled_mutations: Vec<TraitId>,
    #[serde(default)]
    pub included_bionics: Vec<BionicId>,
    #[serde(default)]
    pub upgraded_bionic: Option<BionicId>,
}

/// Container for a bionics content file: `{ "bionics": [ ... ] }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BionicsFile {
    pub bionics: Vec<BionicRecord>,
}

/// A resolved bionic definition.
///
/// `available_upgrades` is derived by the registry's finalize pass and never
/// authored; everything else mirrors the loaded record.
#[derive(Clone, Debug, PartialEq)]
pub struct BionicDefinition {
    pub id: BionicId,
    pub name: String,
    pub description: String,
    /// Power cost on activation.
    pub power_activate: u32,
    /// Power cost on deactivation.
    pub power_deactivate: u32,
    /// Power cost over time; does nothing without a non-zero charge_time.
    pub power_over_time: u32,
    /// How often the bionic draws power while active, in turns.
    pub charge_time: u32,
    /// Power bank size contributed while installed (power sources only).
    pub capacity: u32,
    pub npc_usable: bool,
    pub faulty: bool,
    pub power_source: bool,
    pub activated: bool,
    pub toggled: bool,
    pub gun_bionic: bool,
    pub weapon_bionic: bool,
    /// Can provide power to powered armor.
    pub armor_interface: bool,
    /// Whether a character may install more than one copy.
    pub dupes_ok: bool,
    /// Body part slots required to install, in declaration order.
    pub occupied_bodyparts: Vec<(BodyPart, u32)>,
    /// Fake item created for crafting access; also the gun/weapon item.
    pub fake_item: Option<ItemId>,
    /// Traits removed from the character upon install.
    pub canceled_mutations: Vec<TraitId>,
    /// Bionics installed automatically alongside this one.
    pub included_bionics: Vec<BionicId>,
    /// The bionic this one upgrades.
    pub upgraded_bionic: Option<BionicId>,
    /// Bionics that upgrade this one; rebuilt by finalize.
    pub available_upgrades: BTreeSet<BionicId>,
    /// Activation behavior, resolved once from the flags.
    pub mode: ActivationMode,
}

impl BionicDefinition {
    /// Build a definition from an authored record.
    ///
    /// Content problems that can be repaired in place (duplicate body
    /// parts, a gun/weapon flag without its item) are repaired and pushed
    /// onto `warnings` so the game keeps running with degraded content.
    pub fn from_record(record: BionicRecord, warnings: &mut Vec<ContentWarning>) -> Self {
        let mut occupied: Vec<(BodyPart, u32)> = Vec::new();
        for &(part, slots) in &record.occupied_bodyparts {
            match occupied.iter_mut().find(|(p, _)| *p == part) {
                Some((_, total)) => {
                    *total += slots;
                    warnings.push(ContentWarning::DuplicateBodyPart {
                        bionic: record.id.clone(),
                        part,
                    });
                }
                None => occupied.push((part, slots)),
            }
        }

        let mode = derive_mode(&record);

        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            power_activate: record.power_activate,
            power_deactivate: record.power_deactivate,
            power_over_time: record.power_over_time,
            charge_time: record.charge_time,
            capacity: record.capacity,
            npc_usable: record.npc_usable,
            faulty: record.faulty,
            power_source: record.power_source,
            activated: record.activated,
            toggled: record.toggled,
            gun_bionic: record.gun_bionic,
            weapon_bionic: record.weapon_bionic,
            armor_interface: record.armor_interface,
            dupes_ok: record.dupes_ok,
            occupied_bodyparts: occupied,
            fake_item: record.fake_item,
            canceled_mutations: record.canceled_mutations,
            included_bionics: record.included_bionics,
            upgraded_bionic: record.upgraded_bionic,
            available_upgrades: BTreeSet::new(),
            mode,
        }
    }

    /// Whether `id` is auto-installed alongside this bionic.
    pub fn is_included(&self, id: &BionicId) -> bool {
        self.included_bionics.contains(id)
    }

    /// Slot demand on one body part.
    pub fn occupies(&self, part: BodyPart) -> u32 {
        self.occupied_bodyparts
            .iter()
            .find(|(p, _)| *p == part)
            .map(|(_, slots)| *slots)
            .unwrap_or(0)
    }

    /// Whether the active effect draws power periodically.
    pub fn has_periodic_draw(&self) -> bool {
        self.charge_time > 0
    }
}

/// Resolve the activation mode from the behavior flags, in precedence
/// order: gun, weapon, toggled, pulse, passive.
///
/// A gun/weapon flag without a fake item is dead content; the definition
/// degrades to passive and `check` reports it.
fn derive_mode(record: &BionicRecord) -> ActivationMode {
    if record.gun_bionic {
        if let Some(item) = &record.fake_item {
            return ActivationMode::Gun(item.clone());
        }
        return ActivationMode::Passive;
    }
    if record.weapon_bionic {
        if let Some(item) = &record.fake_item {
            return ActivationMode::Weapon(item.clone());
        }
        return ActivationMode::Passive;
    }
    if record.activated {
        if record.toggled {
            ActivationMode::Toggled
        } else {
            ActivationMode::Pulse
        }
    } else {
        ActivationMode::Passive
    }
}
