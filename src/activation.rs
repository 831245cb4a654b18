//! Activation state machine and per-tick power maintenance
//!
//! Activation resolves against the definition's `ActivationMode` and
//! returns an outcome value; external collaborators (weapon fire, the item
//! system, one-shot effects) act on the outcome. The core never reaches
//! into those systems itself.

use crate::character::PowerBank;
use crate::collection::BionicCollection;
use crate::definition::ActivationMode;
use crate::error::BionicError;
use crate::registry::BionicRegistry;
use crate::types::{BionicId, ItemId};

/// What an activation or deactivation accomplished, and what the caller
/// must now do about it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Fire this item through the weapon-fire collaborator; the fire
    /// action's own cost model applies.
    Fired { item: ItemId },
    /// Spawn this item in the character's hands.
    WeaponDrawn { item: ItemId },
    /// Remove this item from the character's hands.
    WeaponStowed { item: ItemId },
    /// A toggled bionic switched on.
    Activated,
    /// A one-shot bionic pulsed; apply its effect now.
    Pulsed,
    /// A toggled or weapon bionic switched off.
    Deactivated,
    /// Nothing to do (e.g. deactivating an already-inactive bionic).
    NoEffect,
}

/// Power-maintenance events from one tick, for the caller to surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// A toggled bionic shut itself off: the pool could not cover its
    /// periodic draw.
    ShutOff(BionicId),
    /// A passive bionic's effect lapsed this tick for want of power; it
    /// stays installed and retries next tick.
    Lapsed(BionicId),
}

impl BionicCollection {
    /// Activate an installed bionic.
    ///
    /// Costs are deducted atomically: a failed activation spends nothing
    /// and changes no state. Deactivating by re-activating a toggled
    /// bionic is never blocked by an empty pool.
    pub fn activate(
        &mut self,
        id: &BionicId,
        registry: &BionicRegistry,
        power: &mut PowerBank,
    ) -> Result<ActivationOutcome, BionicError> {
        let def = registry.get(id)?;
        let instance = self
            .get_mut(id)
            .ok_or_else(|| BionicError::NotInstalled(id.clone()))?;

        if def.faulty {
            return Err(BionicError::FaultyBionic(id.clone()));
        }

        match &def.mode {
            ActivationMode::Gun(item) => Ok(ActivationOutcome::Fired { item: item.clone() }),
            ActivationMode::Weapon(item) => {
                instance.powered = !instance.powered;
                if instance.powered {
                    Ok(ActivationOutcome::WeaponDrawn { item: item.clone() })
                } else {
                    Ok(ActivationOutcome::WeaponStowed { item: item.clone() })
                }
            }
            ActivationMode::Toggled => {
                if !instance.powered {
                    if !power.try_deduct(def.power_activate) {
                        return Err(BionicError::InsufficientPower {
                            bionic: id.clone(),
                            needed: def.power_activate,
                        });
                    }
                    instance.powered = true;
                    instance.charge = def.charge_time;
                    Ok(ActivationOutcome::Activated)
                } else {
                    power.deduct_upto(def.power_deactivate);
                    instance.powered = false;
                    instance.charge = 0;
                    Ok(ActivationOutcome::Deactivated)
                }
            }
            ActivationMode::Pulse => {
                if !power.try_deduct(def.power_activate) {
                    return Err(BionicError::InsufficientPower {
                        bionic: id.clone(),
                        needed: def.power_activate,
                    });
                }
                Ok(ActivationOutcome::Pulsed)
            }
            ActivationMode::Passive => Err(BionicError::NotActivatable(id.clone())),
        }
    }

    /// Switch an installed bionic off.
    ///
    /// Never blocked: the deactivation cost is deducted only as far as the
    /// pool allows. Inactive instances are a no-op.
    pub fn deactivate(
        &mut self,
        id: &BionicId,
        registry: &BionicRegistry,
        power: &mut PowerBank,
    ) -> Result<ActivationOutcome, BionicError> {
        let def = registry.get(id)?;
        let instance = self
            .get_mut(id)
            .ok_or_else(|| BionicError::NotInstalled(id.clone()))?;

        match &def.mode {
            ActivationMode::Weapon(item) if instance.powered => {
                instance.powered = false;
                Ok(ActivationOutcome::WeaponStowed { item: item.clone() })
            }
            ActivationMode::Toggled if instance.powered => {
                power.deduct_upto(def.power_deactivate);
                instance.powered = false;
                instance.charge = 0;
                Ok(ActivationOutcome::Deactivated)
            }
            _ => Ok(ActivationOutcome::NoEffect),
        }
    }

    /// Per-turn power maintenance, driven once per character per tick.
    ///
    /// Every instance with a currently-active effect (toggled and powered,
    /// passive always, or a power source) and a non-zero `charge_time`
    /// counts down; at zero it attempts its periodic draw. A draw the pool
    /// cannot cover shuts a toggled bionic off and lapses a passive one.
    pub fn tick(&mut self, registry: &BionicRegistry, power: &mut PowerBank) -> Vec<TickEvent> {
        let mut events = Vec::new();

        for instance in self.iter_mut() {
            let def = match registry.get_opt(&instance.id) {
                Some(def) => def,
                None => continue, // dangling id survives until content is fixed
            };

            let effect_active = match def.mode {
                ActivationMode::Toggled => instance.powered,
                ActivationMode::Passive => true,
                _ => false,
            } || def.power_source;

            if !effect_active || !def.has_periodic_draw() {
                continue;
            }

            if instance.charge > 0 {
                instance.charge -= 1;
            }
            if instance.charge == 0 {
                if power.try_deduct(def.power_over_time) {
                    instance.charge = def.charge_time;
                } else if def.mode == ActivationMode::Toggled {
                    instance.powered = false;
                    events.push(TickEvent::ShutOff(instance.id.clone()));
                } else {
                    events.push(TickEvent::Lapsed(instance.id.clone()));
                }
            }
        }

        events
    }
}
