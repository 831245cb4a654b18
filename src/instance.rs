//! Installed bionic instances
//!
//! An instance is one character's copy of a definition: runtime charge,
//! power state, and inventory hotkey. It references the definition by id
//! only, so content reloads cannot leave it holding a stale pointer.

use serde::{Deserialize, Serialize};

use crate::types::BionicId;

/// One installed bionic on one character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BionicInstance {
    /// Key into the definition registry.
    pub id: BionicId,
    /// Ticks until the next periodic power draw while active.
    pub charge: u32,
    /// Inventory hotkey, unique within the owning collection.
    pub invlet: char,
    /// Whether the instance is currently in its active state.
    pub powered: bool,
}

impl BionicInstance {
    pub fn new(id: BionicId, invlet: char) -> Self {
        Self {
            id,
            charge: 0,
            invlet,
            powered: false,
        }
    }
}
