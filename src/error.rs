//! Gameplay-time bionic errors
//!
//! These abort a single requested operation, leave all state unchanged,
//! and render as in-game messages. Content-integrity problems are a
//! separate tier (see `registry::ContentWarning`).

use std::fmt;

use crate::slots::SlotOverflow;
use crate::types::BionicId;

/// A recoverable failure of one install/uninstall/activation request.
#[derive(Clone, Debug, PartialEq)]
pub enum BionicError {
    /// The id does not resolve to any loaded definition.
    UnknownDefinition(BionicId),
    /// The character already has this bionic and it does not permit duplicates.
    AlreadyInstalled(BionicId),
    /// The character does not have this bionic.
    NotInstalled(BionicId),
    /// Installing would exceed body-part slot capacity.
    SlotsExceeded {
        bionic: BionicId,
        overflows: Vec<SlotOverflow>,
    },
    /// The energy pool cannot cover the activation cost.
    InsufficientPower { bionic: BionicId, needed: u32 },
    /// Faulty bionics never successfully activate.
    FaultyBionic(BionicId),
    /// The bionic is passive and has no activation.
    NotActivatable(BionicId),
}

impl fmt::Display for BionicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BionicError::UnknownDefinition(id) => {
                write!(f, "unknown bionic: {}", id)
            }
            BionicError::AlreadyInstalled(id) => {
                write!(f, "{} is already installed", id)
            }
            BionicError::NotInstalled(id) => {
                write!(f, "{} is not installed", id)
            }
            BionicError::SlotsExceeded { bionic, overflows } => {
                let parts: Vec<String> = overflows
                    .iter()
                    .map(|o| format!("{} ({}/{} slots)", o.part, o.required, o.capacity))
                    .collect();
                write!(f, "not enough room to install {}: {}", bionic, parts.join(", "))
            }
            BionicError::InsufficientPower { bionic, needed } => {
                write!(f, "not enough power to activate {} ({} needed)", bionic, needed)
            }
            BionicError::FaultyBionic(id) => {
                write!(f, "{} is faulty and does not respond", id)
            }
            BionicError::NotActivatable(id) => {
                write!(f, "{} cannot be activated", id)
            }
        }
    }
}

impl std::error::Error for BionicError {}
