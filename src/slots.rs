//! Body-part slot occupancy
//!
//! Sums slot demand across a set of installed definitions, validates a
//! hypothetical install against anatomy capacity, and renders occupancy
//! listings for the install UI.

use crate::character::Anatomy;
use crate::definition::BionicDefinition;
use crate::error::BionicError;
use crate::types::BodyPart;

/// One body part pushed past its capacity by a hypothetical install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotOverflow {
    pub part: BodyPart,
    /// Total slots demanded on the part, existing occupants included.
    pub required: u32,
    pub capacity: u32,
}

/// Total slot demand per body part across `defs`, in first-seen
/// declaration order.
pub fn occupied_slots<'a, I>(defs: I) -> Vec<(BodyPart, u32)>
where
    I: IntoIterator<Item = &'a BionicDefinition>,
{
    let mut totals: Vec<(BodyPart, u32)> = Vec::new();
    for def in defs {
        for (part, slots) in &def.occupied_bodyparts {
            match totals.iter_mut().find(|(p, _)| p == part) {
                Some((_, total)) => *total += slots,
                None => totals.push((*part, *slots)),
            }
        }
    }
    totals
}

/// Check whether `candidate` fits alongside `installed` on this anatomy.
///
/// Fails with [`BionicError::SlotsExceeded`] naming every body part whose
/// summed demand would exceed its capacity.
pub fn check_installation<'a, I>(
    candidate: &'a BionicDefinition,
    installed: I,
    anatomy: &Anatomy,
) -> Result<(), BionicError>
where
    I: IntoIterator<Item = &'a BionicDefinition>,
{
    let totals = occupied_slots(installed.into_iter().chain(std::iter::once(candidate)));
    let overflows: Vec<SlotOverflow> = totals
        .into_iter()
        .filter(|(part, required)| *required > anatomy.capacity(*part))
        .map(|(part, required)| SlotOverflow {
            part,
            required,
            capacity: anatomy.capacity(part),
        })
        .collect();

    if overflows.is_empty() {
        Ok(())
    } else {
        Err(BionicError::SlotsExceeded {
            bionic: candidate.id.clone(),
            overflows,
        })
    }
}

/// Human-readable listing of a definition's occupied body parts.
///
/// Zero-demand parts are omitted and ordering follows the definition's
/// declaration order. Returns an empty string for a definition that
/// occupies nothing.
pub fn describe_occupancy(def: &BionicDefinition, intro: &str, multi_line: bool) -> String {
    let pairs: Vec<String> = def
        .occupied_bodyparts
        .iter()
        .filter(|(_, slots)| *slots > 0)
        .map(|(part, slots)| format!("{}: {}", part.display_name(), slots))
        .collect();

    if pairs.is_empty() {
        return String::new();
    }
    if multi_line {
        format!("{}\n{}", intro, pairs.join("\n"))
    } else {
        format!("{} {}", intro, pairs.join(", "))
    }
}
