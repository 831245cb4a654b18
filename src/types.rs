//! Core identifier types for the bionics system
//!
//! Content-authored identifiers are string tags (e.g. `bio_flashlight`);
//! they are kept symbolic so instances never hold references into the
//! registry across content reloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bionic definition (e.g. "bio_power_storage").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BionicId(pub String);

impl BionicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BionicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a character trait/mutation (e.g. "HYPEROPIC").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitId(pub String);

impl TraitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an item definition (e.g. "bio_laser_gun").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body parts that bionics can occupy.
///
/// Content files use the token form (`"arm_l"`); display uses the
/// human-readable name ("left arm").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Eyes,
    Mouth,
    Torso,
    ArmL,
    ArmR,
    HandL,
    HandR,
    LegL,
    LegR,
    FootL,
    FootR,
}

impl BodyPart {
    /// All body parts in canonical order.
    pub fn all() -> &'static [BodyPart] {
        &[
            BodyPart::Head, BodyPart::Eyes, BodyPart::Mouth, BodyPart::Torso,
            BodyPart::ArmL, BodyPart::ArmR, BodyPart::HandL, BodyPart::HandR,
            BodyPart::LegL, BodyPart::LegR, BodyPart::FootL, BodyPart::FootR,
        ]
    }

    /// Content-file token for this part.
    pub fn token(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Eyes => "eyes",
            BodyPart::Mouth => "mouth",
            BodyPart::Torso => "torso",
            BodyPart::ArmL => "arm_l",
            BodyPart::ArmR => "arm_r",
            BodyPart::HandL => "hand_l",
            BodyPart::HandR => "hand_r",
            BodyPart::LegL => "leg_l",
            BodyPart::LegR => "leg_r",
            BodyPart::FootL => "foot_l",
            BodyPart::FootR => "foot_r",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Eyes => "eyes",
            BodyPart::Mouth => "mouth",
            BodyPart::Torso => "torso",
            BodyPart::ArmL => "left arm",
            BodyPart::ArmR => "right arm",
            BodyPart::HandL => "left hand",
            BodyPart::HandR => "right hand",
            BodyPart::LegL => "left leg",
            BodyPart::LegR => "right leg",
            BodyPart::FootL => "left foot",
            BodyPart::FootR => "right foot",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
