//! Installable bionic augmentations for a character simulation
//!
//! Models cybernetic bionics as static, content-authored definitions plus
//! per-character runtime state: installed instances, activation, and
//! periodic power draw against the character's energy pool.
//!
//! # Module Structure
//!
//! - `types`: Identifier newtypes and the `BodyPart` enum
//! - `definition`: Static definitions, content records, activation modes
//! - `registry`: Definition registry with load/finalize/check/reset
//! - `slots`: Body-part slot occupancy and install feasibility
//! - `instance`: One installed bionic's runtime state
//! - `collection`: Per-character instance collection and install workflow
//! - `activation`: Activation state machine and per-tick power maintenance
//! - `character`: Character-side collaborators (anatomy, power, traits)
//! - `events`: In-game bionic event log
//! - `persistence`: Versioned save/load of installed bionics
//! - `error`: Gameplay-tier errors
//!
//! # Usage
//!
//! ```ignore
//! use bionics::{Anatomy, BionicCollection, BionicRegistry, PowerBank, TraitSet};
//!
//! let registry = BionicRegistry::defaults();
//! let mut bionics = BionicCollection::new();
//! let mut power = PowerBank::new(0);
//! bionics.install(&id, &registry, &anatomy, &mut traits, &taken)?;
//! power.set_capacity(bionics.power_capacity(&registry));
//! ```

pub mod activation;
pub mod character;
pub mod collection;
pub mod definition;
pub mod error;
pub mod events;
pub mod instance;
pub mod persistence;
pub mod registry;
pub mod slots;
pub mod types;

// Re-export main types for convenience
pub use activation::{ActivationOutcome, TickEvent};
pub use character::{Anatomy, PowerBank, TraitSet};
pub use collection::BionicCollection;
pub use definition::{ActivationMode, BionicDefinition, BionicRecord, BionicsFile};
pub use error::BionicError;
pub use events::{BionicEvent, BionicLog};
pub use instance::BionicInstance;
pub use registry::{BionicRegistry, ContentWarning, LoadError};
pub use slots::{check_installation, describe_occupancy, occupied_slots, SlotOverflow};
pub use types::{BionicId, BodyPart, ItemId, TraitId};
