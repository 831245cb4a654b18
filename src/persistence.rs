//! Save/load of a character's installed bionics
//!
//! Provides save/load of a BionicCollection to bincode files with a format
//! version for forward compatibility. Loading validates every stored id
//! against the registry: an unknown id surfaces a dangling-reference error
//! instead of handing the caller a corrupted collection.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collection::BionicCollection;
use crate::registry::BionicRegistry;
use crate::types::BionicId;

const SAVE_VERSION: u32 = 1;

/// Wrapper for the save file format.
#[derive(Serialize, Deserialize)]
struct BionicSaveFile {
    /// Format version for forward compatibility
    version: u32,
    /// The character's installed bionics
    bionics: BionicCollection,
}

/// Errors that can occur during save/load operations.
#[derive(Debug)]
pub enum SaveError {
    /// IO error (file not found, permissions, etc.)
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
    /// Deserialization error (corrupted file)
    Deserialization(String),
    /// The file was written by an incompatible format version
    VersionMismatch { found: u32, expected: u32 },
    /// A stored instance references a definition the registry no longer has
    DanglingReference(BionicId),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Serialization(e) => write!(f, "Serialization error: {}", e),
            SaveError::Deserialization(e) => write!(f, "Deserialization error: {}", e),
            SaveError::VersionMismatch { found, expected } => {
                write!(f, "Save version {} (expected {})", found, expected)
            }
            SaveError::DanglingReference(id) => {
                write!(f, "Saved bionic {} no longer exists", id)
            }
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

/// Save a character's bionics to a binary file using bincode.
pub fn save_bionics(collection: &BionicCollection, path: &Path) -> Result<(), SaveError> {
    let save = BionicSaveFile {
        version: SAVE_VERSION,
        bionics: collection.clone(),
    };
    let bytes =
        bincode::serialize(&save).map_err(|e| SaveError::Serialization(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a character's bionics, validating every id against the registry.
///
/// Fails with [`SaveError::DanglingReference`] if the file references a
/// definition that was removed since the save was written (e.g. a mod was
/// disabled); the collection is not returned in that case.
pub fn load_bionics(path: &Path, registry: &BionicRegistry) -> Result<BionicCollection, SaveError> {
    let bytes = fs::read(path)?;
    let save: BionicSaveFile =
        bincode::deserialize(&bytes).map_err(|e| SaveError::Deserialization(e.to_string()))?;

    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            found: save.version,
            expected: SAVE_VERSION,
        });
    }
    for instance in save.bionics.iter() {
        if !registry.contains(&instance.id) {
            return Err(SaveError::DanglingReference(instance.id.clone()));
        }
    }
    Ok(save.bionics)
}
