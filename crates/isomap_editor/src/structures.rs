//! Library of named multi-cell structures
//!
//! Structures are plain [`TileGrab`]s stored by name in a JSON file. Picking
//! one makes it the active grab; the active selection can be stored as a new
//! structure.

use bevy::prelude::Resource;
use isomap_core::{StructureSource, TileGrab};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Structure name is empty")]
    EmptyName,
    #[error("Structure '{0}' holds no tiles")]
    EmptyStructure(String),
}

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureCatalog {
    structures: BTreeMap<String, TileGrab>,
}

impl StructureCatalog {
    pub fn load(path: &Path) -> Result<Self, StructureError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(StructureError::Parse)
    }

    pub fn save(&self, path: &Path) -> Result<(), StructureError> {
        let content = serde_json::to_string_pretty(self).map_err(StructureError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Store `grab` under `name`, replacing any structure with that name.
    /// The stored copy is anchored at the origin.
    pub fn insert(&mut self, name: &str, grab: &TileGrab) -> Result<(), StructureError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StructureError::EmptyName);
        }
        if grab.is_empty() {
            return Err(StructureError::EmptyStructure(name.to_string()));
        }
        let mut stored = grab.clone();
        stored.x = 0;
        stored.y = 0;
        self.structures.insert(name.to_string(), stored);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<TileGrab> {
        self.structures.remove(name)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl StructureSource for StructureCatalog {
    fn structure_names(&self) -> Vec<String> {
        self.structures.keys().cloned().collect()
    }

    fn structure(&self, name: &str) -> Option<TileGrab> {
        self.structures.get(name).cloned()
    }
}
