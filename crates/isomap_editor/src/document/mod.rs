//! Open map documents
//!
//! Each document owns its grid and its undo history; they are mutated together
//! and nothing is shared between documents.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use isomap_core::{DimensionError, IsoTransform, MapGrid, TileGeometry};
use std::path::PathBuf;
use uuid::Uuid;

use crate::commands::{ActionKind, ActionLog};

/// One map being edited
#[derive(Debug)]
pub struct MapDocument {
    pub id: Uuid,
    pub name: String,
    pub path: Option<PathBuf>,
    pub map: MapGrid,
    pub history: ActionLog,
    pub geometry: TileGeometry,
    /// History revision at the last save
    saved_revision: u64,
}

impl MapDocument {
    /// A new blank map. Both sides must be in `1..=255`.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        geometry: TileGeometry,
    ) -> Result<Self, DimensionError> {
        Ok(Self::from_map(name, MapGrid::new(width, height)?, geometry))
    }

    pub fn from_map(name: impl Into<String>, map: MapGrid, geometry: TileGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path: None,
            map,
            history: ActionLog::new(),
            geometry,
            saved_revision: 0,
        }
    }

    /// Pixel/tile transform for the current size and geometry
    pub fn transform(&self) -> IsoTransform {
        IsoTransform::new(self.geometry, self.map.width(), self.map.height())
    }

    /// Whether the map changed since it was last saved or loaded
    pub fn is_modified(&self) -> bool {
        self.history.revision() != self.saved_revision
    }

    pub fn undo(&mut self) -> Option<ActionKind> {
        self.history.undo(&mut self.map)
    }

    pub fn redo(&mut self) -> Option<ActionKind> {
        self.history.redo(&mut self.map)
    }

    /// Replace the grid with a resized copy. Recorded edits refer to the old
    /// grid, so the history is dropped.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), DimensionError> {
        self.map = self.map.resized(width, height)?;
        self.history.clear();
        Ok(())
    }
}

/// All open documents, one of them active
#[derive(Resource, Default)]
pub struct OpenMaps {
    documents: Vec<MapDocument>,
    active: Option<Uuid>,
}

impl OpenMaps {
    /// Add a document and make it active. Returns its id.
    pub fn open(&mut self, document: MapDocument) -> Uuid {
        let id = document.id;
        self.documents.push(document);
        self.active = Some(id);
        id
    }

    /// Remove a document with its grid and history. The most recently opened
    /// remaining document becomes active if the closed one was.
    pub fn close(&mut self, id: Uuid) -> Option<MapDocument> {
        let index = self.documents.iter().position(|doc| doc.id == id)?;
        let document = self.documents.remove(index);
        if self.active == Some(id) {
            self.active = self.documents.last().map(|doc| doc.id);
        }
        Some(document)
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    /// Make `id` active; returns false if no such document is open
    pub fn set_active(&mut self, id: Uuid) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&MapDocument> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut MapDocument> {
        let id = self.active?;
        self.get_mut(id)
    }

    pub fn get(&self, id: Uuid) -> Option<&MapDocument> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut MapDocument> {
        self.documents.iter_mut().find(|doc| doc.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapDocument> {
        self.documents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MapDocument> {
        self.documents.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
