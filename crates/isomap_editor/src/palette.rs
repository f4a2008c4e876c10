//! In-memory tile palette used by the sample tool

use bevy::prelude::Resource;
use isomap_core::{Layer, Tile, TileGrab, TileId, TilePalette};
use std::collections::{BTreeSet, HashMap};

/// Known tile ids per layer and the entry currently selected
#[derive(Resource, Debug, Default)]
pub struct TilesetPalette {
    entries: HashMap<Layer, BTreeSet<TileId>>,
    selected: Option<Tile>,
}

impl TilesetPalette {
    /// Register ids for `layer`. Empty tiles are never palette entries.
    pub fn insert(&mut self, layer: Layer, ids: impl IntoIterator<Item = TileId>) {
        let entries = self.entries.entry(layer).or_default();
        entries.extend(ids.into_iter().filter(|id| !layer.is_empty_tile(*id)));
    }

    pub fn contains(&self, layer: Layer, id: TileId) -> bool {
        self.entries
            .get(&layer)
            .is_some_and(|entries| entries.contains(&id))
    }

    /// Ids on `layer` in ascending order
    pub fn ids(&self, layer: Layer) -> impl Iterator<Item = TileId> + '_ {
        self.entries.get(&layer).into_iter().flatten().copied()
    }

    pub fn selected(&self) -> Option<Tile> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected = None;
    }
}

impl TilePalette for TilesetPalette {
    fn select(&mut self, layer: Layer, id: TileId) -> Option<TileGrab> {
        if !self.contains(layer, id) {
            return None;
        }
        self.selected = Some(Tile::new(layer, id));
        Some(TileGrab::single(layer, id))
    }
}
