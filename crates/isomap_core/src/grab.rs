//! Rectangular multi-layer tile snapshots.
//!
//! A [`TileGrab`] is the clipboard, the stamp painted by the draw tool and the
//! payload of every undo record. It keeps one flat, row-major id list per
//! layer it captured; a layer counts as present exactly when its list is
//! non-empty.
//!
//! The declared rectangle (`width` x `height`) is whatever was requested, but
//! a region that ran off the right or bottom edge of the map only copies the
//! cells that exist. The lists are then shorter than `width * height` and are
//! laid out with [`TileGrab::columns`] entries per row, so anything that walks
//! a grab iterates the populated lists rather than the declared rectangle.

use crate::iso::TileCoord;
use crate::{Layer, LayerMask, MapGrid, TileId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileGrab {
    /// Map column of the top-left cell when captured from a region
    pub x: u32,
    /// Map row of the top-left cell when captured from a region
    pub y: u32,
    /// Declared width in tiles
    pub width: u32,
    /// Declared height in tiles
    pub height: u32,
    /// Cells per row actually stored in the lists
    columns: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    background: Vec<TileId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    left: Vec<TileId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    right: Vec<TileId>,
}

impl TileGrab {
    /// Copy `[x, x + width) x [y, y + height)` of every layer in `mask`.
    ///
    /// The declared size stays `width` x `height` even when the map edge clips
    /// the copy.
    pub fn from_region(
        map: &MapGrid,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        mask: LayerMask,
    ) -> Self {
        let columns = width.min(map.width().saturating_sub(x));
        let rows = height.min(map.height().saturating_sub(y));

        let mut grab = Self {
            x,
            y,
            width,
            height,
            columns,
            ..Default::default()
        };
        if columns == 0 || rows == 0 {
            return grab;
        }

        for layer in mask.layers() {
            let view = map.view(layer, x, y, columns, rows);
            *grab.list_mut(layer) = view.rows().flatten().copied().collect();
        }
        grab
    }

    /// The 1x1 grab under a single click
    pub fn from_single_tile(map: &MapGrid, x: u32, y: u32, mask: LayerMask) -> Self {
        Self::from_region(map, x, y, 1, 1, mask)
    }

    /// Rectangle spanned by a drag from `start` to `current`, freshly read from
    /// the map. Corners may come in any order; off-map corners are clamped.
    pub fn from_drag(map: &MapGrid, start: TileCoord, current: TileCoord, mask: LayerMask) -> Self {
        let max_x = map.width() as i32 - 1;
        let max_y = map.height() as i32 - 1;
        let left = start.x.min(current.x).clamp(0, max_x);
        let right = start.x.max(current.x).clamp(0, max_x);
        let top = start.y.min(current.y).clamp(0, max_y);
        let bottom = start.y.max(current.y).clamp(0, max_y);

        Self::from_region(
            map,
            left as u32,
            top as u32,
            (right - left + 1) as u32,
            (bottom - top + 1) as u32,
            mask,
        )
    }

    /// A 1x1 grab holding one tile on one layer
    pub fn single(layer: Layer, id: TileId) -> Self {
        let mut grab = Self {
            width: 1,
            height: 1,
            columns: 1,
            ..Default::default()
        };
        *grab.list_mut(layer) = vec![id];
        grab
    }

    /// Build a grab from explicit row-major lists. Each list must be empty or
    /// hold exactly `width * height` ids.
    pub fn from_layers(
        width: u32,
        height: u32,
        background: Vec<TileId>,
        left: Vec<TileId>,
        right: Vec<TileId>,
    ) -> Option<Self> {
        let len = (width * height) as usize;
        let fits = |list: &Vec<TileId>| list.is_empty() || list.len() == len;
        if !(fits(&background) && fits(&left) && fits(&right)) {
            return None;
        }
        Some(Self {
            x: 0,
            y: 0,
            width,
            height,
            columns: width,
            background,
            left,
            right,
        })
    }

    /// Cells per stored row
    pub fn columns(&self) -> u32 {
        self.columns
    }

    fn list(&self, layer: Layer) -> &Vec<TileId> {
        match layer {
            Layer::Background => &self.background,
            Layer::LeftForeground => &self.left,
            Layer::RightForeground => &self.right,
        }
    }

    fn list_mut(&mut self, layer: Layer) -> &mut Vec<TileId> {
        match layer {
            Layer::Background => &mut self.background,
            Layer::LeftForeground => &mut self.left,
            Layer::RightForeground => &mut self.right,
        }
    }

    /// Stored ids for `layer`, row-major with [`Self::columns`] per row
    pub fn ids(&self, layer: Layer) -> &[TileId] {
        self.list(layer)
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        !self.list(layer).is_empty()
    }

    pub fn has_background(&self) -> bool {
        self.has_layer(Layer::Background)
    }

    pub fn has_left(&self) -> bool {
        self.has_layer(Layer::LeftForeground)
    }

    pub fn has_right(&self) -> bool {
        self.has_layer(Layer::RightForeground)
    }

    /// Layers with stored data
    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        Layer::ALL
            .into_iter()
            .filter(move |layer| self.has_layer(*layer))
    }

    /// No layer holds any data
    pub fn is_empty(&self) -> bool {
        self.layers().next().is_none()
    }

    /// Stored cells of `layer` as `(dx, dy, id)` relative to the grab origin
    pub fn cells(&self, layer: Layer) -> impl Iterator<Item = (u32, u32, TileId)> + '_ {
        let columns = self.columns.max(1);
        self.list(layer)
            .iter()
            .enumerate()
            .map(move |(i, id)| (i as u32 % columns, i as u32 / columns, *id))
    }

    /// Stamp onto `map` with the top-left cell at `(anchor_x, anchor_y)`.
    ///
    /// Only layers both in `mask` and stored in the grab are touched. Cells
    /// landing off the map are skipped. Without `overwrite`, empty cells of the
    /// grab leave the destination alone; with it, they clear the destination.
    /// Returns the number of cells written.
    pub fn apply(
        &self,
        map: &mut MapGrid,
        anchor_x: i32,
        anchor_y: i32,
        mask: LayerMask,
        overwrite: bool,
    ) -> usize {
        let mut written = 0;
        for layer in mask.layers() {
            for (dx, dy, id) in self.cells(layer) {
                let x = anchor_x + dx as i32;
                let y = anchor_y + dy as i32;
                if !map.contains(x, y) {
                    continue;
                }
                if !overwrite && layer.is_empty_tile(id) {
                    continue;
                }
                map.set(layer, x as u32, y as u32, id);
                written += 1;
            }
        }
        written
    }

    /// Stamp back at the grab's own origin
    pub fn apply_in_place(&self, map: &mut MapGrid, mask: LayerMask, overwrite: bool) -> usize {
        self.apply(map, self.x as i32, self.y as i32, mask, overwrite)
    }

    /// Clear every stored cell position of the layers in `mask` to empty.
    /// Returns the number of cells cleared.
    pub fn erase(&self, map: &mut MapGrid, mask: LayerMask) -> usize {
        let mut cleared = 0;
        for layer in mask.layers() {
            for (dx, dy, _) in self.cells(layer) {
                let x = self.x as i32 + dx as i32;
                let y = self.y as i32 + dy as i32;
                if !map.contains(x, y) {
                    continue;
                }
                map.set(layer, x as u32, y as u32, layer.empty_tile());
                cleared += 1;
            }
        }
        cleared
    }

    /// Same shape and layers with every id set to its layer's empty tile
    pub fn cleared(&self) -> Self {
        let mut grab = self.clone();
        for layer in Layer::ALL {
            let empty = layer.empty_tile();
            grab.list_mut(layer).iter_mut().for_each(|id| *id = empty);
        }
        grab
    }

    /// Move a lone 1x1 foreground tile onto the `active` side.
    ///
    /// Applies only when the grab is exactly 1x1, `active` is a foreground
    /// layer, and the tile sits on the opposite side with `active` empty.
    /// Returns whether the tile moved.
    pub fn swap_foreground_side(&mut self, active: Layer) -> bool {
        let Some(other) = active.other_side() else {
            return false;
        };
        if self.width != 1 || self.height != 1 {
            return false;
        }
        if self.has_layer(active) || !self.has_layer(other) {
            return false;
        }
        let ids = std::mem::take(self.list_mut(other));
        *self.list_mut(active) = ids;
        true
    }
}
