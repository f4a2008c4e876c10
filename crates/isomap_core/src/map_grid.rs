//! The three co-dimensioned layer grids of one map

use crate::grid::{validate_dimensions, DimensionError, Grid, GridView, GridViewMut};
use crate::{Layer, LayerMask, Tile, TileId};

/// Background, left foreground and right foreground grids sharing one size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGrid {
    width: u32,
    height: u32,
    layers: [Grid; 3],
}

impl MapGrid {
    /// Create a blank map with every cell empty on every layer
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        Ok(Self {
            width,
            height,
            layers: [
                Grid::new(Layer::Background, width, height)?,
                Grid::new(Layer::LeftForeground, width, height)?,
                Grid::new(Layer::RightForeground, width, height)?,
            ],
        })
    }

    /// Assemble a map from row-major cell data for each layer
    pub fn from_layers(
        width: u32,
        height: u32,
        background: Vec<TileId>,
        left: Vec<TileId>,
        right: Vec<TileId>,
    ) -> Result<Self, DimensionError> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            layers: [
                Grid::from_cells(Layer::Background, width, height, background)?,
                Grid::from_cells(Layer::LeftForeground, width, height, left)?,
                Grid::from_cells(Layer::RightForeground, width, height, right)?,
            ],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the signed tile coordinate lies on the map
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn grid(&self, layer: Layer) -> &Grid {
        &self.layers[layer.index()]
    }

    pub fn grid_mut(&mut self, layer: Layer) -> &mut Grid {
        &mut self.layers[layer.index()]
    }

    /// Tile id on `layer` at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, layer: Layer, x: u32, y: u32) -> TileId {
        self.grid(layer).get(x, y)
    }

    /// Tile value on `layer` at `(x, y)`. Panics when out of bounds.
    pub fn tile(&self, layer: Layer, x: u32, y: u32) -> Tile {
        self.grid(layer).tile(x, y)
    }

    /// Set the tile id on `layer` at `(x, y)`. Panics when out of bounds.
    pub fn set(&mut self, layer: Layer, x: u32, y: u32, id: TileId) {
        self.grid_mut(layer).set(x, y, id);
    }

    pub fn view(&self, layer: Layer, x: u32, y: u32, width: u32, height: u32) -> GridView<'_> {
        self.grid(layer).view(x, y, width, height)
    }

    pub fn view_mut(
        &mut self,
        layer: Layer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> GridViewMut<'_> {
        self.grid_mut(layer).view_mut(x, y, width, height)
    }

    /// Raise the dirty flag on every layer in `mask`
    pub fn mark_dirty(&mut self, mask: LayerMask) {
        for layer in mask.layers() {
            self.grid_mut(layer).mark_dirty();
        }
    }

    /// Layers currently flagged dirty, without clearing them
    pub fn dirty_layers(&self) -> Vec<Layer> {
        Layer::ALL
            .into_iter()
            .filter(|layer| self.grid(*layer).is_dirty())
            .collect()
    }

    /// Clear every dirty flag, returning the layers that were dirty
    pub fn take_dirty(&mut self) -> Vec<Layer> {
        Layer::ALL
            .into_iter()
            .filter(|layer| self.grid_mut(*layer).take_dirty())
            .collect()
    }

    /// Build a new map of the given size, keeping the overlapping top-left region
    pub fn resized(&self, width: u32, height: u32) -> Result<Self, DimensionError> {
        let mut resized = MapGrid::new(width, height)?;
        let keep_w = self.width.min(width);
        let keep_h = self.height.min(height);
        for layer in Layer::ALL {
            let source = self.view(layer, 0, 0, keep_w, keep_h);
            let mut target = resized.view_mut(layer, 0, 0, keep_w, keep_h);
            for (y, row) in source.rows().enumerate() {
                for (x, id) in row.iter().enumerate() {
                    target.set(x as u32, y as u32, *id);
                }
            }
        }
        Ok(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_grid() {
        let map = MapGrid::new(10, 8).unwrap();
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 8);
        for layer in Layer::ALL {
            assert_eq!(map.grid(layer).width(), 10);
            assert_eq!(map.grid(layer).height(), 8);
            assert_eq!(map.grid(layer).occupied(), 0);
        }
    }

    #[test]
    fn test_layers_are_independent() {
        let mut map = MapGrid::new(4, 4).unwrap();
        map.set(Layer::LeftForeground, 1, 2, 5);
        assert_eq!(map.get(Layer::LeftForeground, 1, 2), 5);
        assert_eq!(map.get(Layer::Background, 1, 2), 0);
        assert_eq!(map.get(Layer::RightForeground, 1, 2), 0);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut map = MapGrid::new(4, 4).unwrap();
        assert_eq!(map.take_dirty().len(), 3);
        assert!(map.take_dirty().is_empty());

        map.set(Layer::RightForeground, 0, 0, 1);
        map.set(Layer::RightForeground, 1, 0, 1);
        assert_eq!(map.dirty_layers(), vec![Layer::RightForeground]);
        assert_eq!(map.take_dirty(), vec![Layer::RightForeground]);

        map.mark_dirty(LayerMask::Foreground);
        assert_eq!(
            map.take_dirty(),
            vec![Layer::LeftForeground, Layer::RightForeground]
        );
    }

    #[test]
    fn test_resized_keeps_overlap() {
        let mut map = MapGrid::new(4, 4).unwrap();
        map.set(Layer::Background, 1, 1, 7);
        map.set(Layer::Background, 3, 3, 8);

        let smaller = map.resized(2, 3).unwrap();
        assert_eq!(smaller.width(), 2);
        assert_eq!(smaller.get(Layer::Background, 1, 1), 7);

        let larger = map.resized(6, 5).unwrap();
        assert_eq!(larger.get(Layer::Background, 3, 3), 8);
        assert_eq!(larger.get(Layer::Background, 5, 4), 0);

        assert!(map.resized(0, 3).is_err());
    }
}
