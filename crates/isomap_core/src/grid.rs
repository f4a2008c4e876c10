//! Dense single-layer tile storage and borrowed sub-rectangle views

use crate::{Layer, Tile, TileId};
use thiserror::Error;

/// Largest width or height a map may have
pub const MAX_DIMENSION: u32 = 255;

/// Rejected grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid map dimensions {width}x{height} (each side must be 1..={max})", max = MAX_DIMENSION)]
pub struct DimensionError {
    pub width: u32,
    pub height: u32,
}

/// Check that `width` x `height` is a legal map size
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), DimensionError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(DimensionError { width, height });
    }
    Ok(())
}

/// Row-major tile ids for one layer.
///
/// `cells.len() == width * height` always holds. Grids are never resized in
/// place; a resize builds a new grid. Every mutation raises the dirty flag,
/// which stays up until the render consumer clears it.
#[derive(Debug, Clone)]
pub struct Grid {
    layer: Layer,
    width: u32,
    height: u32,
    cells: Vec<TileId>,
    dirty: bool,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.layer == other.layer
            && self.width == other.width
            && self.height == other.height
            && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl Grid {
    /// Create a grid with every cell set to the layer's empty tile
    pub fn new(layer: Layer, width: u32, height: u32) -> Result<Self, DimensionError> {
        validate_dimensions(width, height)?;
        Ok(Self {
            layer,
            width,
            height,
            cells: vec![layer.empty_tile(); (width * height) as usize],
            dirty: true,
        })
    }

    /// Wrap existing row-major cell data
    pub fn from_cells(
        layer: Layer,
        width: u32,
        height: u32,
        cells: Vec<TileId>,
    ) -> Result<Self, DimensionError> {
        validate_dimensions(width, height)?;
        assert_eq!(
            cells.len(),
            (width * height) as usize,
            "cell data does not match {}x{} grid",
            width,
            height
        );
        Ok(Self {
            layer,
            width,
            height,
            cells,
            dirty: true,
        })
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell data
    pub fn cells(&self) -> &[TileId] {
        &self.cells
    }

    /// Whether the signed coordinate lies inside the grid
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "tile ({}, {}) out of bounds for {}x{} {} grid",
            x,
            y,
            self.width,
            self.height,
            self.layer.name()
        );
        (y * self.width + x) as usize
    }

    /// Tile id at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> TileId {
        self.cells[self.index(x, y)]
    }

    /// Tile id at `(x, y)`, or `None` when out of bounds
    pub fn try_get(&self, x: u32, y: u32) -> Option<TileId> {
        if x < self.width && y < self.height {
            Some(self.cells[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Tile value (id plus layer tag) at `(x, y)`. Panics when out of bounds.
    pub fn tile(&self, x: u32, y: u32) -> Tile {
        Tile::new(self.layer, self.get(x, y))
    }

    /// Set the tile id at `(x, y)`. Panics when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, id: TileId) {
        let index = self.index(x, y);
        self.cells[index] = id;
        self.dirty = true;
    }

    /// Reset every cell to the empty tile
    pub fn clear(&mut self) {
        let empty = self.layer.empty_tile();
        self.cells.fill(empty);
        self.dirty = true;
    }

    /// Number of non-empty cells
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .filter(|id| !self.layer.is_empty_tile(**id))
            .count()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn check_view(&self, x: u32, y: u32, width: u32, height: u32) {
        assert!(
            x + width <= self.width && y + height <= self.height,
            "view {}x{} at ({}, {}) out of bounds for {}x{} grid",
            width,
            height,
            x,
            y,
            self.width,
            self.height
        );
    }

    /// Borrow a sub-rectangle without copying. Panics if it leaves the grid.
    pub fn view(&self, x: u32, y: u32, width: u32, height: u32) -> GridView<'_> {
        self.check_view(x, y, width, height);
        GridView {
            cells: &self.cells,
            stride: self.width as usize,
            offset_x: x as usize,
            offset_y: y as usize,
            width,
            height,
        }
    }

    /// Mutably borrow a sub-rectangle without copying. Panics if it leaves the grid.
    pub fn view_mut(&mut self, x: u32, y: u32, width: u32, height: u32) -> GridViewMut<'_> {
        self.check_view(x, y, width, height);
        GridViewMut {
            cells: &mut self.cells,
            dirty: &mut self.dirty,
            stride: self.width as usize,
            offset_x: x as usize,
            offset_y: y as usize,
            width,
            height,
        }
    }
}

/// Read-only window onto a rectangle of a [`Grid`]
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    cells: &'a [TileId],
    stride: usize,
    offset_x: usize,
    offset_y: usize,
    width: u32,
    height: u32,
}

impl<'a> GridView<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "view cell ({}, {}) out of bounds for {}x{} view",
            x,
            y,
            self.width,
            self.height
        );
        (self.offset_y + y as usize) * self.stride + self.offset_x + x as usize
    }

    /// Tile id at view-relative `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> TileId {
        self.cells[self.index(x, y)]
    }

    /// One row of the view as a contiguous slice
    pub fn row(&self, y: u32) -> &'a [TileId] {
        let start = self.index(0, y);
        &self.cells[start..start + self.width as usize]
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &'a [TileId]> {
        let view = *self;
        (0..view.height).map(move |y| view.row(y))
    }
}

/// Writable window onto a rectangle of a [`Grid`]. Writes go straight to the grid.
#[derive(Debug)]
pub struct GridViewMut<'a> {
    cells: &'a mut [TileId],
    dirty: &'a mut bool,
    stride: usize,
    offset_x: usize,
    offset_y: usize,
    width: u32,
    height: u32,
}

impl<'a> GridViewMut<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "view cell ({}, {}) out of bounds for {}x{} view",
            x,
            y,
            self.width,
            self.height
        );
        (self.offset_y + y as usize) * self.stride + self.offset_x + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> TileId {
        self.cells[self.index(x, y)]
    }

    /// Set the tile id at view-relative `(x, y)`
    pub fn set(&mut self, x: u32, y: u32, id: TileId) {
        let index = self.index(x, y);
        self.cells[index] = id;
        *self.dirty = true;
    }

    /// Set every cell of the view to `id`
    pub fn fill(&mut self, id: TileId) {
        for y in 0..self.height {
            let start = self.index(0, y);
            self.cells[start..start + self.width as usize].fill(id);
        }
        *self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(Layer::Background, 4, 3).unwrap();
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.cells().iter().all(|id| *id == 0));
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_dimension_limits() {
        assert!(Grid::new(Layer::Background, 255, 255).is_ok());
        assert_eq!(
            Grid::new(Layer::Background, 256, 1),
            Err(DimensionError {
                width: 256,
                height: 1
            })
        );
        assert!(Grid::new(Layer::Background, 0, 4).is_err());
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(Layer::LeftForeground, 4, 4).unwrap();
        grid.take_dirty();
        grid.set(2, 3, 9);
        assert_eq!(grid.get(2, 3), 9);
        assert_eq!(grid.tile(2, 3), Tile::new(Layer::LeftForeground, 9));
        assert_eq!(grid.cells()[3 * 4 + 2], 9);
        assert!(grid.take_dirty());
        assert!(!grid.is_dirty());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        let grid = Grid::new(Layer::Background, 4, 4).unwrap();
        grid.get(4, 0);
    }

    #[test]
    fn test_try_get() {
        let grid = Grid::new(Layer::Background, 2, 2).unwrap();
        assert_eq!(grid.try_get(1, 1), Some(0));
        assert_eq!(grid.try_get(2, 1), None);
        assert!(grid.contains(1, 1));
        assert!(!grid.contains(-1, 0));
    }

    #[test]
    fn test_view_reads_sub_rectangle() {
        let cells = (0..16).collect::<Vec<TileId>>();
        let grid = Grid::from_cells(Layer::Background, 4, 4, cells).unwrap();
        let view = grid.view(1, 2, 2, 2);
        assert_eq!(view.get(0, 0), 9);
        assert_eq!(view.get(1, 1), 14);
        let rows: Vec<&[TileId]> = view.rows().collect();
        let expected: Vec<&[TileId]> = vec![&[9, 10], &[13, 14]];
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_view_mut_writes_through() {
        let mut grid = Grid::new(Layer::RightForeground, 3, 3).unwrap();
        grid.take_dirty();
        {
            let mut view = grid.view_mut(1, 1, 2, 2);
            view.set(1, 0, 5);
            assert_eq!(view.get(1, 0), 5);
        }
        assert_eq!(grid.get(2, 1), 5);
        assert!(grid.is_dirty());

        grid.view_mut(0, 0, 2, 1).fill(3);
        assert_eq!(&grid.cells()[0..3], &[3, 3, 0]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_view_out_of_bounds_panics() {
        let grid = Grid::new(Layer::Background, 4, 4).unwrap();
        grid.view(3, 0, 2, 1);
    }
}
