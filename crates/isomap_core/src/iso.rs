//! Isometric (diamond grid) projection between pixel space and tile space
//!
//! Tile `(x, y)` occupies a diamond of `tile_width` x `tile_height` pixels.
//! Moving one tile along x steps right and down by half a tile, moving along
//! y steps left and down. The leftmost pixel column of row 0 therefore starts
//! at `(height - 1) * half_width`, and each following row starts `half_width`
//! further left and `half_height` further down.

use crate::Layer;
use serde::{Deserialize, Serialize};

/// Pixel size of a tile diamond and the foreground draw offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGeometry {
    /// Full diamond width in pixels
    pub tile_width: u32,
    /// Full diamond height in pixels
    pub tile_height: u32,
    /// Downward offset applied to foreground frames before bottom-anchoring
    pub foreground_padding: i32,
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self {
            tile_width: 64,
            tile_height: 32,
            foreground_padding: 32,
        }
    }
}

impl TileGeometry {
    pub fn half_width(&self) -> i32 {
        (self.tile_width / 2) as i32
    }

    pub fn half_height(&self) -> i32 {
        (self.tile_height / 2) as i32
    }

    /// Both half extents must be at least one pixel
    pub fn is_valid(&self) -> bool {
        self.tile_width >= 2 && self.tile_height >= 2
    }
}

/// A tile position. Signed so that off-map positions can be represented while
/// dragging; [`TileCoord::INVALID`] is the "no tile" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const INVALID: TileCoord = TileCoord { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A position in map pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel/tile conversion for one map size and tile geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoTransform {
    geometry: TileGeometry,
    map_width: u32,
    map_height: u32,
}

impl IsoTransform {
    pub fn new(geometry: TileGeometry, map_width: u32, map_height: u32) -> Self {
        Self {
            geometry,
            map_width,
            map_height,
        }
    }

    pub fn geometry(&self) -> TileGeometry {
        self.geometry
    }

    fn half_extents(&self) -> (i64, i64) {
        (
            self.geometry.half_width().max(1) as i64,
            self.geometry.half_height().max(1) as i64,
        )
    }

    /// Top-left pixel of the bounding box of row `y`'s first tile
    pub fn row_origin(&self, y: i32) -> PixelPoint {
        let (hw, hh) = self.half_extents();
        let rows = self.map_height as i64;
        PixelPoint::new(
            ((rows - 1 - y as i64) * hw) as i32,
            (y as i64 * hh) as i32,
        )
    }

    /// Size in pixels of the bounding box around the whole map diamond
    pub fn map_pixel_size(&self) -> (u32, u32) {
        let (hw, hh) = self.half_extents();
        let span = (self.map_width + self.map_height) as i64;
        ((span * hw) as u32, (span * hh) as u32)
    }

    /// Map a pixel to the tile whose diamond contains it.
    ///
    /// Returns `None` for any pixel outside the map's footprint; an off-map
    /// pixel never resolves to an edge tile.
    pub fn pixel_to_tile(&self, px: i32, py: i32) -> Option<TileCoord> {
        let (hw, hh) = self.half_extents();
        let origin = self.row_origin(0);

        let local_x = px as i64 - (origin.x as i64 + hw);
        let local_y = py as i64 - origin.y as i64;

        // floor((lx / hw + ly / hh) / 2) and floor((ly / hh - lx / hw) / 2),
        // scaled by hw * hh to stay in exact integer arithmetic
        let cell = 2 * hw * hh;
        let tile_x = (local_x * hh + local_y * hw).div_euclid(cell);
        let tile_y = (local_y * hw - local_x * hh).div_euclid(cell);

        if tile_x < 0
            || tile_y < 0
            || tile_x >= self.map_width as i64
            || tile_y >= self.map_height as i64
        {
            return None;
        }
        Some(TileCoord::new(tile_x as i32, tile_y as i32))
    }

    /// Like [`Self::pixel_to_tile`] but yields [`TileCoord::INVALID`] instead of `None`
    pub fn pixel_to_tile_or_invalid(&self, px: i32, py: i32) -> TileCoord {
        self.pixel_to_tile(px, py).unwrap_or(TileCoord::INVALID)
    }

    /// Draw origin (top-left) for a tile frame.
    ///
    /// Background frames sit in the diamond's bounding box. Foreground frames
    /// are bottom-anchored: pushed down by the padding and then lifted by
    /// their own `frame_height`, so taller walls grow upwards.
    ///
    /// The anchor is a box corner, outside the tile's own diamond: picking it
    /// with [`IsoTransform::pixel_to_tile`] yields a neighbour or `None`. Use
    /// [`IsoTransform::tile_center`] for a point that picks this tile.
    pub fn tile_to_pixel_anchor(&self, x: i32, y: i32, layer: Layer, frame_height: u32) -> PixelPoint {
        let (hw, hh) = self.half_extents();
        let row = self.row_origin(y);
        let base = PixelPoint::new(
            (row.x as i64 + x as i64 * hw) as i32,
            (row.y as i64 + x as i64 * hh) as i32,
        );
        match layer {
            Layer::Background => base,
            Layer::LeftForeground | Layer::RightForeground => PixelPoint::new(
                base.x,
                base.y + self.geometry.foreground_padding - frame_height as i32,
            ),
        }
    }

    /// Centre pixel of a tile's diamond
    pub fn tile_center(&self, x: i32, y: i32) -> PixelPoint {
        let (hw, hh) = self.half_extents();
        let anchor = self.tile_to_pixel_anchor(x, y, Layer::Background, 0);
        PixelPoint::new(anchor.x + hw as i32, anchor.y + hh as i32)
    }
}
