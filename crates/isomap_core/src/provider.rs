//! Seams to the collaborators that live outside the map core: the tileset
//! archive that owns frames, the tile palette that owns selection of single
//! tiles, and the structure library of pre-authored stamps.

use crate::iso::{IsoTransform, PixelPoint};
use crate::{Layer, Tile, TileGrab, TileId};

/// Size of one renderable frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// What a tileset holds for one tile id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileFrame {
    Still(FrameSize),
    /// Frames in playback order
    Animated(Vec<FrameSize>),
}

impl TileFrame {
    /// Size of the frame shown first
    pub fn first(&self) -> Option<FrameSize> {
        match self {
            TileFrame::Still(size) => Some(*size),
            TileFrame::Animated(frames) => frames.first().copied(),
        }
    }
}

/// Looks up renderable frames by tile id. `None` means the tileset has no such tile.
pub trait TileFrameProvider {
    fn frame(&self, id: TileId, layer: Layer) -> Option<TileFrame>;
}

/// The palette of single tiles a user picks from.
///
/// Selecting an entry produces the grab that becomes the active brush, the
/// same as picking it by hand would.
pub trait TilePalette {
    fn select(&mut self, layer: Layer, id: TileId) -> Option<TileGrab>;
}

/// A library of named multi-cell stamps
pub trait StructureSource {
    fn structure_names(&self) -> Vec<String>;
    fn structure(&self, name: &str) -> Option<TileGrab>;
}

/// Draw origin for `tile` at `(x, y)`, using the frame height the provider
/// reports. Empty tiles and tiles missing from the tileset have no anchor.
pub fn frame_anchor(
    iso: &IsoTransform,
    provider: &dyn TileFrameProvider,
    x: i32,
    y: i32,
    tile: Tile,
) -> Option<PixelPoint> {
    if tile.is_empty() {
        return None;
    }
    let size = provider.frame(tile.id, tile.layer)?.first()?;
    Some(iso.tile_to_pixel_anchor(x, y, tile.layer, size.height))
}
