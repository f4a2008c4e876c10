//! Core data structures for isometric tile maps
//!
//! This crate provides the engine-independent model behind the map editor:
//! - `Grid` / `GridView` - Dense storage for one layer and borrowed sub-rectangles
//! - `MapGrid` - Background, left foreground and right foreground grids of one map
//! - `IsoTransform` - Pixel to tile picking and tile to pixel draw anchors
//! - `TileGrab` - Rectangular multi-layer snapshot (clipboard, stamp, undo payload)
//! - `map_file` - The fixed-record binary map format
//! - `provider` - Traits for the tileset, tile palette and structure library

mod grab;
mod grid;
mod iso;
mod layer;
mod map_grid;
pub mod map_file;
pub mod provider;

pub use grab::TileGrab;
pub use grid::{validate_dimensions, DimensionError, Grid, GridView, GridViewMut, MAX_DIMENSION};
pub use iso::{IsoTransform, PixelPoint, TileCoord, TileGeometry};
pub use layer::{Layer, LayerMask, Tile, TileId, EMPTY_TILE};
pub use map_file::MapFileError;
pub use map_grid::MapGrid;
pub use provider::{FrameSize, StructureSource, TileFrame, TileFrameProvider, TilePalette};
