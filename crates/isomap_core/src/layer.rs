//! Layer tags, layer masks and tile values

use serde::{Deserialize, Serialize};

/// In-memory tile id. Each layer reserves [`EMPTY_TILE`] as its "no content" value.
///
/// Signed and wider than the stored `i16` so that every stored value, including
/// negative ones and the shifted background range, has an in-memory id.
pub type TileId = i32;

/// Sentinel id meaning "no tile" on every layer
pub const EMPTY_TILE: TileId = 0;

/// One of the three tile layers of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    LeftForeground,
    RightForeground,
}

impl Layer {
    /// All layers, in storage and draw order
    pub const ALL: [Layer; 3] = [
        Layer::Background,
        Layer::LeftForeground,
        Layer::RightForeground,
    ];

    /// The id this layer uses for an empty cell
    #[inline]
    pub fn empty_tile(self) -> TileId {
        EMPTY_TILE
    }

    /// Whether `id` is this layer's empty sentinel
    #[inline]
    pub fn is_empty_tile(self, id: TileId) -> bool {
        id == self.empty_tile()
    }

    /// Storage slot of this layer inside a [`crate::MapGrid`]
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Layer::Background => 0,
            Layer::LeftForeground => 1,
            Layer::RightForeground => 2,
        }
    }

    /// Whether this is one of the two foreground layers
    pub fn is_foreground(self) -> bool {
        !matches!(self, Layer::Background)
    }

    /// The opposite foreground side, if this is a foreground layer
    pub fn other_side(self) -> Option<Layer> {
        match self {
            Layer::Background => None,
            Layer::LeftForeground => Some(Layer::RightForeground),
            Layer::RightForeground => Some(Layer::LeftForeground),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Background => "Background",
            Layer::LeftForeground => "Left Foreground",
            Layer::RightForeground => "Right Foreground",
        }
    }
}

/// The set of layers an edit operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayerMask {
    #[default]
    Background,
    LeftForeground,
    RightForeground,
    /// Left and right foreground together
    Foreground,
    /// Every layer
    All,
}

impl LayerMask {
    /// Whether `layer` is part of this mask
    pub fn contains(self, layer: Layer) -> bool {
        match self {
            LayerMask::Background => layer == Layer::Background,
            LayerMask::LeftForeground => layer == Layer::LeftForeground,
            LayerMask::RightForeground => layer == Layer::RightForeground,
            LayerMask::Foreground => layer.is_foreground(),
            LayerMask::All => true,
        }
    }

    /// Layers in this mask, in storage order
    pub fn layers(self) -> impl Iterator<Item = Layer> {
        Layer::ALL.into_iter().filter(move |layer| self.contains(*layer))
    }

    /// The layer when this mask names exactly one, `None` for `Foreground` and `All`
    pub fn single(self) -> Option<Layer> {
        match self {
            LayerMask::Background => Some(Layer::Background),
            LayerMask::LeftForeground => Some(Layer::LeftForeground),
            LayerMask::RightForeground => Some(Layer::RightForeground),
            LayerMask::Foreground | LayerMask::All => None,
        }
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Background => LayerMask::Background,
            Layer::LeftForeground => LayerMask::LeftForeground,
            Layer::RightForeground => LayerMask::RightForeground,
        }
    }
}

/// A tile value: an id into the layer's tileset plus the layer it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub layer: Layer,
    pub id: TileId,
}

impl Tile {
    pub fn new(layer: Layer, id: TileId) -> Self {
        Self { layer, id }
    }

    /// The empty tile for `layer`
    pub fn empty(layer: Layer) -> Self {
        Self {
            layer,
            id: layer.empty_tile(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layer.is_empty_tile(self.id)
    }
}
