//! User preferences for the map editor

mod file;

pub use file::*;

use bevy::prelude::Resource;
use isomap_core::{LayerMask, TileGeometry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tools::EditorTool;

/// Number of entries kept in the recent files list
pub const MAX_RECENT_FILES: usize = 10;

/// A recently opened or saved map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: String,
    pub name: String,
}

/// Persistent editor preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Full diamond width in pixels
    pub tile_width: u32,
    /// Full diamond height in pixels
    pub tile_height: u32,
    /// Downward offset for foreground frames
    pub foreground_padding: i32,
    pub initial_tool: EditorTool,
    pub initial_layers: LayerMask,
    /// Most recent first
    pub recent_files: Vec<RecentFile>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        let geometry = TileGeometry::default();
        Self {
            tile_width: geometry.tile_width,
            tile_height: geometry.tile_height,
            foreground_padding: geometry.foreground_padding,
            initial_tool: EditorTool::default(),
            initial_layers: LayerMask::default(),
            recent_files: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Tile geometry for new documents. Unusable sizes fall back to the default.
    pub fn geometry(&self) -> TileGeometry {
        let geometry = TileGeometry {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            foreground_padding: self.foreground_padding,
        };
        if geometry.is_valid() {
            geometry
        } else {
            bevy::log::warn!(
                "Ignoring tile size {}x{} from preferences",
                self.tile_width,
                self.tile_height
            );
            TileGeometry::default()
        }
    }

    pub fn set_geometry(&mut self, geometry: TileGeometry) {
        self.tile_width = geometry.tile_width;
        self.tile_height = geometry.tile_height;
        self.foreground_padding = geometry.foreground_padding;
    }

    /// Move `path` to the front of the recent list
    pub fn add_recent_file(&mut self, path: PathBuf, name: String) {
        let path = path.to_string_lossy().to_string();
        self.recent_files.retain(|recent| recent.path != path);
        self.recent_files.insert(0, RecentFile { path, name });
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    pub fn remove_recent_file(&mut self, path: &str) {
        self.recent_files.retain(|recent| recent.path != path);
    }

    pub fn clear_recent_files(&mut self) {
        self.recent_files.clear();
    }
}
