//! Map document save/load operations

use super::MapDocument;
use isomap_core::{map_file, MapFileError, TileGeometry};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    MapFile(#[from] MapFileError),
    #[error("No file path set")]
    NoPath,
}

impl MapDocument {
    /// Load a map file, inferring its dimensions
    pub fn load(path: &Path, geometry: TileGeometry) -> Result<Self, DocumentError> {
        let map = map_file::load(path)?;
        let mut document = Self::from_map(display_name(path), map, geometry);
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Save to `path`. The document only adopts the path once the write went through.
    pub fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        map_file::save(&self.map, path)?;

        self.path = Some(path.to_path_buf());
        self.name = display_name(path);
        self.saved_revision = self.history.revision();

        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), DocumentError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(DocumentError::NoPath)
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
