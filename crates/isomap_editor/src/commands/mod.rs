//! Undo/redo history and keyboard shortcuts

mod history;
mod shortcuts;

pub use history::{ActionKind, ActionLog, ActionRecord, HISTORY_CAPACITY};
pub use shortcuts::handle_keyboard_shortcuts;

use std::path::PathBuf;

/// Editor action requested by a shortcut or a host UI, processed once per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Undo,
    Redo,
    Save,
    /// Save the active map under a new path
    SaveAs(PathBuf),
    /// Load a map file into a new document
    Open(PathBuf),
    /// Create a blank map
    New { width: u32, height: u32 },
    /// Close the active document
    Close,
    /// Resize the active map, keeping the overlapping cells
    Resize { width: u32, height: u32 },
    /// Store the active grab in the structure catalog under this name
    CreateStructure(String),
    /// Make the named structure the active grab
    UseStructure(String),
}
