//! isomap_editor - Editing session for isometric tile maps
//!
//! This crate provides the editor core on top of Bevy ECS:
//! - Draw / Select / Sample / Erase tools driven by pointer messages
//! - Bounded undo/redo per open map
//! - Map documents (new, open, save, resize, close)
//! - Keyboard shortcuts, user preferences and a structure catalog
//! - Per-layer redraw messages for an external renderer
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use isomap_editor::{EditorPlugin, EditorTool};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_initial_tool(EditorTool::Select))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod document;
pub mod palette;
pub mod preferences;
pub mod render;
pub mod structures;
pub mod tools;

pub use isomap_core;

use bevy::prelude::*;
use isomap_core::{LayerMask, StructureSource, TileGeometry};
use uuid::Uuid;

use commands::{handle_keyboard_shortcuts, PendingAction};
use document::{MapDocument, OpenMaps};
use preferences::EditorPreferences;
use render::MapRedrawPlugin;
use structures::StructureCatalog;
pub use tools::{EditorTool, PointerInput, ToolController};
use tools::EditorToolsPlugin;

/// Configuration for initial editor state
///
/// Unset fields come from the saved preferences.
#[derive(Clone, Debug, Default)]
pub struct EditorStateConfig {
    /// Initial tool selection
    pub initial_tool: Option<EditorTool>,
    /// Initial active layers
    pub initial_layers: Option<LayerMask>,
    /// Tile geometry for new documents
    pub geometry: Option<TileGeometry>,
}

/// Main editor plugin with configurable initial state
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use isomap_editor::{EditorPlugin, EditorTool};
/// use isomap_editor::isomap_core::LayerMask;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         EditorPlugin::new()
///             .with_initial_tool(EditorTool::Erase)
///             .with_initial_layers(LayerMask::Foreground)
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct EditorPlugin {
    /// Initial editor state configuration.
    pub initial_state: EditorStateConfig,
    /// Preferences to use instead of the ones saved on disk
    pub preferences: Option<EditorPreferences>,
}

impl EditorPlugin {
    /// Create an editor plugin with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial tool selection (default: Draw)
    pub fn with_initial_tool(mut self, tool: EditorTool) -> Self {
        self.initial_state.initial_tool = Some(tool);
        self
    }

    /// Set the initial layer mask (default: Background)
    pub fn with_initial_layers(mut self, layers: LayerMask) -> Self {
        self.initial_state.initial_layers = Some(layers);
        self
    }

    /// Set the tile geometry used for new and opened maps
    pub fn with_geometry(mut self, geometry: TileGeometry) -> Self {
        self.initial_state.geometry = Some(geometry);
        self
    }

    /// Use these preferences instead of loading them from the config directory
    pub fn with_preferences(mut self, preferences: EditorPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        // Load user preferences
        let preferences = match &self.preferences {
            Some(preferences) => preferences.clone(),
            None => {
                let loaded = EditorPreferences::load();
                bevy::log::info!("Loaded editor preferences");
                loaded
            }
        };

        // Plugin config takes precedence over saved preferences
        let config = &self.initial_state;
        let editor_state = EditorState {
            controller: ToolController::new(
                config.initial_tool.unwrap_or(preferences.initial_tool),
                config.initial_layers.unwrap_or(preferences.initial_layers),
            ),
            geometry: config.geometry.unwrap_or_else(|| preferences.geometry()),
            pending_action: None,
            gesture_document: None,
        };
        bevy::log::info!(
            "EditorPlugin: {} tool on {:?}, tiles {}x{}",
            editor_state.controller.tool().label(),
            editor_state.controller.layers(),
            editor_state.geometry.tile_width,
            editor_state.geometry.tile_height
        );

        app.add_plugins(EditorToolsPlugin)
            .add_plugins(MapRedrawPlugin)
            .insert_resource(editor_state)
            .insert_resource(preferences)
            .init_resource::<OpenMaps>()
            .init_resource::<StructureCatalog>()
            .init_resource::<StatusMessage>()
            .add_systems(
                Update,
                (handle_keyboard_shortcuts, process_edit_actions).chain(),
            );
    }
}

/// Global editor state
#[derive(Resource, Default)]
pub struct EditorState {
    /// Current tool, layers and active grab
    pub controller: ToolController,
    /// Tile geometry for new and opened maps
    pub geometry: TileGeometry,
    /// Action to run on the next frame
    pub pending_action: Option<PendingAction>,
    /// Document the controller's unfinished gesture started on
    gesture_document: Option<Uuid>,
}

/// Last message meant for the user, e.g. a failed save
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: Option<String>,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.is_error = false;
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.is_error = true;
    }
}

/// System that runs the pending editor action
fn process_edit_actions(
    mut editor_state: ResMut<EditorState>,
    mut open_maps: ResMut<OpenMaps>,
    mut preferences: ResMut<EditorPreferences>,
    mut catalog: ResMut<StructureCatalog>,
    mut status: ResMut<StatusMessage>,
) {
    let Some(action) = editor_state.pending_action.take() else {
        return;
    };

    match action {
        PendingAction::Undo => {
            if let Some(document) = open_maps.active_mut() {
                if let Some(kind) = document.undo() {
                    info!("Undo {:?} in '{}'", kind, document.name);
                }
            }
        }
        PendingAction::Redo => {
            if let Some(document) = open_maps.active_mut() {
                if let Some(kind) = document.redo() {
                    info!("Redo {:?} in '{}'", kind, document.name);
                }
            }
        }
        PendingAction::Save => {
            if let Some(document) = open_maps.active_mut() {
                let result = document.save_current();
                report_save(document, result, &mut preferences, &mut status);
            }
        }
        PendingAction::SaveAs(path) => {
            if let Some(document) = open_maps.active_mut() {
                let result = document.save(&path);
                report_save(document, result, &mut preferences, &mut status);
            }
        }
        PendingAction::Open(path) => match MapDocument::load(&path, editor_state.geometry) {
            Ok(document) => {
                info!(
                    "Opened '{}' ({}x{})",
                    document.name,
                    document.map.width(),
                    document.map.height()
                );
                preferences.add_recent_file(path, document.name.clone());
                save_preferences(&preferences);
                status.info(format!("Opened {}", document.name));
                editor_state.controller.cancel_gesture();
                open_maps.open(document);
            }
            Err(e) => {
                error!("Failed to open {:?}: {}", path, e);
                status.error(format!("Failed to open map: {}", e));
                preferences.remove_recent_file(&path.to_string_lossy());
                save_preferences(&preferences);
            }
        },
        PendingAction::New { width, height } => {
            let name = format!("Untitled {}", open_maps.len() + 1);
            match MapDocument::new(name, width, height, editor_state.geometry) {
                Ok(document) => {
                    info!("Created '{}' ({}x{})", document.name, width, height);
                    editor_state.controller.cancel_gesture();
                    open_maps.open(document);
                }
                Err(e) => status.error(e.to_string()),
            }
        }
        PendingAction::Close => {
            if let Some(id) = open_maps.active_id() {
                editor_state.controller.cancel_gesture();
                if let Some(document) = open_maps.close(id) {
                    if document.is_modified() {
                        warn!("Closed '{}' with unsaved changes", document.name);
                    }
                }
            }
        }
        PendingAction::Resize { width, height } => {
            if let Some(document) = open_maps.active_mut() {
                editor_state.controller.cancel_gesture();
                match document.resize(width, height) {
                    Ok(()) => info!("Resized '{}' to {}x{}", document.name, width, height),
                    Err(e) => status.error(e.to_string()),
                }
            }
        }
        PendingAction::CreateStructure(name) => {
            let Some(grab) = editor_state.controller.active_grab() else {
                status.error("Nothing selected");
                return;
            };
            match catalog.insert(&name, grab) {
                Ok(()) => status.info(format!("Created structure '{}'", name.trim())),
                Err(e) => {
                    warn!("Could not create structure: {}", e);
                    status.error(e.to_string());
                }
            }
        }
        PendingAction::UseStructure(name) => match catalog.structure(&name) {
            Some(grab) => editor_state.controller.set_active_grab(grab),
            None => warn!("Unknown structure '{}'", name),
        },
    }
}

fn report_save(
    document: &MapDocument,
    result: Result<(), document::DocumentError>,
    preferences: &mut EditorPreferences,
    status: &mut StatusMessage,
) {
    match (result, &document.path) {
        (Ok(()), Some(path)) => {
            info!("Saved '{}' to {:?}", document.name, path);
            preferences.add_recent_file(path.clone(), document.name.clone());
            save_preferences(preferences);
            status.info(format!("Saved {}", document.name));
        }
        (Ok(()), None) => {}
        (Err(e), _) => {
            error!("Failed to save '{}': {}", document.name, e);
            status.error(format!("Failed to save map: {}", e));
        }
    }
}

fn save_preferences(preferences: &EditorPreferences) {
    if let Err(e) = preferences.save() {
        bevy::log::error!("Failed to save preferences: {}", e);
    }
}
