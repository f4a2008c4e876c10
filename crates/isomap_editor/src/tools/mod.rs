//! Editor tools - draw, select, sample, erase
//!
//! Pointer messages arrive in map pixel space, get resolved to tile cells with
//! the active document's isometric transform, and drive the tool controller.

mod controller;

pub use controller::{ToolController, ToolEvent};

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;
use isomap_core::TileCoord;
use serde::{Deserialize, Serialize};

use crate::document::OpenMaps;
use crate::palette::TilesetPalette;
use crate::EditorState;

/// Plugin for editor tools and pointer input
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerInput>()
            .init_resource::<TilesetPalette>()
            .add_systems(Update, handle_pointer_input);
    }
}

/// Available editor tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorTool {
    /// Stamp the active grab
    #[default]
    Draw,
    /// Drag out a rectangle that becomes the active grab
    Select,
    /// Pick the tile under the cursor from the palette
    Sample,
    /// Drag out a rectangle and clear it on release
    Erase,
}

impl EditorTool {
    pub const ALL: [EditorTool; 4] = [
        EditorTool::Draw,
        EditorTool::Select,
        EditorTool::Sample,
        EditorTool::Erase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditorTool::Draw => "Draw",
            EditorTool::Select => "Select",
            EditorTool::Sample => "Sample",
            EditorTool::Erase => "Erase",
        }
    }

    /// Whether a finished gesture with this tool changes the map
    pub fn edits_map(&self) -> bool {
        matches!(self, EditorTool::Draw | EditorTool::Erase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Pressed,
    Moved,
    Released,
}

/// Primary pointer input over the active map, in map pixel coordinates
/// (origin at the top-left of the map's bounding box)
#[derive(Message, Debug, Clone, Copy)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerInput {
    pub fn pressed(position: Vec2) -> Self {
        Self {
            phase: PointerPhase::Pressed,
            position,
        }
    }

    pub fn moved(position: Vec2) -> Self {
        Self {
            phase: PointerPhase::Moved,
            position,
        }
    }

    pub fn released(position: Vec2) -> Self {
        Self {
            phase: PointerPhase::Released,
            position,
        }
    }
}

/// Resolve pointer messages to tiles and feed them to the tool controller
fn handle_pointer_input(
    mut pointer: MessageReader<PointerInput>,
    mut editor_state: ResMut<EditorState>,
    mut open_maps: ResMut<OpenMaps>,
    mut palette: ResMut<TilesetPalette>,
) {
    if editor_state.controller.is_gesture_active()
        && editor_state.gesture_document != open_maps.active_id()
    {
        finish_gesture_elsewhere(&mut editor_state, &mut open_maps);
    }

    let Some(document) = open_maps.active_mut() else {
        // Nothing to edit; drop the input
        pointer.clear();
        return;
    };
    let iso = document.transform();

    for input in pointer.read() {
        let px = input.position.x.floor() as i32;
        let py = input.position.y.floor() as i32;
        let tile = iso.pixel_to_tile(px, py);

        let event = match (input.phase, tile) {
            (PointerPhase::Pressed, Some(tile)) => ToolEvent::Click(tile),
            (PointerPhase::Moved, Some(tile)) => {
                if !editor_state.controller.is_gesture_active() {
                    continue;
                }
                ToolEvent::Drag(tile)
            }
            (PointerPhase::Released, tile) => {
                ToolEvent::Release(tile.unwrap_or(TileCoord::INVALID))
            }
            (PointerPhase::Pressed | PointerPhase::Moved, None) => continue,
        };
        if let ToolEvent::Click(_) = event {
            editor_state.gesture_document = Some(document.id);
        }

        let before = document.history.revision();
        let (map, history) = (&mut document.map, &mut document.history);
        editor_state
            .controller
            .handle(event, map, history, &mut *palette);
        if document.history.revision() != before {
            if let Some(record) = document.history.last() {
                debug!(
                    "{:?} on {:?}: {}x{} at ({}, {})",
                    record.kind,
                    record.layers,
                    record.before.width,
                    record.before.height,
                    record.before.x,
                    record.before.y
                );
            }
        }
    }
}

/// A gesture belongs to the document it started on. Once another document is
/// active it is finished there, or dropped if that document was closed.
fn finish_gesture_elsewhere(editor_state: &mut EditorState, open_maps: &mut OpenMaps) {
    let gesture_document = editor_state.gesture_document.take();
    match gesture_document.and_then(|id| open_maps.get_mut(id)) {
        Some(document) => {
            debug!("Finishing gesture on inactive map {}", document.name);
            editor_state
                .controller
                .finish_gesture(&mut document.map, &mut document.history);
        }
        None => editor_state.controller.cancel_gesture(),
    }
}
