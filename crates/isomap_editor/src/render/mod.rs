//! Redraw requests for the map viewport
//!
//! The editor never touches rendering itself. Once a frame's input has been
//! applied, the dirty layers of every open document are drained and published
//! as [`MapRedrawRequest`] messages for whatever renderer is listening.

use bevy::ecs::message::{Message, MessageWriter};
use bevy::prelude::*;
use isomap_core::Layer;
use uuid::Uuid;

use crate::document::OpenMaps;

/// Plugin publishing per-layer redraw requests
pub struct MapRedrawPlugin;

impl Plugin for MapRedrawPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MapRedrawRequest>()
            .init_resource::<RedrawState>()
            .add_systems(PostUpdate, publish_redraw_requests);
    }
}

/// Layers of one document that need to be composited again
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct MapRedrawRequest {
    pub document: Uuid,
    pub layers: Vec<Layer>,
}

/// Tracks which document the viewport last showed
#[derive(Resource, Default)]
pub struct RedrawState {
    pub shown_document: Option<Uuid>,
}

fn publish_redraw_requests(
    mut open_maps: ResMut<OpenMaps>,
    mut redraw_state: ResMut<RedrawState>,
    mut requests: MessageWriter<MapRedrawRequest>,
) {
    let active = open_maps.active_id();
    let switched = redraw_state.shown_document != active;
    redraw_state.shown_document = active;

    for document in open_maps.iter_mut() {
        let mut layers = document.map.take_dirty();
        // A newly shown document is drawn in full
        if switched && Some(document.id) == active {
            layers = Layer::ALL.to_vec();
        }
        if layers.is_empty() {
            continue;
        }
        requests.write(MapRedrawRequest {
            document: document.id,
            layers,
        });
    }
}
