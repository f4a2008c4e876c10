//! Keyboard shortcut handling

use bevy::prelude::*;
use isomap_core::LayerMask;

use super::PendingAction;
use crate::tools::EditorTool;
use crate::EditorState;

const TOOL_KEYS: [(KeyCode, EditorTool); 4] = [
    (KeyCode::KeyD, EditorTool::Draw),
    (KeyCode::KeyS, EditorTool::Select),
    (KeyCode::KeyA, EditorTool::Sample),
    (KeyCode::KeyE, EditorTool::Erase),
];

const LAYER_KEYS: [(KeyCode, LayerMask); 5] = [
    (KeyCode::Digit1, LayerMask::Background),
    (KeyCode::Digit2, LayerMask::LeftForeground),
    (KeyCode::Digit3, LayerMask::RightForeground),
    (KeyCode::Digit4, LayerMask::Foreground),
    (KeyCode::Digit5, LayerMask::All),
];

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_state: ResMut<EditorState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl {
        // Ctrl+Z - Undo
        if keyboard.just_pressed(KeyCode::KeyZ) && !shift {
            editor_state.pending_action = Some(PendingAction::Undo);
        }
        // Ctrl+Shift+Z or Ctrl+Y - Redo
        if (keyboard.just_pressed(KeyCode::KeyZ) && shift) || keyboard.just_pressed(KeyCode::KeyY) {
            editor_state.pending_action = Some(PendingAction::Redo);
        }
        // Ctrl+S - Save
        if keyboard.just_pressed(KeyCode::KeyS) {
            editor_state.pending_action = Some(PendingAction::Save);
        }
        return;
    }

    for (key, tool) in TOOL_KEYS {
        if keyboard.just_pressed(key) {
            editor_state.controller.set_tool(tool);
        }
    }

    for (key, layers) in LAYER_KEYS {
        if keyboard.just_pressed(key) {
            editor_state.controller.set_layers(layers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, keys: &[KeyCode]) {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.reset_all();
        for key in keys {
            input.press(*key);
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<EditorState>()
            .add_systems(Update, handle_keyboard_shortcuts);
        app
    }

    #[test]
    fn test_undo_redo_save_keys() {
        let mut app = app();
        let cases = [
            (vec![KeyCode::ControlLeft, KeyCode::KeyZ], PendingAction::Undo),
            (
                vec![KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyZ],
                PendingAction::Redo,
            ),
            (vec![KeyCode::ControlRight, KeyCode::KeyY], PendingAction::Redo),
            (vec![KeyCode::ControlLeft, KeyCode::KeyS], PendingAction::Save),
        ];
        for (keys, expected) in cases {
            press(&mut app, &keys);
            app.update();
            let action = app.world_mut().resource_mut::<EditorState>().pending_action.take();
            assert_eq!(action, Some(expected));
        }
    }

    #[test]
    fn test_tool_and_layer_keys() {
        let mut app = app();
        press(&mut app, &[KeyCode::KeyE, KeyCode::Digit4]);
        app.update();
        let state = app.world().resource::<EditorState>();
        assert_eq!(state.controller.tool(), EditorTool::Erase);
        assert_eq!(state.controller.layers(), LayerMask::Foreground);

        // Ctrl+S saves instead of switching to Select
        press(&mut app, &[KeyCode::ControlLeft, KeyCode::KeyS]);
        app.update();
        let state = app.world().resource::<EditorState>();
        assert_eq!(state.controller.tool(), EditorTool::Erase);
        assert_eq!(state.pending_action, Some(PendingAction::Save));
    }
}
