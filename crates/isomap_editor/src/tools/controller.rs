//! Tool state machine: turns click/drag/release on tile cells into grabs and
//! map edits, and records each finished edit in the action log.

use isomap_core::{Layer, LayerMask, MapGrid, TileCoord, TileGrab, TilePalette};

use super::EditorTool;
use crate::commands::{ActionKind, ActionLog};

/// Pointer input already resolved to a tile cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEvent {
    /// Primary button pressed over a tile
    Click(TileCoord),
    /// Pointer entered a tile while the button is held
    Drag(TileCoord),
    /// Primary button released
    Release(TileCoord),
}

/// A draw stroke in progress
#[derive(Debug)]
struct DrawStroke {
    layers: LayerMask,
    /// Map as it was before the first stamp of the stroke
    snapshot: MapGrid,
    /// Inclusive bounds of every cell the stroke's stamps covered
    touched: Option<(u32, u32, u32, u32)>,
    last: TileCoord,
}

impl DrawStroke {
    fn touch(&mut self, x: u32, y: u32) {
        self.touched = Some(match self.touched {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
}

/// The gesture between a click and its release. Drag and release follow the
/// tool that started the gesture, even if the tool changed in between.
#[derive(Debug)]
enum Gesture {
    Draw(DrawStroke),
    Select { last: TileCoord },
    Sample { last: TileCoord },
    Erase { layers: LayerMask, last: TileCoord },
}

/// Current tool, active layers and the active grab (brush/clipboard)
#[derive(Debug, Default)]
pub struct ToolController {
    tool: EditorTool,
    layers: LayerMask,
    active_grab: Option<TileGrab>,
    selection_start: Option<TileCoord>,
    gesture: Option<Gesture>,
}

impl ToolController {
    pub fn new(tool: EditorTool, layers: LayerMask) -> Self {
        Self {
            tool,
            layers,
            ..Default::default()
        }
    }

    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: EditorTool) {
        self.tool = tool;
    }

    pub fn layers(&self) -> LayerMask {
        self.layers
    }

    /// Change the active layers. Choosing one foreground side moves a lone
    /// 1x1 tile captured on the other side over to it.
    pub fn set_layers(&mut self, layers: LayerMask) {
        self.layers = layers;
        if let (Some(layer), Some(grab)) = (layers.single(), self.active_grab.as_mut()) {
            grab.swap_foreground_side(layer);
        }
    }

    pub fn active_grab(&self) -> Option<&TileGrab> {
        self.active_grab.as_ref()
    }

    /// Replace the active grab, e.g. with a structure from the library
    pub fn set_active_grab(&mut self, grab: TileGrab) {
        self.active_grab = Some(grab);
        self.selection_start = None;
    }

    pub fn clear_active_grab(&mut self) {
        self.active_grab = None;
        self.selection_start = None;
    }

    /// Anchor cell of the current or last rectangle selection
    pub fn selection_start(&self) -> Option<TileCoord> {
        self.selection_start
    }

    /// Whether a click has been seen without its release
    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Drop an unfinished gesture without recording it. Cells a draw stroke
    /// already stamped stay as they are.
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }

    /// Finish an unfinished gesture at its last cell, as if released there
    pub fn finish_gesture(&mut self, map: &mut MapGrid, log: &mut ActionLog) {
        if let Some(last) = self.last_cell() {
            self.release(last, map, log);
        }
    }

    /// Feed one input event. `tile` positions must lie on `map`; events for
    /// off-map tiles should not be sent (drags simply skip them).
    pub fn handle(
        &mut self,
        event: ToolEvent,
        map: &mut MapGrid,
        log: &mut ActionLog,
        palette: &mut dyn TilePalette,
    ) {
        match event {
            ToolEvent::Click(tile) => self.click(tile, map, log, palette),
            ToolEvent::Drag(tile) => self.drag(tile, map, palette),
            ToolEvent::Release(tile) => self.release(tile, map, log),
        }
    }

    fn click(
        &mut self,
        tile: TileCoord,
        map: &mut MapGrid,
        log: &mut ActionLog,
        palette: &mut dyn TilePalette,
    ) {
        if !map.contains(tile.x, tile.y) {
            return;
        }
        // A click without a release for the previous gesture finishes it first
        self.finish_gesture(map, log);

        self.gesture = match self.tool {
            EditorTool::Draw => self.begin_stroke(tile, map).map(Gesture::Draw),
            EditorTool::Select => {
                self.begin_selection(tile, map);
                Some(Gesture::Select { last: tile })
            }
            EditorTool::Sample => {
                self.sample(tile, map, palette);
                Some(Gesture::Sample { last: tile })
            }
            EditorTool::Erase => {
                self.begin_selection(tile, map);
                Some(Gesture::Erase {
                    layers: self.layers,
                    last: tile,
                })
            }
        };
    }

    fn drag(&mut self, tile: TileCoord, map: &mut MapGrid, palette: &mut dyn TilePalette) {
        if !map.contains(tile.x, tile.y) {
            return;
        }
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        match &mut gesture {
            Gesture::Draw(stroke) => {
                // Stamps land only on cells the pointer actually entered
                if stroke.last != tile {
                    stroke.last = tile;
                    if let Some(grab) = self.active_grab.as_ref() {
                        stamp(grab, stroke, map, tile);
                    }
                }
            }
            Gesture::Select { last } => {
                *last = tile;
                self.resize_selection(tile, map, self.layers);
            }
            Gesture::Sample { last } => {
                if *last != tile {
                    *last = tile;
                    self.sample(tile, map, palette);
                }
            }
            Gesture::Erase { layers, last } => {
                *last = tile;
                self.resize_selection(tile, map, *layers);
            }
        }
        self.gesture = Some(gesture);
    }

    fn release(&mut self, tile: TileCoord, map: &mut MapGrid, log: &mut ActionLog) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        let tile = if map.contains(tile.x, tile.y) {
            tile
        } else {
            match &gesture {
                Gesture::Draw(stroke) => stroke.last,
                Gesture::Select { last } | Gesture::Sample { last } | Gesture::Erase { last, .. } => {
                    *last
                }
            }
        };

        match gesture {
            Gesture::Draw(stroke) => finish_stroke(stroke, map, log),
            Gesture::Select { .. } => {
                self.resize_selection(tile, map, self.layers);
            }
            Gesture::Sample { .. } => {}
            Gesture::Erase { layers, .. } => {
                self.resize_selection(tile, map, layers);
                if let Some(before) = self.active_grab.clone() {
                    if before.is_empty() {
                        return;
                    }
                    before.erase(map, layers);
                    let after = before.cleared();
                    log.record(ActionKind::Erase, layers, before, after);
                }
            }
        }
    }

    fn last_cell(&self) -> Option<TileCoord> {
        self.gesture.as_ref().map(|gesture| match gesture {
            Gesture::Draw(stroke) => stroke.last,
            Gesture::Select { last } | Gesture::Sample { last } | Gesture::Erase { last, .. } => {
                *last
            }
        })
    }

    fn begin_stroke(&self, tile: TileCoord, map: &mut MapGrid) -> Option<DrawStroke> {
        let grab = self.active_grab.as_ref()?;
        if grab.is_empty() {
            return None;
        }
        let mut stroke = DrawStroke {
            layers: self.layers,
            snapshot: map.clone(),
            touched: None,
            last: tile,
        };
        stamp(grab, &mut stroke, map, tile);
        Some(stroke)
    }

    fn begin_selection(&mut self, tile: TileCoord, map: &MapGrid) {
        self.selection_start = Some(tile);
        self.active_grab = Some(TileGrab::from_single_tile(
            map,
            tile.x as u32,
            tile.y as u32,
            self.layers,
        ));
    }

    /// Re-read the whole rectangle from the live map
    fn resize_selection(&mut self, tile: TileCoord, map: &MapGrid, layers: LayerMask) {
        if let Some(start) = self.selection_start {
            self.active_grab = Some(TileGrab::from_drag(map, start, tile, layers));
        }
    }

    fn sample(&mut self, tile: TileCoord, map: &MapGrid, palette: &mut dyn TilePalette) {
        let Some(layer) = self.layers.single() else {
            return;
        };
        let id = map.get(layer, tile.x as u32, tile.y as u32);
        if let Some(grab) = palette.select(layer, id) {
            self.active_grab = Some(grab);
            self.selection_start = None;
        }
    }

    /// The single layer sampling would read, if the current mask names one
    pub fn sample_layer(&self) -> Option<Layer> {
        self.layers.single()
    }
}

fn stamp(grab: &TileGrab, stroke: &mut DrawStroke, map: &mut MapGrid, tile: TileCoord) {
    for layer in stroke.layers.layers() {
        for (dx, dy, _) in grab.cells(layer) {
            let x = tile.x + dx as i32;
            let y = tile.y + dy as i32;
            if map.contains(x, y) {
                stroke.touch(x as u32, y as u32);
            }
        }
    }
    grab.apply(map, tile.x, tile.y, stroke.layers, false);
}

fn finish_stroke(stroke: DrawStroke, map: &mut MapGrid, log: &mut ActionLog) {
    map.mark_dirty(stroke.layers);
    let Some((min_x, min_y, max_x, max_y)) = stroke.touched else {
        return;
    };
    let (width, height) = (max_x - min_x + 1, max_y - min_y + 1);
    let before = TileGrab::from_region(&stroke.snapshot, min_x, min_y, width, height, stroke.layers);
    let after = TileGrab::from_region(map, min_x, min_y, width, height, stroke.layers);
    log.record(ActionKind::Draw, stroke.layers, before, after);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::TilesetPalette;
    use isomap_core::{map_file, TileId};

    struct Session {
        tools: ToolController,
        map: MapGrid,
        log: ActionLog,
        palette: TilesetPalette,
    }

    impl Session {
        fn new(width: u32, height: u32) -> Self {
            Self {
                tools: ToolController::default(),
                map: MapGrid::new(width, height).unwrap(),
                log: ActionLog::new(),
                palette: TilesetPalette::default(),
            }
        }

        fn send(&mut self, event: ToolEvent) {
            self.tools
                .handle(event, &mut self.map, &mut self.log, &mut self.palette);
        }

        fn click(&mut self, x: i32, y: i32) {
            self.send(ToolEvent::Click(TileCoord::new(x, y)));
        }

        fn drag(&mut self, x: i32, y: i32) {
            self.send(ToolEvent::Drag(TileCoord::new(x, y)));
        }

        fn release(&mut self, x: i32, y: i32) {
            self.send(ToolEvent::Release(TileCoord::new(x, y)));
        }

        fn bg(&self, x: u32, y: u32) -> TileId {
            self.map.get(Layer::Background, x, y)
        }
    }

    #[test]
    fn test_draw_scenario_with_undo_and_save() {
        let mut session = Session::new(4, 4);
        session
            .tools
            .set_active_grab(TileGrab::single(Layer::Background, 7));
        session.tools.set_tool(EditorTool::Draw);

        session.click(1, 1);
        session.release(1, 1);
        session.click(2, 1);
        session.release(2, 1);

        assert_eq!(session.bg(1, 1), 7);
        assert_eq!(session.bg(2, 1), 7);
        assert_eq!(session.map.grid(Layer::Background).occupied(), 2);
        assert_eq!(session.log.undo_len(), 2);

        session.log.undo(&mut session.map);
        assert_eq!(session.bg(2, 1), 0);
        assert_eq!(session.bg(1, 1), 7);

        let bytes = map_file::encode(&session.map).unwrap();
        let loaded = map_file::decode(&bytes).unwrap();
        assert_eq!(loaded, session.map);
    }

    #[test]
    fn test_draw_stroke_is_one_record() {
        let mut session = Session::new(6, 6);
        session
            .tools
            .set_active_grab(TileGrab::single(Layer::Background, 3));
        session.tools.set_tool(EditorTool::Draw);

        session.click(0, 0);
        session.drag(1, 0);
        session.drag(1, 0);
        session.drag(3, 2);
        session.release(3, 2);

        assert_eq!(session.bg(0, 0), 3);
        assert_eq!(session.bg(1, 0), 3);
        // Skipped cells stay untouched
        assert_eq!(session.bg(2, 1), 0);
        assert_eq!(session.bg(3, 2), 3);
        assert_eq!(session.log.undo_len(), 1);

        let record = session.log.last().unwrap();
        assert_eq!(record.kind, ActionKind::Draw);
        assert_eq!((record.before.x, record.before.y), (0, 0));
        assert_eq!((record.before.width, record.before.height), (4, 3));

        session.log.undo(&mut session.map);
        assert_eq!(session.map.grid(Layer::Background).occupied(), 0);
    }

    #[test]
    fn test_draw_preserves_content_under_holes() {
        let mut session = Session::new(4, 4);
        session.map.set(Layer::Background, 1, 0, 9);
        let stamp = TileGrab::from_layers(2, 1, vec![5, 0], Vec::new(), Vec::new()).unwrap();
        session.tools.set_active_grab(stamp);
        session.tools.set_tool(EditorTool::Draw);

        session.click(0, 0);
        session.release(0, 0);
        assert_eq!(session.bg(0, 0), 5);
        assert_eq!(session.bg(1, 0), 9);

        session.log.undo(&mut session.map);
        assert_eq!(session.bg(0, 0), 0);
        assert_eq!(session.bg(1, 0), 9);
    }

    #[test]
    fn test_draw_without_grab_records_nothing() {
        let mut session = Session::new(4, 4);
        session.tools.set_tool(EditorTool::Draw);
        session.click(1, 1);
        session.release(1, 1);
        assert!(!session.log.can_undo());
        assert!(!session.tools.is_gesture_active());
    }

    #[test]
    fn test_select_drag_resamples_live_map() {
        let mut session = Session::new(5, 5);
        session.map.set(Layer::Background, 3, 3, 4);
        session.tools.set_tool(EditorTool::Select);

        session.click(3, 3);
        assert_eq!(session.tools.selection_start(), Some(TileCoord::new(3, 3)));
        assert_eq!(session.tools.active_grab().unwrap().ids(Layer::Background), &[4]);

        session.drag(4, 4);
        session.map.set(Layer::Background, 1, 1, 8);
        session.drag(1, 1);
        session.release(1, 2);

        let grab = session.tools.active_grab().unwrap();
        assert_eq!((grab.x, grab.y, grab.width, grab.height), (1, 2, 3, 2));
        assert_eq!(grab.ids(Layer::Background)[5], 4);
        assert!(!session.log.can_undo());
    }

    #[test]
    fn test_selection_becomes_draw_brush() {
        let mut session = Session::new(6, 6);
        session.map.set(Layer::Background, 0, 0, 1);
        session.map.set(Layer::Background, 1, 0, 2);
        session.tools.set_tool(EditorTool::Select);
        session.click(0, 0);
        session.drag(1, 0);
        session.release(1, 0);

        session.tools.set_tool(EditorTool::Draw);
        session.click(3, 4);
        session.release(3, 4);
        assert_eq!(session.bg(3, 4), 1);
        assert_eq!(session.bg(4, 4), 2);
    }

    #[test]
    fn test_erase_rectangle_and_undo() {
        let mut session = Session::new(4, 4);
        for x in 0..4 {
            session.map.set(Layer::Background, x, 1, 6);
            session.map.set(Layer::LeftForeground, x, 1, 2);
        }
        let original = session.map.clone();
        session.tools.set_tool(EditorTool::Erase);
        session.tools.set_layers(LayerMask::Background);

        session.click(1, 1);
        // Nothing changes until release
        assert_eq!(session.bg(1, 1), 6);
        session.drag(2, 1);
        session.release(2, 1);

        assert_eq!(session.bg(1, 1), 0);
        assert_eq!(session.bg(2, 1), 0);
        assert_eq!(session.bg(3, 1), 6);
        assert_eq!(session.map.get(Layer::LeftForeground, 1, 1), 2);

        let record = session.log.last().unwrap();
        assert_eq!(record.kind, ActionKind::Erase);
        assert_eq!(record.after.ids(Layer::Background), &[0, 0]);

        session.log.undo(&mut session.map);
        assert_eq!(session.map, original);
        session.log.redo(&mut session.map);
        assert_eq!(session.bg(2, 1), 0);
    }

    #[test]
    fn test_erase_keeps_layers_from_click() {
        let mut session = Session::new(4, 4);
        for x in 0..4 {
            session.map.set(Layer::Background, x, 1, 6);
            session.map.set(Layer::LeftForeground, x, 1, 2);
        }
        session.tools.set_tool(EditorTool::Erase);
        session.tools.set_layers(LayerMask::Background);

        session.click(1, 1);
        session.tools.set_layers(LayerMask::LeftForeground);
        session.drag(2, 1);
        session.release(2, 1);

        assert_eq!(session.bg(1, 1), 0);
        assert_eq!(session.bg(2, 1), 0);
        assert_eq!(session.map.get(Layer::LeftForeground, 1, 1), 2);
        assert_eq!(session.map.get(Layer::LeftForeground, 2, 1), 2);

        let record = session.log.last().unwrap();
        assert_eq!(record.layers, LayerMask::Background);
        assert_eq!(record.before.ids(Layer::Background), &[6, 6]);
        assert_eq!(session.log.undo_len(), 1);

        session.log.undo(&mut session.map);
        assert_eq!(session.bg(1, 1), 6);
        assert_eq!(session.bg(2, 1), 6);
    }

    #[test]
    fn test_finish_gesture_records_stroke() {
        let mut session = Session::new(4, 4);
        session
            .tools
            .set_active_grab(TileGrab::single(Layer::Background, 5));
        session.click(0, 0);
        session.drag(1, 0);

        session.tools.finish_gesture(&mut session.map, &mut session.log);
        assert!(!session.tools.is_gesture_active());
        assert_eq!(session.log.undo_len(), 1);

        // Nothing left to finish
        session.tools.finish_gesture(&mut session.map, &mut session.log);
        assert_eq!(session.log.undo_len(), 1);
    }

    #[test]
    fn test_sample_selects_palette_entry() {
        let mut session = Session::new(4, 4);
        session.palette.insert(Layer::LeftForeground, [11, 12]);
        session.map.set(Layer::LeftForeground, 2, 2, 12);
        session.map.set(Layer::LeftForeground, 3, 2, 40);
        session.tools.set_tool(EditorTool::Sample);
        session.tools.set_layers(LayerMask::LeftForeground);

        session.click(2, 2);
        let grab = session.tools.active_grab().unwrap();
        assert_eq!(grab.ids(Layer::LeftForeground), &[12]);

        // Unknown ids leave the brush alone
        session.drag(3, 2);
        session.release(3, 2);
        assert_eq!(
            session.tools.active_grab().unwrap().ids(Layer::LeftForeground),
            &[12]
        );
        assert!(!session.log.can_undo());
    }

    #[test]
    fn test_sample_needs_single_layer() {
        let mut session = Session::new(4, 4);
        session.palette.insert(Layer::Background, [3]);
        session.map.set(Layer::Background, 0, 0, 3);
        session.tools.set_tool(EditorTool::Sample);
        session.tools.set_layers(LayerMask::All);
        session.click(0, 0);
        assert!(session.tools.active_grab().is_none());

        session.tools.set_layers(LayerMask::Foreground);
        session.click(0, 0);
        assert!(session.tools.active_grab().is_none());
    }

    #[test]
    fn test_layer_switch_moves_single_foreground_tile() {
        let mut tools = ToolController::default();
        tools.set_active_grab(TileGrab::single(Layer::LeftForeground, 5));
        tools.set_layers(LayerMask::RightForeground);
        let grab = tools.active_grab().unwrap();
        assert!(grab.has_right());
        assert!(!grab.has_left());

        tools.set_layers(LayerMask::Foreground);
        assert!(tools.active_grab().unwrap().has_right());
    }

    #[test]
    fn test_gesture_follows_starting_tool() {
        let mut session = Session::new(4, 4);
        session.map.set(Layer::Background, 0, 0, 2);
        session.tools.set_tool(EditorTool::Erase);
        session.click(0, 0);
        session.tools.set_tool(EditorTool::Draw);
        session.release(0, 0);
        assert_eq!(session.bg(0, 0), 0);
        assert_eq!(session.log.last().unwrap().kind, ActionKind::Erase);
    }

    #[test]
    fn test_off_map_events_are_ignored() {
        let mut session = Session::new(3, 3);
        session
            .tools
            .set_active_grab(TileGrab::single(Layer::Background, 1));
        session.tools.set_tool(EditorTool::Draw);
        session.send(ToolEvent::Click(TileCoord::INVALID));
        assert!(!session.tools.is_gesture_active());

        session.click(2, 2);
        session.drag(5, 5);
        session.send(ToolEvent::Release(TileCoord::INVALID));
        assert_eq!(session.bg(2, 2), 1);
        assert_eq!(session.log.undo_len(), 1);
    }
}
