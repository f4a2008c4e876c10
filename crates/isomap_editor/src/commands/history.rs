//! Bounded undo/redo history of tile edits

use isomap_core::{LayerMask, MapGrid, TileGrab};
use std::collections::VecDeque;

/// Records kept per queue; older ones are discarded silently
pub const HISTORY_CAPACITY: usize = 20;

/// The kind of gesture that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Draw,
    Erase,
}

/// One completed gesture: the touched cells before and after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub layers: LayerMask,
    pub before: TileGrab,
    pub after: TileGrab,
}

/// Undo and redo queues for one map
#[derive(Debug, Default)]
pub struct ActionLog {
    undo_stack: VecDeque<ActionRecord>,
    redo_stack: VecDeque<ActionRecord>,
    /// Bumped on every change to the map made through the log
    revision: u64,
}

fn push_bounded(queue: &mut VecDeque<ActionRecord>, record: ActionRecord) {
    if queue.len() == HISTORY_CAPACITY {
        queue.pop_front();
    }
    queue.push_back(record);
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed gesture. Any redo history is dropped.
    pub fn record(&mut self, kind: ActionKind, layers: LayerMask, before: TileGrab, after: TileGrab) {
        push_bounded(
            &mut self.undo_stack,
            ActionRecord {
                kind,
                layers,
                before,
                after,
            },
        );
        self.redo_stack.clear();
        self.revision += 1;
    }

    /// Restore the cells of the newest record to their state before it.
    /// Returns the kind undone, or `None` when there is nothing to undo.
    pub fn undo(&mut self, map: &mut MapGrid) -> Option<ActionKind> {
        let record = self.undo_stack.pop_back()?;
        record.before.apply_in_place(map, record.layers, true);
        let kind = record.kind;
        push_bounded(&mut self.redo_stack, record);
        self.revision += 1;
        Some(kind)
    }

    /// Replay the newest undone record.
    /// Returns the kind redone, or `None` when there is nothing to redo.
    pub fn redo(&mut self, map: &mut MapGrid) -> Option<ActionKind> {
        let record = self.redo_stack.pop_back()?;
        match record.kind {
            ActionKind::Draw => {
                record.after.apply_in_place(map, record.layers, true);
            }
            ActionKind::Erase => {
                record.before.erase(map, record.layers);
            }
        }
        let kind = record.kind;
        push_bounded(&mut self.undo_stack, record);
        self.revision += 1;
        Some(kind)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Newest undoable record
    pub fn last(&self) -> Option<&ActionRecord> {
        self.undo_stack.back()
    }

    /// Undoable records, oldest first
    pub fn undo_records(&self) -> impl Iterator<Item = &ActionRecord> {
        self.undo_stack.iter()
    }

    /// Drop both queues
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
