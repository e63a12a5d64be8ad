// Drag operation model
//
// Transient state for one pointer gesture on the day axis. Never persisted.

use chrono::NaiveDate;

use crate::models::slot::SlotId;

/// Which edge of a slot is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
}

/// What the gesture does to the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Create,
    Move,
    Resize(ResizeEdge),
}

impl DragKind {
    /// Move and resize operate on an existing slot.
    pub fn edits_existing(&self) -> bool {
        !matches!(self, DragKind::Create)
    }
}

/// State of one in-flight gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct DragOperation {
    pub kind: DragKind,
    /// Slot being moved or resized; `None` for create
    pub slot_id: Option<SlotId>,
    pub date: NaiveDate,
    /// Pointer offset at pointer-down
    pub anchor_position: f32,
    /// Snapped minute at pointer-down
    pub anchor_time: i32,
    /// Snapped minute of the latest pointer sample
    pub current_time: i32,
    pub original_start: i32,
    pub original_end: i32,
    /// Live candidate interval
    pub start: i32,
    pub end: i32,
    /// Nearest free edge before the slot (or 0), resolved at pointer-down
    pub floor: i32,
    /// Nearest free edge after the slot (or the day end), resolved at pointer-down
    pub ceiling: i32,
    /// Set once the candidate has differed from the original
    pub changed: bool,
}

impl DragOperation {
    /// Candidate geometry for drawing.
    pub fn transient(&self) -> TransientSlot {
        TransientSlot {
            slot_id: self.slot_id,
            start_time: self.start,
            end_time: self.end,
        }
    }

    /// Geometry to restore when the gesture is rejected.
    pub fn original(&self) -> TransientSlot {
        TransientSlot {
            slot_id: self.slot_id,
            start_time: self.original_start,
            end_time: self.original_end,
        }
    }
}

/// Candidate interval emitted on every pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransientSlot {
    pub slot_id: Option<SlotId>,
    pub start_time: i32,
    pub end_time: i32,
}

impl TransientSlot {
    pub fn duration(&self) -> i32 {
        self.end_time - self.start_time
    }
}
