//! Pointer gesture state machine.
//!
//! A gesture runs `Idle -> Dragging -> Idle`. `begin` captures the slot's
//! original geometry and the free window around it; `update` turns each
//! pointer sample into a snapped, clamped candidate; `commit` runs the
//! candidate through the validator; `cancel` drops it. Only one gesture is
//! active at a time.
//!
//! The free window is resolved once at pointer-down, so `update` does no
//! scanning or allocation and can run on every frame.

use thiserror::Error;

use crate::models::config::{ClickCreatePolicy, TimeTrackerConfig};
use crate::models::drag::{DragKind, DragOperation, ResizeEdge, TransientSlot};
use crate::models::slot::{SlotId, SlotPayload, TimeSlot};
use crate::services::boundary::free_window;
use crate::services::collection::DaySlots;
use crate::services::validation::{validate, ValidationError, ValidationRules};
use crate::utils::grid::snap;
use crate::utils::time::{offset_to_minutes, DAY_MINUTES};

/// Why a gesture could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("A gesture is already in progress")]
    AlreadyActive,
    #[error("Move and resize gestures need a slot")]
    MissingSlot,
    #[error("Slot belongs to a different day")]
    WrongDate,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// A create gesture produced a new slot
    Created(TimeSlot),
    /// A move or resize produced a new version of an existing slot
    Updated(TimeSlot),
    /// A move or resize released without movement
    Unchanged(TimeSlot),
    /// Nothing to commit
    Ignored,
}

impl Commit {
    pub fn slot(&self) -> Option<&TimeSlot> {
        match self {
            Commit::Created(slot) | Commit::Updated(slot) | Commit::Unchanged(slot) => Some(slot),
            Commit::Ignored => None,
        }
    }

    /// Whether the day needs to change.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Commit::Created(_) | Commit::Updated(_))
    }
}

/// Start a gesture.
///
/// `slot` is required for move and resize and ignored for create.
pub fn begin_operation(
    kind: DragKind,
    anchor_position: f32,
    anchor_time: i32,
    slot: Option<&TimeSlot>,
    day: &DaySlots,
    grid: i32,
) -> Result<DragOperation, GestureError> {
    let anchor_time = snap(anchor_time.clamp(0, DAY_MINUTES), grid).clamp(0, DAY_MINUTES);

    let (slot_id, original_start, original_end) = match (kind, slot) {
        (DragKind::Create, _) => (None, anchor_time, anchor_time),
        (_, Some(slot)) if slot.date != day.date() => return Err(GestureError::WrongDate),
        (_, Some(slot)) => (Some(slot.id), slot.start_time, slot.end_time),
        (_, None) => return Err(GestureError::MissingSlot),
    };

    let (floor, ceiling) = free_window(
        day.as_slice(),
        day.date(),
        original_start,
        original_end,
        slot_id,
    );

    Ok(DragOperation {
        kind,
        slot_id,
        date: day.date(),
        anchor_position,
        anchor_time,
        current_time: anchor_time,
        original_start,
        original_end,
        start: original_start,
        end: original_end,
        floor,
        ceiling,
        changed: false,
    })
}

/// Apply one pointer sample to `op` and return the candidate geometry.
pub fn update_operation(
    op: &mut DragOperation,
    pointer_position: f32,
    axis_length: f32,
    grid: i32,
) -> TransientSlot {
    let grid = grid.max(1);
    let time = snap(offset_to_minutes(pointer_position, axis_length), grid).clamp(0, DAY_MINUTES);
    op.current_time = time;

    let (start, end) = match op.kind {
        DragKind::Move => {
            let delta = (time - op.anchor_time)
                .clamp(op.floor - op.original_start, op.ceiling - op.original_end);
            (op.original_start + delta, op.original_end + delta)
        }
        DragKind::Resize(ResizeEdge::Bottom) => {
            let min_end = op.original_start + grid;
            let end = if min_end <= op.ceiling {
                time.clamp(min_end, op.ceiling)
            } else {
                op.original_end
            };
            (op.original_start, end)
        }
        DragKind::Resize(ResizeEdge::Top) => {
            let max_start = op.original_end - grid;
            let start = if op.floor <= max_start {
                time.clamp(op.floor, max_start)
            } else {
                op.original_start
            };
            (start, op.original_end)
        }
        DragKind::Create => {
            let (low, high) = if time < op.anchor_time {
                (time, op.anchor_time)
            } else {
                (op.anchor_time, time)
            };
            (low.max(op.floor), high.min(op.ceiling))
        }
    };

    op.start = start;
    op.end = end;
    if (start, end) != (op.original_start, op.original_end) {
        op.changed = true;
    }
    op.transient()
}

/// Finalise `op` against the current state of the day.
///
/// The day is not modified; the caller applies the returned slot.
pub fn commit_operation(
    op: &DragOperation,
    day: &DaySlots,
    config: &TimeTrackerConfig,
) -> Result<Commit, ValidationError> {
    if op.date != day.date() {
        return Err(ValidationError::WrongDate);
    }

    if !op.kind.edits_existing() {
        return commit_create(op, day, config);
    }
    let Some(id) = op.slot_id else {
        log::warn!("Edit gesture without a slot; nothing to commit");
        return Ok(Commit::Ignored);
    };

    let original = day.get(id).ok_or(ValidationError::SlotNotFound(id))?;
    if !op.changed {
        return Ok(Commit::Unchanged(original.clone()));
    }
    let updated = original.with_times(op.start, op.end);
    validate(&updated, day.as_slice(), ValidationRules::for_edit(config))?;
    Ok(Commit::Updated(updated))
}

fn commit_create(
    op: &DragOperation,
    day: &DaySlots,
    config: &TimeTrackerConfig,
) -> Result<Commit, ValidationError> {
    let (start, end) = if op.changed {
        (op.start, op.end)
    } else {
        match config.click_create {
            ClickCreatePolicy::Ignore => return Ok(Commit::Ignored),
            ClickCreatePolicy::Reject => {
                return Err(ValidationError::InvertedInterval {
                    start: op.start,
                    end: op.end,
                })
            }
            ClickCreatePolicy::ExpandToMinimum => {
                // Grow down from the anchor, or up from the ceiling when the
                // free window below the anchor is too short
                let length = config.grid_size.max(config.min_slot_duration);
                if op.anchor_time + length > op.ceiling {
                    (op.ceiling - length, op.ceiling)
                } else {
                    (op.anchor_time, op.anchor_time + length)
                }
            }
        }
    };

    let slot = TimeSlot {
        id: SlotId::new(),
        date: op.date,
        start_time: start,
        end_time: end,
        category_id: config.default_category_id.clone(),
        title: None,
        description: None,
        color: None,
        payload: SlotPayload::default(),
    };
    validate(&slot, day.as_slice(), ValidationRules::for_create(config))?;
    Ok(Commit::Created(slot))
}

/// Where the machine is in a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
}

/// Owns the single active gesture for one timeline axis.
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    grid: i32,
    axis_length: f32,
    active: Option<DragOperation>,
}

impl InteractionMachine {
    pub fn new(config: &TimeTrackerConfig, axis_length: f32) -> Self {
        Self {
            grid: config.grid_size,
            axis_length,
            active: None,
        }
    }

    pub fn axis_length(&self) -> f32 {
        self.axis_length
    }

    /// The axis may be resized between gestures (window resize).
    pub fn set_axis_length(&mut self, axis_length: f32) {
        self.axis_length = axis_length;
    }

    pub fn grid(&self) -> i32 {
        self.grid
    }

    pub fn phase(&self) -> GesturePhase {
        if self.active.is_some() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    pub fn active(&self) -> Option<&DragOperation> {
        self.active.as_ref()
    }

    /// Start a gesture. A second pointer-down while dragging is ignored and
    /// the active gesture is left untouched.
    pub fn begin(
        &mut self,
        kind: DragKind,
        anchor_position: f32,
        anchor_time: i32,
        slot: Option<&TimeSlot>,
        day: &DaySlots,
    ) -> Result<&DragOperation, GestureError> {
        if self.active.is_some() {
            log::debug!("Ignoring {:?} pointer-down during an active gesture", kind);
            return Err(GestureError::AlreadyActive);
        }
        let op = begin_operation(kind, anchor_position, anchor_time, slot, day, self.grid)?;
        log::debug!(
            "Gesture {:?} started at minute {} (window {}..{})",
            op.kind,
            op.anchor_time,
            op.floor,
            op.ceiling
        );
        Ok(self.active.insert(op))
    }

    /// Feed a pointer sample. `None` when no gesture is active.
    pub fn update(&mut self, pointer_position: f32) -> Option<TransientSlot> {
        let op = self.active.as_mut()?;
        Some(update_operation(op, pointer_position, self.axis_length, self.grid))
    }

    /// End the gesture and validate its result. The machine returns to idle
    /// whatever the outcome; on error the caller restores the original
    /// geometry.
    pub fn commit(
        &mut self,
        day: &DaySlots,
        config: &TimeTrackerConfig,
    ) -> Result<Commit, ValidationError> {
        let Some(op) = self.active.take() else {
            return Ok(Commit::Ignored);
        };
        let result = commit_operation(&op, day, config);
        match &result {
            Ok(commit) => log::debug!("Gesture {:?} committed: {:?}", op.kind, commit),
            Err(e) => log::debug!("Gesture {:?} rejected: {}", op.kind, e),
        }
        result
    }

    /// Drop the active gesture, if any.
    pub fn cancel(&mut self) -> Option<DragOperation> {
        let op = self.active.take();
        if let Some(op) = &op {
            log::debug!("Gesture {:?} cancelled", op.kind);
        }
        op
    }
}
