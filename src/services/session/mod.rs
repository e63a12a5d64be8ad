//! One editable day.
//!
//! `DaySession` owns the day's slots, the gesture machine and the store
//! handle. Pointer events arrive in axis pixels; the session hit-tests them
//! against the drawn slots, drives the machine and applies committed
//! results to the collection before persisting them.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::config::TimeTrackerConfig;
use crate::models::drag::{DragKind, ResizeEdge, TransientSlot};
use crate::models::slot::{SlotId, TimeSlot};
use crate::services::collection::DaySlots;
use crate::services::interaction::{Commit, GestureError, InteractionMachine};
use crate::services::store::SlotStore;
use crate::services::validation::{ValidationError, ValidationRules};
use crate::utils::time::{offset_to_minutes, slot_extent};

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Empty,
    Body(SlotId),
    Edge(SlotId, ResizeEdge),
}

impl PointerTarget {
    /// Gesture a pointer-down here starts.
    pub fn drag_kind(&self) -> DragKind {
        match self {
            PointerTarget::Empty => DragKind::Create,
            PointerTarget::Body(_) => DragKind::Move,
            PointerTarget::Edge(_, edge) => DragKind::Resize(*edge),
        }
    }

    pub fn slot_id(&self) -> Option<SlotId> {
        match self {
            PointerTarget::Empty => None,
            PointerTarget::Body(id) | PointerTarget::Edge(id, _) => Some(*id),
        }
    }
}

/// Outcome of a pointer-up.
///
/// A store failure does not undo the in-memory change; it is logged and
/// carried here so the caller can surface it.
#[derive(Debug)]
pub struct SessionCommit {
    pub outcome: Commit,
    pub store_error: Option<anyhow::Error>,
}

impl SessionCommit {
    pub fn is_persisted(&self) -> bool {
        self.store_error.is_none()
    }
}

pub struct DaySession<S: SlotStore> {
    config: TimeTrackerConfig,
    day: DaySlots,
    machine: InteractionMachine,
    store: S,
}

impl<S: SlotStore> DaySession<S> {
    /// Load `date` from `store`.
    pub fn load(store: S, config: TimeTrackerConfig, date: NaiveDate, axis_length: f32) -> Result<Self> {
        let slots = store.list_by_date(date)?;
        let day = DaySlots::from_slots(date, slots)
            .with_context(|| format!("Stored slots for {} overlap", date))?;
        log::info!("Loaded {} slots for {}", day.len(), date);

        let machine = InteractionMachine::new(&config, axis_length);
        Ok(Self {
            config,
            day,
            machine,
            store,
        })
    }

    pub fn day(&self) -> &DaySlots {
        &self.day
    }

    pub fn config(&self) -> &TimeTrackerConfig {
        &self.config
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_axis_length(&mut self, axis_length: f32) {
        self.machine.set_axis_length(axis_length);
    }

    /// Find the slot body or edge under `position`.
    ///
    /// Edge handles extend `edge_handle_px` either side of a slot edge, capped
    /// at a quarter of the slot's height so short slots keep a body. Handles
    /// are resolved across every slot before bodies, so a neighbour's handle
    /// reaching into a short slot still wins. Where two handles meet, the
    /// nearer wins and ties go to the slot under the pointer.
    pub fn hit_test(&self, position: f32) -> PointerTarget {
        let axis = self.machine.axis_length();
        let mut nearest: Option<(f32, SlotId, ResizeEdge)> = None;
        let mut body = None;

        for slot in &self.day {
            let (top, height) = slot_extent(slot.start_time, slot.end_time, axis);
            let bottom = top + height;
            let handle = self.config.edge_handle_px.min(height / 4.0).max(0.0);
            let inside = position >= top && position < bottom;

            if position >= top + handle && position < bottom - handle {
                body = Some(slot.id);
            }

            for (edge, y) in [(ResizeEdge::Top, top), (ResizeEdge::Bottom, bottom)] {
                let distance = (position - y).abs();
                if distance > handle {
                    continue;
                }
                let closer = match nearest {
                    None => true,
                    Some((best, ..)) => distance < best || (distance == best && inside),
                };
                if closer {
                    nearest = Some((distance, slot.id, edge));
                }
            }
        }

        match (nearest, body) {
            (Some((_, id, edge)), _) => PointerTarget::Edge(id, edge),
            (None, Some(id)) => PointerTarget::Body(id),
            (None, None) => PointerTarget::Empty,
        }
    }

    /// Start a gesture at `position` and return the initial candidate.
    pub fn pointer_down(&mut self, position: f32) -> Result<TransientSlot, GestureError> {
        let target = self.hit_test(position);
        let anchor_time = offset_to_minutes(position, self.machine.axis_length());
        let slot = target.slot_id().and_then(|id| self.day.get(id));

        let op = self
            .machine
            .begin(target.drag_kind(), position, anchor_time, slot, &self.day)?;
        Ok(op.transient())
    }

    pub fn pointer_move(&mut self, position: f32) -> Option<TransientSlot> {
        self.machine.update(position)
    }

    /// Finish the gesture, apply it to the day and persist it.
    ///
    /// On `Err` nothing changed and the caller redraws the original geometry.
    pub fn pointer_up(&mut self) -> Result<SessionCommit, ValidationError> {
        let outcome = self.machine.commit(&self.day, &self.config)?;

        let store_error = match &outcome {
            Commit::Created(slot) => {
                self.day
                    .insert(slot.clone(), ValidationRules::for_create(&self.config))?;
                self.persist("save", slot, |store| store.save(slot))
            }
            Commit::Updated(slot) => {
                self.day
                    .replace(slot.clone(), ValidationRules::for_edit(&self.config))?;
                self.persist("update", slot, |store| store.update(slot))
            }
            Commit::Unchanged(_) | Commit::Ignored => None,
        };

        Ok(SessionCommit {
            outcome,
            store_error,
        })
    }

    /// Abandon the gesture. Returns the geometry to redraw, if one was active.
    pub fn cancel(&mut self) -> Option<TransientSlot> {
        self.machine.cancel().map(|op| op.original())
    }

    /// Delete a slot from the store, then from the day.
    pub fn delete(&mut self, id: SlotId) -> Result<Option<TimeSlot>> {
        if self.day.get(id).is_none() {
            return Ok(None);
        }
        if self.machine.active().and_then(|op| op.slot_id) == Some(id) {
            self.machine.cancel();
        }
        self.store.delete(id)?;
        Ok(self.day.remove(id))
    }

    /// Remove every slot of the day.
    pub fn clear_day(&mut self) -> Result<usize> {
        self.machine.cancel();
        let removed = self.store.delete_by_date(self.day.date())?;
        self.day.clear();
        Ok(removed)
    }

    /// Replace the in-memory day with what the store holds.
    pub fn reload(&mut self) -> Result<()> {
        self.machine.cancel();
        let date = self.day.date();
        let slots = self.store.list_by_date(date)?;
        self.day = DaySlots::from_slots(date, slots)
            .with_context(|| format!("Stored slots for {} overlap", date))?;
        Ok(())
    }

    fn persist(
        &self,
        action: &str,
        slot: &TimeSlot,
        write: impl FnOnce(&S) -> Result<()>,
    ) -> Option<anyhow::Error> {
        match write(&self.store) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Failed to {} slot {}: {:#}", action, slot.id, e);
                Some(e)
            }
        }
    }
}
