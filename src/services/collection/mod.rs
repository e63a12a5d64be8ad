//! Per-day slot collection.
//!
//! `DaySlots` owns the slots of one date, kept ordered by start time. Every
//! mutation runs through the validator, so the no-overlap invariant holds
//! for any instance reachable from safe code.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::category::TimeSlotCategory;
use crate::models::slot::{SlotId, TimeSlot};
use crate::services::validation::{validate, ValidationError, ValidationRules};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlots {
    date: NaiveDate,
    slots: Vec<TimeSlot>,
}

impl DaySlots {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            slots: Vec::new(),
        }
    }

    /// Build a day from loaded slots.
    ///
    /// Slots dated on other days are dropped with a warning. Overlapping or
    /// malformed input is rejected; duration limits are not applied to data
    /// that already exists.
    pub fn from_slots(
        date: NaiveDate,
        slots: impl IntoIterator<Item = TimeSlot>,
    ) -> Result<Self, ValidationError> {
        let mut day = Self::new(date);
        for slot in slots {
            if slot.date != date {
                log::warn!("Dropping slot {} dated {} from day {}", slot.id, slot.date, date);
                continue;
            }
            day.insert(slot, ValidationRules::structural())?;
        }
        Ok(day)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn as_slice(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Slot covering `minute`, if any.
    pub fn slot_at(&self, minute: i32) -> Option<&TimeSlot> {
        // Ordered and disjoint: the candidate is the last slot starting at or before `minute`
        let idx = self.slots.partition_point(|slot| slot.start_time <= minute);
        idx.checked_sub(1)
            .map(|i| &self.slots[i])
            .filter(|slot| slot.contains_minute(minute))
    }

    /// Add a new slot.
    pub fn insert(&mut self, slot: TimeSlot, rules: ValidationRules) -> Result<(), ValidationError> {
        if slot.date != self.date {
            return Err(ValidationError::WrongDate);
        }
        if self.get(slot.id).is_some() {
            return Err(ValidationError::DuplicateSlot(slot.id));
        }
        validate(&slot, &self.slots, rules)?;

        let idx = self.slots.partition_point(|s| s.start_time < slot.start_time);
        self.slots.insert(idx, slot);
        Ok(())
    }

    /// Replace the slot with the same id. Returns the previous version.
    pub fn replace(
        &mut self,
        slot: TimeSlot,
        rules: ValidationRules,
    ) -> Result<TimeSlot, ValidationError> {
        if slot.date != self.date {
            return Err(ValidationError::WrongDate);
        }
        let pos = self
            .slots
            .iter()
            .position(|s| s.id == slot.id)
            .ok_or(ValidationError::SlotNotFound(slot.id))?;
        validate(&slot, &self.slots, rules)?;

        let previous = self.slots.remove(pos);
        let idx = self.slots.partition_point(|s| s.start_time < slot.start_time);
        self.slots.insert(idx, slot);
        Ok(previous)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<TimeSlot> {
        let pos = self.slots.iter().position(|slot| slot.id == id)?;
        Some(self.slots.remove(pos))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Sum of all slot durations in minutes.
    pub fn total_minutes(&self) -> i32 {
        self.slots.iter().map(TimeSlot::duration).sum()
    }

    /// Minutes in slots whose category is flagged `is_track_time`.
    ///
    /// Slots with an unknown category id do not count.
    pub fn tracked_minutes(&self, categories: &[TimeSlotCategory]) -> i32 {
        self.slots
            .iter()
            .filter(|slot| {
                categories
                    .iter()
                    .any(|cat| cat.id == slot.category_id && cat.is_track_time)
            })
            .map(TimeSlot::duration)
            .sum()
    }

    /// Minutes per category id, ordered by id.
    pub fn minutes_by_category(&self) -> BTreeMap<&str, i32> {
        let mut totals = BTreeMap::new();
        for slot in &self.slots {
            *totals.entry(slot.category_id.as_str()).or_insert(0) += slot.duration();
        }
        totals
    }
}

impl<'a> IntoIterator for &'a DaySlots {
    type Item = &'a TimeSlot;
    type IntoIter = std::slice::Iter<'a, TimeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
