//! Neighbour boundaries for clamping live gestures.
//!
//! Given the slots of a day and the slot being dragged, find the nearest
//! edges a move or resize may reach without overlapping a neighbour.

use chrono::NaiveDate;

use crate::models::slot::{SlotId, TimeSlot};
use crate::utils::time::DAY_MINUTES;

/// Slots on `date` other than `exclude` and `current`.
fn neighbours<'a>(
    slots: &'a [TimeSlot],
    date: NaiveDate,
    current: Option<SlotId>,
    exclude: Option<SlotId>,
) -> impl Iterator<Item = &'a TimeSlot> + 'a {
    slots.iter().filter(move |slot| {
        slot.date == date && Some(slot.id) != current && Some(slot.id) != exclude
    })
}

/// Nearest neighbour start at or after `current.end_time`.
///
/// `None` means the slot may extend to the end of the day.
pub fn below_boundary(
    slots: &[TimeSlot],
    current: &TimeSlot,
    exclude_id: Option<SlotId>,
) -> Option<i32> {
    next_start_at_or_after(slots, current.date, current.end_time, Some(current.id), exclude_id)
}

/// Nearest neighbour end at or before `current.start_time`.
///
/// `None` means the slot may extend to the start of the day.
pub fn above_boundary(
    slots: &[TimeSlot],
    current: &TimeSlot,
    exclude_id: Option<SlotId>,
) -> Option<i32> {
    prev_end_at_or_before(slots, current.date, current.start_time, Some(current.id), exclude_id)
}

/// Resolve both boundaries around `[start, end)`, defaulting to the day edges.
///
/// Returns `(floor, ceiling)`.
pub fn free_window(
    slots: &[TimeSlot],
    date: NaiveDate,
    start: i32,
    end: i32,
    exclude_id: Option<SlotId>,
) -> (i32, i32) {
    let floor = prev_end_at_or_before(slots, date, start, None, exclude_id).unwrap_or(0);
    let ceiling = next_start_at_or_after(slots, date, end, None, exclude_id).unwrap_or(DAY_MINUTES);
    (floor, ceiling)
}

fn next_start_at_or_after(
    slots: &[TimeSlot],
    date: NaiveDate,
    minute: i32,
    current: Option<SlotId>,
    exclude: Option<SlotId>,
) -> Option<i32> {
    neighbours(slots, date, current, exclude)
        .map(|slot| slot.start_time)
        .filter(|start| *start >= minute)
        .min()
}

fn prev_end_at_or_before(
    slots: &[TimeSlot],
    date: NaiveDate,
    minute: i32,
    current: Option<SlotId>,
    exclude: Option<SlotId>,
) -> Option<i32> {
    neighbours(slots, date, current, exclude)
        .map(|slot| slot.end_time)
        .filter(|end| *end <= minute)
        .max()
}
