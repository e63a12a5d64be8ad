//! Slot validation.
//!
//! The final gate every slot passes before it enters a day collection.
//! Rules run in a fixed order (bounds, ordering, duration, overlap) so the
//! first failure reported is deterministic.

use thiserror::Error;

use crate::models::config::TimeTrackerConfig;
use crate::models::slot::{SlotId, TimeSlot};
use crate::utils::time::{format_range, DAY_MINUTES};

/// Why a slot was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Slot {} is outside the day", clock_range(.start, .end))]
    OutOfBounds { start: i32, end: i32 },

    #[error("Slot start {start} must be before end {end}")]
    InvertedInterval { start: i32, end: i32 },

    #[error("Slot overlaps {} ({})", clock_range(.start, .end), .conflicting)]
    Overlap {
        conflicting: SlotId,
        start: i32,
        end: i32,
    },

    #[error("Slot duration {duration}m must be between {min}m and {max}m")]
    DurationOutOfRange { duration: i32, min: i32, max: i32 },

    #[error("Slot {0} not found")]
    SlotNotFound(SlotId),

    #[error("Slot {0} already exists")]
    DuplicateSlot(SlotId),

    #[error("Slot belongs to a different day")]
    WrongDate,
}

fn clock_range(start: &i32, end: &i32) -> String {
    format_range(*start, *end)
}

/// Which optional rules apply at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationRules {
    /// Inclusive `(min, max)` duration in minutes, when enforced
    pub duration: Option<(i32, i32)>,
}

impl ValidationRules {
    /// Structural rules only: bounds, ordering and overlap.
    pub fn structural() -> Self {
        Self { duration: None }
    }

    /// Rules for a newly created slot. Duration is always enforced.
    pub fn for_create(config: &TimeTrackerConfig) -> Self {
        Self {
            duration: Some((config.min_slot_duration, config.max_slot_duration)),
        }
    }

    /// Rules for a move or resize commit.
    pub fn for_edit(config: &TimeTrackerConfig) -> Self {
        if config.enforce_duration_on_edit {
            Self::for_create(config)
        } else {
            Self::structural()
        }
    }
}

/// Check `candidate` against `existing`.
///
/// Slots on other dates, and the slot sharing the candidate's id, are
/// ignored for the overlap rule.
pub fn validate(
    candidate: &TimeSlot,
    existing: &[TimeSlot],
    rules: ValidationRules,
) -> Result<(), ValidationError> {
    let (start, end) = (candidate.start_time, candidate.end_time);

    if start < 0 || end > DAY_MINUTES {
        return Err(ValidationError::OutOfBounds { start, end });
    }
    if start >= end {
        return Err(ValidationError::InvertedInterval { start, end });
    }

    if let Some((min, max)) = rules.duration {
        let duration = end - start;
        if duration < min || duration > max {
            return Err(ValidationError::DurationOutOfRange { duration, min, max });
        }
    }

    if let Some(other) = existing
        .iter()
        .filter(|other| other.id != candidate.id)
        .find(|other| candidate.overlaps(other))
    {
        return Err(ValidationError::Overlap {
            conflicting: other.id,
            start: other.start_time,
            end: other.end_time,
        });
    }

    Ok(())
}

pub fn is_valid(candidate: &TimeSlot, existing: &[TimeSlot], rules: ValidationRules) -> bool {
    validate(candidate, existing, rules).is_ok()
}
