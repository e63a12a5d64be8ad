//! Time slot model.
//!
//! A slot is a half-open `[start_time, end_time)` interval of minutes on a
//! single calendar day, assigned to a category. The serialized shape is the
//! camelCase JSON object exchanged with the slot store.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::validation::ValidationError;
use crate::utils::time::{format_range, DAY_MINUTES};

/// Opaque, immutable slot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(Uuid);

impl SlotId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its hyphenated string form.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Domain-specific extras carried by a slot but never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_count: Option<u32>,
}

impl SlotPayload {
    pub fn is_empty(&self) -> bool {
        self.exercise_type_id.is_none() && self.exercise_count.is_none()
    }
}

/// A contiguous interval on one day assigned to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: SlotId,
    pub date: NaiveDate,
    pub start_time: i32,
    pub end_time: i32,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub payload: SlotPayload,
}

impl TimeSlot {
    /// Create a slot with a fresh id and no display data.
    ///
    /// Only the intrinsic interval rules are checked here; overlap and
    /// duration policy belong to the validator.
    pub fn new(
        date: NaiveDate,
        start_time: i32,
        end_time: i32,
        category_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::builder()
            .date(date)
            .start_time(start_time)
            .end_time(end_time)
            .category(category_id)
            .build()
    }

    pub fn builder() -> TimeSlotBuilder {
        TimeSlotBuilder::new()
    }

    pub fn duration(&self) -> i32 {
        self.end_time - self.start_time
    }

    /// Half-open overlap test on the same day. Touching edges do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && self.end_time > other.start_time
    }

    pub fn contains_minute(&self, minute: i32) -> bool {
        self.start_time <= minute && minute < self.end_time
    }

    /// `HH:MM - HH:MM` label.
    pub fn time_range_label(&self) -> String {
        format_range(self.start_time, self.end_time)
    }

    /// Copy of this slot moved to a new interval, keeping id and display data.
    pub fn with_times(&self, start_time: i32, end_time: i32) -> Self {
        Self {
            start_time,
            end_time,
            ..self.clone()
        }
    }
}

/// Builder for slots with optional display fields.
#[derive(Debug, Default)]
pub struct TimeSlotBuilder {
    id: Option<SlotId>,
    date: Option<NaiveDate>,
    start_time: Option<i32>,
    end_time: Option<i32>,
    category_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    color: Option<String>,
    payload: SlotPayload,
}

impl TimeSlotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing identifier instead of generating one.
    pub fn id(mut self, id: SlotId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start_time(mut self, minutes: i32) -> Self {
        self.start_time = Some(minutes);
        self
    }

    pub fn end_time(mut self, minutes: i32) -> Self {
        self.end_time = Some(minutes);
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn exercise(mut self, type_id: impl Into<String>, count: u32) -> Self {
        self.payload = SlotPayload {
            exercise_type_id: Some(type_id.into()),
            exercise_count: Some(count),
        };
        self
    }

    /// Build the slot. Missing times default to an empty interval at
    /// midnight and are rejected as inverted; a missing date is today.
    pub fn build(self) -> Result<TimeSlot, ValidationError> {
        let start_time = self.start_time.unwrap_or(0);
        let end_time = self.end_time.unwrap_or(start_time);

        if start_time < 0 || end_time > DAY_MINUTES {
            return Err(ValidationError::OutOfBounds {
                start: start_time,
                end: end_time,
            });
        }
        if start_time >= end_time {
            return Err(ValidationError::InvertedInterval {
                start: start_time,
                end: end_time,
            });
        }

        Ok(TimeSlot {
            id: self.id.unwrap_or_default(),
            date: self
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            start_time,
            end_time,
            category_id: self.category_id.unwrap_or_default(),
            title: self.title,
            description: self.description,
            color: self.color,
            payload: self.payload,
        })
    }
}
