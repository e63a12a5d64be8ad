//! Slot categories.
//!
//! Categories are static configuration: an id referenced by slots, plus the
//! display name and colour used when projecting a slot onto the timeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::slot::TimeSlot;

/// Colour used when a slot references an unknown category.
pub const FALLBACK_CATEGORY_COLOR: &str = "#d9d9d9";
/// Name used when a slot references an unknown category.
pub const FALLBACK_CATEGORY_NAME: &str = "unknown";

/// A category slots can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotCategory {
    /// Stable identifier referenced by `TimeSlot::category_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// Hex color code (e.g. "#1677ff")
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether time in this category counts toward tracked totals
    #[serde(default)]
    pub is_track_time: bool,
}

impl TimeSlotCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            description: None,
            is_track_time: false,
        }
    }

    /// Mark the category as counting toward tracked time.
    pub fn tracked(mut self) -> Self {
        self.is_track_time = true;
        self
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.id.trim().is_empty() {
            return Err(CategoryValidationError::EmptyId);
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong);
        }
        if !is_valid_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryValidationError {
    #[error("Category id cannot be empty")]
    EmptyId,
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name must be 50 characters or less")]
    NameTooLong,
    #[error("Invalid color format '{0}' (use hex like #FF0000)")]
    InvalidColor(String),
}

/// Check if a string is a valid hex color code.
fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.trim().strip_prefix('#') else {
        return false;
    };
    // Accept 3, 6, or 8 character hex codes
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Colour for `category_id`, or [`FALLBACK_CATEGORY_COLOR`].
pub fn category_color<'a>(category_id: &str, categories: &'a [TimeSlotCategory]) -> &'a str {
    categories
        .iter()
        .find(|cat| cat.id == category_id)
        .map(|cat| cat.color.as_str())
        .unwrap_or(FALLBACK_CATEGORY_COLOR)
}

/// Display name for `category_id`, or [`FALLBACK_CATEGORY_NAME`].
pub fn category_name<'a>(category_id: &str, categories: &'a [TimeSlotCategory]) -> &'a str {
    categories
        .iter()
        .find(|cat| cat.id == category_id)
        .map(|cat| cat.name.as_str())
        .unwrap_or(FALLBACK_CATEGORY_NAME)
}

/// Colour to paint a slot with: its own colour wins over the category's.
pub fn slot_color<'a>(slot: &'a TimeSlot, categories: &'a [TimeSlotCategory]) -> &'a str {
    slot.color
        .as_deref()
        .unwrap_or_else(|| category_color(&slot.category_id, categories))
}

/// Categories that ship with the tracker.
pub fn default_categories() -> Vec<TimeSlotCategory> {
    vec![
        TimeSlotCategory::new("project", "Project", "#722ed1").tracked(),
        TimeSlotCategory::new("study", "Study", "#52c41a").tracked(),
        TimeSlotCategory::new("work", "Work", "#1677ff").tracked(),
        TimeSlotCategory::new("rest", "Rest", "#faad14"),
        TimeSlotCategory::new("entertainment", "Entertainment", "#eb2f96"),
        TimeSlotCategory::new("exercise", "Exercise", "#fa541c").tracked(),
        TimeSlotCategory::new("eat", "Eat", "#fa8c16"),
        TimeSlotCategory::new("wash", "Wash", "#13c2c2"),
        TimeSlotCategory::new("commuting", "Commuting", "#2f54eb"),
        TimeSlotCategory::new("finance-investment", "Finance", "#f5222d").tracked(),
        TimeSlotCategory::new("other", "Other", "#bfbfbf"),
    ]
}
