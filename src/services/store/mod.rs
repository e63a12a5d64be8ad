//! Slot persistence.
//!
//! The editor only talks to storage through [`SlotStore`]. `SqliteSlotStore`
//! is the shipped implementation; the JSON helpers convert a day to and from
//! the wire shape used for import and export.

mod schema;
mod sqlite;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::slot::{SlotId, TimeSlot};
use crate::services::collection::DaySlots;

pub use sqlite::SqliteSlotStore;

/// Storage collaborator for slots.
#[cfg_attr(test, mockall::automock)]
pub trait SlotStore {
    /// All slots on `date`, ordered by start time.
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<TimeSlot>>;

    /// All slots from `start` to `end` inclusive, ordered by date then start
    /// time. Empty when `end` is before `start`.
    fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeSlot>>;

    /// Persist a new slot.
    fn save(&self, slot: &TimeSlot) -> Result<()>;

    /// Overwrite an existing slot. Fails when the id is unknown.
    fn update(&self, slot: &TimeSlot) -> Result<()>;

    /// Remove a slot. Fails when the id is unknown.
    fn delete(&self, id: SlotId) -> Result<()>;

    /// Remove every slot on `date`, returning how many were removed.
    fn delete_by_date(&self, date: NaiveDate) -> Result<usize>;
}

/// Serialise a day as a pretty JSON array of slots.
pub fn export_day_json(day: &DaySlots) -> Result<String> {
    serde_json::to_string_pretty(day.as_slice())
        .with_context(|| format!("Failed to serialise slots for {}", day.date()))
}

/// Parse a JSON array of slots into a day.
///
/// Slots dated on other days are dropped; overlapping input is an error.
pub fn import_day_json(date: NaiveDate, json: &str) -> Result<DaySlots> {
    let slots: Vec<TimeSlot> =
        serde_json::from_str(json).context("Failed to parse slot JSON")?;
    DaySlots::from_slots(date, slots)
        .with_context(|| format!("Imported slots for {} are inconsistent", date))
}

/// Write a day to a JSON file.
pub fn export_day_to_file(day: &DaySlots, path: &Path) -> Result<()> {
    let json = export_day_json(day)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {} slots to {}", day.len(), path.display());
    Ok(())
}

/// Read a day from a JSON file.
pub fn import_day_from_file(date: NaiveDate, path: &Path) -> Result<DaySlots> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    import_day_json(date, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn sample_day() -> DaySlots {
        DaySlots::from_slots(
            day(),
            vec![
                TimeSlot::new(day(), 540, 600, "work").unwrap(),
                TimeSlot::new(day(), 840, 900, "rest").unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_export_then_import_preserves_day() {
        let original = sample_day();
        let json = export_day_json(&original).unwrap();
        assert!(json.contains("\"startTime\": 540"));

        assert_eq!(import_day_json(day(), &json).unwrap(), original);
    }

    #[test]
    fn test_import_wire_shape() {
        let json = r#"[
            {
                "id": "6f1c1f5e-3c0a-4a8e-9d7e-2f4b8a1d9c01",
                "date": "2024-01-10",
                "startTime": 420,
                "endTime": 480,
                "categoryId": "exercise",
                "exerciseTypeId": "pushup",
                "exerciseCount": 30,
                "createdBy": "ignored"
            }
        ]"#;

        let imported = import_day_json(day(), json).unwrap();
        let slot = &imported.as_slice()[0];
        assert_eq!(slot.start_time, 420);
        assert_eq!(slot.payload.exercise_count, Some(30));
    }

    #[test]
    fn test_import_rejects_overlap() {
        let json = r#"[
            {"id": "6f1c1f5e-3c0a-4a8e-9d7e-2f4b8a1d9c01", "date": "2024-01-10",
             "startTime": 540, "endTime": 600, "categoryId": "work"},
            {"id": "6f1c1f5e-3c0a-4a8e-9d7e-2f4b8a1d9c02", "date": "2024-01-10",
             "startTime": 570, "endTime": 630, "categoryId": "work"}
        ]"#;

        let err = import_day_json(day(), json).unwrap_err();
        assert!(format!("{:#}", err).contains("overlaps"));
    }

    #[test]
    fn test_import_malformed_json() {
        assert!(import_day_json(day(), "{not json").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("2024-01-10.json");

        let original = sample_day();
        export_day_to_file(&original, &path).unwrap();
        assert_eq!(import_day_from_file(day(), &path).unwrap(), original);
    }

    #[test]
    fn test_mock_store_contract() {
        let mut store = MockSlotStore::new();
        store
            .expect_list_by_date()
            .withf(|date| *date == NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
            .returning(|_| Ok(Vec::new()));

        assert!(store.list_by_date(day()).unwrap().is_empty());
    }
}
