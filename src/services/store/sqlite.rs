// SQLite slot store
// One row per slot in `time_slots`; reads are per date or per date range.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::schema;
use super::SlotStore;
use crate::models::slot::{SlotId, SlotPayload, TimeSlot};
use crate::services::collection::DaySlots;

const SLOT_COLUMNS: &str = "id, date, start_time, end_time, category_id, title, description, \
                            color, exercise_type_id, exercise_count";

pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Open (or create) a store and make sure the schema is current.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file (or ":memory:" for in-memory)
    ///
    /// # Examples
    /// ```
    /// use day_timeline::services::store::SqliteSlotStore;
    /// let store = SqliteSlotStore::new(":memory:").unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path))?;
        schema::initialize_schema(&conn)?;
        log::info!("Opened slot store at {}", path);
        Ok(Self { conn })
    }

    /// Replace every stored slot on `day.date()` with the slots of `day`.
    ///
    /// Runs as one transaction; if any insert fails the stored day is left
    /// as it was. Returns how many slots were removed.
    pub fn replace_day(&mut self, day: &DaySlots) -> Result<usize> {
        let date = day.date();
        let tx = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        let removed = tx
            .execute("DELETE FROM time_slots WHERE date = ?1", params![date])
            .with_context(|| format!("Failed to clear slots for {}", date))?;
        for slot in day {
            insert_slot(&tx, slot)?;
        }
        tx.commit()
            .with_context(|| format!("Failed to replace slots for {}", date))?;

        log::info!("Replaced {} slots on {} with {}", removed, date, day.len());
        Ok(removed)
    }
}

fn insert_slot(conn: &Connection, slot: &TimeSlot) -> Result<()> {
    let sql = format!(
        "INSERT INTO time_slots ({}, duration)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        SLOT_COLUMNS
    );
    conn.execute(
        &sql,
        params![
            slot.id.to_string(),
            slot.date,
            slot.start_time,
            slot.end_time,
            slot.category_id,
            slot.title,
            slot.description,
            slot.color,
            slot.payload.exercise_type_id,
            slot.payload.exercise_count,
            slot.duration(),
        ],
    )
    .with_context(|| format!("Failed to insert slot {}", slot.id))?;
    Ok(())
}

fn slot_from_row(row: &Row<'_>) -> rusqlite::Result<TimeSlot> {
    let raw_id: String = row.get(0)?;
    let id = SlotId::parse(&raw_id).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("invalid slot id '{}'", raw_id).into(),
        )
    })?;

    Ok(TimeSlot {
        id,
        date: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        category_id: row.get(4)?,
        title: row.get(5)?,
        description: row.get(6)?,
        color: row.get(7)?,
        payload: SlotPayload {
            exercise_type_id: row.get(8)?,
            exercise_count: row.get(9)?,
        },
    })
}

impl SlotStore for SqliteSlotStore {
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<TimeSlot>> {
        let sql = format!(
            "SELECT {} FROM time_slots WHERE date = ?1 ORDER BY start_time ASC",
            SLOT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let slots = stmt.query_map(params![date], slot_from_row)?;

        slots
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to load slots for {}", date))
    }

    fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeSlot>> {
        let sql = format!(
            "SELECT {} FROM time_slots WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC, start_time ASC",
            SLOT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let slots = stmt.query_map(params![start, end], slot_from_row)?;

        slots
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to load slots for {} to {}", start, end))
    }

    fn save(&self, slot: &TimeSlot) -> Result<()> {
        insert_slot(&self.conn, slot)?;
        log::debug!("Saved slot {} on {}", slot.id, slot.date);
        Ok(())
    }

    fn update(&self, slot: &TimeSlot) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE time_slots
                 SET date = ?2, start_time = ?3, end_time = ?4, duration = ?5,
                     category_id = ?6, title = ?7, description = ?8, color = ?9,
                     exercise_type_id = ?10, exercise_count = ?11,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?1",
                params![
                    slot.id.to_string(),
                    slot.date,
                    slot.start_time,
                    slot.end_time,
                    slot.duration(),
                    slot.category_id,
                    slot.title,
                    slot.description,
                    slot.color,
                    slot.payload.exercise_type_id,
                    slot.payload.exercise_count,
                ],
            )
            .with_context(|| format!("Failed to update slot {}", slot.id))?;

        if rows == 0 {
            return Err(anyhow!("Slot {} not found", slot.id));
        }
        log::debug!("Updated slot {}", slot.id);
        Ok(())
    }

    fn delete(&self, id: SlotId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM time_slots WHERE id = ?1", params![id.to_string()])
            .with_context(|| format!("Failed to delete slot {}", id))?;

        if rows == 0 {
            return Err(anyhow!("Slot {} not found", id));
        }
        log::debug!("Deleted slot {}", id);
        Ok(())
    }

    fn delete_by_date(&self, date: NaiveDate) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM time_slots WHERE date = ?1", params![date])
            .with_context(|| format!("Failed to clear slots for {}", date))?;
        log::info!("Cleared {} slots on {}", rows, date);
        Ok(rows)
    }
}
