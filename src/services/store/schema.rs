use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_time_slots_table(conn)?;
    run_time_slot_migrations(conn)?;
    create_indexes(conn)?;
    Ok(())
}

fn create_time_slots_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS time_slots (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            start_time INTEGER NOT NULL CHECK (start_time >= 0),
            end_time INTEGER NOT NULL CHECK (end_time <= 1440),
            duration INTEGER NOT NULL,
            category_id TEXT NOT NULL,
            title TEXT,
            description TEXT,
            color TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (start_time < end_time)
        )",
        [],
    )
    .context("Failed to create time_slots table")?;

    Ok(())
}

// Exercise fields arrived after the first schema version
fn run_time_slot_migrations(conn: &Connection) -> Result<()> {
    ensure_column(
        conn,
        "time_slots",
        "exercise_type_id",
        "ALTER TABLE time_slots ADD COLUMN exercise_type_id TEXT",
    )?;

    ensure_column(
        conn,
        "time_slots",
        "exercise_count",
        "ALTER TABLE time_slots ADD COLUMN exercise_count INTEGER",
    )?;

    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_time_slots_date ON time_slots(date, start_time)",
        [],
    )
    .context("Failed to create time_slots date index")?;
    Ok(())
}

/// Checks whether a column exists on a table.
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let exists: i32 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
            |row| row.get(0),
        )
        .context("Failed to inspect table info")?;

    Ok(exists > 0)
}

/// Adds a column if it does not already exist.
fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    if column_exists(conn, table, column)? {
        return Ok(());
    }

    log::info!("Migrating {}: adding column {}", table, column);
    conn.execute(ddl, [])
        .with_context(|| format!("Failed to add {}.{}", table, column))?;
    Ok(())
}
