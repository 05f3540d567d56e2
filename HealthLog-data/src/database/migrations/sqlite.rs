use rusqlite::Connection;
use tracing::info;

/// Schema version written to `PRAGMA user_version` once all migrations ran
const SCHEMA_VERSION: i64 = 1;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    let version: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| format!("Failed to read schema version: {}", e))?;

    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    info!("Running SQLite migrations from version {}", version);

    if version < 1 {
        create_entries_table(conn)?;
        create_entries_date_index(conn)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| format!("Failed to record schema version: {}", e))?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the entries table
fn create_entries_table(conn: &Connection) -> Result<(), String> {
    info!("Creating entries table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT,
            note TEXT,
            blood_sugar REAL,
            systolic INTEGER,
            diastolic INTEGER,
            weight REAL,
            pulse INTEGER,
            carbs REAL,
            insulin_bolus REAL,
            insulin_basal REAL,
            sport_type TEXT,
            sport_minutes INTEGER
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on date for the newest-first listing
fn create_entries_date_index(conn: &Connection) -> Result<(), String> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_date
        ON entries (date DESC)",
        [],
    )
    .map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
