use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::debug;

use crate::models::entry::{format_stored_date, parse_stored_date, Entry, EntryChanges, EntryData};
use super::errors::RepositoryError;

const SELECT_ENTRY: &str = "SELECT id, date, note, blood_sugar, systolic, diastolic, weight, pulse,
     carbs, insulin_bolus, insulin_basal, sport_type, sport_minutes
     FROM entries";

/// SQL operations on the entries table.
///
/// Every function runs synchronously on a connection already checked out of
/// the pool; callers decide where the blocking work happens.
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert a new entry and return it with its assigned id
    pub fn insert(conn: &Connection, data: &EntryData) -> Result<Entry, RepositoryError> {
        conn.execute(
            "INSERT INTO entries
             (date, note, blood_sugar, systolic, diastolic, weight, pulse,
              carbs, insulin_bolus, insulin_basal, sport_type, sport_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                data.date.as_ref().map(format_stored_date),
                data.note,
                data.blood_sugar,
                data.systolic,
                data.diastolic,
                data.weight,
                data.pulse,
                data.carbs,
                data.insulin_bolus,
                data.insulin_basal,
                data.sport_type,
                data.sport_minutes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted entry: id={}", id);

        Self::get_by_id(conn, id)?.ok_or(RepositoryError::NotFound(id))
    }

    /// Get an entry by id
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Entry>, RepositoryError> {
        let entry = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_ENTRY), [id], entry_from_row)
            .optional()?;

        Ok(entry)
    }

    /// Page through entries, newest date first; `take = None` returns everything after `skip`
    pub fn list(conn: &Connection, skip: u32, take: Option<u32>) -> Result<Vec<Entry>, RepositoryError> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = take.map(i64::from).unwrap_or(-1);

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY date DESC, id DESC LIMIT ?1 OFFSET ?2",
            SELECT_ENTRY
        ))?;

        let entries = stmt.query_map(params![limit, i64::from(skip)], entry_from_row)?;

        let mut result = Vec::new();
        for entry in entries {
            result.push(entry?);
        }

        Ok(result)
    }

    /// Overwrite every non-id column of an entry
    pub fn replace(conn: &Connection, id: i64, data: &EntryData) -> Result<Entry, RepositoryError> {
        let updated = conn.execute(
            "UPDATE entries SET
             date = ?1, note = ?2, blood_sugar = ?3, systolic = ?4, diastolic = ?5,
             weight = ?6, pulse = ?7, carbs = ?8, insulin_bolus = ?9, insulin_basal = ?10,
             sport_type = ?11, sport_minutes = ?12
             WHERE id = ?13",
            params![
                data.date.as_ref().map(format_stored_date),
                data.note,
                data.blood_sugar,
                data.systolic,
                data.diastolic,
                data.weight,
                data.pulse,
                data.carbs,
                data.insulin_bolus,
                data.insulin_basal,
                data.sport_type,
                data.sport_minutes,
                id,
            ],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Self::get_by_id(conn, id)?.ok_or(RepositoryError::NotFound(id))
    }

    /// Write the columns named in `changes`, leaving the others as they are
    pub fn apply_changes(conn: &Connection, id: i64, changes: &EntryChanges) -> Result<Entry, RepositoryError> {
        let date = format_stored_date(&changes.date);

        let mut assignments: Vec<&str> = vec!["date = ?", "note = ?"];
        let mut values: Vec<&dyn ToSql> = vec![&date as &dyn ToSql, &changes.note];

        if let Some(value) = &changes.blood_sugar {
            assignments.push("blood_sugar = ?");
            values.push(value);
        }
        if let Some(value) = &changes.systolic {
            assignments.push("systolic = ?");
            values.push(value);
        }
        if let Some(value) = &changes.diastolic {
            assignments.push("diastolic = ?");
            values.push(value);
        }
        if let Some(value) = &changes.pulse {
            assignments.push("pulse = ?");
            values.push(value);
        }
        if let Some(value) = &changes.weight {
            assignments.push("weight = ?");
            values.push(value);
        }
        if let Some(value) = &changes.sport_minutes {
            assignments.push("sport_minutes = ?");
            values.push(value);
        }
        if let Some(value) = &changes.insulin_bolus {
            assignments.push("insulin_bolus = ?");
            values.push(value);
        }
        values.push(&id);

        let query = format!("UPDATE entries SET {} WHERE id = ?", assignments.join(", "));
        let updated = conn.execute(&query, &values[..])?;

        if updated == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Self::get_by_id(conn, id)?.ok_or(RepositoryError::NotFound(id))
    }

    /// Delete an entry by id
    pub fn delete(conn: &Connection, id: i64) -> Result<(), RepositoryError> {
        let deleted = conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let date = match row.get::<_, Option<String>>(1)? {
        Some(text) => Some(parse_stored_date(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
        })?),
        None => None,
    };

    Ok(Entry {
        id: row.get(0)?,
        date,
        note: row.get(2)?,
        blood_sugar: row.get(3)?,
        systolic: row.get(4)?,
        diastolic: row.get(5)?,
        weight: row.get(6)?,
        pulse: row.get(7)?,
        carbs: row.get(8)?,
        insulin_bolus: row.get(9)?,
        insulin_basal: row.get(10)?,
        sport_type: row.get(11)?,
        sport_minutes: row.get(12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::run_sqlite_migrations;
    use chrono::{TimeZone, Utc};

    fn connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_sqlite_migrations(&conn).unwrap();
        conn
    }

    fn dated(day: u32) -> EntryData {
        EntryData {
            date: Some(Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap()),
            ..EntryData::default()
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = connection();
        let first = DatabaseStorage::insert(&conn, &EntryData::default()).unwrap();
        let second = DatabaseStorage::insert(&conn, &EntryData::default()).unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.date, None);
        assert_eq!(first.note, None);
    }

    #[test]
    fn test_list_orders_by_date_descending_with_undated_last() {
        let conn = connection();
        let undated = DatabaseStorage::insert(&conn, &EntryData::default()).unwrap();
        let old = DatabaseStorage::insert(&conn, &dated(1)).unwrap();
        let new = DatabaseStorage::insert(&conn, &dated(20)).unwrap();
        let middle = DatabaseStorage::insert(&conn, &dated(10)).unwrap();

        let all = DatabaseStorage::list(&conn, 0, None).unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![new.id, middle.id, old.id, undated.id]);

        let page = DatabaseStorage::list(&conn, 1, Some(2)).unwrap();
        let ids: Vec<i64> = page.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![middle.id, old.id]);
    }

    #[test]
    fn test_apply_changes_touches_only_named_columns() {
        let conn = connection();
        let created = DatabaseStorage::insert(
            &conn,
            &EntryData {
                blood_sugar: Some(140.0),
                pulse: Some(70),
                carbs: Some(45.0),
                ..dated(5)
            },
        )
        .unwrap();

        let mut changes = EntryChanges::new(Utc.with_ymd_and_hms(2024, 3, 6, 9, 30, 0).unwrap(), "");
        changes.blood_sugar = Some(Some(98.5));
        changes.pulse = Some(None);

        let updated = DatabaseStorage::apply_changes(&conn, created.id, &changes).unwrap();
        assert_eq!(updated.blood_sugar, Some(98.5));
        assert_eq!(updated.pulse, None);
        assert_eq!(updated.carbs, Some(45.0));
        assert_eq!(updated.note.as_deref(), Some(""));
        assert_eq!(updated.date, Some(changes.date));
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let conn = connection();

        assert!(matches!(
            DatabaseStorage::replace(&conn, 42, &EntryData::default()),
            Err(RepositoryError::NotFound(42))
        ));
        assert!(matches!(
            DatabaseStorage::apply_changes(&conn, 42, &EntryChanges::new(Utc::now(), "")),
            Err(RepositoryError::NotFound(42))
        ));
        assert!(matches!(
            DatabaseStorage::delete(&conn, 42),
            Err(RepositoryError::NotFound(42))
        ));
        assert!(DatabaseStorage::get_by_id(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_stored_date_is_an_error() {
        let conn = connection();
        conn.execute("INSERT INTO entries (date) VALUES ('yesterday')", []).unwrap();
        let id = conn.last_insert_rowid();

        assert!(matches!(
            DatabaseStorage::get_by_id(&conn, id),
            Err(RepositoryError::Sqlite(_))
        ));
    }
}
