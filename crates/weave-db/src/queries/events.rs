//! Event related database queries.

use crate::pool::{not_found, DbError, DbPool, DbResult};
use rusqlite::{params, OptionalExtension, Row};

/// Event row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: i64,
    pub decision_id: i64,
    pub event_type: String,
    pub source: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

const EVENT_COLUMNS: &str = "id, decision_id, event_type, source, description, created_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        decision_id: row.get(1)?,
        event_type: row.get(2)?,
        source: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert an event and return its new ID.
pub fn insert_event(
    pool: &DbPool,
    decision_id: i64,
    event_type: &str,
    source: Option<&str>,
    description: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO events (decision_id, event_type, source, description)
             VALUES (?1, ?2, ?3, ?4)",
            params![decision_id, event_type, source, description],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get an event by ID.
pub fn get_event(pool: &DbPool, id: i64) -> DbResult<EventRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
            params![id],
            map_row,
        )
        .map_err(not_found("Event", id))
    })
}

/// List events in insertion order.
pub fn list_events(pool: &DbPool, skip: i64, limit: i64) -> DbResult<Vec<EventRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![limit, skip], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Most recent events first.
pub fn list_recent_events(pool: &DbPool, limit: i64) -> DbResult<Vec<EventRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Events of one decision, oldest first.
pub fn list_events_for_decision(
    pool: &DbPool,
    decision_id: i64,
    skip: i64,
    limit: i64,
) -> DbResult<Vec<EventRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE decision_id = ?1
             ORDER BY created_at ASC, id ASC
             LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt.query_map(params![decision_id, limit, skip], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// All event IDs, ascending.
pub fn list_event_ids(pool: &DbPool) -> DbResult<Vec<i64>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT id FROM events ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Total number of events.
pub fn count_events(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .map_err(DbError::from)
    })
}

/// Event count per type, most frequent first.
pub fn event_type_counts(pool: &DbPool) -> DbResult<Vec<(String, i64)>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT event_type, COUNT(*) AS n FROM events
             GROUP BY event_type
             ORDER BY n DESC, event_type ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Type of the newest event of a decision, if it has any.
pub fn latest_event_type(pool: &DbPool, decision_id: i64) -> DbResult<Option<String>> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT event_type FROM events
             WHERE decision_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            params![decision_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(DbError::from)
    })
}
