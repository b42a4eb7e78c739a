//! Decision related database queries.

use crate::pool::{not_found, DbError, DbPool, DbResult};
use rusqlite::{params, Row};

/// Decision row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub context: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct DecisionChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub context: Option<&'a str>,
    pub is_active: Option<bool>,
}

const DECISION_COLUMNS: &str =
    "id, title, description, context, created_at, updated_at, is_active";

fn map_row(row: &Row<'_>) -> rusqlite::Result<DecisionRow> {
    Ok(DecisionRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        context: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        is_active: row.get(6)?,
    })
}

/// Insert a decision and return its new ID.
pub fn insert_decision(
    pool: &DbPool,
    title: &str,
    description: Option<&str>,
    context: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO decisions (title, description, context) VALUES (?1, ?2, ?3)",
            params![title, description, context],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a decision by ID regardless of its active flag.
pub fn get_decision(pool: &DbPool, id: i64) -> DbResult<DecisionRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {DECISION_COLUMNS} FROM decisions WHERE id = ?1"),
            params![id],
            map_row,
        )
        .map_err(not_found("Decision", id))
    })
}

/// Get an active (not soft-deleted) decision by ID.
pub fn get_active_decision(pool: &DbPool, id: i64) -> DbResult<DecisionRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {DECISION_COLUMNS} FROM decisions WHERE id = ?1 AND is_active = 1"),
            params![id],
            map_row,
        )
        .map_err(not_found("Decision", id))
    })
}

/// List active decisions, oldest first.
pub fn list_active_decisions(pool: &DbPool, skip: i64, limit: i64) -> DbResult<Vec<DecisionRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {DECISION_COLUMNS} FROM decisions
             WHERE is_active = 1
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2"
        ))?;

        let rows = stmt.query_map(params![limit, skip], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Count active decisions.
pub fn count_active_decisions(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM decisions WHERE is_active = 1", [], |row| row.get(0))
            .map_err(DbError::from)
    })
}

/// Apply a partial update to an active decision.
pub fn update_decision(pool: &DbPool, id: i64, changes: &DecisionChanges<'_>) -> DbResult<()> {
    pool.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE decisions SET
                 title = COALESCE(?1, title),
                 description = COALESCE(?2, description),
                 context = COALESCE(?3, context),
                 is_active = COALESCE(?4, is_active),
                 updated_at = datetime('now')
             WHERE id = ?5 AND is_active = 1",
            params![changes.title, changes.description, changes.context, changes.is_active, id],
        )?;

        if updated == 0 {
            return Err(DbError::NotFound(format!("Decision: {}", id)));
        }
        Ok(())
    })
}

/// Soft delete: mark a decision inactive. The row is kept.
pub fn deactivate_decision(pool: &DbPool, id: i64) -> DbResult<()> {
    update_decision(
        pool,
        id,
        &DecisionChanges {
            is_active: Some(false),
            ..Default::default()
        },
    )
}

/// All decision IDs, active or not, ascending.
pub fn list_decision_ids(pool: &DbPool) -> DbResult<Vec<i64>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT id FROM decisions ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Decisions created per calendar day since `since` (a `datetime()` string), ascending.
pub fn decisions_created_per_day(pool: &DbPool, since: &str) -> DbResult<Vec<(String, i64)>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT date(created_at) AS day, COUNT(*)
             FROM decisions
             WHERE created_at >= ?1
             GROUP BY day
             ORDER BY day ASC",
        )?;
        let rows = stmt.query_map(params![since], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
