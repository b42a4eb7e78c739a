//! Decisions: create, read, update and soft delete.

pub mod model;

use crate::error::{WeaveError, WeaveResult};
use crate::page::Page;
use model::{Decision, DecisionUpdate, NewDecision};
use tracing::info;
use weave_db::queries::decisions::{self as queries, DecisionChanges};
use weave_db::{DbError, DbPool};

/// Maximum length of a decision title.
pub const MAX_TITLE_LEN: usize = 255;

fn validate_title(title: &str) -> WeaveResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(WeaveError::validation("Decision title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(WeaveError::validation(format!(
            "Decision title exceeds {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title)
}

fn map_missing(id: i64) -> impl FnOnce(DbError) -> WeaveError {
    move |e| match e {
        DbError::NotFound(_) => WeaveError::DecisionNotFound(id),
        e => WeaveError::Database(e),
    }
}

/// Create a new decision.
pub fn create_decision(pool: &DbPool, new: &NewDecision) -> WeaveResult<Decision> {
    let title = validate_title(&new.title)?;

    let id = queries::insert_decision(
        pool,
        title,
        new.description.as_deref(),
        new.context.as_deref(),
    )?;
    info!(decision_id = id, title, "Decision created");

    get_decision(pool, id)
}

/// Get an active decision by ID.
pub fn get_decision(pool: &DbPool, id: i64) -> WeaveResult<Decision> {
    let row = queries::get_active_decision(pool, id).map_err(map_missing(id))?;
    Ok(Decision::from_row(row))
}

/// List active decisions.
pub fn list_decisions(pool: &DbPool, page: Page) -> WeaveResult<Vec<Decision>> {
    let page = page.normalized();
    let rows = queries::list_active_decisions(pool, page.skip, page.limit)?;
    Ok(rows.into_iter().map(Decision::from_row).collect())
}

/// Update the provided fields of an active decision.
pub fn update_decision(pool: &DbPool, id: i64, update: &DecisionUpdate) -> WeaveResult<Decision> {
    let title = update.title.as_deref().map(validate_title).transpose()?;

    let changes = DecisionChanges {
        title,
        description: update.description.as_deref(),
        context: update.context.as_deref(),
        is_active: update.is_active,
    };
    queries::update_decision(pool, id, &changes).map_err(map_missing(id))?;
    info!(decision_id = id, "Decision updated");

    // A deactivating update leaves nothing active to return.
    let row = queries::get_decision(pool, id).map_err(map_missing(id))?;
    Ok(Decision::from_row(row))
}

/// Soft delete a decision. Returns `DecisionNotFound` if it is missing or already inactive.
pub fn delete_decision(pool: &DbPool, id: i64) -> WeaveResult<()> {
    queries::deactivate_decision(pool, id).map_err(map_missing(id))?;
    info!(decision_id = id, "Decision deactivated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        weave_db::run_migrations(&pool).unwrap();
        pool
    }

    fn new_decision(title: &str) -> NewDecision {
        NewDecision {
            title: title.to_string(),
            description: None,
            context: None,
        }
    }

    #[test]
    fn test_create_trims_title() {
        let pool = pool();
        let d = create_decision(&pool, &new_decision("  Launch v2  ")).unwrap();
        assert_eq!(d.title, "Launch v2");
        assert!(d.is_active);
    }

    #[test]
    fn test_create_rejects_blank_and_long_titles() {
        let pool = pool();
        assert!(matches!(
            create_decision(&pool, &new_decision("   ")),
            Err(WeaveError::ValidationError(_))
        ));
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            create_decision(&pool, &new_decision(&long)),
            Err(WeaveError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_and_delete() {
        let pool = pool();
        let d = create_decision(&pool, &new_decision("Draft")).unwrap();

        let updated = update_decision(
            &pool,
            d.id,
            &DecisionUpdate {
                description: Some("Ship in October".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.description.as_deref(), Some("Ship in October"));

        delete_decision(&pool, d.id).unwrap();
        assert!(matches!(get_decision(&pool, d.id), Err(WeaveError::DecisionNotFound(id)) if id == d.id));
        assert!(matches!(delete_decision(&pool, d.id), Err(WeaveError::DecisionNotFound(_))));
    }

    #[test]
    fn test_update_missing_decision() {
        let pool = pool();
        let err = update_decision(&pool, 7, &DecisionUpdate::default()).unwrap_err();
        assert!(err.is_not_found());
    }
}
