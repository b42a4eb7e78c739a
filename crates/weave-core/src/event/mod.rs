//! Events recorded against decisions.

pub mod model;

use crate::error::{WeaveError, WeaveResult};
use crate::page::Page;
use model::{Event, NewEvent};
use tracing::info;
use weave_db::queries::{decisions, events as queries};
use weave_db::{DbError, DbPool};

/// Maximum length of an event type tag.
pub const MAX_EVENT_TYPE_LEN: usize = 100;

/// Default page size when listing one decision's events.
pub const DECISION_EVENTS_LIMIT: i64 = 50;

/// Record an event against an active decision.
pub fn create_event(pool: &DbPool, new: &NewEvent) -> WeaveResult<Event> {
    let event_type = new.event_type.trim();
    if event_type.is_empty() {
        return Err(WeaveError::validation("Event type cannot be empty"));
    }
    if event_type.chars().count() > MAX_EVENT_TYPE_LEN {
        return Err(WeaveError::validation(format!(
            "Event type exceeds {} characters",
            MAX_EVENT_TYPE_LEN
        )));
    }

    decisions::get_active_decision(pool, new.decision_id).map_err(|e| match e {
        DbError::NotFound(_) => WeaveError::DecisionNotFound(new.decision_id),
        e => WeaveError::Database(e),
    })?;

    let id = queries::insert_event(
        pool,
        new.decision_id,
        event_type,
        new.source.as_deref(),
        new.description.as_deref(),
    )?;
    info!(event_id = id, decision_id = new.decision_id, event_type, "Event recorded");

    get_event(pool, id)
}

/// Get an event by ID.
pub fn get_event(pool: &DbPool, id: i64) -> WeaveResult<Event> {
    let row = queries::get_event(pool, id).map_err(|e| match e {
        DbError::NotFound(_) => WeaveError::EventNotFound(id),
        e => WeaveError::Database(e),
    })?;
    Ok(Event::from_row(row))
}

/// List all events.
pub fn list_events(pool: &DbPool, page: Page) -> WeaveResult<Vec<Event>> {
    let page = page.normalized();
    let rows = queries::list_events(pool, page.skip, page.limit)?;
    Ok(rows.into_iter().map(Event::from_row).collect())
}

/// Most recent events, newest first.
pub fn list_recent_events(pool: &DbPool, limit: i64) -> WeaveResult<Vec<Event>> {
    let limit = Page::new(0, limit).normalized().limit;
    let rows = queries::list_recent_events(pool, limit)?;
    Ok(rows.into_iter().map(Event::from_row).collect())
}

/// Events of one decision, oldest first.
pub fn list_events_for_decision(pool: &DbPool, decision_id: i64, page: Page) -> WeaveResult<Vec<Event>> {
    let page = page.normalized();
    let rows = queries::list_events_for_decision(pool, decision_id, page.skip, page.limit)?;
    Ok(rows.into_iter().map(Event::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{self, model::NewDecision};

    fn setup() -> (DbPool, i64) {
        let pool = DbPool::in_memory().unwrap();
        weave_db::run_migrations(&pool).unwrap();
        let d = decision::create_decision(
            &pool,
            &NewDecision {
                title: "Launch v2".to_string(),
                description: None,
                context: None,
            },
        )
        .unwrap();
        (pool, d.id)
    }

    fn new_event(decision_id: i64, event_type: &str) -> NewEvent {
        NewEvent {
            decision_id,
            event_type: event_type.to_string(),
            source: None,
            description: None,
        }
    }

    #[test]
    fn test_create_event() {
        let (pool, decision_id) = setup();
        let event = create_event(&pool, &new_event(decision_id, " approved ")).unwrap();
        assert_eq!(event.event_type, "approved");
        assert_eq!(event.decision_id, decision_id);
        assert_eq!(event.kind(), Some(model::EventKind::Approved));
    }

    #[test]
    fn test_create_event_for_missing_or_inactive_decision() {
        let (pool, decision_id) = setup();
        assert!(matches!(
            create_event(&pool, &new_event(999, "approved")),
            Err(WeaveError::DecisionNotFound(999))
        ));

        decision::delete_decision(&pool, decision_id).unwrap();
        assert!(matches!(
            create_event(&pool, &new_event(decision_id, "approved")),
            Err(WeaveError::DecisionNotFound(_))
        ));
    }

    #[test]
    fn test_create_event_rejects_blank_type() {
        let (pool, decision_id) = setup();
        assert!(matches!(
            create_event(&pool, &new_event(decision_id, "")),
            Err(WeaveError::ValidationError(_))
        ));
    }

    #[test]
    fn test_list_events_for_decision() {
        let (pool, decision_id) = setup();
        create_event(&pool, &new_event(decision_id, "proposed")).unwrap();
        create_event(&pool, &new_event(decision_id, "approved")).unwrap();

        let events = list_events_for_decision(&pool, decision_id, Page::new(0, DECISION_EVENTS_LIMIT)).unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["proposed", "approved"]);

        assert!(matches!(get_event(&pool, 404), Err(WeaveError::EventNotFound(404))));
    }
}
