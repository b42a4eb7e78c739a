//! Event domain models.

use serde::{Deserialize, Serialize};
use weave_db::queries::events::EventRow;

/// Something that happened to a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub decision_id: i64,
    pub event_type: String,
    pub source: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

impl Event {
    /// Create from database row.
    pub fn from_row(row: EventRow) -> Self {
        Self {
            id: row.id,
            decision_id: row.decision_id,
            event_type: row.event_type,
            source: row.source,
            description: row.description,
            created_at: row.created_at,
        }
    }

    /// The event type, if it is one of the well-known kinds.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_str(&self.event_type)
    }
}

/// Payload for recording an event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub decision_id: i64,
    pub event_type: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Event types the dashboard knows how to present. Stored types are free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Proposed,
    Approved,
    Rejected,
    Implemented,
    OnHold,
    Review,
    Updated,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        Self::Proposed,
        Self::Approved,
        Self::Rejected,
        Self::Implemented,
        Self::OnHold,
        Self::Review,
        Self::Updated,
    ];

    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "proposed" => Some(Self::Proposed),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "implemented" => Some(Self::Implemented),
            "on_hold" | "on-hold" => Some(Self::OnHold),
            "review" => Some(Self::Review),
            "updated" => Some(Self::Updated),
            _ => None,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Implemented => "implemented",
            Self::OnHold => "on_hold",
            Self::Review => "review",
            Self::Updated => "updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_as_str() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_str("On-Hold"), Some(EventKind::OnHold));
        assert_eq!(EventKind::from_str("escalated"), None);
    }
}
