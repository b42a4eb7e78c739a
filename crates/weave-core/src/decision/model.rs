//! Decision domain models.

use serde::{Deserialize, Serialize};
use weave_db::queries::decisions::DecisionRow;

/// A decision tracked by the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub context: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
}

impl Decision {
    /// Create from database row.
    pub fn from_row(row: DecisionRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            context: row.context,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_active: row.is_active,
        }
    }
}

/// Payload for creating a decision.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDecision {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub context: Option<String>,
    pub is_active: Option<bool>,
}
