//! Account data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account ID type
pub type AccountId = Uuid;

/// Account model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    /// Cumulative points from finished tournaments, never negative
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
}
