use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerPlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Validated step array, as returned to the client.
    pub plan_details: Value,
    pub created_at: DateTime<Utc>,
}
