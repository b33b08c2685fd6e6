use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A generated job listing cached for one user. Replaced on every search.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScrapedJobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub source: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A normalized listing as cached in the shared cache and inserted per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScrapedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub source: String,
    pub description: String,
}
