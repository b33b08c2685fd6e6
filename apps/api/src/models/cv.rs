use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_THEME: &str = "Modern";

/// The user's CV document. List sections are free-form JSON arrays shaped by
/// the client's editor.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CvProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary: String,
    pub skills: Json<Vec<Value>>,
    pub languages: Json<Vec<Value>>,
    pub custom_sections: Json<Vec<Value>>,
    pub custom_contacts: Json<Vec<Value>>,
    pub education_details: Json<Vec<Value>>,
    pub work_experience: Json<Vec<Value>>,
    pub theme: String,
    #[serde(rename = "last_updated")]
    pub updated_at: DateTime<Utc>,
}

/// One enrollment as listed on the CV, graded or still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CvInternship {
    pub title: String,
    pub description: String,
    pub score: Option<i32>,
    pub skills: String,
    pub status: String,
}
