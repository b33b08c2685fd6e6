use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Profile fields the generation pipeline reads. Owned by the identity
/// service; never written here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub occupation: String,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: i32,
    pub city: String,
    pub country: String,
}
