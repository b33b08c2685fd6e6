//! Relational persistence for everything the pipeline reads and writes.
//!
//! `AppState` holds an `Arc<dyn Store>`; production uses `PgStore`, tests use
//! the in-memory implementation.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::models::career::CareerPlanRow;
use crate::models::cv::{CvInternship, CvProfileRow};
use crate::models::internship::{
    EnrollmentRow, InternshipRow, NewInternship, QuestionSet, ResourceLink,
};
use crate::models::job::{NewScrapedJob, ScrapedJobRow};
use crate::models::local_vibe::{LocalVibeItem, LocalVibeRow};
use crate::models::todo::TodoRow;
use crate::models::user::UserProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait Store: Send + Sync {
    // ── Users ────────────────────────────────────────────────────────────────
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>>;

    // ── Career plans ────────────────────────────────────────────────────────
    async fn latest_career_plan(&self, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>>;
    async fn insert_career_plan(&self, user_id: Uuid, plan: &Value) -> StoreResult<CareerPlanRow>;

    // ── Internships ─────────────────────────────────────────────────────────
    async fn get_internship(&self, internship_id: Uuid) -> StoreResult<Option<InternshipRow>>;
    /// Newest first.
    async fn list_internships(&self, user_id: Uuid) -> StoreResult<Vec<InternshipRow>>;
    /// Deletes the user's internships that no enrollment references.
    /// Returns the number removed.
    async fn delete_unenrolled_internships(&self, user_id: Uuid) -> StoreResult<u64>;
    async fn insert_internship(&self, internship: NewInternship) -> StoreResult<InternshipRow>;
    async fn set_internship_questions(
        &self,
        internship_id: Uuid,
        questions: &QuestionSet,
    ) -> StoreResult<()>;
    async fn set_internship_resources(
        &self,
        internship_id: Uuid,
        links: &[ResourceLink],
    ) -> StoreResult<()>;

    // ── Enrollments ─────────────────────────────────────────────────────────
    async fn find_enrollment(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> StoreResult<Option<EnrollmentRow>>;
    /// Returns the existing enrollment or creates one with status `Enrolled`.
    async fn get_or_create_enrollment(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> StoreResult<EnrollmentRow>;
    async fn save_enrollment(&self, enrollment: &EnrollmentRow) -> StoreResult<()>;

    // ── Job listings ────────────────────────────────────────────────────────
    /// Deletes all of the user's listings, then inserts `jobs`.
    async fn replace_scraped_jobs(
        &self,
        user_id: Uuid,
        jobs: Vec<NewScrapedJob>,
    ) -> StoreResult<Vec<ScrapedJobRow>>;

    // ── Local vibes (city/country matched case-insensitively) ───────────────
    async fn find_local_vibe(&self, city: &str, country: &str) -> StoreResult<Option<LocalVibeRow>>;
    /// Deletes the row and returns what was deleted.
    async fn delete_local_vibe(&self, city: &str, country: &str)
        -> StoreResult<Option<LocalVibeRow>>;
    async fn upsert_local_vibe(
        &self,
        city: &str,
        country: &str,
        offers: &[LocalVibeItem],
    ) -> StoreResult<LocalVibeRow>;

    // ── Todos (always scoped to the owner) ──────────────────────────────────
    async fn create_todo(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
        is_urgent: bool,
    ) -> StoreResult<TodoRow>;
    /// Urgent first, then newest first.
    async fn list_todos(&self, user_id: Uuid) -> StoreResult<Vec<TodoRow>>;
    async fn toggle_todo_urgent(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<TodoRow>>;
    async fn complete_todo(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<TodoRow>>;
    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<bool>;

    // ── CV profiles (one per user) ──────────────────────────────────────────
    /// Returns the user's CV, creating an empty one on first access.
    async fn get_or_create_cv(&self, user_id: Uuid) -> StoreResult<CvProfileRow>;
    /// Writes every editable field and bumps `updated_at`.
    async fn save_cv(&self, cv: &CvProfileRow) -> StoreResult<CvProfileRow>;
    /// The user's enrollments joined with their internships, newest first.
    async fn cv_internships(&self, user_id: Uuid) -> StoreResult<Vec<CvInternship>>;
}

/// Loads a user profile or fails with `NotFound`.
pub async fn require_user(
    store: &dyn Store,
    user_id: Uuid,
) -> Result<UserProfile, crate::errors::AppError> {
    store
        .get_user(user_id)
        .await?
        .ok_or_else(|| crate::errors::AppError::NotFound(format!("User {user_id} not found")))
}

/// Loads an internship or fails with `NotFound`.
pub async fn require_internship(
    store: &dyn Store,
    internship_id: Uuid,
) -> Result<InternshipRow, crate::errors::AppError> {
    store
        .get_internship(internship_id)
        .await?
        .ok_or_else(|| crate::errors::AppError::NotFound("Internship not found".to_string()))
}
