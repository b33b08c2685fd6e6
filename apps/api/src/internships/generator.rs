//! Mock internship sets: generation, listing, enrollment and resource sync.
//!
//! Regeneration is partition-protected: internships referenced by any
//! enrollment (Enrolled or Graded) survive; only untouched ones are replaced.
//! Generation and parsing finish before anything is deleted.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::internships::prompts::build_internship_set_prompt;
use crate::llm_client::parser::ParseError;
use crate::llm_client::prompts::Locale;
use crate::llm_client::{generate_records, ContentKind, ContentRequest, TextGenerator};
use crate::models::internship::{
    EnrollmentRow, InternshipRow, NewInternship, QuestionSet, ResourceLink,
};
use crate::models::user::UserProfile;
use crate::resources::VideoSearch;
use crate::store::{require_internship, Store};

pub const INTERNSHIPS_PER_SET: usize = 5;
pub const DEFAULT_OCCUPATION: &str = "Software Developer";
pub const DEFAULT_IMAGE_URL: &str =
    "https://res.cloudinary.com/demo/image/upload/v1312461204/sample.jpg";
const MIN_DAYS: i64 = 7;
const MAX_DAYS: i64 = 30;

// ────────────────────────────────────────────────────────────────────────────
// AI payload (defaults applied at the deserialization boundary)
// ────────────────────────────────────────────────────────────────────────────

fn default_title() -> String {
    "Exciting Internship".to_string()
}

fn default_min_days() -> i64 {
    MIN_DAYS
}

fn default_max_days() -> i64 {
    MAX_DAYS
}

#[derive(Debug, Clone, Deserialize)]
pub struct InternshipPayload {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_min_days")]
    pub min_days: i64,
    #[serde(default = "default_max_days")]
    pub max_days: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_learned: String,
    #[serde(default)]
    pub ai_text: String,
    #[serde(default)]
    pub youtube_search_term: Option<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

impl InternshipPayload {
    pub fn search_term(&self) -> String {
        match self.youtube_search_term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_string(),
            _ => format!("{} tutorial", self.title),
        }
    }

    /// Both bounds clamped to 7..=30 with `min <= max`.
    pub fn day_range(&self) -> (i32, i32) {
        let a = self.min_days.clamp(MIN_DAYS, MAX_DAYS) as i32;
        let b = self.max_days.clamp(MIN_DAYS, MAX_DAYS) as i32;
        (a.min(b), a.max(b))
    }

    fn into_new_internship(self, user_id: Uuid, resource_links: Vec<ResourceLink>) -> NewInternship {
        let (min_days, max_days) = self.day_range();
        NewInternship {
            user_id,
            title: self.title,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            min_days,
            max_days,
            description: self.description,
            skills_learned: self.skills_learned,
            ai_generated_text: self.ai_text,
            resource_links,
            questions: QuestionSet::Interview(self.questions),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Projections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct InternshipSummary {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSet {
    pub created: Vec<InternshipSummary>,
    pub removed: u64,
}

/// An internship as shown to its owner, merged with their enrollment state.
#[derive(Debug, Clone, Serialize)]
pub struct InternshipView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub min_days: i32,
    pub max_days: i32,
    pub image_url: String,
    pub skills_learned: String,
    pub resource_links: Vec<ResourceLink>,
    pub ai_generated_text: String,
    /// "New" when the user has not enrolled.
    pub status: String,
    pub score: Option<i32>,
    pub feedback: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_internship_set(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    videos: &dyn VideoSearch,
    user: &UserProfile,
    locale: Locale,
) -> Result<GeneratedSet, AppError> {
    let occupation = match user.occupation.trim() {
        "" => DEFAULT_OCCUPATION,
        occupation => occupation,
    };
    info!("Generating internships for user {} ({occupation})", user.id);

    let request = ContentRequest::new(
        ContentKind::InternshipSet,
        user.id.to_string(),
        build_internship_set_prompt(occupation, locale),
    );
    let mut payloads = generate_records::<InternshipPayload>(llm, &request).await?;
    if payloads.is_empty() {
        return Err(ParseError::Empty.into());
    }
    payloads.truncate(INTERNSHIPS_PER_SET);

    let removed = store.delete_unenrolled_internships(user.id).await?;
    info!("Removed {removed} unenrolled internships for user {}", user.id);

    let mut created = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let links = videos.search(&payload.search_term()).await;
        let row = store
            .insert_internship(payload.into_new_internship(user.id, links))
            .await?;
        created.push(InternshipSummary {
            id: row.id,
            title: row.title,
        });
    }

    info!(
        "Created {} internships for user {}",
        created.len(),
        user.id
    );
    Ok(GeneratedSet { created, removed })
}

pub async fn list_internships(
    store: &dyn Store,
    user_id: Uuid,
) -> Result<Vec<InternshipView>, AppError> {
    let rows = store.list_internships(user_id).await?;
    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let enrollment = store.find_enrollment(user_id, row.id).await?;
        views.push(project(row, enrollment.as_ref()));
    }
    Ok(views)
}

fn project(row: InternshipRow, enrollment: Option<&EnrollmentRow>) -> InternshipView {
    InternshipView {
        id: row.id,
        title: row.title,
        description: row.description,
        min_days: row.min_days,
        max_days: row.max_days,
        image_url: row.image_url,
        skills_learned: row.skills_learned,
        resource_links: row.resource_links.0,
        ai_generated_text: row.ai_generated_text,
        status: enrollment
            .map(|e| e.status.clone())
            .unwrap_or_else(|| "New".to_string()),
        score: enrollment.and_then(|e| e.ai_score),
        feedback: enrollment.map(|e| e.ai_feedback.clone()),
    }
}

/// Get-or-create; returns the enrollment id.
pub async fn enroll(store: &dyn Store, user_id: Uuid, internship_id: Uuid) -> Result<Uuid, AppError> {
    require_internship(store, internship_id).await?;
    let enrollment = store.get_or_create_enrollment(user_id, internship_id).await?;
    info!("User {user_id} enrolled in internship {internship_id}");
    Ok(enrollment.id)
}

/// Re-runs the video lookup for an internship and stores the result.
pub async fn sync_resources(
    store: &dyn Store,
    videos: &dyn VideoSearch,
    internship_id: Uuid,
) -> Result<Vec<ResourceLink>, AppError> {
    let internship = require_internship(store, internship_id).await?;
    let links = videos
        .search(&format!("{} tutorial", internship.title))
        .await;
    store.set_internship_resources(internship_id, &links).await?;
    Ok(links)
}
