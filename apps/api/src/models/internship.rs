use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A learning resource attached to an internship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

/// One multiple-choice exam question. `correct` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
}

impl QuizQuestion {
    pub const OPTION_COUNT: usize = 4;

    /// Non-empty text, exactly four options, and an in-range answer index.
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == Self::OPTION_COUNT
            && self.correct < self.options.len()
    }
}

/// Questions stored on an internship. The variant is chosen when the set is
/// written and persisted as the `kind` discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum QuestionSet {
    /// Free-text interview prompts produced with the internship itself.
    Interview(Vec<String>),
    /// The graded multiple-choice exam.
    Quiz(Vec<QuizQuestion>),
}

impl Default for QuestionSet {
    fn default() -> Self {
        QuestionSet::Interview(Vec::new())
    }
}

impl QuestionSet {
    /// The stored quiz, if one with at least `min_len` questions exists.
    pub fn quiz(&self, min_len: usize) -> Option<&[QuizQuestion]> {
        match self {
            QuestionSet::Quiz(items) if items.len() >= min_len => Some(items),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InternshipRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub min_days: i32,
    pub max_days: i32,
    pub description: String,
    pub skills_learned: String,
    pub ai_generated_text: String,
    pub resource_links: Json<Vec<ResourceLink>>,
    pub questions: Json<QuestionSet>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInternship {
    pub user_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub min_days: i32,
    pub max_days: i32,
    pub description: String,
    pub skills_learned: String,
    pub ai_generated_text: String,
    pub resource_links: Vec<ResourceLink>,
    pub questions: QuestionSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Enrolled,
    Graded,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "Enrolled",
            EnrollmentStatus::Graded => "Graded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnrollmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub internship_id: Uuid,
    pub status: String,
    pub repo_link: Option<String>,
    pub time_taken_days: Option<i32>,
    pub difficulty_rating: Option<i32>,
    pub user_rating: Option<i32>,
    pub ai_score: Option<i32>,
    pub ai_feedback: String,
    pub created_at: DateTime<Utc>,
}

impl EnrollmentRow {
    pub fn is_graded(&self) -> bool {
        self.status == EnrollmentStatus::Graded.as_str()
    }

    pub fn set_status(&mut self, status: EnrollmentStatus) {
        self.status = status.as_str().to_string();
    }
}
