//! Repository submission grading.
//!
//! The model must answer with a `SCORE:` line; anything else is a parse
//! failure and the enrollment is left untouched.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::internships::prompts::build_grading_prompt;
use crate::llm_client::parser::ParseError;
use crate::llm_client::prompts::Locale;
use crate::llm_client::{generate_text, ContentKind, ContentRequest, TextGenerator};
use crate::models::internship::EnrollmentStatus;
use crate::store::{require_internship, Store};

const NO_FEEDBACK: &str = "No feedback provided.";

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub repo_link: String,
    pub time_taken_days: Option<i32>,
    pub difficulty_rating: Option<i32>,
    pub user_rating: Option<i32>,
}

impl Submission {
    fn validate(&self) -> Result<(), AppError> {
        let link = self.repo_link.trim();
        if link.is_empty() {
            return Err(AppError::Validation("repo_link is required".to_string()));
        }
        if !(link.starts_with("http://") || link.starts_with("https://")) {
            return Err(AppError::Validation(
                "repo_link must be an http(s) URL".to_string(),
            ));
        }
        if matches!(self.time_taken_days, Some(days) if days < 0) {
            return Err(AppError::Validation(
                "time_taken cannot be negative".to_string(),
            ));
        }
        for (name, rating) in [
            ("difficulty", self.difficulty_rating),
            ("user_rating", self.user_rating),
        ] {
            if matches!(rating, Some(r) if !(1..=5).contains(&r)) {
                return Err(AppError::Validation(format!(
                    "{name} must be between 1 and 5"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub score: i32,
    pub feedback: String,
}

/// Extracts `SCORE:` (clamped to 0..=100) and the `FEEDBACK:` section.
/// Labels match case-insensitively.
pub fn parse_grade(text: &str) -> Result<Grade, ParseError> {
    let lower = text.to_ascii_lowercase();

    let score_at = lower.find("score:").ok_or(ParseError::MissingLabel("SCORE"))?;
    let digits: String = text[score_at + "score:".len()..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let score = digits
        .parse::<u32>()
        .map_err(|_| ParseError::MissingLabel("SCORE"))?
        .min(100) as i32;

    let feedback = lower
        .find("feedback:")
        .map(|at| text[at + "feedback:".len()..].trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| NO_FEEDBACK.to_string());

    Ok(Grade { score, feedback })
}

pub async fn grade_submission(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    user_id: Uuid,
    internship_id: Uuid,
    submission: Submission,
    locale: Locale,
) -> Result<Grade, AppError> {
    submission.validate()?;
    let internship = require_internship(store, internship_id).await?;
    let repo_link = submission.repo_link.trim().to_string();

    let request = ContentRequest::new(
        ContentKind::Grading,
        internship_id.to_string(),
        build_grading_prompt(
            &repo_link,
            &internship.title,
            &internship.description,
            &internship.skills_learned,
            locale,
        ),
    );
    let text = generate_text(llm, &request).await?;
    let grade = parse_grade(&text)?;

    let mut enrollment = store.get_or_create_enrollment(user_id, internship_id).await?;
    enrollment.set_status(EnrollmentStatus::Graded);
    enrollment.repo_link = Some(repo_link);
    enrollment.time_taken_days = submission.time_taken_days;
    enrollment.difficulty_rating = submission.difficulty_rating;
    enrollment.user_rating = submission.user_rating;
    enrollment.ai_score = Some(grade.score);
    enrollment.ai_feedback = grade.feedback.clone();
    store.save_enrollment(&enrollment).await?;

    info!(
        "Graded submission for internship {internship_id} by user {user_id}: {}",
        grade.score
    );
    Ok(grade)
}
