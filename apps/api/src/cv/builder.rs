//! CV builder: one editable document per user, returned together with the
//! profile and every internship the user has enrolled in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use tracing::info;

use crate::errors::AppError;
use crate::models::cv::{CvInternship, CvProfileRow};
use crate::models::user::UserProfile;
use crate::store::Store;

pub const MAX_THEME_LEN: usize = 50;

/// Partial update. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CvUpdate {
    pub summary: Option<String>,
    pub skills: Option<Value>,
    pub languages: Option<Value>,
    pub custom_sections: Option<Value>,
    pub custom_contacts: Option<Value>,
    pub education_details: Option<Value>,
    pub work_experience: Option<Value>,
    pub theme: Option<String>,
}

fn list_field(name: &str, value: Option<Value>) -> Result<Option<Json<Vec<Value>>>, AppError> {
    match value {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(Json(items))),
        Some(_) => Err(AppError::Validation(format!("{name} must be a list"))),
    }
}

fn theme_field(value: Option<String>) -> Result<Option<String>, AppError> {
    let Some(theme) = value else {
        return Ok(None);
    };
    let theme = theme.trim();
    if theme.is_empty() || theme.chars().count() > MAX_THEME_LEN {
        return Err(AppError::Validation(format!(
            "theme must be 1 to {MAX_THEME_LEN} characters"
        )));
    }
    Ok(Some(theme.to_string()))
}

impl CvUpdate {
    /// Checks every field before writing any, so a rejected update leaves
    /// `cv` untouched.
    pub fn apply(self, cv: &mut CvProfileRow) -> Result<(), AppError> {
        let skills = list_field("skills", self.skills)?;
        let languages = list_field("languages", self.languages)?;
        let custom_sections = list_field("custom_sections", self.custom_sections)?;
        let custom_contacts = list_field("custom_contacts", self.custom_contacts)?;
        let education_details = list_field("education_details", self.education_details)?;
        let work_experience = list_field("work_experience", self.work_experience)?;
        let theme = theme_field(self.theme)?;

        if let Some(summary) = self.summary {
            cv.summary = summary;
        }
        if let Some(skills) = skills {
            cv.skills = skills;
        }
        if let Some(languages) = languages {
            cv.languages = languages;
        }
        if let Some(sections) = custom_sections {
            cv.custom_sections = sections;
        }
        if let Some(contacts) = custom_contacts {
            cv.custom_contacts = contacts;
        }
        if let Some(education) = education_details {
            cv.education_details = education;
        }
        if let Some(experience) = work_experience {
            cv.work_experience = experience;
        }
        if let Some(theme) = theme {
            cv.theme = theme;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CvView {
    #[serde(flatten)]
    pub profile: CvProfileRow,
    pub internships: Vec<CvInternship>,
    pub user_details: UserProfile,
}

async fn assemble(
    store: &dyn Store,
    profile: CvProfileRow,
    user: UserProfile,
) -> Result<CvView, AppError> {
    let internships = store.cv_internships(user.id).await?;
    Ok(CvView {
        profile,
        internships,
        user_details: user,
    })
}

pub async fn get_cv(store: &dyn Store, user: UserProfile) -> Result<CvView, AppError> {
    let profile = store.get_or_create_cv(user.id).await?;
    assemble(store, profile, user).await
}

pub async fn update_cv(
    store: &dyn Store,
    user: UserProfile,
    update: CvUpdate,
) -> Result<CvView, AppError> {
    let mut profile = store.get_or_create_cv(user.id).await?;
    update.apply(&mut profile)?;
    let profile = store.save_cv(&profile).await?;
    info!("Saved CV for user {}", user.id);
    assemble(store, profile, user).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::models::cv::DEFAULT_THEME;
    use crate::models::internship::{EnrollmentStatus, NewInternship, QuestionSet};
    use crate::store::memory::MemoryStore;
    use crate::testing::{sample_user, Journal};

    fn internship(user_id: Uuid, title: &str) -> NewInternship {
        NewInternship {
            user_id,
            title: title.into(),
            image_url: String::new(),
            min_days: 7,
            max_days: 14,
            description: format!("Build a {title}"),
            skills_learned: "Rust, SQL".into(),
            ai_generated_text: String::new(),
            resource_links: vec![],
            questions: QuestionSet::Interview(vec![]),
        }
    }

    #[tokio::test]
    async fn test_first_read_creates_empty_cv_once() {
        let store = MemoryStore::new();
        let user = sample_user("Backend Engineer");

        let first = get_cv(&store, user.clone()).await.unwrap();
        let second = get_cv(&store, user.clone()).await.unwrap();

        assert_eq!(first.profile.id, second.profile.id);
        assert_eq!(first.profile.theme, DEFAULT_THEME);
        assert!(first.profile.skills.0.is_empty());
        assert_eq!(first.user_details.id, user.id);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let store = MemoryStore::new();
        let user = sample_user("Backend Engineer");
        let update = CvUpdate {
            summary: Some("Rust developer".into()),
            skills: Some(json!(["Rust", "Postgres"])),
            ..CvUpdate::default()
        };
        update_cv(&store, user.clone(), update).await.unwrap();

        let update = CvUpdate {
            theme: Some("Classic".into()),
            ..CvUpdate::default()
        };
        let cv = update_cv(&store, user, update).await.unwrap();

        assert_eq!(cv.profile.summary, "Rust developer");
        assert_eq!(cv.profile.skills.0, vec![json!("Rust"), json!("Postgres")]);
        assert_eq!(cv.profile.theme, "Classic");
    }

    #[tokio::test]
    async fn test_invalid_update_writes_nothing() {
        let journal = Journal::default();
        let store = MemoryStore::with_journal(journal.clone());
        let user = sample_user("Backend Engineer");
        let update = CvUpdate {
            summary: Some("changed".into()),
            languages: Some(json!("English")),
            ..CvUpdate::default()
        };

        let err = update_cv(&store, user.clone(), update).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(!journal.entries().contains(&"save_cv".to_string()));
        assert_eq!(get_cv(&store, user).await.unwrap().profile.summary, "");
    }

    #[test]
    fn test_theme_length_is_bounded() {
        assert!(theme_field(Some("x".repeat(MAX_THEME_LEN))).is_ok());
        assert!(theme_field(Some("x".repeat(MAX_THEME_LEN + 1))).is_err());
        assert!(theme_field(Some("   ".into())).is_err());
    }

    #[tokio::test]
    async fn test_lists_every_enrollment_newest_first() {
        let store = MemoryStore::new();
        let user = sample_user("Backend Engineer");
        let api = store.insert_internship(internship(user.id, "REST API")).await.unwrap();
        let cli = store.insert_internship(internship(user.id, "CLI Tool")).await.unwrap();
        store.insert_internship(internship(user.id, "Not Enrolled")).await.unwrap();

        let mut graded = store.get_or_create_enrollment(user.id, api.id).await.unwrap();
        graded.set_status(EnrollmentStatus::Graded);
        graded.ai_score = Some(88);
        store.save_enrollment(&graded).await.unwrap();
        store.get_or_create_enrollment(user.id, cli.id).await.unwrap();

        let cv = get_cv(&store, user).await.unwrap();

        let titles: Vec<_> = cv.internships.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["CLI Tool", "REST API"]);
        assert_eq!(cv.internships[0].status, "Enrolled");
        assert_eq!(cv.internships[1].score, Some(88));
        assert_eq!(cv.internships[1].skills, "Rust, SQL");
    }
}
