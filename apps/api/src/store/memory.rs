//! In-memory `Store` for tests. Mirrors the Postgres semantics the pipeline
//! relies on and records mutating calls in a shared journal so tests can
//! assert ordering against generator calls.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::models::career::CareerPlanRow;
use crate::models::cv::{CvInternship, CvProfileRow, DEFAULT_THEME};
use crate::models::internship::{
    EnrollmentRow, EnrollmentStatus, InternshipRow, NewInternship, QuestionSet, ResourceLink,
};
use crate::models::job::{NewScrapedJob, ScrapedJobRow};
use crate::models::local_vibe::{LocalVibeItem, LocalVibeRow};
use crate::models::todo::TodoRow;
use crate::models::user::UserProfile;
use crate::testing::Journal;

#[derive(Default)]
struct Tables {
    users: Vec<UserProfile>,
    career_plans: Vec<CareerPlanRow>,
    internships: Vec<InternshipRow>,
    enrollments: Vec<EnrollmentRow>,
    scraped_jobs: Vec<ScrapedJobRow>,
    local_vibes: Vec<LocalVibeRow>,
    todos: Vec<TodoRow>,
    cv_profiles: Vec<CvProfileRow>,
    /// Monotonic offset so rows created in one test have distinct timestamps.
    tick: i64,
}

impl Tables {
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.tick += 1;
        Utc::now() + Duration::milliseconds(self.tick)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    journal: Journal,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            tables: Mutex::default(),
            journal,
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn record(&self, entry: &str) {
        self.journal.push(entry);
    }

    pub fn add_user(&self, user: UserProfile) {
        self.tables().users.push(user);
    }

    pub fn internships(&self) -> Vec<InternshipRow> {
        self.tables().internships.clone()
    }

    pub fn scraped_jobs(&self, user_id: Uuid) -> Vec<ScrapedJobRow> {
        self.tables()
            .scraped_jobs
            .iter()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect()
    }
}

fn same_location(row: &LocalVibeRow, city: &str, country: &str) -> bool {
    row.city.eq_ignore_ascii_case(city) && row.country.eq_ignore_ascii_case(country)
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>> {
        Ok(self.tables().users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn latest_career_plan(&self, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>> {
        Ok(self
            .tables()
            .career_plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn insert_career_plan(&self, user_id: Uuid, plan: &Value) -> StoreResult<CareerPlanRow> {
        self.record("insert_career_plan");
        let mut tables = self.tables();
        let row = CareerPlanRow {
            id: Uuid::new_v4(),
            user_id,
            plan_details: plan.clone(),
            created_at: tables.now(),
        };
        tables.career_plans.push(row.clone());
        Ok(row)
    }

    async fn get_internship(&self, internship_id: Uuid) -> StoreResult<Option<InternshipRow>> {
        Ok(self
            .tables()
            .internships
            .iter()
            .find(|i| i.id == internship_id)
            .cloned())
    }

    async fn list_internships(&self, user_id: Uuid) -> StoreResult<Vec<InternshipRow>> {
        let mut rows: Vec<_> = self
            .tables()
            .internships
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn delete_unenrolled_internships(&self, user_id: Uuid) -> StoreResult<u64> {
        self.record("delete_unenrolled_internships");
        let mut tables = self.tables();
        let Tables {
            internships,
            enrollments,
            ..
        } = &mut *tables;
        let before = internships.len();
        internships.retain(|i| {
            i.user_id != user_id || enrollments.iter().any(|e| e.internship_id == i.id)
        });
        Ok((before - internships.len()) as u64)
    }

    async fn insert_internship(&self, internship: NewInternship) -> StoreResult<InternshipRow> {
        self.record("insert_internship");
        let mut tables = self.tables();
        let row = InternshipRow {
            id: Uuid::new_v4(),
            user_id: internship.user_id,
            title: internship.title,
            image_url: internship.image_url,
            min_days: internship.min_days,
            max_days: internship.max_days,
            description: internship.description,
            skills_learned: internship.skills_learned,
            ai_generated_text: internship.ai_generated_text,
            resource_links: Json(internship.resource_links),
            questions: Json(internship.questions),
            created_at: tables.now(),
        };
        tables.internships.push(row.clone());
        Ok(row)
    }

    async fn set_internship_questions(
        &self,
        internship_id: Uuid,
        questions: &QuestionSet,
    ) -> StoreResult<()> {
        self.record("set_internship_questions");
        if let Some(row) = self
            .tables()
            .internships
            .iter_mut()
            .find(|i| i.id == internship_id)
        {
            row.questions = Json(questions.clone());
        }
        Ok(())
    }

    async fn set_internship_resources(
        &self,
        internship_id: Uuid,
        links: &[ResourceLink],
    ) -> StoreResult<()> {
        self.record("set_internship_resources");
        if let Some(row) = self
            .tables()
            .internships
            .iter_mut()
            .find(|i| i.id == internship_id)
        {
            row.resource_links = Json(links.to_vec());
        }
        Ok(())
    }

    async fn find_enrollment(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> StoreResult<Option<EnrollmentRow>> {
        Ok(self
            .tables()
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.internship_id == internship_id)
            .cloned())
    }

    async fn get_or_create_enrollment(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> StoreResult<EnrollmentRow> {
        let mut tables = self.tables();
        if let Some(existing) = tables
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.internship_id == internship_id)
        {
            return Ok(existing.clone());
        }
        let row = EnrollmentRow {
            id: Uuid::new_v4(),
            user_id,
            internship_id,
            status: EnrollmentStatus::Enrolled.as_str().to_string(),
            repo_link: None,
            time_taken_days: None,
            difficulty_rating: None,
            user_rating: None,
            ai_score: None,
            ai_feedback: String::new(),
            created_at: tables.now(),
        };
        tables.enrollments.push(row.clone());
        Ok(row)
    }

    async fn save_enrollment(&self, enrollment: &EnrollmentRow) -> StoreResult<()> {
        self.record("save_enrollment");
        let mut tables = self.tables();
        match tables.enrollments.iter_mut().find(|e| e.id == enrollment.id) {
            Some(row) => {
                *row = enrollment.clone();
                Ok(())
            }
            None => Err(sqlx::Error::RowNotFound),
        }
    }

    async fn replace_scraped_jobs(
        &self,
        user_id: Uuid,
        jobs: Vec<NewScrapedJob>,
    ) -> StoreResult<Vec<ScrapedJobRow>> {
        self.record("replace_scraped_jobs");
        let mut tables = self.tables();
        tables.scraped_jobs.retain(|j| j.user_id != user_id);
        let mut rows = Vec::with_capacity(jobs.len());
        for job in jobs {
            let row = ScrapedJobRow {
                id: Uuid::new_v4(),
                user_id,
                title: job.title,
                company: job.company,
                location: job.location,
                link: job.link,
                source: job.source,
                description: job.description,
                created_at: tables.now(),
            };
            tables.scraped_jobs.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn find_local_vibe(&self, city: &str, country: &str) -> StoreResult<Option<LocalVibeRow>> {
        Ok(self
            .tables()
            .local_vibes
            .iter()
            .find(|v| same_location(v, city, country))
            .cloned())
    }

    async fn delete_local_vibe(
        &self,
        city: &str,
        country: &str,
    ) -> StoreResult<Option<LocalVibeRow>> {
        self.record("delete_local_vibe");
        let mut tables = self.tables();
        let position = tables
            .local_vibes
            .iter()
            .position(|v| same_location(v, city, country));
        Ok(position.map(|i| tables.local_vibes.remove(i)))
    }

    async fn upsert_local_vibe(
        &self,
        city: &str,
        country: &str,
        offers: &[LocalVibeItem],
    ) -> StoreResult<LocalVibeRow> {
        self.record("upsert_local_vibe");
        let mut tables = self.tables();
        let now = tables.now();
        if let Some(row) = tables
            .local_vibes
            .iter_mut()
            .find(|v| same_location(v, city, country))
        {
            row.offers = Json(offers.to_vec());
            row.updated_at = now;
            return Ok(row.clone());
        }
        let row = LocalVibeRow {
            id: Uuid::new_v4(),
            city: city.to_string(),
            country: country.to_string(),
            offers: Json(offers.to_vec()),
            created_at: now,
            updated_at: now,
        };
        tables.local_vibes.push(row.clone());
        Ok(row)
    }

    async fn create_todo(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
        is_urgent: bool,
    ) -> StoreResult<TodoRow> {
        let mut tables = self.tables();
        let row = TodoRow {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            description: description.to_string(),
            is_completed: false,
            is_urgent,
            created_at: tables.now(),
        };
        tables.todos.push(row.clone());
        Ok(row)
    }

    async fn list_todos(&self, user_id: Uuid) -> StoreResult<Vec<TodoRow>> {
        let mut rows: Vec<_> = self
            .tables()
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.is_urgent
                .cmp(&a.is_urgent)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn toggle_todo_urgent(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<TodoRow>> {
        Ok(self
            .tables()
            .todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.user_id == user_id)
            .map(|t| {
                t.is_urgent = !t.is_urgent;
                t.clone()
            }))
    }

    async fn complete_todo(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<TodoRow>> {
        Ok(self
            .tables()
            .todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.user_id == user_id)
            .map(|t| {
                t.is_completed = true;
                t.clone()
            }))
    }

    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables();
        let before = tables.todos.len();
        tables
            .todos
            .retain(|t| !(t.id == todo_id && t.user_id == user_id));
        Ok(tables.todos.len() < before)
    }

    async fn get_or_create_cv(&self, user_id: Uuid) -> StoreResult<CvProfileRow> {
        let mut tables = self.tables();
        if let Some(existing) = tables.cv_profiles.iter().find(|c| c.user_id == user_id) {
            return Ok(existing.clone());
        }
        let row = CvProfileRow {
            id: Uuid::new_v4(),
            user_id,
            summary: String::new(),
            skills: Json(Vec::new()),
            languages: Json(Vec::new()),
            custom_sections: Json(Vec::new()),
            custom_contacts: Json(Vec::new()),
            education_details: Json(Vec::new()),
            work_experience: Json(Vec::new()),
            theme: DEFAULT_THEME.to_string(),
            updated_at: tables.now(),
        };
        tables.cv_profiles.push(row.clone());
        Ok(row)
    }

    async fn save_cv(&self, cv: &CvProfileRow) -> StoreResult<CvProfileRow> {
        self.record("save_cv");
        let mut tables = self.tables();
        let now = tables.now();
        let row = tables
            .cv_profiles
            .iter_mut()
            .find(|c| c.id == cv.id)
            .ok_or(sqlx::Error::RowNotFound)?;
        *row = CvProfileRow {
            updated_at: now,
            ..cv.clone()
        };
        Ok(row.clone())
    }

    async fn cv_internships(&self, user_id: Uuid) -> StoreResult<Vec<CvInternship>> {
        let tables = self.tables();
        let mut enrollments: Vec<_> = tables
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .collect();
        enrollments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(enrollments
            .into_iter()
            .filter_map(|e| {
                let internship = tables.internships.iter().find(|i| i.id == e.internship_id)?;
                Some(CvInternship {
                    title: internship.title.clone(),
                    description: internship.description.clone(),
                    score: e.ai_score,
                    skills: internship.skills_learned.clone(),
                    status: e.status.clone(),
                })
            })
            .collect())
    }
}
