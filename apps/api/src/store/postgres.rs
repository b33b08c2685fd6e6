use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::models::career::CareerPlanRow;
use crate::models::cv::{CvInternship, CvProfileRow};
use crate::models::internship::{
    EnrollmentRow, EnrollmentStatus, InternshipRow, NewInternship, QuestionSet, ResourceLink,
};
use crate::models::job::{NewScrapedJob, ScrapedJobRow};
use crate::models::local_vibe::{LocalVibeItem, LocalVibeRow};
use crate::models::todo::TodoRow;
use crate::models::user::UserProfile;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, occupation, interests, skills, experience_level, city, country
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn latest_career_plan(&self, user_id: Uuid) -> StoreResult<Option<CareerPlanRow>> {
        sqlx::query_as::<_, CareerPlanRow>(
            "SELECT * FROM career_plans WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_career_plan(&self, user_id: Uuid, plan: &Value) -> StoreResult<CareerPlanRow> {
        sqlx::query_as::<_, CareerPlanRow>(
            r#"
            INSERT INTO career_plans (id, user_id, plan_details)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(plan)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_internship(&self, internship_id: Uuid) -> StoreResult<Option<InternshipRow>> {
        sqlx::query_as::<_, InternshipRow>("SELECT * FROM internships WHERE id = $1")
            .bind(internship_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_internships(&self, user_id: Uuid) -> StoreResult<Vec<InternshipRow>> {
        sqlx::query_as::<_, InternshipRow>(
            "SELECT * FROM internships WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_unenrolled_internships(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM internships i
            WHERE i.user_id = $1
              AND NOT EXISTS (SELECT 1 FROM enrollments e WHERE e.internship_id = i.id)
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_internship(&self, internship: NewInternship) -> StoreResult<InternshipRow> {
        sqlx::query_as::<_, InternshipRow>(
            r#"
            INSERT INTO internships
                (id, user_id, title, image_url, min_days, max_days, description,
                 skills_learned, ai_generated_text, resource_links, questions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(internship.user_id)
        .bind(&internship.title)
        .bind(&internship.image_url)
        .bind(internship.min_days)
        .bind(internship.max_days)
        .bind(&internship.description)
        .bind(&internship.skills_learned)
        .bind(&internship.ai_generated_text)
        .bind(Json(&internship.resource_links))
        .bind(Json(&internship.questions))
        .fetch_one(&self.pool)
        .await
    }

    async fn set_internship_questions(
        &self,
        internship_id: Uuid,
        questions: &QuestionSet,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE internships SET questions = $1 WHERE id = $2")
            .bind(Json(questions))
            .bind(internship_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_internship_resources(
        &self,
        internship_id: Uuid,
        links: &[ResourceLink],
    ) -> StoreResult<()> {
        sqlx::query("UPDATE internships SET resource_links = $1 WHERE id = $2")
            .bind(Json(links))
            .bind(internship_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_enrollment(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> StoreResult<Option<EnrollmentRow>> {
        sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND internship_id = $2",
        )
        .bind(user_id)
        .bind(internship_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_or_create_enrollment(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> StoreResult<EnrollmentRow> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (id, user_id, internship_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, internship_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(internship_id)
        .bind(EnrollmentStatus::Enrolled.as_str())
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND internship_id = $2",
        )
        .bind(user_id)
        .bind(internship_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_enrollment(&self, enrollment: &EnrollmentRow) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE enrollments
            SET status = $1, repo_link = $2, time_taken_days = $3, difficulty_rating = $4,
                user_rating = $5, ai_score = $6, ai_feedback = $7
            WHERE id = $8
            "#,
        )
        .bind(&enrollment.status)
        .bind(&enrollment.repo_link)
        .bind(enrollment.time_taken_days)
        .bind(enrollment.difficulty_rating)
        .bind(enrollment.user_rating)
        .bind(enrollment.ai_score)
        .bind(&enrollment.ai_feedback)
        .bind(enrollment.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_scraped_jobs(
        &self,
        user_id: Uuid,
        jobs: Vec<NewScrapedJob>,
    ) -> StoreResult<Vec<ScrapedJobRow>> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM scraped_jobs WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut rows = Vec::with_capacity(jobs.len());
        for job in jobs {
            let row = sqlx::query_as::<_, ScrapedJobRow>(
                r#"
                INSERT INTO scraped_jobs
                    (id, user_id, title, company, location, link, source, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.link)
            .bind(&job.source)
            .bind(&job.description)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }

        tx.commit().await?;
        info!(
            "Replaced {deleted} job listings with {} for user {user_id}",
            rows.len()
        );
        Ok(rows)
    }

    async fn find_local_vibe(&self, city: &str, country: &str) -> StoreResult<Option<LocalVibeRow>> {
        sqlx::query_as::<_, LocalVibeRow>(
            "SELECT * FROM local_vibes WHERE LOWER(city) = LOWER($1) AND LOWER(country) = LOWER($2)",
        )
        .bind(city)
        .bind(country)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_local_vibe(
        &self,
        city: &str,
        country: &str,
    ) -> StoreResult<Option<LocalVibeRow>> {
        sqlx::query_as::<_, LocalVibeRow>(
            r#"
            DELETE FROM local_vibes
            WHERE LOWER(city) = LOWER($1) AND LOWER(country) = LOWER($2)
            RETURNING *
            "#,
        )
        .bind(city)
        .bind(country)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_local_vibe(
        &self,
        city: &str,
        country: &str,
        offers: &[LocalVibeItem],
    ) -> StoreResult<LocalVibeRow> {
        sqlx::query_as::<_, LocalVibeRow>(
            r#"
            INSERT INTO local_vibes (id, city, country, offers)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ((LOWER(city)), (LOWER(country)))
            DO UPDATE SET offers = EXCLUDED.offers, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(city)
        .bind(country)
        .bind(Json(offers))
        .fetch_one(&self.pool)
        .await
    }

    async fn create_todo(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
        is_urgent: bool,
    ) -> StoreResult<TodoRow> {
        sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (id, user_id, title, description, is_urgent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(is_urgent)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_todos(&self, user_id: Uuid) -> StoreResult<Vec<TodoRow>> {
        sqlx::query_as::<_, TodoRow>(
            "SELECT * FROM todos WHERE user_id = $1 ORDER BY is_urgent DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn toggle_todo_urgent(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<TodoRow>> {
        sqlx::query_as::<_, TodoRow>(
            "UPDATE todos SET is_urgent = NOT is_urgent WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(todo_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn complete_todo(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<TodoRow>> {
        sqlx::query_as::<_, TodoRow>(
            "UPDATE todos SET is_completed = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(todo_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(todo_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_or_create_cv(&self, user_id: Uuid) -> StoreResult<CvProfileRow> {
        sqlx::query(
            r#"
            INSERT INTO cv_profiles (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, CvProfileRow>("SELECT * FROM cv_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn save_cv(&self, cv: &CvProfileRow) -> StoreResult<CvProfileRow> {
        let row = sqlx::query_as::<_, CvProfileRow>(
            r#"
            UPDATE cv_profiles
            SET summary = $1, skills = $2, languages = $3, custom_sections = $4,
                custom_contacts = $5, education_details = $6, work_experience = $7,
                theme = $8, updated_at = now()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&cv.summary)
        .bind(&cv.skills)
        .bind(&cv.languages)
        .bind(&cv.custom_sections)
        .bind(&cv.custom_contacts)
        .bind(&cv.education_details)
        .bind(&cv.work_experience)
        .bind(&cv.theme)
        .bind(cv.id)
        .fetch_one(&self.pool)
        .await?;

        info!("Updated CV {} for user {}", row.id, row.user_id);
        Ok(row)
    }

    async fn cv_internships(&self, user_id: Uuid) -> StoreResult<Vec<CvInternship>> {
        sqlx::query_as::<_, CvInternship>(
            r#"
            SELECT i.title, i.description, e.ai_score AS score,
                   i.skills_learned AS skills, e.status
            FROM enrollments e
            JOIN internships i ON i.id = e.internship_id
            WHERE e.user_id = $1
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
