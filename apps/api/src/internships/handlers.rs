use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::internships::generator::{
    enroll, generate_internship_set, list_internships, sync_resources, InternshipSummary,
    InternshipView,
};
use crate::internships::grading::{grade_submission, Submission};
use crate::internships::quiz::{get_quiz, submit_quiz, AnswerResult, PublicQuestion};
use crate::models::internship::ResourceLink;
use crate::routes::request_locale;
use crate::state::AppState;
use crate::store::require_user;

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: String,
    pub data: Vec<InternshipSummary>,
}

/// POST /api/v1/internships/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UserRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let user = require_user(state.store.as_ref(), request.user_id).await?;
    let set = generate_internship_set(
        state.store.as_ref(),
        state.llm.as_ref(),
        state.videos.as_ref(),
        &user,
        request_locale(&headers),
    )
    .await?;

    Ok(Json(GenerateResponse {
        status: format!(
            "Generated {} new internships. Your enrolled ones are safe.",
            set.created.len()
        ),
        data: set.created,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub status: &'static str,
    pub internships: Vec<InternshipView>,
}

/// GET /api/v1/internships?user_id=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let internships = list_internships(state.store.as_ref(), query.user_id).await?;
    Ok(Json(ListResponse {
        status: "success",
        internships,
    }))
}

/// POST /api/v1/internships/:id/enroll
pub async fn handle_enroll(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
    Json(request): Json<UserRequest>,
) -> Result<Json<Value>, AppError> {
    require_user(state.store.as_ref(), request.user_id).await?;
    let enrollment_id = enroll(state.store.as_ref(), request.user_id, internship_id).await?;
    Ok(Json(json!({
        "status": "Enrolled",
        "enrollment_id": enrollment_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub repo_link: String,
    pub time_taken: Option<i32>,
    pub difficulty: Option<i32>,
    pub user_rating: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub status: &'static str,
    pub score: i32,
    pub feedback: String,
}

/// POST /api/v1/internships/:id/grade
pub async fn handle_grade(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<GradeRequest>,
) -> Result<Json<GradeResponse>, AppError> {
    require_user(state.store.as_ref(), request.user_id).await?;
    let submission = Submission {
        repo_link: request.repo_link,
        time_taken_days: request.time_taken,
        difficulty_rating: request.difficulty,
        user_rating: request.user_rating,
    };
    let grade = grade_submission(
        state.store.as_ref(),
        state.llm.as_ref(),
        request.user_id,
        internship_id,
        submission,
        request_locale(&headers),
    )
    .await?;

    Ok(Json(GradeResponse {
        status: "Graded",
        score: grade.score,
        feedback: grade.feedback,
    }))
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub status: &'static str,
    pub resource_links: Vec<ResourceLink>,
}

/// POST /api/v1/internships/:id/resources/sync
pub async fn handle_sync_resources(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
) -> Result<Json<SyncResponse>, AppError> {
    let resource_links =
        sync_resources(state.store.as_ref(), state.videos.as_ref(), internship_id).await?;
    Ok(Json(SyncResponse {
        status: "success",
        resource_links,
    }))
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub status: &'static str,
    pub questions: Vec<PublicQuestion>,
    pub total: usize,
}

/// POST /api/v1/internships/:id/quiz
pub async fn handle_quiz(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
) -> Result<Json<QuizResponse>, AppError> {
    let view = get_quiz(
        state.store.as_ref(),
        state.cache.as_ref(),
        state.llm.as_ref(),
        internship_id,
    )
    .await?;
    Ok(Json(QuizResponse {
        status: "success",
        questions: view.questions,
        total: view.total,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub answers: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub status: &'static str,
    pub score: u32,
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
    pub results: Vec<AnswerResult>,
    pub feedback: String,
}

/// POST /api/v1/internships/:id/quiz/submit
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
    Json(request): Json<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, AppError> {
    require_user(state.store.as_ref(), request.user_id).await?;
    let result = submit_quiz(
        state.store.as_ref(),
        request.user_id,
        internship_id,
        &request.answers,
    )
    .await?;
    let feedback = result.summary();

    Ok(Json(SubmitQuizResponse {
        status: "success",
        score: result.score,
        correct: result.correct,
        total: result.total,
        passed: result.passed,
        results: result.results,
        feedback,
    }))
}
