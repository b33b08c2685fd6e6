use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::search::search_jobs;
use crate::models::job::ScrapedJobRow;
use crate::state::AppState;
use crate::store::require_user;

#[derive(Debug, Deserialize)]
pub struct JobSearchQuery {
    pub user_id: Uuid,
    pub query: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobSearchResponse {
    pub status: &'static str,
    pub count: usize,
    pub query_used: String,
    pub location_used: String,
    pub jobs: Vec<ScrapedJobRow>,
}

/// GET /api/v1/jobs?user_id=&query=&location=
pub async fn handle_job_search(
    State(state): State<AppState>,
    Query(params): Query<JobSearchQuery>,
) -> Result<Json<JobSearchResponse>, AppError> {
    let user = require_user(state.store.as_ref(), params.user_id).await?;
    let search = search_jobs(
        state.store.as_ref(),
        state.cache.as_ref(),
        state.llm.as_ref(),
        &user,
        params.query.as_deref(),
        params.location.as_deref(),
    )
    .await?;

    Ok(Json(JobSearchResponse {
        status: "success",
        count: search.jobs.len(),
        query_used: search.query_used,
        location_used: search.location_used,
        jobs: search.jobs,
    }))
}
