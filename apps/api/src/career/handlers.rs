use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::career::planner::{get_or_generate_plan, CareerStep};
use crate::errors::AppError;
use crate::routes::request_locale;
use crate::state::AppState;
use crate::store::require_user;

#[derive(Debug, Deserialize)]
pub struct CareerPlanRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub extra_info: String,
}

#[derive(Debug, Serialize)]
pub struct CareerPlanResponse {
    pub status: &'static str,
    pub career_plan: Vec<CareerStep>,
    pub plan_id: Uuid,
    pub cached: bool,
}

/// POST /api/v1/career-plan
pub async fn handle_career_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CareerPlanRequest>,
) -> Result<Json<CareerPlanResponse>, AppError> {
    let user = require_user(state.store.as_ref(), request.user_id).await?;
    let plan = get_or_generate_plan(
        state.store.as_ref(),
        state.llm.as_ref(),
        &user,
        &request.extra_info,
        request_locale(&headers),
    )
    .await?;

    Ok(Json(CareerPlanResponse {
        status: "success",
        career_plan: plan.steps,
        plan_id: plan.plan_id,
        cached: plan.cached,
    }))
}
