use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::cv::builder::{get_cv, update_cv, CvUpdate, CvView};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::require_user;

#[derive(Debug, Deserialize)]
pub struct CvQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCvRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub update: CvUpdate,
}

/// GET /api/v1/cv?user_id=
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Query(query): Query<CvQuery>,
) -> Result<Json<CvView>, AppError> {
    let user = require_user(state.store.as_ref(), query.user_id).await?;
    Ok(Json(get_cv(state.store.as_ref(), user).await?))
}

/// PUT /api/v1/cv
pub async fn handle_update_cv(
    State(state): State<AppState>,
    Json(request): Json<UpdateCvRequest>,
) -> Result<Json<CvView>, AppError> {
    let user = require_user(state.store.as_ref(), request.user_id).await?;
    Ok(Json(update_cv(state.store.as_ref(), user, request.update).await?))
}
