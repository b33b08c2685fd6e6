use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::local::travel::{plan_trip, TravelPlace};
use crate::local::vibes::{local_vibes, VibeSource};
use crate::models::local_vibe::LocalVibeItem;
use crate::routes::request_locale;
use crate::state::AppState;
use crate::store::require_user;

#[derive(Debug, Deserialize)]
pub struct LocalVibesQuery {
    pub user_id: Uuid,
    pub refresh: Option<String>,
}

impl LocalVibesQuery {
    /// Only a case-insensitive `true` forces a refresh; anything else is ignored.
    pub fn wants_refresh(&self) -> bool {
        self.refresh
            .as_deref()
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
    }
}

#[derive(Debug, Serialize)]
pub struct LocalVibesResponse {
    pub status: &'static str,
    pub location: String,
    pub active_offers: Vec<LocalVibeItem>,
    pub source: VibeSource,
}

/// GET /api/v1/local-vibes?user_id=&refresh=
pub async fn handle_local_vibes(
    State(state): State<AppState>,
    Query(params): Query<LocalVibesQuery>,
) -> Result<Json<LocalVibesResponse>, AppError> {
    let user = require_user(state.store.as_ref(), params.user_id).await?;
    let vibes = local_vibes(
        state.store.as_ref(),
        state.llm.as_ref(),
        &user,
        params.wants_refresh(),
    )
    .await?;

    Ok(Json(LocalVibesResponse {
        status: "success",
        location: vibes.location,
        active_offers: vibes.offers,
        source: vibes.source,
    }))
}

fn default_from() -> String {
    "City".to_string()
}

fn default_to() -> String {
    "Destination".to_string()
}

fn default_date() -> String {
    "anytime".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TravelRequest {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
    #[serde(default = "default_date")]
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct TravelResponse {
    pub status: &'static str,
    pub travel_plan: Vec<TravelPlace>,
    pub flight_search_url: String,
}

/// POST /api/v1/travel/plan
pub async fn handle_travel_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TravelRequest>,
) -> Json<TravelResponse> {
    let plan = plan_trip(
        state.llm.as_ref(),
        request.from.trim(),
        request.to.trim(),
        request.date.trim(),
        request_locale(&headers),
    )
    .await;

    Json(TravelResponse {
        status: "success",
        travel_plan: plan.places,
        flight_search_url: plan.flight_search_url,
    })
}
