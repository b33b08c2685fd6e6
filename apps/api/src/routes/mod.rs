pub mod health;

use axum::{
    http::{header::ACCEPT_LANGUAGE, HeaderMap},
    routing::{delete, get, post},
    Router,
};

use crate::career::handlers as career;
use crate::cv::handlers as cv;
use crate::internships::handlers as internships;
use crate::jobs::handlers as jobs;
use crate::llm_client::prompts::Locale;
use crate::local::handlers as local;
use crate::state::AppState;
use crate::todos::handlers as todos;

/// Output language requested through `Accept-Language`.
pub fn request_locale(headers: &HeaderMap) -> Locale {
    Locale::from_accept_language(
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Career plans
        .route("/api/v1/career-plan", post(career::handle_career_plan))
        // Internships
        .route("/api/v1/internships", get(internships::handle_list))
        .route(
            "/api/v1/internships/generate",
            post(internships::handle_generate),
        )
        .route(
            "/api/v1/internships/:id/enroll",
            post(internships::handle_enroll),
        )
        .route(
            "/api/v1/internships/:id/grade",
            post(internships::handle_grade),
        )
        .route(
            "/api/v1/internships/:id/resources/sync",
            post(internships::handle_sync_resources),
        )
        .route("/api/v1/internships/:id/quiz", post(internships::handle_quiz))
        .route(
            "/api/v1/internships/:id/quiz/submit",
            post(internships::handle_submit_quiz),
        )
        // Jobs, local and travel
        .route("/api/v1/jobs", get(jobs::handle_job_search))
        .route("/api/v1/local-vibes", get(local::handle_local_vibes))
        .route("/api/v1/travel/plan", post(local::handle_travel_plan))
        // Todos
        .route(
            "/api/v1/todos",
            get(todos::handle_list_todos).post(todos::handle_create_todo),
        )
        .route("/api/v1/todos/:id", delete(todos::handle_delete_todo))
        .route(
            "/api/v1/todos/:id/complete",
            post(todos::handle_complete_todo),
        )
        .route(
            "/api/v1/todos/:id/toggle-urgent",
            post(todos::handle_toggle_urgent),
        )
        // CV builder
        .route("/api/v1/cv", get(cv::handle_get_cv).put(cv::handle_update_cv))
        .with_state(state)
}
