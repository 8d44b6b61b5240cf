pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::outreach::handlers as outreach;
use crate::parsing::handlers as parsing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/rank", post(matching::handle_rank))
        .route("/api/v1/rank/upload", post(matching::handle_rank_upload))
        .route("/api/v1/skills/match", post(matching::handle_match_skills))
        // Supporting tools
        .route("/api/v1/jobs/parse", post(parsing::handle_parse_job))
        .route("/api/v1/outreach/email", post(outreach::handle_outreach_email))
        .with_state(state)
}
