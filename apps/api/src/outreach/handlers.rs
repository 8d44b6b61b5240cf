use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::outreach::{generate_outreach_email, OutreachCandidate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OutreachRequest {
    pub job_description: String,
    pub candidate: OutreachCandidate,
    #[serde(default)]
    pub recruiter_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    pub email: String,
}

/// POST /api/v1/outreach/email
pub async fn handle_outreach_email(
    State(state): State<AppState>,
    Json(request): Json<OutreachRequest>,
) -> Result<Json<OutreachResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let email = generate_outreach_email(
        state.llm.as_ref(),
        &request.job_description,
        &request.candidate,
        request.recruiter_name.as_deref(),
    )
    .await?;

    Ok(Json(OutreachResponse { email }))
}
