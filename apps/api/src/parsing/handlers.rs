use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::parsing::jd_parser::{parse_job, ParsedJob};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ParseJobResponse {
    pub parsed_job: ParsedJob,
}

/// POST /api/v1/jobs/parse
///
/// Structured preview of a job description.
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(request): Json<ParseJobRequest>,
) -> Result<Json<ParseJobResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let parsed_job = parse_job(&request.job_description, state.llm.as_ref()).await?;

    Ok(Json(ParseJobResponse { parsed_job }))
}
