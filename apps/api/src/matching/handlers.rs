//! Axum route handlers for the Matching API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::corpus::taxonomy::skills_in_domain;
use crate::errors::AppError;
use crate::matching::ranker::{
    RankedCandidate, RankingMode, RankingNotice, RankingOutcome, RankingRequest,
};
use crate::matching::skill_matcher::SkillMatch;
use crate::parsing::text::extract_text;
use crate::state::AppState;
use crate::vector_store::MetadataFilter;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_k() -> usize {
    5
}

fn default_skill_k() -> usize {
    10
}

fn default_score_threshold() -> f32 {
    0.65
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    #[serde(default = "default_k")]
    pub k: usize,
    /// Present (even empty) switches to local mode.
    #[serde(default)]
    pub candidate_docs: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct NoticeBody {
    pub code: RankingNotice,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub request_id: Uuid,
    pub mode: RankingMode,
    pub candidates: Vec<RankedCandidate>,
    pub notice: Option<NoticeBody>,
    /// Uploaded files that yielded no text and were left out of the ranking.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_files: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl RankResponse {
    fn new(mode: RankingMode, outcome: RankingOutcome) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            mode,
            candidates: outcome.candidates,
            notice: outcome.notice.map(|code| NoticeBody {
                code,
                message: code.message(),
            }),
            skipped_files: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SkillMatchRequest {
    pub job_description: String,
    #[serde(default = "default_skill_k")]
    pub k: usize,
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillMatchResponse {
    pub skills: Vec<SkillMatch>,
}

fn validate(job_description: &str, k: usize) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if k == 0 {
        return Err(AppError::Validation("k must be at least 1".to_string()));
    }
    Ok(())
}

async fn run_ranking(state: &AppState, request: RankingRequest) -> RankResponse {
    let mode = request.mode();
    let outcome = state.ranker.rank(request).await;
    info!(
        "Ranking ({mode:?}) returned {} candidates",
        outcome.candidates.len()
    );
    RankResponse::new(mode, outcome)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rank
///
/// Database mode unless `candidate_docs` is supplied.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    validate(&request.job_description, request.k)?;

    let ranking = RankingRequest::new(request.job_description, request.k, request.candidate_docs);
    Ok(Json(run_ranking(&state, ranking).await))
}

/// POST /api/v1/rank/upload
///
/// Multipart form: `job_description`, `k`, and any number of `files` (PDF or text).
/// Always local mode. A file that yields no text is skipped and listed in
/// `skipped_files`; the request fails with 422 only when every file is unreadable.
pub async fn handle_rank_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankResponse>, AppError> {
    let mut job_description = String::new();
    let mut k = default_k();
    let mut documents = Vec::new();
    let mut skipped_files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
            }
            "k" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid k: {e}")))?;
                k = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation(format!("k must be a positive integer, got '{raw}'")))?;
            }
            "files" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read '{file_name}': {e}")))?;

                let label = file_name.clone();
                let extracted = tokio::task::spawn_blocking(move || extract_text(&bytes, &label))
                    .await
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?;
                match extracted {
                    Ok(text) => documents.push(text),
                    Err(e) => {
                        warn!("Skipping uploaded file: {e}");
                        skipped_files.push(file_name);
                    }
                }
            }
            other => warn!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    validate(&job_description, k)?;
    if documents.is_empty() && !skipped_files.is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "None of the uploaded files contained extractable text: {}",
            skipped_files.join(", ")
        )));
    }

    let ranking = RankingRequest::Local {
        job_description,
        k,
        documents,
    };
    let mut response = run_ranking(&state, ranking).await;
    response.skipped_files = skipped_files;
    Ok(Json(response))
}

/// POST /api/v1/skills/match
///
/// Canonical skills for a JD, optionally restricted to one taxonomy domain.
pub async fn handle_match_skills(
    State(state): State<AppState>,
    Json(request): Json<SkillMatchRequest>,
) -> Result<Json<SkillMatchResponse>, AppError> {
    validate(&request.job_description, request.k)?;
    if let Some(domain) = request.domain.as_deref() {
        if skills_in_domain(domain).next().is_none() {
            return Err(AppError::Validation(format!("Unknown skill domain '{domain}'")));
        }
    }

    let filter = request
        .domain
        .as_deref()
        .map(|domain| MetadataFilter::field_eq("domain", domain));
    let skills = state
        .skill_matcher
        .match_skills_filtered(
            &request.job_description,
            request.k,
            request.score_threshold,
            filter.as_ref(),
        )
        .await;

    Ok(Json(SkillMatchResponse { skills }))
}
