//! Outreach Email Generator — drafts a recruiter email for one ranked candidate.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;
use tracing::info;

use crate::llm_client::prompts::fill;
use crate::llm_client::{GenerationProvider, ProviderError};
use crate::matching::ranker::RankedCandidate;
use crate::outreach::prompts::{OUTREACH_PROMPT_TEMPLATE, OUTREACH_SYSTEM};

pub const OUTREACH_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_CANDIDATE_NAME: &str = "Talented Professional";
pub const DEFAULT_CANDIDATE_SUMMARY: &str = "Profile summary not available.";
pub const DEFAULT_RECRUITER_NAME: &str = "Recruitment Agent";

/// The parts of a ranked candidate the email uses. Every field is optional so a
/// partial record (or a full `RankedCandidate` JSON) deserialises.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutreachCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
}

impl From<&RankedCandidate> for OutreachCandidate {
    fn from(candidate: &RankedCandidate) -> Self {
        Self {
            name: Some(candidate.name.clone()),
            summary: Some(candidate.summary.clone()),
            match_score: Some(candidate.match_score),
        }
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default)
}

pub fn build_outreach_prompt(
    job_description: &str,
    candidate: &OutreachCandidate,
    recruiter_name: Option<&str>,
) -> String {
    let match_score = format!("{:.2}", candidate.match_score.unwrap_or(0.0));
    fill(
        OUTREACH_PROMPT_TEMPLATE,
        &[
            (
                "candidate_name",
                or_default(candidate.name.as_deref(), DEFAULT_CANDIDATE_NAME),
            ),
            (
                "candidate_summary",
                or_default(candidate.summary.as_deref(), DEFAULT_CANDIDATE_SUMMARY),
            ),
            ("job_description", job_description),
            (
                "recruiter_name",
                or_default(recruiter_name, DEFAULT_RECRUITER_NAME),
            ),
            ("match_score", match_score.as_str()),
        ],
    )
}

/// Returns the email body, trimmed. Retries are the provider's concern.
pub async fn generate_outreach_email(
    llm: &dyn GenerationProvider,
    job_description: &str,
    candidate: &OutreachCandidate,
    recruiter_name: Option<&str>,
) -> Result<String, ProviderError> {
    let prompt = build_outreach_prompt(job_description, candidate, recruiter_name);
    let email = llm
        .complete(OUTREACH_SYSTEM, &prompt, OUTREACH_TEMPERATURE)
        .await?;
    info!("Drafted outreach email ({} chars)", email.len());
    Ok(email.trim().to_string())
}
