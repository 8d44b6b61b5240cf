//! Name and summary extraction for local-mode candidates.
//!
//! One generation call per document returning `<name>|||<summary>`. Never fails:
//! a malformed answer or a provider error falls back to the document's first line
//! and a placeholder summary.

use serde::Serialize;
use tracing::warn;

use crate::llm_client::prompts::{fill, PLAIN_TEXT_SYSTEM};
use crate::llm_client::GenerationProvider;
use crate::matching::prompts::PROFILE_EXTRACTION_PROMPT_TEMPLATE;

pub const EXTRACTION_DELIMITER: &str = "|||";
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;

pub const PARSE_FAILURE_SUMMARY: &str = "LLM extraction failed. Please review the full document.";
pub const PROVIDER_FAILURE_SUMMARY: &str = "LLM extraction failed. Using heuristic fallback.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub summary: String,
}

/// First non-blank line of the document, else `Candidate <doc_id>`.
pub fn fallback_name(doc_text: &str, doc_id: &str) -> String {
    doc_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Candidate {doc_id}"))
}

/// Splits a `<name>|||<summary>` answer. Text after a second delimiter is dropped.
pub fn parse_extraction(response: &str) -> Option<CandidateProfile> {
    let mut parts = response.trim().split(EXTRACTION_DELIMITER);
    let name = parts.next()?.trim();
    let summary = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(CandidateProfile {
        name: name.to_string(),
        summary: summary.to_string(),
    })
}

pub async fn extract_profile(
    llm: &dyn GenerationProvider,
    doc_text: &str,
    doc_id: &str,
) -> CandidateProfile {
    let prompt = fill(PROFILE_EXTRACTION_PROMPT_TEMPLATE, &[("doc_text", doc_text)]);

    match llm
        .complete(PLAIN_TEXT_SYSTEM, &prompt, EXTRACTION_TEMPERATURE)
        .await
    {
        Ok(response) => parse_extraction(&response).unwrap_or_else(|| {
            warn!("Could not split name and summary for document {doc_id}");
            CandidateProfile {
                name: fallback_name(doc_text, doc_id),
                summary: PARSE_FAILURE_SUMMARY.to_string(),
            }
        }),
        Err(e) => {
            warn!("Error during extraction for document {doc_id}: {e}");
            CandidateProfile {
                name: fallback_name(doc_text, doc_id),
                summary: PROVIDER_FAILURE_SUMMARY.to_string(),
            }
        }
    }
}
