//! CV Parser — turns raw résumé text into a `StructuredCv`.
//!
//! Transient and malformed responses are retried (3 attempts, exponential backoff).
//! After exhaustion the parser returns `None` rather than an error: the corpus builder
//! skips the record and moves on.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::fill;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{complete_json, GenerationProvider};
use crate::parsing::null_as_default;
use crate::parsing::prompts::{CV_PARSE_PROMPT_TEMPLATE, CV_PARSE_SYSTEM};

const CV_PARSE_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

/// Structured fields extracted from one CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredCv {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub career_objective: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

/// Document-parsing collaborator. `None` is the failure sentinel.
#[async_trait]
pub trait CvParser: Send + Sync {
    async fn parse(&self, cv_text: &str) -> Option<StructuredCv>;
}

/// `CvParser` backed by a JSON-schema prompt to the generation provider.
pub struct LlmCvParser {
    llm: Arc<dyn GenerationProvider>,
    retry: RetryPolicy,
}

impl LlmCvParser {
    pub fn new(llm: Arc<dyn GenerationProvider>) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl CvParser for LlmCvParser {
    async fn parse(&self, cv_text: &str) -> Option<StructuredCv> {
        let prompt = fill(CV_PARSE_PROMPT_TEMPLATE, &[("cv_text", cv_text)]);
        let prompt = prompt.as_str();
        let llm = self.llm.as_ref();

        // Transient transport errors are already retried inside the provider;
        // this loop only re-asks for output that failed to parse.
        let result = self
            .retry
            .run_with(
                "cv_parser",
                |e| !e.is_transient(),
                move || complete_json::<StructuredCv>(llm, CV_PARSE_SYSTEM, prompt, CV_PARSE_TEMPERATURE),
            )
            .await;

        match result {
            Ok(cv) => Some(cv),
            Err(e) => {
                warn!(
                    "CV extraction failed after {} attempts: {e}",
                    self.retry.max_attempts
                );
                None
            }
        }
    }
}
