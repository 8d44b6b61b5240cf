//! JD Parser — extracts title, requirements and keywords from a raw job description.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::fill;
use crate::llm_client::{complete_json, GenerationProvider, ProviderError};
use crate::parsing::null_as_default;
use crate::parsing::prompts::{JOB_PARSE_PROMPT_TEMPLATE, JOB_PARSE_SYSTEM};

const JOB_PARSE_TEMPERATURE: f32 = 0.0;

/// Full structured output of JD parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedJob {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_qualifications: Vec<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub salary_or_benefits: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
}

/// Parses a job description using the LLM and returns a structured `ParsedJob`.
pub async fn parse_job(
    jd_text: &str,
    llm: &dyn GenerationProvider,
) -> Result<ParsedJob, ProviderError> {
    let prompt = fill(JOB_PARSE_PROMPT_TEMPLATE, &[("jd_text", jd_text)]);
    complete_json::<ParsedJob>(llm, JOB_PARSE_SYSTEM, &prompt, JOB_PARSE_TEMPERATURE).await
}
