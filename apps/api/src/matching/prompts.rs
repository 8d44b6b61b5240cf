// Prompt templates for the local-documents ranking mode.

/// Skill-target query synthesis. Replace `{job_description}` before sending.
pub const SKILL_QUERY_PROMPT_TEMPLATE: &str = r#"Analyze the following Job Description and identify the top 5 most critical technical skills,
key responsibilities, and required experience areas. Combine these points into a single,
dense query paragraph suitable for semantic search that will prioritize candidates based
on relevance to the JD.

JOB DESCRIPTION:
---
{job_description}
---"#;

/// Candidate name and summary extraction. Replace `{doc_text}` before sending.
/// The model must answer `<name>|||<summary>`.
pub const PROFILE_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze the following raw Candidate Resume text.

1. Identify the full professional name of the candidate.
2. Generate a concise, professional summary (max 3 sentences) that highlights their primary job role, years of experience (if mentioned), and key technical expertise.

Return only the name and the summary text, separated by a unique delimiter: '|||'.

RAW RESUME TEXT:
---
{doc_text}
---"#;
