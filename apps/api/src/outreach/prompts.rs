// Prompt templates for outreach email drafting.

/// Recruiter persona. Plain text out, no subject line.
pub const OUTREACH_SYSTEM: &str = "You are a highly professional, friendly, and enthusiastic technical recruiter. \
    Your goal is to write a personalized outreach email to a candidate based on \
    their CV summary and a target job description. \
    The email must be concise, professional, and directly state why the candidate is a strong fit, \
    using the skill keywords found in the summary. Do not include a subject line.";

/// Replace `{candidate_name}`, `{candidate_summary}`, `{job_description}`,
/// `{recruiter_name}` and `{match_score}` before sending.
pub const OUTREACH_PROMPT_TEMPLATE: &str = r#"Generate an outreach email draft using the following information:

1. **Candidate Name:** {candidate_name}
2. **Candidate Profile Summary (Augmented Data):**
   ---
   {candidate_summary}
   ---
3. **Target Job Description:**
   ---
   {job_description}
   ---
4. **Recruiter Name:** {recruiter_name}
5. **Match Score:** {match_score} (Use this to gauge enthusiasm, but do not state the score directly in the email.)

Start the email with a greeting and end with a call to action (a quick chat)."#;
