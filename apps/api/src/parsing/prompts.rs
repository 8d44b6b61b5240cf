// Prompt templates for document structuring.

/// System prompt for CV structuring — enforces JSON-only output.
pub const CV_PARSE_SYSTEM: &str = "You are a precise resume data extractor. \
    Extract key details from a CV into structured JSON. \
    You MUST respond with valid JSON only — no markdown fences, no explanations. \
    Never invent details that are not present in the CV. \
    Use null for missing scalar fields and [] for missing lists.";

/// CV structuring prompt. Replace `{cv_text}` before sending.
pub const CV_PARSE_PROMPT_TEMPLATE: &str = r#"Please analyze the following CV and extract the required information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "The applicant's full name",
  "contact_info": {"email": null, "phone": null, "linkedin": null, "portfolio": null},
  "education": [
    {"degree": "BSc", "major": "Computer Science", "institution": "string", "graduation_year": "2019", "gpa": null}
  ],
  "experience": [
    {"title": "string", "company": "string", "duration": "string", "responsibilities": "string", "technologies": ["string"]}
  ],
  "projects": [
    {"title": "string", "description": "string", "technologies": ["string"]}
  ],
  "skills": ["Technical and soft skills, e.g. Python, Machine Learning, Communication"],
  "certifications": ["string"],
  "languages": ["string"],
  "career_objective": "Short statement about the applicant's professional goals",
  "soft_skills": ["Leadership, teamwork, communication, ..."],
  "location": "Applicant's current city or country",
  "availability": "Full-time, part-time, internship, ..."
}

"name", "education" and "skills" are required.

CV:
---
{cv_text}
---"#;

/// System prompt for JD structuring — enforces JSON-only output.
pub const JOB_PARSE_SYSTEM: &str = "You are an expert job description analyst. \
    Parse a job description and extract structured information. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// JD structuring prompt. Replace `{jd_text}` before sending.
pub const JOB_PARSE_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract all relevant details.

Return a JSON object with this EXACT schema (no extra fields):
{
  "job_title": "The official title of the job position",
  "company": "The company or organization offering the job",
  "location": "City and/or country where the position is based",
  "responsibilities": ["Key duties expected from the candidate"],
  "requirements": ["Essential technical and non-technical skills"],
  "preferred_qualifications": ["Additional qualifications that give candidates an advantage"],
  "duration": "Contract type or duration, e.g. full-time, 3-month internship",
  "start_date": null,
  "salary_or_benefits": null,
  "application_deadline": null,
  "keywords": ["Important skills, tools and topics describing the role"],
  "employment_type": "Internship | Full-time | Part-time | Contract"
}

"job_title", "company", "responsibilities" and "requirements" are required.
Use null for anything the description does not mention.

JOB DESCRIPTION:
---
{jd_text}
---"#;
