//! Augmented chunk — the dense text form of a parsed résumé that gets embedded.
//!
//! Format: one `LABEL: value` line per field, in this fixed order:
//!
//! ```text
//! CANDIDATE: <name>
//! LOCATION: <location>
//! OBJECTIVE: <career objective>
//! TOP SKILLS: <skill>, <skill>, ...
//! EXPERIENCE SUMMARY: <title> at <company> [<tech>, ...]; ...
//! EDUCATION SUMMARY: <degree> in <major>; ...
//! ```
//!
//! Values never contain line breaks; the encoder folds them into spaces.

use crate::parsing::cv_parser::StructuredCv;

/// Name used when a résumé or chunk has no candidate name.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkField {
    Candidate,
    Location,
    Objective,
    TopSkills,
    ExperienceSummary,
    EducationSummary,
}

impl ChunkField {
    pub const ALL: [ChunkField; 6] = [
        ChunkField::Candidate,
        ChunkField::Location,
        ChunkField::Objective,
        ChunkField::TopSkills,
        ChunkField::ExperienceSummary,
        ChunkField::EducationSummary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChunkField::Candidate => "CANDIDATE",
            ChunkField::Location => "LOCATION",
            ChunkField::Objective => "OBJECTIVE",
            ChunkField::TopSkills => "TOP SKILLS",
            ChunkField::ExperienceSummary => "EXPERIENCE SUMMARY",
            ChunkField::EducationSummary => "EDUCATION SUMMARY",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentedChunk {
    pub name: String,
    pub location: String,
    pub objective: String,
    pub skills: String,
    pub experience: String,
    pub education: String,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

impl AugmentedChunk {
    /// Builds the chunk from structured CV fields.
    pub fn from_cv(cv: &StructuredCv) -> Self {
        let experience = cv
            .experience
            .iter()
            .map(|job| {
                format!(
                    "{} at {} [{}]",
                    non_blank(&job.title).unwrap_or("N/A"),
                    non_blank(&job.company).unwrap_or_default(),
                    job.technologies.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        let education = cv
            .education
            .iter()
            .map(|e| {
                format!(
                    "{} in {}",
                    non_blank(&e.degree).unwrap_or_default(),
                    non_blank(&e.major).unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            name: non_blank(&cv.name).unwrap_or(UNKNOWN_NAME).to_string(),
            location: non_blank(&cv.location).unwrap_or(UNKNOWN_NAME).to_string(),
            objective: non_blank(&cv.career_objective)
                .unwrap_or_default()
                .to_string(),
            skills: cv.skills.join(", "),
            experience,
            education,
        }
    }

    fn value(&self, field: ChunkField) -> &str {
        match field {
            ChunkField::Candidate => &self.name,
            ChunkField::Location => &self.location,
            ChunkField::Objective => &self.objective,
            ChunkField::TopSkills => &self.skills,
            ChunkField::ExperienceSummary => &self.experience,
            ChunkField::EducationSummary => &self.education,
        }
    }

    pub fn encode(&self) -> String {
        ChunkField::ALL
            .iter()
            .map(|&field| format!("{}: {}", field.label(), single_line(self.value(field))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Recognised `(field, value)` pairs in line order.
fn fields(content: &str) -> impl Iterator<Item = (ChunkField, &str)> {
    content.split('\n').filter_map(|line| {
        let line = line.trim_start();
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (label, value) = line.split_once(':')?;
        let field = ChunkField::from_label(label)?;
        Some((field, value.strip_prefix(' ').unwrap_or(value)))
    })
}

/// Value of the first `field` line in `content`. Unknown labels and prose lines
/// are skipped.
pub fn field_value(content: &str, field: ChunkField) -> Option<&str> {
    fields(content)
        .find(|(f, _)| *f == field)
        .map(|(_, value)| value)
}

/// The `CANDIDATE` line's value, trimmed; `None` when absent or blank.
pub fn candidate_name(content: &str) -> Option<String> {
    field_value(content, ChunkField::Candidate)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::cv_parser::{Education, Experience};

    fn sample_cv() -> StructuredCv {
        StructuredCv {
            name: Some("Ada Lovelace".to_string()),
            location: Some("London".to_string()),
            career_objective: Some("Lead applied ML teams".to_string()),
            skills: vec!["NLP".to_string(), "RAG".to_string()],
            experience: vec![
                Experience {
                    title: Some("Data Scientist".to_string()),
                    company: Some("Analytical Engines".to_string()),
                    technologies: vec!["Python".to_string(), "PyTorch".to_string()],
                    ..Default::default()
                },
                Experience {
                    company: Some("Babbage & Co".to_string()),
                    ..Default::default()
                },
            ],
            education: vec![Education {
                degree: Some("MSc".to_string()),
                major: Some("Mathematics".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_from_cv_formats_every_section() {
        let chunk = AugmentedChunk::from_cv(&sample_cv());
        assert_eq!(
            chunk.encode(),
            "CANDIDATE: Ada Lovelace\n\
             LOCATION: London\n\
             OBJECTIVE: Lead applied ML teams\n\
             TOP SKILLS: NLP, RAG\n\
             EXPERIENCE SUMMARY: Data Scientist at Analytical Engines [Python, PyTorch]; N/A at Babbage & Co []\n\
             EDUCATION SUMMARY: MSc in Mathematics"
        );
    }

    #[test]
    fn test_missing_name_and_location_default_to_unknown() {
        let chunk = AugmentedChunk::from_cv(&StructuredCv::default());
        assert_eq!(chunk.name, UNKNOWN_NAME);
        assert_eq!(chunk.location, UNKNOWN_NAME);
        assert_eq!(chunk.objective, "");
    }

    #[test]
    fn test_name_survives_encode_then_marker_scan() {
        for name in ["Ada Lovelace", "José Núñez-García", "O'Brien: PhD", "李小龙"] {
            let mut cv = sample_cv();
            cv.name = Some(name.to_string());
            let content = AugmentedChunk::from_cv(&cv).encode();
            assert_eq!(candidate_name(&content).as_deref(), Some(name));
        }
    }

    #[test]
    fn test_every_field_reads_back() {
        let chunk = AugmentedChunk::from_cv(&sample_cv());
        let encoded = chunk.encode();
        for field in ChunkField::ALL {
            assert_eq!(field_value(&encoded, field), Some(chunk.value(field)));
        }
    }

    #[test]
    fn test_encoder_folds_line_breaks() {
        let chunk = AugmentedChunk {
            objective: "line one\nline two\r\nline three".to_string(),
            ..Default::default()
        };
        let encoded = chunk.encode();
        assert_eq!(encoded.lines().count(), ChunkField::ALL.len());
        assert_eq!(
            field_value(&encoded, ChunkField::Objective),
            Some("line one line two  line three")
        );
    }

    #[test]
    fn test_content_without_candidate_line_has_no_name() {
        let content = "LOCATION: Paris\nTOP SKILLS: SQL";
        assert_eq!(candidate_name(content), None);
        assert_eq!(candidate_name("CANDIDATE:   \nLOCATION: Paris"), None);
    }

    #[test]
    fn test_decoder_tolerates_indentation_and_crlf() {
        let content = "        CANDIDATE: Grace Hopper\r\n        LOCATION: Arlington\r\n";
        assert_eq!(candidate_name(content).as_deref(), Some("Grace Hopper"));
        assert_eq!(field_value(content, ChunkField::Location), Some("Arlington"));
    }

    #[test]
    fn test_unknown_labels_and_prose_are_ignored() {
        let content = "Note: candidate was referred\nCANDIDATE: Alan Turing\nCANDIDATE: Someone Else";
        assert_eq!(candidate_name(content).as_deref(), Some("Alan Turing"));
        assert_eq!(field_value(content, ChunkField::TopSkills), None);
    }
}
