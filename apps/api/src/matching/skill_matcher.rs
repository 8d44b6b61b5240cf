//! Skill Matcher — maps a job description onto canonical skills from the skills index.
//!
//! Degrade-to-empty: a too-short JD, an embedding failure or a store failure all yield
//! an empty list with a warning, never an error.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::llm_client::embedding::EmbeddingProvider;
use crate::vector_store::{MetadataFilter, VectorStore};

/// Job descriptions shorter than this (in characters, trimmed) are not embedded.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub id: String,
    pub score: f32,
    pub content: String,
}

pub fn is_matchable(job_description: &str) -> bool {
    job_description.trim().chars().count() >= MIN_JOB_DESCRIPTION_CHARS
}

pub struct SkillMatcher {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    index: String,
}

impl SkillMatcher {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            index: index.into(),
        }
    }

    /// Top-`k` skills for the JD with `score >= score_threshold`, in store order.
    pub async fn match_skills(
        &self,
        job_description: &str,
        k: usize,
        score_threshold: f32,
    ) -> Vec<SkillMatch> {
        self.match_skills_filtered(job_description, k, score_threshold, None)
            .await
    }

    /// As `match_skills`, restricted to skills whose metadata satisfies `filter`.
    pub async fn match_skills_filtered(
        &self,
        job_description: &str,
        k: usize,
        score_threshold: f32,
        filter: Option<&MetadataFilter>,
    ) -> Vec<SkillMatch> {
        if !is_matchable(job_description) {
            warn!(
                "Job description is too short or empty for skill retrieval (minimum {MIN_JOB_DESCRIPTION_CHARS} characters)"
            );
            return Vec::new();
        }
        if k == 0 {
            return Vec::new();
        }

        debug!("Retrieving top {k} skills from '{}'", self.index);

        let vector = match self.embedder.embed(job_description).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Skill retrieval failed while embedding the job description: {e}");
                return Vec::new();
            }
        };

        let matches = match self.store.query(&self.index, &vector, k, filter).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Skill retrieval failed while querying '{}': {e}", self.index);
                return Vec::new();
            }
        };

        if matches.is_empty() {
            info!("No skills found that match the job description");
            return Vec::new();
        }

        let skills: Vec<SkillMatch> = matches
            .into_iter()
            .filter(|m| m.score >= score_threshold)
            .map(|m| {
                let content = m.content().unwrap_or_default().to_string();
                SkillMatch {
                    id: m.id,
                    score: m.score,
                    content,
                }
            })
            .collect();

        info!(
            "Found {} skills above threshold ({score_threshold})",
            skills.len()
        );
        skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStore, FakeEmbedder};
    use crate::vector_store::{DistanceMetric, MemoryStore, Metadata, VectorRecord};
    use serde_json::json;

    const INDEX: &str = "skills-index";
    const DATA_SCIENTIST_JD: &str =
        "Seeking a Senior Data Scientist with NLP and RAG experience";

    fn skill(id: &str, values: Vec<f32>, domain: &str) -> VectorRecord {
        let mut metadata = Metadata::new();
        metadata.insert("content".to_string(), json!(format!("NAME: {id}")));
        metadata.insert("domain".to_string(), json!(domain));
        VectorRecord {
            id: id.to_string(),
            values,
            metadata,
        }
    }

    /// Query vector for the data-scientist JD is [1, 1, 0] / √2 after normalisation,
    /// so NLP and RAG land at ~0.71 and the others well below 0.70.
    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .ensure_index(INDEX, 3, DistanceMetric::Cosine)
            .await
            .unwrap();
        for record in [
            skill("CAN_NLP_LLMS", vec![1.0, 0.0, 0.0], "TECH"),
            skill("CAN_RAG_VECTORS", vec![0.0, 1.0, 0.0], "TECH"),
            skill("CAN_HR_BENEFIT_ADMIN", vec![0.0, 0.0, 1.0], "HR"),
            skill("CAN_DB_SQL_DA", vec![0.2, 0.0, 1.0], "TECH"),
        ] {
            store.upsert(INDEX, record).await.unwrap();
        }
        store
    }

    fn embedder() -> Arc<FakeEmbedder> {
        Arc::new(
            FakeEmbedder::new(3)
                .with_rule("nlp", vec![1.0, 0.0, 0.0])
                .with_rule("rag", vec![0.0, 1.0, 0.0])
                .with_fallback(vec![0.0, 0.0, 1.0]),
        )
    }

    #[tokio::test]
    async fn test_data_scientist_jd_matches_nlp_and_rag() {
        let matcher = SkillMatcher::new(embedder(), seeded_store().await, INDEX);
        let skills = matcher.match_skills(DATA_SCIENTIST_JD, 15, 0.70).await;

        let ids: Vec<&str> = skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["CAN_NLP_LLMS", "CAN_RAG_VECTORS"]);
        assert_eq!(skills[0].content, "NAME: CAN_NLP_LLMS");
    }

    #[tokio::test]
    async fn test_no_match_below_threshold_is_returned() {
        let matcher = SkillMatcher::new(embedder(), seeded_store().await, INDEX);
        for threshold in [0.0, 0.5, 0.70, 0.72, 0.99] {
            let skills = matcher.match_skills(DATA_SCIENTIST_JD, 15, threshold).await;
            assert!(skills.iter().all(|s| s.score >= threshold));
        }
    }

    #[tokio::test]
    async fn test_short_jd_returns_empty_without_embedding() {
        let embedder = embedder();
        let matcher = SkillMatcher::new(embedder.clone(), seeded_store().await, INDEX);

        assert!(matcher.match_skills("NLP engineer", 15, 0.0).await.is_empty());
        assert!(matcher.match_skills("   ", 15, 0.0).await.is_empty());
        assert_eq!(embedder.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_empty() {
        let matcher = SkillMatcher::new(embedder(), Arc::new(FailingStore), INDEX);
        assert!(matcher.match_skills(DATA_SCIENTIST_JD, 15, 0.0).await.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_empty() {
        let failing = Arc::new(FakeEmbedder::new(3).failing());
        let matcher = SkillMatcher::new(failing, seeded_store().await, INDEX);
        assert!(matcher.match_skills(DATA_SCIENTIST_JD, 15, 0.0).await.is_empty());
    }

    #[tokio::test]
    async fn test_domain_filter_restricts_skills() {
        let matcher = SkillMatcher::new(embedder(), seeded_store().await, INDEX);
        let filter = MetadataFilter::field_eq("domain", "HR");
        let skills = matcher
            .match_skills_filtered("Benefits administration and payroll lead", 10, 0.0, Some(&filter))
            .await;

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id, "CAN_HR_BENEFIT_ADMIN");
    }

    #[tokio::test]
    async fn test_k_bounds_the_query() {
        let matcher = SkillMatcher::new(embedder(), seeded_store().await, INDEX);
        assert_eq!(matcher.match_skills(DATA_SCIENTIST_JD, 1, 0.0).await.len(), 1);
        assert!(matcher.match_skills(DATA_SCIENTIST_JD, 0, 0.0).await.is_empty());
    }
}
