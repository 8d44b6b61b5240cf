//! Candidate Ranker — the two-stage retrieval pipeline.
//!
//! A `RankingRequest` is either `Database` (skills index → skill-target query →
//! candidate documents index) or `Local` (model-synthesised skill-target query →
//! in-memory dot-product scoring of the supplied documents). Both produce
//! `RankedCandidate`s on a 0–100 scale with dense 1-based ranks.
//!
//! Ranking never fails. Every provider or store failure is logged and degrades to
//! an empty result with a `RankingNotice`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::llm_client::embedding::EmbeddingProvider;
use crate::llm_client::prompts::{fill, PLAIN_TEXT_SYSTEM};
use crate::llm_client::GenerationProvider;
use crate::matching::chunk::{candidate_name, UNKNOWN_NAME};
use crate::matching::extraction::extract_profile;
use crate::matching::normalize::{dense_rank, scale_database_score, scale_local_score};
use crate::matching::prompts::SKILL_QUERY_PROMPT_TEMPLATE;
use crate::matching::skill_matcher::{is_matchable, SkillMatcher};
use crate::vector_store::similarity::dot_product;
use crate::vector_store::VectorStore;

/// Database mode casts a wider skill net than the caller's `k`.
pub const DATABASE_SKILL_POOL: usize = 15;
pub const DATABASE_SKILL_THRESHOLD: f32 = 0.70;
pub const SKILL_QUERY_TEMPERATURE: f32 = 0.1;
pub const MISSING_SUMMARY: &str = "No summary defined.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub summary: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    Database,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankingRequest {
    Database {
        job_description: String,
        k: usize,
    },
    Local {
        job_description: String,
        k: usize,
        documents: Vec<String>,
    },
}

impl RankingRequest {
    /// Supplying candidate documents (even an empty list) selects local mode.
    pub fn new(job_description: String, k: usize, candidate_docs: Option<Vec<String>>) -> Self {
        match candidate_docs {
            Some(documents) => RankingRequest::Local {
                job_description,
                k,
                documents,
            },
            None => RankingRequest::Database { job_description, k },
        }
    }

    pub fn mode(&self) -> RankingMode {
        match self {
            RankingRequest::Database { .. } => RankingMode::Database,
            RankingRequest::Local { .. } => RankingMode::Local,
        }
    }
}

/// User-visible reason for an empty ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingNotice {
    JobDescriptionTooShort,
    NoDocuments,
    NoCandidatesFound,
}

impl RankingNotice {
    pub fn message(self) -> &'static str {
        match self {
            RankingNotice::JobDescriptionTooShort => {
                "The job description is too short or empty to identify the required skills."
            }
            RankingNotice::NoDocuments => "No candidate documents were provided.",
            RankingNotice::NoCandidatesFound => {
                "No candidates matched the skills identified in the job description."
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingOutcome {
    pub candidates: Vec<RankedCandidate>,
    pub notice: Option<RankingNotice>,
}

impl RankingOutcome {
    fn aborted(notice: RankingNotice) -> Self {
        Self {
            candidates: Vec::new(),
            notice: Some(notice),
        }
    }

    fn ranked(candidates: Vec<RankedCandidate>) -> Self {
        let notice = candidates
            .is_empty()
            .then_some(RankingNotice::NoCandidatesFound);
        Self { candidates, notice }
    }
}

#[async_trait]
pub trait Ranker: Send + Sync {
    async fn rank(&self, request: RankingRequest) -> RankingOutcome;
}

// ────────────────────────────────────────────────────────────────────────────
// Database mode
// ────────────────────────────────────────────────────────────────────────────

pub struct DatabaseRanker {
    skill_matcher: Arc<SkillMatcher>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    docs_index: String,
}

impl DatabaseRanker {
    pub fn new(
        skill_matcher: Arc<SkillMatcher>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        docs_index: impl Into<String>,
    ) -> Self {
        Self {
            skill_matcher,
            embedder,
            store,
            docs_index: docs_index.into(),
        }
    }

    pub async fn rank_candidates(&self, job_description: &str, k: usize) -> RankingOutcome {
        if k == 0 {
            return RankingOutcome::default();
        }
        if !is_matchable(job_description) {
            warn!("Database ranking aborted: job description too short");
            return RankingOutcome::aborted(RankingNotice::JobDescriptionTooShort);
        }

        // Stage 1: canonical skills
        let skills = self
            .skill_matcher
            .match_skills(job_description, DATABASE_SKILL_POOL, DATABASE_SKILL_THRESHOLD)
            .await;
        if skills.is_empty() {
            info!("No relevant skills were identified from the job description; aborting candidate search");
            return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
        }

        // Stage 2: skill-target query
        let skill_ids: Vec<&str> = skills.iter().map(|s| s.id.as_str()).collect();
        info!("Identified skills: {}", skill_ids.join(", "));
        let query_text = skills
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        // Stage 3: candidate retrieval
        let vector = match self.embedder.embed(&query_text).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Candidate retrieval failed while embedding the skill-target query: {e}");
                return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
            }
        };
        let matches = match self.store.query(&self.docs_index, &vector, k, None).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Candidate retrieval failed while querying '{}': {e}", self.docs_index);
                return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
            }
        };
        if matches.is_empty() {
            info!("No candidates matched the skill-target query");
            return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
        }

        // Stage 4: format. The store already returns descending scores; the stable
        // re-sort only matters if it does not.
        let unranked: Vec<RankedCandidate> = matches
            .into_iter()
            .map(|m| {
                let content = m.content().map(str::to_string);
                RankedCandidate {
                    rank: 0,
                    name: content
                        .as_deref()
                        .and_then(candidate_name)
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    summary: content.unwrap_or_else(|| MISSING_SUMMARY.to_string()),
                    match_score: scale_database_score(m.score),
                    id: m.id,
                }
            })
            .collect();

        let candidates = dense_rank(unranked, |c| c.match_score, k)
            .into_iter()
            .map(|(rank, candidate)| RankedCandidate { rank, ..candidate })
            .collect();
        RankingOutcome::ranked(candidates)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Local mode
// ────────────────────────────────────────────────────────────────────────────

pub struct LocalRanker {
    llm: Arc<dyn GenerationProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl LocalRanker {
    pub fn new(llm: Arc<dyn GenerationProvider>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { llm, embedder }
    }

    async fn synthesize_query(&self, job_description: &str) -> Option<String> {
        let prompt = fill(
            SKILL_QUERY_PROMPT_TEMPLATE,
            &[("job_description", job_description)],
        );
        match self
            .llm
            .complete(PLAIN_TEXT_SYSTEM, &prompt, SKILL_QUERY_TEMPERATURE)
            .await
        {
            Ok(query) => Some(query.trim().to_string()),
            Err(e) => {
                warn!("Skill-target query synthesis failed: {e}");
                None
            }
        }
    }

    pub async fn rank_candidates(
        &self,
        job_description: &str,
        k: usize,
        documents: &[String],
    ) -> RankingOutcome {
        if documents.is_empty() {
            info!("No candidate documents provided");
            return RankingOutcome::aborted(RankingNotice::NoDocuments);
        }
        if k == 0 {
            return RankingOutcome::default();
        }
        if job_description.trim().is_empty() {
            warn!("Local ranking aborted: empty job description");
            return RankingOutcome::aborted(RankingNotice::JobDescriptionTooShort);
        }

        info!("Processing {} local documents", documents.len());

        // Stage 1: skill-target query straight from the JD
        let Some(query) = self.synthesize_query(job_description).await else {
            return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
        };
        debug!(
            "Generated target query: '{}...'",
            query.chars().take(80).collect::<String>()
        );

        // Stage 2: one query embedding, one batch for the documents
        let query_vector = match self.embedder.embed(&query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Local ranking failed while embedding the query: {e}");
                return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
            }
        };
        let document_vectors = match self.embedder.embed_batch(documents).await {
            Ok(vectors) if vectors.len() == documents.len() => vectors,
            Ok(vectors) => {
                warn!(
                    "Embedding provider returned {} vectors for {} documents",
                    vectors.len(),
                    documents.len()
                );
                return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
            }
            Err(e) => {
                warn!("Local ranking failed while embedding documents: {e}");
                return RankingOutcome::aborted(RankingNotice::NoCandidatesFound);
            }
        };

        // Stage 3: score, sort, cut to k
        let scored: Vec<(usize, f64)> = document_vectors
            .iter()
            .map(|v| scale_local_score(dot_product(v, &query_vector)))
            .enumerate()
            .collect();
        let top = dense_rank(scored, |&(_, score)| score, k);

        // Stage 4: name and summary for the survivors, one call each
        let mut candidates = Vec::with_capacity(top.len());
        for (rank, (index, match_score)) in top {
            let id = format!("local-doc-{}", index + 1);
            let profile = extract_profile(self.llm.as_ref(), &documents[index], &id).await;
            candidates.push(RankedCandidate {
                rank,
                id,
                name: profile.name,
                summary: profile.summary,
                match_score,
            });
        }
        RankingOutcome::ranked(candidates)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch
// ────────────────────────────────────────────────────────────────────────────

/// `Ranker` that routes each request variant to its mode implementation.
pub struct CandidateRanker {
    database: DatabaseRanker,
    local: LocalRanker,
}

impl CandidateRanker {
    pub fn new(database: DatabaseRanker, local: LocalRanker) -> Self {
        Self { database, local }
    }
}

#[async_trait]
impl Ranker for CandidateRanker {
    async fn rank(&self, request: RankingRequest) -> RankingOutcome {
        match request {
            RankingRequest::Database { job_description, k } => {
                self.database.rank_candidates(&job_description, k).await
            }
            RankingRequest::Local {
                job_description,
                k,
                documents,
            } => {
                self.local
                    .rank_candidates(&job_description, k, &documents)
                    .await
            }
        }
    }
}
