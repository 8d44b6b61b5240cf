//! Skill corpus builder — indexes the canonical taxonomy into the skills index.

use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::corpus::taxonomy::SkillDefinition;
use crate::corpus::{index_document, CorpusReport};
use crate::llm_client::embedding::EmbeddingProvider;
use crate::vector_store::{Metadata, VectorStore};

/// Filterable tags stored next to each skill's content.
fn skill_metadata(skill: &SkillDefinition) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("skill_id".to_string(), json!(skill.skill_id));
    metadata.insert("domain".to_string(), json!(skill.domain));
    metadata.insert("sub_domain".to_string(), json!(skill.sub_domain));
    metadata.insert("canonical_name".to_string(), json!(skill.canonical_name));
    metadata.insert("weight".to_string(), json!(skill.weight));
    metadata
}

pub async fn build_skill_corpus(
    skills: &[SkillDefinition],
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    index: &str,
    delay: Duration,
) -> CorpusReport {
    let total = skills.len();
    info!("Building skill corpus into '{index}' ({total} skills)");

    let mut report = CorpusReport::default();
    for (i, skill) in skills.iter().enumerate() {
        let result = index_document(
            embedder,
            store,
            index,
            skill.skill_id,
            skill.content(),
            skill_metadata(skill),
        )
        .await;

        match result {
            Ok(()) => {
                report.indexed += 1;
                info!(
                    "[{}/{total}] Indexed {}/{} skill: {} (weight {})",
                    i + 1,
                    skill.domain,
                    skill.sub_domain,
                    skill.canonical_name,
                    skill.weight
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                report.failed += 1;
                warn!("Failed to index skill {}: {e}", skill.skill_id);
            }
        }
    }

    info!(
        "Skill corpus build complete: {} indexed, {} failed",
        report.indexed, report.failed
    );
    report
}
