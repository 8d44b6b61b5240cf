// Offline corpus builders.
// Populate the skills index from the built-in taxonomy and the candidate documents
// index from raw résumé records. Sequential, one record at a time, with a fixed delay.

pub mod documents;
pub mod skills;
pub mod taxonomy;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::embedding::EmbeddingProvider;
use crate::llm_client::ProviderError;
use crate::vector_store::{Metadata, StoreError, VectorRecord, VectorStore, CONTENT_KEY};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("embedding failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("index write failed: {0}")]
    Store(#[from] StoreError),
}

/// Tally of one corpus build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusReport {
    pub indexed: usize,
    /// Records rejected before embedding (too short, unparseable).
    pub skipped: usize,
    /// Records whose embedding or upsert failed.
    pub failed: usize,
}

/// Embeds `content` and upserts it under `id`, storing the text as `content` metadata.
pub async fn index_document(
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    index: &str,
    id: &str,
    content: String,
    mut metadata: Metadata,
) -> Result<(), CorpusError> {
    let values = embedder.embed(&content).await?;
    metadata.insert(CONTENT_KEY.to_string(), Value::String(content));
    store
        .upsert(
            index,
            VectorRecord {
                id: id.to_string(),
                values,
                metadata,
            },
        )
        .await?;
    Ok(())
}
