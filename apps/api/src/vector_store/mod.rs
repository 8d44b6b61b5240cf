//! Vector Index Store — the contract the ranking pipeline and corpus builders depend on.
//!
//! Records are `(id, vector, metadata)` triples grouped into named indexes.
//! Two adapters live here: `PineconeStore` (REST) for deployments and `MemoryStore`
//! for development and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod pinecone;
pub mod similarity;

pub use memory::MemoryStore;
pub use pinecone::PineconeStore;

/// Free-form record metadata. Every record written by this service carries `content`.
pub type Metadata = Map<String, Value>;

/// Metadata key holding the embedded text of a record.
pub const CONTENT_KEY: &str = "content";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Index '{0}' does not exist")]
    IndexNotFound(String),

    #[error("Index '{index}' has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Cosine,
    Dotproduct,
    Euclidean,
}

/// One record to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Metadata,
}

/// One nearest-neighbour hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorMatch {
    /// The `content` metadata field, if present and a string.
    pub fn content(&self) -> Option<&str> {
        self.metadata.get(CONTENT_KEY).and_then(Value::as_str)
    }
}

/// Conjunction of `key == value` conditions on record metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter(pub BTreeMap<String, Value>);

impl MetadataFilter {
    pub fn field_eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut conditions = BTreeMap::new();
        conditions.insert(key.into(), value.into());
        Self(conditions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| metadata.get(key) == Some(expected))
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the index if missing. An existing index with another dimension is an error.
    async fn ensure_index(
        &self,
        index: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), StoreError>;

    /// Idempotent: re-upserting an id replaces its vector and metadata.
    async fn upsert(&self, index: &str, record: VectorRecord) -> Result<(), StoreError>;

    /// Top-`top_k` neighbours, metadata included, in descending score order.
    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorMatch>, StoreError>;

    async fn delete(&self, index: &str, ids: &[String]) -> Result<(), StoreError>;

    /// Removes every record from the index, keeping the index itself.
    async fn clear(&self, index: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_filter_matches_all_conditions() {
        let mut filter = MetadataFilter::field_eq("domain", "TECH");
        filter.0.insert("sub_domain".to_string(), json!("AI_ENGINEER"));

        assert!(filter.matches(&metadata(
            json!({"domain": "TECH", "sub_domain": "AI_ENGINEER", "weight": 1.0})
        )));
        assert!(!filter.matches(&metadata(json!({"domain": "TECH", "sub_domain": "DATA_ANALYST"}))));
        assert!(!filter.matches(&metadata(json!({"sub_domain": "AI_ENGINEER"}))));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(MetadataFilter::default().matches(&Metadata::new()));
    }

    #[test]
    fn test_match_content_accessor() {
        let hit = VectorMatch {
            id: "a".to_string(),
            score: 0.9,
            metadata: metadata(json!({"content": "CANDIDATE: Ada"})),
        };
        assert_eq!(hit.content(), Some("CANDIDATE: Ada"));

        let bare = VectorMatch {
            id: "b".to_string(),
            score: 0.1,
            metadata: Metadata::new(),
        };
        assert_eq!(bare.content(), None);
    }

    #[test]
    fn test_metric_serializes_lowercase() {
        assert_eq!(serde_json::to_value(DistanceMetric::Cosine).unwrap(), json!("cosine"));
    }
}
