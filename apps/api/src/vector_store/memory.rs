//! Process-local vector store with exact similarity search.
//!
//! Ties are broken by insertion order, so results are deterministic for a given
//! upsert history.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::vector_store::similarity::{cosine_similarity, dot_product, negative_euclidean};
use crate::vector_store::{
    DistanceMetric, MetadataFilter, StoreError, VectorMatch, VectorRecord, VectorStore,
};

struct MemoryIndex {
    dimension: usize,
    metric: DistanceMetric,
    records: Vec<VectorRecord>,
}

impl MemoryIndex {
    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            DistanceMetric::Cosine => cosine_similarity(a, b),
            DistanceMetric::Dotproduct => dot_product(a, b),
            DistanceMetric::Euclidean => negative_euclidean(a, b),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    indexes: RwLock<HashMap<String, MemoryIndex>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `index`, or `None` if the index does not exist.
    #[cfg(test)]
    pub async fn len(&self, index: &str) -> Option<usize> {
        self.indexes.read().await.get(index).map(|i| i.records.len())
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn ensure_index(
        &self,
        index: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), StoreError> {
        let mut indexes = self.indexes.write().await;
        match indexes.get(index) {
            Some(existing) if existing.dimension != dimension => {
                Err(StoreError::DimensionMismatch {
                    index: index.to_string(),
                    expected: dimension,
                    actual: existing.dimension,
                })
            }
            Some(_) => Ok(()),
            None => {
                debug!("Creating in-memory index '{index}' (dimension={dimension}, metric={metric:?})");
                indexes.insert(
                    index.to_string(),
                    MemoryIndex {
                        dimension,
                        metric,
                        records: Vec::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn upsert(&self, index: &str, record: VectorRecord) -> Result<(), StoreError> {
        let mut indexes = self.indexes.write().await;
        let target = indexes
            .get_mut(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;

        if record.values.len() != target.dimension {
            return Err(StoreError::InvalidRecord(format!(
                "record '{}' has {} values, index '{index}' expects {}",
                record.id,
                record.values.len(),
                target.dimension
            )));
        }

        match target.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => target.records.push(record),
        }
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorMatch>, StoreError> {
        let indexes = self.indexes.read().await;
        let target = indexes
            .get(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;

        if vector.len() != target.dimension {
            return Err(StoreError::DimensionMismatch {
                index: index.to_string(),
                expected: target.dimension,
                actual: vector.len(),
            });
        }

        let mut matches: Vec<VectorMatch> = target
            .records
            .iter()
            .filter(|r| filter.map_or(true, |f| f.matches(&r.metadata)))
            .map(|r| VectorMatch {
                id: r.id.clone(),
                score: target.score(&r.values, vector),
                metadata: r.metadata.clone(),
            })
            .collect();

        // sort_by is stable: equal scores keep insertion order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete(&self, index: &str, ids: &[String]) -> Result<(), StoreError> {
        let mut indexes = self.indexes.write().await;
        let target = indexes
            .get_mut(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;
        target.records.retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn clear(&self, index: &str) -> Result<(), StoreError> {
        let mut indexes = self.indexes.write().await;
        let target = indexes
            .get_mut(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;
        target.records.clear();
        Ok(())
    }
}
