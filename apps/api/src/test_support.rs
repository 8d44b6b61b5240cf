//! Test doubles for the provider capabilities and the vector store.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::embedding::EmbeddingProvider;
use crate::llm_client::{GenerationProvider, ProviderError};
use crate::vector_store::{
    DistanceMetric, MetadataFilter, StoreError, VectorMatch, VectorRecord, VectorStore,
};

type Responder = Box<dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync>;

/// Generation double. Replays scripted responses in order, then falls back to the
/// responder (keyed on the prompt), then to `EmptyContent`.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    responder: Option<Responder>,
    prompts: Mutex<Vec<String>>,
    temperatures: Mutex<Vec<f32>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            responder: None,
            prompts: Mutex::new(Vec::new()),
            temperatures: Mutex::new(Vec::new()),
        }
    }

    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn temperatures(&self) -> Vec<f32> {
        self.temperatures.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerator {
    async fn complete(
        &self,
        _system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.temperatures.lock().unwrap().push(temperature);

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match &self.responder {
            Some(responder) => responder(prompt),
            None => Err(ProviderError::EmptyContent),
        }
    }
}

/// Embedding double. A text's vector is the sum of the vectors of every keyword rule
/// it contains (case-insensitive); texts matching nothing get `fallback`.
pub struct FakeEmbedder {
    dimension: usize,
    rules: Vec<(String, Vec<f32>)>,
    fallback: Vec<f32>,
    fail: bool,
    embed_inputs: Mutex<Vec<String>>,
    batch_calls: Mutex<usize>,
}

impl FakeEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rules: Vec::new(),
            fallback: vec![0.0; dimension],
            fail: false,
            embed_inputs: Mutex::new(Vec::new()),
            batch_calls: Mutex::new(0),
        }
    }

    pub fn with_rule(mut self, keyword: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimension);
        self.rules.push((keyword.to_lowercase(), vector));
        self
    }

    pub fn with_fallback(mut self, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimension);
        self.fallback = vector;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let mut out = vec![0.0; self.dimension];
        let mut matched = false;
        for (keyword, vector) in &self.rules {
            if lowered.contains(keyword.as_str()) {
                matched = true;
                for (o, v) in out.iter_mut().zip(vector) {
                    *o += v;
                }
            }
        }
        if matched {
            out
        } else {
            self.fallback.clone()
        }
    }

    /// Texts passed to single `embed` calls.
    pub fn embed_inputs(&self) -> Vec<String> {
        self.embed_inputs.lock().unwrap().clone()
    }

    pub fn batch_calls(&self) -> usize {
        *self.batch_calls.lock().unwrap()
    }

    pub fn total_calls(&self) -> usize {
        self.embed_inputs.lock().unwrap().len() + self.batch_calls()
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.embed_inputs.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(ProviderError::Api {
                status: 503,
                message: "embedding backend unavailable".to_string(),
            });
        }
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        *self.batch_calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ProviderError::Api {
                status: 503,
                message: "embedding backend unavailable".to_string(),
            });
        }
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

/// Store double whose every operation fails.
pub struct FailingStore;

fn store_down() -> StoreError {
    StoreError::Api {
        status: 503,
        message: "store unavailable".to_string(),
    }
}

#[async_trait]
impl VectorStore for FailingStore {
    async fn ensure_index(&self, _: &str, _: usize, _: DistanceMetric) -> Result<(), StoreError> {
        Err(store_down())
    }

    async fn upsert(&self, _: &str, _: VectorRecord) -> Result<(), StoreError> {
        Err(store_down())
    }

    async fn query(
        &self,
        _: &str,
        _: &[f32],
        _: usize,
        _: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorMatch>, StoreError> {
        Err(store_down())
    }

    async fn delete(&self, _: &str, _: &[String]) -> Result<(), StoreError> {
        Err(store_down())
    }

    async fn clear(&self, _: &str) -> Result<(), StoreError> {
        Err(store_down())
    }
}
