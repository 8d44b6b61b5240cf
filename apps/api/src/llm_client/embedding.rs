//! Embedding capability and the Gemini embedding client.
//!
//! Every vector returned by an `EmbeddingProvider` has exactly `dimension()` components;
//! the vector indexes are created with the same dimension at startup.

use std::future::Future;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::ProviderError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const EMBEDDING_MODEL: &str = "gemini-embedding-001";
/// Output dimension of `gemini-embedding-001` at full size.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 3072;
/// `batchEmbedContents` rejects more requests than this in one call.
pub const MAX_BATCH_SIZE: usize = 100;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed length of every vector this provider returns.
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Many texts at once; output order matches input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn content_request(text: &str, dimension: usize) -> EmbedContentRequest<'_> {
    EmbedContentRequest {
        model: format!("models/{EMBEDDING_MODEL}"),
        content: Content {
            parts: vec![Part { text }],
        },
        output_dimensionality: dimension,
    }
}

fn check_dimension(values: Vec<f32>, expected: usize) -> Result<Vec<f32>, ProviderError> {
    if values.len() != expected {
        return Err(ProviderError::DimensionMismatch {
            expected,
            actual: values.len(),
        });
    }
    Ok(values)
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    dimension: usize,
    retry: RetryPolicy,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, dimension: usize) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            api_key,
            dimension,
            retry: RetryPolicy::default(),
        })
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let url = format!("{GEMINI_API_BASE}/models/{EMBEDDING_MODEL}:{method}");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let body = content_request(text, self.dimension);
        let body = &body;
        let response: EmbedContentResponse = self
            .retry
            .run("gemini.embedContent", move || self.post("embedContent", body))
            .await?;

        check_dimension(response.embedding.values, self.dimension)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        embed_in_batches(texts, MAX_BATCH_SIZE, |chunk| self.embed_chunk(chunk)).await
    }
}

impl GeminiEmbedder {
    /// One `batchEmbedContents` round-trip. `texts` must not exceed `MAX_BATCH_SIZE`.
    async fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|t| content_request(t, self.dimension))
                .collect(),
        };
        let body = &body;
        let response: BatchEmbedResponse = self
            .retry
            .run("gemini.batchEmbedContents", move || {
                self.post("batchEmbedContents", body)
            })
            .await?;

        debug!("Embedded batch of {} texts", texts.len());

        response
            .embeddings
            .into_iter()
            .map(|e| check_dimension(e.values, self.dimension))
            .collect()
    }
}

/// Splits `texts` into consecutive chunks of at most `batch_size`, embeds them in
/// order and concatenates the results. A chunk that comes back with the wrong
/// number of vectors fails the whole batch.
async fn embed_in_batches<'a, F, Fut>(
    texts: &'a [String],
    batch_size: usize,
    mut embed_chunk: F,
) -> Result<Vec<Vec<f32>>, ProviderError>
where
    F: FnMut(&'a [String]) -> Fut,
    Fut: Future<Output = Result<Vec<Vec<f32>>, ProviderError>>,
{
    let mut vectors = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        let embedded = embed_chunk(chunk).await?;
        if embedded.len() != chunk.len() {
            return Err(ProviderError::Malformed(format!(
                "requested {} embeddings, received {}",
                chunk.len(),
                embedded.len()
            )));
        }
        vectors.extend(embedded);
    }
    Ok(vectors)
}

/// Confirms the provider is configured for `expected` components and that a live
/// call actually returns vectors of that length.
pub async fn verify_dimension(
    embedder: &dyn EmbeddingProvider,
    expected: usize,
) -> Result<(), ProviderError> {
    if embedder.dimension() != expected {
        return Err(ProviderError::DimensionMismatch {
            expected,
            actual: embedder.dimension(),
        });
    }
    let vector = embedder.embed("dimension check").await?;
    check_dimension(vector, expected).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeEmbedder;

    #[test]
    fn test_content_request_shape() {
        let body = content_request("Rust engineer", 3072);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "models/gemini-embedding-001");
        assert_eq!(value["content"]["parts"][0]["text"], "Rust engineer");
        assert_eq!(value["outputDimensionality"], 3072);
    }

    #[test]
    fn test_batch_response_parses() {
        let json = r#"{"embeddings": [{"values": [0.1, 0.2]}, {"values": [0.3, 0.4]}]}"#;
        let parsed: BatchEmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.embeddings.len(), 2);
        assert_eq!(parsed.embeddings[1].values, vec![0.3, 0.4]);
    }

    #[test]
    fn test_check_dimension_rejects_wrong_length() {
        let err = check_dimension(vec![0.0; 4], 3).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::DimensionMismatch {
                expected: 3,
                actual: 4
            }
        ));
        assert_eq!(check_dimension(vec![1.0; 3], 3).unwrap().len(), 3);
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc {i}")).collect()
    }

    #[tokio::test]
    async fn test_large_batches_are_split_in_order() {
        let input = texts(250);
        let mut chunk_sizes = Vec::new();
        let vectors = embed_in_batches(&input, MAX_BATCH_SIZE, |chunk| {
            chunk_sizes.push(chunk.len());
            async move {
                Ok::<_, ProviderError>(
                    chunk
                        .iter()
                        .map(|t| vec![t.trim_start_matches("doc ").parse::<f32>().unwrap()])
                        .collect::<Vec<_>>(),
                )
            }
        })
        .await
        .unwrap();

        assert_eq!(chunk_sizes, vec![100, 100, 50]);
        assert_eq!(vectors.len(), 250);
        assert!(vectors.iter().enumerate().all(|(i, v)| v[0] == i as f32));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let mut calls = 0;
        let vectors = embed_in_batches(&[], MAX_BATCH_SIZE, |_| {
            calls += 1;
            async { Ok::<_, ProviderError>(Vec::new()) }
        })
        .await
        .unwrap();
        assert!(vectors.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_short_chunk_response_is_malformed() {
        let input = texts(3);
        let result = embed_in_batches(&input, 2, |chunk| async move {
            Ok::<_, ProviderError>(vec![vec![0.0_f32]; chunk.len().min(1)])
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_chunk_error_stops_the_batch() {
        let input = texts(5);
        let mut calls = 0;
        let result = embed_in_batches(&input, 2, |_| {
            calls += 1;
            async { Err::<Vec<Vec<f32>>, _>(ProviderError::EmptyContent) }
        })
        .await;
        assert!(matches!(result, Err(ProviderError::EmptyContent)));
        assert_eq!(calls, 1);
    }

    /// Claims one dimension but returns shorter vectors.
    struct TruncatingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for TruncatingEmbedder {
        fn dimension(&self) -> usize {
            3
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.0; 2])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(vec![vec![0.0; 2]; texts.len()])
        }
    }

    #[tokio::test]
    async fn test_verify_dimension_accepts_matching_provider() {
        let embedder = FakeEmbedder::new(3);
        verify_dimension(&embedder, 3).await.unwrap();
        assert_eq!(embedder.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_verify_dimension_rejects_configured_mismatch_without_calling() {
        let embedder = FakeEmbedder::new(4);
        let err = verify_dimension(&embedder, 3).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::DimensionMismatch {
                expected: 3,
                actual: 4
            }
        ));
        assert_eq!(embedder.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_dimension_rejects_short_live_vectors() {
        let err = verify_dimension(&TruncatingEmbedder, 3).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_verify_dimension_surfaces_provider_failure() {
        let embedder = FakeEmbedder::new(3).failing();
        assert!(verify_dimension(&embedder, 3).await.is_err());
    }
}
