//! Pinecone REST adapter.
//!
//! Control plane (`api.pinecone.io`) describes and creates indexes; each index has its
//! own data-plane host, resolved once and cached.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::vector_store::{
    DistanceMetric, Metadata, MetadataFilter, StoreError, VectorMatch, VectorRecord, VectorStore,
};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";
const SERVERLESS_CLOUD: &str = "aws";
const SERVERLESS_REGION: &str = "us-east-1";

#[derive(Debug, Deserialize)]
struct IndexDescription {
    dimension: usize,
    host: String,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: DistanceMetric,
    spec: Value,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<WireVector<'a>>,
}

#[derive(Debug, Serialize)]
struct WireVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a Metadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

/// Translates equality conditions into Pinecone's `$eq` filter language.
fn filter_to_wire(filter: &MetadataFilter) -> Option<Value> {
    if filter.is_empty() {
        return None;
    }
    let conditions: Map<String, Value> = filter
        .0
        .iter()
        .map(|(key, value)| (key.clone(), json!({ "$eq": value })))
        .collect();
    Some(Value::Object(conditions))
}

pub struct PineconeStore {
    client: Client,
    api_key: String,
    hosts: RwLock<HashMap<String, String>>,
}

impl PineconeStore {
    pub fn new(api_key: String) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            api_key,
            hosts: RwLock::new(HashMap::new()),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    async fn describe_index(&self, index: &str) -> Result<Option<IndexDescription>, StoreError> {
        let response = self
            .authed(self.client.get(format!("{CONTROL_PLANE_URL}/indexes/{index}")))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Data-plane host for `index`, fetched from the control plane on first use.
    async fn host(&self, index: &str) -> Result<String, StoreError> {
        if let Some(host) = self.hosts.read().await.get(index) {
            return Ok(host.clone());
        }

        let description = self
            .describe_index(index)
            .await?
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;
        self.hosts
            .write()
            .await
            .insert(index.to_string(), description.host.clone());
        Ok(description.host)
    }

    async fn data_plane_post<B: Serialize + Sync>(
        &self,
        index: &str,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, StoreError> {
        let host = self.host(index).await?;
        let url = if host.starts_with("http") {
            format!("{host}{path}")
        } else {
            format!("https://{host}{path}")
        };
        let response = self.authed(self.client.post(url)).json(body).send().await?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn ensure_index(
        &self,
        index: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), StoreError> {
        if let Some(existing) = self.describe_index(index).await? {
            if existing.dimension != dimension {
                return Err(StoreError::DimensionMismatch {
                    index: index.to_string(),
                    expected: dimension,
                    actual: existing.dimension,
                });
            }
            self.hosts
                .write()
                .await
                .insert(index.to_string(), existing.host);
            return Ok(());
        }

        info!("Creating Pinecone index '{index}' (dimension={dimension}, metric={metric:?})");
        let request = CreateIndexRequest {
            name: index,
            dimension,
            metric,
            spec: json!({
                "serverless": { "cloud": SERVERLESS_CLOUD, "region": SERVERLESS_REGION }
            }),
        };
        let response = self
            .authed(self.client.post(format!("{CONTROL_PLANE_URL}/indexes")))
            .json(&request)
            .send()
            .await?;
        let created: IndexDescription = check_status(response).await?.json().await?;
        self.hosts
            .write()
            .await
            .insert(index.to_string(), created.host);
        Ok(())
    }

    async fn upsert(&self, index: &str, record: VectorRecord) -> Result<(), StoreError> {
        let request = UpsertRequest {
            vectors: vec![WireVector {
                id: &record.id,
                values: &record.values,
                metadata: &record.metadata,
            }],
        };
        self.data_plane_post(index, "/vectors/upsert", &request)
            .await?;
        debug!("Upserted '{}' into '{index}'", record.id);
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorMatch>, StoreError> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            filter: filter.and_then(filter_to_wire),
        };
        let response: QueryResponse = self
            .data_plane_post(index, "/query", &request)
            .await?
            .json()
            .await?;
        debug!("Query on '{index}' returned {} matches", response.matches.len());
        Ok(response.matches)
    }

    async fn delete(&self, index: &str, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.data_plane_post(index, "/vectors/delete", &json!({ "ids": ids }))
            .await?;
        Ok(())
    }

    async fn clear(&self, index: &str) -> Result<(), StoreError> {
        self.data_plane_post(index, "/vectors/delete", &json!({ "deleteAll": true }))
            .await?;
        info!("Cleared every vector from '{index}'");
        Ok(())
    }
}
