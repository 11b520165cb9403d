//! Elasticsearch client for the recipe index.
//!
//! Only the handful of REST calls a crawl run needs: a liveness probe, index
//! existence check and creation, document indexing, and search.

mod mapping;
mod query;

pub use mapping::{creation_body, FieldType, IndexMapping};
pub use query::{Range, SearchQuery};

use crate::config::{BackendConfig, IndexConfig};
use crate::error::IndexerError;
use crate::model::RecipeRecord;
use log::{debug, error, info};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Outcome of a successful [`IndexClient::try_ensure_index`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    AlreadyExists,
}

/// Backend acknowledgement for one indexed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreOutcome {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub result: String,
}

/// Handle to a search backend that answered the liveness probe.
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: Client,
    base_url: String,
}

impl IndexClient {
    /// Probe the backend and return a handle if it is reachable.
    pub async fn connect(config: &BackendConfig) -> Option<Self> {
        match Self::try_connect(config).await {
            Ok(client) => {
                info!("Connected to search backend at {}", client.base_url);
                Some(client)
            }
            Err(e) => {
                error!("Could not connect to search backend at {}: {}", config.url, e);
                None
            }
        }
    }

    pub async fn try_connect(config: &BackendConfig) -> Result<Self, IndexerError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let index_client = IndexClient {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        };
        index_client.ping().await?;
        Ok(index_client)
    }

    async fn ping(&self) -> Result<(), IndexerError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|e| IndexerError::IndexConnection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(IndexerError::IndexConnection(format!(
                "liveness probe answered {}",
                response.status()
            )))
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn index_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Make sure the index exists, creating it if needed.
    ///
    /// Returns `false` (after logging) when the index could not be confirmed
    /// or created.
    pub async fn ensure_index(&self, index: &IndexConfig) -> bool {
        match self.try_ensure_index(index).await {
            Ok(status) => {
                debug!("Index '{}' ready ({:?})", index.name, status);
                true
            }
            Err(e) => {
                error!("Failed to create index '{}': {}", index.name, e);
                false
            }
        }
    }

    pub async fn try_ensure_index(
        &self,
        index: &IndexConfig,
    ) -> Result<IndexStatus, IndexerError> {
        let url = self.index_url(&index.name);

        let response = self.client.head(&url).send().await?;
        match response.status() {
            status if status.is_success() => return Ok(IndexStatus::AlreadyExists),
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(IndexerError::IndexOperation {
                    status: status.as_u16(),
                    reason: "unexpected answer to index existence check".to_string(),
                })
            }
        }

        let body = creation_body(
            &index.doc_type,
            index.shards,
            index.replicas,
            &index.mapping,
        );
        let response = self.client.put(&url).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            info!("Created index '{}'", index.name);
            return Ok(IndexStatus::Created);
        }

        let payload = error_payload(response).await;
        // Another writer created it between the existence check and now.
        if status == StatusCode::BAD_REQUEST && error_type(&payload) == Some(ALREADY_EXISTS) {
            debug!("Index '{}' already exists", index.name);
            return Ok(IndexStatus::AlreadyExists);
        }

        Err(IndexerError::IndexOperation {
            status: status.as_u16(),
            reason: error_reason(&payload),
        })
    }

    /// Index one record. Returns `false` (after logging) on any failure.
    pub async fn store(&self, index: &IndexConfig, record: &RecipeRecord) -> bool {
        match self.try_store(index, record).await {
            Ok(outcome) => {
                info!(
                    "Indexed '{}' into '{}' as {} ({})",
                    record.title, index.name, outcome.id, outcome.result
                );
                true
            }
            Err(e) => {
                error!("Error in indexing data: {}", e);
                false
            }
        }
    }

    pub async fn try_store(
        &self,
        index: &IndexConfig,
        record: &RecipeRecord,
    ) -> Result<StoreOutcome, IndexerError> {
        let document = record.to_document()?;
        let url = format!("{}/{}", self.index_url(&index.name), index.doc_type);

        let response = self.client.post(&url).json(&document).send().await?;
        let status = response.status();
        if !status.is_success() {
            let payload = error_payload(response).await;
            return Err(IndexerError::IndexOperation {
                status: status.as_u16(),
                reason: error_reason(&payload),
            });
        }

        Ok(response.json::<StoreOutcome>().await?)
    }

    /// Run a query and return the raw response payload.
    pub async fn search(&self, name: &str, query: &SearchQuery) -> Result<Value, IndexerError> {
        let url = format!("{}/_search", self.index_url(name));
        debug!("Searching '{}' with {}", name, serde_json::to_string(query)?);

        let response = self.client.post(&url).json(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let payload = error_payload(response).await;
            return Err(IndexerError::IndexOperation {
                status: status.as_u16(),
                reason: error_reason(&payload),
            });
        }

        Ok(response.json().await?)
    }
}

async fn error_payload(response: Response) -> Value {
    response.json().await.unwrap_or(Value::Null)
}

fn error_type(payload: &Value) -> Option<&str> {
    payload["error"]["type"].as_str()
}

fn error_reason(payload: &Value) -> String {
    payload["error"]["reason"]
        .as_str()
        .or_else(|| payload["error"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string())
}
