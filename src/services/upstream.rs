use crate::models::{ActivitySession, CentreActivityGroup, CommunityCentre, NormalizedActivityName};
use crate::services::cache::{CacheKey, ResponseCache};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when talking to the upstream activity API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("API request failed: {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("API response validation failed: {0}")]
    Validation(String),

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl UpstreamError {
    fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(timeout_secs)
        } else {
            UpstreamError::Network(err.to_string())
        }
    }

    /// Whether the upstream reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            UpstreamError::NotFound(_) => true,
            UpstreamError::Api { status, .. } => *status == StatusCode::NOT_FOUND.as_u16(),
            _ => false,
        }
    }
}

/// Read-only client for the community-centre activity API
///
/// Every payload is deserialized and validated before it reaches the
/// listing code, and validated payloads are cached per path.
pub struct UpstreamClient {
    base_url: String,
    timeout_secs: u64,
    client: Client,
    cache: Arc<ResponseCache>,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(
        base_url: &str,
        timeout: Duration,
        cache: Arc<ResponseCache>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
            client,
            cache,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch every community centre
    pub async fn centres(&self) -> Result<Vec<CommunityCentre>, UpstreamError> {
        self.get_list("/centres").await
    }

    /// Fetch a single centre by id
    pub async fn centre(&self, centre_id: &str) -> Result<CommunityCentre, UpstreamError> {
        self.centres()
            .await?
            .into_iter()
            .find(|centre| centre.id == centre_id)
            .ok_or_else(|| UpstreamError::NotFound(format!("Centre {} not found", centre_id)))
    }

    /// Fetch the activity types offered by one centre
    pub async fn centre_activities(
        &self,
        centre_id: &str,
    ) -> Result<Vec<CentreActivityGroup>, UpstreamError> {
        let path = format!("/centres/{}/normalized-activities", urlencoding::encode(centre_id));
        self.get_list(&path).await
    }

    /// Fetch the sessions of one activity type at one centre
    pub async fn centre_activity_sessions(
        &self,
        centre_id: &str,
        activity_name: &str,
    ) -> Result<Vec<ActivitySession>, UpstreamError> {
        let path = format!(
            "/centres/{}/activities/{}",
            urlencoding::encode(centre_id),
            urlencoding::encode(activity_name)
        );
        self.get_list(&path).await
    }

    /// Fetch the cross-centre activity index
    pub async fn normalized_activities(&self) -> Result<Vec<NormalizedActivityName>, UpstreamError> {
        self.get_list("/normalized-activities").await
    }

    /// Fetch every session of an activity type across all centres
    pub async fn activity_sessions(
        &self,
        activity_name: &str,
    ) -> Result<Vec<ActivitySession>, UpstreamError> {
        let path = format!("/activities/{}", urlencoding::encode(activity_name));
        self.get_list(&path).await
    }

    /// GET a JSON array, validate each element, and cache the result
    async fn get_list<T>(&self, path: &str) -> Result<Vec<T>, UpstreamError>
    where
        T: DeserializeOwned + Serialize + Validate,
    {
        let cache_key = CacheKey::upstream(path);
        if let Ok(cached) = self.cache.get::<Vec<T>>(&cache_key).await {
            return Ok(cached);
        }

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Fetching upstream: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_secs))?;

        let items = parse_list::<T>(&body)?;

        if let Err(e) = self.cache.set(&cache_key, &items).await {
            tracing::warn!("Failed to cache upstream response for {}: {}", path, e);
        }

        Ok(items)
    }
}

/// Strictly deserialize and validate an upstream JSON array
pub fn parse_list<T>(body: &[u8]) -> Result<Vec<T>, UpstreamError>
where
    T: DeserializeOwned + Validate,
{
    let items: Vec<T> = serde_json::from_slice(body)
        .map_err(|e| UpstreamError::Validation(e.to_string()))?;

    for (index, item) in items.iter().enumerate() {
        item.validate()
            .map_err(|e| UpstreamError::Validation(format!("item {}: {}", index, e)))?;
    }

    Ok(items)
}
