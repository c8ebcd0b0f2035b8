use super::{decode_response, DispatchError, FeatureBackend, FeatureRequest, FeatureResult};
use crate::config::{BackendConfig, ConfigError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for the insights backend
///
/// Sends exactly one POST per dispatch. Failures are returned to the caller
/// as they happened: no retries, no fallback to earlier results.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
    connect_timeout: Duration,
}

impl BackendClient {
    /// Create a client from backend configuration
    pub fn new(config: &BackendConfig) -> Result<Self, ConfigError> {
        let base_url = config.parsed_base_url()?;
        let timeout = config.request_timeout();
        let connect_timeout = Duration::from_secs(config.connect_timeout_seconds);

        let mut builder = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout,
            connect_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an `/api/...` path, keeping any path prefix of the base
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Seconds of the limit that expired; connect timeouts also report `is_connect`
    fn fired_timeout(&self, during_connect: bool) -> u64 {
        match self.timeout {
            Some(timeout) if !during_connect => timeout.as_secs(),
            _ => self.connect_timeout.as_secs(),
        }
    }

    fn classify(&self, err: reqwest::Error) -> DispatchError {
        if err.is_timeout() {
            DispatchError::Timeout {
                seconds: self.fired_timeout(err.is_connect()),
            }
        } else if err.is_decode() || err.is_body() {
            DispatchError::InvalidResponse(err.to_string())
        } else {
            debug!("Request error: {}", err);
            DispatchError::Connection {
                base_url: self.base_url.as_str().trim_end_matches('/').to_string(),
            }
        }
    }
}

/// Pull the `error` field out of an error body, if it has one
fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl FeatureBackend for BackendClient {
    async fn dispatch(&self, request: &FeatureRequest) -> FeatureResult {
        let feature = request.feature();
        let url = self.endpoint(&feature.path());

        debug!("Sending {} request for {} to {}", feature, request.video().id(), url);

        let response = self
            .client
            .post(&url)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let err = DispatchError::Http {
                status: status.as_u16(),
                detail: error_detail(&body),
            };
            warn!("❌ {} failed for {}: {}", feature, request.video().id(), err);
            return Err(err);
        }

        match decode_response(feature, &body) {
            Ok(payload) => {
                info!("✅ {} completed for {}", feature, request.video().id());
                Ok(payload)
            }
            Err(err) => {
                warn!("❌ {} failed for {}: {}", feature, request.video().id(), err);
                Err(err)
            }
        }
    }

    async fn verify_connection(&self) -> bool {
        let url = self.endpoint("/api/health");

        match self.client.get(&url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!("Health check {} -> {}", url, response.status());
                ok
            }
            Err(e) => {
                warn!("Backend not reachable at {}: {}", url, e);
                false
            }
        }
    }
}
