//! Shared HTTP client for the diagnostic probes

use crate::config::EndpointConfig;
use crate::error::{DoctorError, Result};
use crate::probe::ProbeResult;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Bearer-authenticated client shared by every probe.
///
/// Holds the endpoint table, the project identifier and the access token; the
/// probes in this module are implemented as methods on it.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http_client: reqwest::Client,
    access_token: String,
    /// Project the probes are scoped to
    pub project_id: String,
    /// Endpoint base URLs
    pub endpoints: EndpointConfig,
}

impl ProbeClient {
    /// Create a probe client with a fixed timeout
    pub fn new(
        endpoints: EndpointConfig,
        project_id: String,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| DoctorError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            access_token,
            project_id,
            endpoints,
        })
    }

    /// GET a JSON document, mapping the status code per the probe contract
    pub async fn get_json(&self, url: &str) -> ProbeResult<Value> {
        debug!("probe GET {}", url);
        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json");
        Self::dispatch(request).await
    }

    /// POST a JSON body, mapping the status code per the probe contract
    pub async fn post_json(&self, url: &str, body: &Value) -> ProbeResult<Value> {
        debug!("probe POST {}", url);
        let request = self
            .http_client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body);
        Self::dispatch(request).await
    }

    /// POST returning the raw status and body, for calls with non-standard
    /// success codes (service enablement treats 409 as already-enabled)
    pub async fn post_raw(&self, url: &str, body: &Value) -> ProbeResult<(u16, String)> {
        debug!("probe POST {}", url);
        let response = match self
            .http_client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ProbeResult::warning_from(None, e),
        };
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        ProbeResult::Found((status, truncate(&text, 300)))
    }

    async fn dispatch(request: reqwest::RequestBuilder) -> ProbeResult<Value> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return ProbeResult::warning_from(None, e),
        };

        let status = response.status();
        match status.as_u16() {
            403 => ProbeResult::PermissionDenied,
            404 => ProbeResult::Missing,
            code if status.is_success() => match response.json::<Value>().await {
                Ok(v) => ProbeResult::Found(v),
                Err(e) => ProbeResult::warning_from(Some(code), e),
            },
            code => {
                let body = response.text().await.unwrap_or_default();
                ProbeResult::Warning {
                    status: Some(code),
                    detail: truncate(&body, 300),
                }
            }
        }
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Extract an array field from a JSON payload, tolerating its absence
pub(crate) fn array_field<'a>(value: &'a Value, field: &str) -> Vec<&'a Value> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

/// Extract a string field, empty when absent
pub(crate) fn str_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
