//! Unauthenticated API key tester

use crate::config::EndpointConfig;
use crate::error::{DoctorError, Result};
use crate::probe::client::truncate;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Outcome of testing the key against one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKeyTestResult {
    /// Display label for the endpoint
    pub endpoint: String,
    /// HTTP status, when a response arrived
    pub status: Option<u16>,
    /// Whether the endpoint accepted the key
    pub ok: bool,
    /// Success summary or truncated error body
    pub detail: String,
}

/// Tests an API key against a few cloud endpoints with a short timeout.
///
/// The key travels as a query parameter; no bearer token is involved.
#[derive(Debug, Clone)]
pub struct ApiKeyTester {
    http_client: reqwest::Client,
    endpoints: EndpointConfig,
    project_id: String,
    api_key: String,
}

impl ApiKeyTester {
    /// Create a tester with the configured short timeout
    pub fn new(
        endpoints: EndpointConfig,
        project_id: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DoctorError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoints,
            project_id,
            api_key,
        })
    }

    /// Key rendered for display: first and last 10 characters only
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() > 20 {
            format!(
                "{}...{}",
                chars[..10].iter().collect::<String>(),
                chars[chars.len() - 10..].iter().collect::<String>()
            )
        } else {
            format!("{}...", chars.iter().take(10).collect::<String>())
        }
    }

    /// Run all three tests in order
    pub async fn run_all(&self) -> Vec<ApiKeyTestResult> {
        vec![
            self.test_storage().await,
            self.test_resource_manager().await,
            self.test_firebase_database().await,
        ]
    }

    /// Bucket listing with the key as the only credential
    pub async fn test_storage(&self) -> ApiKeyTestResult {
        let url = format!(
            "{}/storage/v1/b?project={}&key={}",
            self.endpoints.storage, self.project_id, self.api_key
        );
        self.probe("Cloud Storage API", &url, |body| {
            let count = body
                .get("items")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            format!("{} bucket(s)", count)
        })
        .await
    }

    /// Project metadata with the key as the only credential
    pub async fn test_resource_manager(&self) -> ApiKeyTestResult {
        let url = format!(
            "{}/v1/projects/{}?key={}",
            self.endpoints.resource_manager, self.project_id, self.api_key
        );
        self.probe("Cloud Resource Manager API", &url, |body| {
            format!(
                "project {} ({})",
                body.get("name").and_then(Value::as_str).unwrap_or("?"),
                body.get("lifecycleState")
                    .and_then(Value::as_str)
                    .unwrap_or("?")
            )
        })
        .await
    }

    /// Realtime database root, in case the key is a Firebase key
    pub async fn test_firebase_database(&self) -> ApiKeyTestResult {
        let host = self
            .endpoints
            .firebase_db_template
            .replace("{project}", &self.project_id);
        let url = format!("{}/.json?auth={}", host, self.api_key);
        self.probe("Firebase Database", &url, |_| {
            "database root readable".to_string()
        })
        .await
    }

    async fn probe<F>(&self, label: &str, url: &str, describe: F) -> ApiKeyTestResult
    where
        F: FnOnce(&Value) -> String,
    {
        debug!("api key test GET {}", label);
        let response = match self.http_client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                return ApiKeyTestResult {
                    endpoint: label.to_string(),
                    status: None,
                    ok: false,
                    detail: e.to_string(),
                }
            }
        };

        let status = response.status();
        if status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            ApiKeyTestResult {
                endpoint: label.to_string(),
                status: Some(status.as_u16()),
                ok: true,
                detail: describe(&body),
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            ApiKeyTestResult {
                endpoint: label.to_string(),
                status: Some(status.as_u16()),
                ok: false,
                detail: truncate(&body, 200),
            }
        }
    }
}
