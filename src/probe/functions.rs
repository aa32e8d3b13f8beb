//! Cloud Functions probe

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};

/// Summary of one deployed function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSummary {
    pub name: String,
    pub runtime: String,
    pub status: String,
    /// HTTPS trigger URL, when the function has one
    pub trigger_url: Option<String>,
}

impl ProbeClient {
    /// List functions across all locations
    pub async fn functions(&self) -> ProbeResult<Vec<FunctionSummary>> {
        let url = format!(
            "{}/v1/projects/{}/locations/-/functions",
            self.endpoints.functions, self.project_id
        );
        self.get_json(&url).await.map(|v| {
            array_field(&v, "functions")
                .into_iter()
                .map(|f| FunctionSummary {
                    name: str_field(f, "name"),
                    runtime: str_field(f, "runtime"),
                    status: str_field(f, "status"),
                    trigger_url: f
                        .get("httpsTrigger")
                        .and_then(|t| t.get("url"))
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string),
                })
                .collect()
        })
    }
}
