//! Firebase project probe

use crate::probe::client::str_field;
use crate::probe::{ProbeClient, ProbeResult};

/// Firebase project record, when the project has Firebase enabled
#[derive(Debug, Clone, PartialEq)]
pub struct FirebaseInfo {
    pub project_number: String,
    pub display_name: String,
    pub realtime_database: Option<String>,
    pub storage_bucket: Option<String>,
}

impl ProbeClient {
    /// Fetch the Firebase project record; `Missing` means Firebase is not set up
    pub async fn firebase_info(&self) -> ProbeResult<FirebaseInfo> {
        let url = format!(
            "{}/v1beta1/projects/{}",
            self.endpoints.firebase, self.project_id
        );
        self.get_json(&url).await.map(|v| {
            let resources = v.get("resources").cloned().unwrap_or_default();
            FirebaseInfo {
                project_number: str_field(&v, "projectNumber"),
                display_name: str_field(&v, "displayName"),
                realtime_database: resources
                    .get("realtimeDatabaseInstance")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string),
                storage_bucket: resources
                    .get("storageBucket")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string),
            }
        })
    }
}
