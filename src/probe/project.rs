//! Project metadata probes

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};

/// Project metadata as the resource manager reports it
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub name: String,
    pub project_id: String,
    pub project_number: String,
    pub lifecycle_state: String,
}

/// One entry from the visible-projects listing
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub name: String,
    pub project_id: String,
}

impl ProbeClient {
    /// Fetch the project's metadata (name, number, lifecycle state)
    pub async fn project_info(&self) -> ProbeResult<ProjectInfo> {
        let url = format!(
            "{}/v1/projects/{}",
            self.endpoints.resource_manager, self.project_id
        );
        self.get_json(&url).await.map(|v| ProjectInfo {
            name: str_field(&v, "name"),
            project_id: str_field(&v, "projectId"),
            project_number: str_field(&v, "projectNumber"),
            lifecycle_state: str_field(&v, "lifecycleState"),
        })
    }

    /// List every project the caller can see.
    ///
    /// 403 is the normal outcome for a single-project service account.
    pub async fn list_projects(&self) -> ProbeResult<Vec<ProjectSummary>> {
        let url = format!("{}/v1/projects", self.endpoints.resource_manager);
        self.get_json(&url).await.map(|v| {
            array_field(&v, "projects")
                .into_iter()
                .map(|p| ProjectSummary {
                    name: str_field(p, "name"),
                    project_id: str_field(p, "projectId"),
                })
                .collect()
        })
    }
}
