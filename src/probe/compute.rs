//! Compute Engine instance probe

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};
use serde_json::Value;

/// Summary of one VM instance, flattened from the per-zone aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSummary {
    pub name: String,
    /// Aggregation key, e.g. `zones/europe-west1-b`
    pub zone: String,
    pub status: String,
    /// Machine type short name (last URL path segment)
    pub machine_type: String,
}

impl ProbeClient {
    /// List VM instances across all zones
    pub async fn compute_instances(&self) -> ProbeResult<Vec<InstanceSummary>> {
        let url = format!(
            "{}/compute/v1/projects/{}/aggregated/instances",
            self.endpoints.compute, self.project_id
        );
        self.get_json(&url).await.map(|v| {
            let mut instances = Vec::new();
            if let Some(items) = v.get("items").and_then(Value::as_object) {
                for (zone, zone_data) in items {
                    for instance in array_field(zone_data, "instances") {
                        let machine_type = str_field(instance, "machineType");
                        instances.push(InstanceSummary {
                            name: str_field(instance, "name"),
                            zone: zone.clone(),
                            status: str_field(instance, "status"),
                            machine_type: machine_type
                                .rsplit('/')
                                .next()
                                .unwrap_or_default()
                                .to_string(),
                        });
                    }
                }
            }
            instances
        })
    }
}
