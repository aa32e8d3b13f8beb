//! Enabled-service listing, categorization and enablement

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};
use serde_json::json;

/// Services the summaries single out, by display label and API identifier
pub const KEY_SERVICES: &[(&str, &str)] = &[
    ("Firebase", "firebase.googleapis.com"),
    ("Firestore", "firestore.googleapis.com"),
    ("Cloud Functions", "cloudfunctions.googleapis.com"),
    ("Cloud Storage", "storage-component.googleapis.com"),
    ("IAM", "iam.googleapis.com"),
    ("Service Usage", "serviceusage.googleapis.com"),
];

/// One enabled service: API identifier plus human title
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    /// Internal API name, e.g. `storage.googleapis.com`
    pub name: String,
    /// Human-readable title; falls back to the name
    pub title: String,
}

/// Display bucket a service is sorted into, by substring match on its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceCategory {
    Firebase,
    Storage,
    Compute,
    Functions,
    BigQuery,
    Security,
    Core,
    Other,
}

impl ServiceCategory {
    /// Printable label, matching the original report headings
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Firebase => "🔥 Firebase",
            ServiceCategory::Storage => "📦 Storage",
            ServiceCategory::Compute => "💻 Compute",
            ServiceCategory::Functions => "⚡ Functions",
            ServiceCategory::BigQuery => "📊 BigQuery",
            ServiceCategory::Security => "🔐 Security",
            ServiceCategory::Core => "☁️ Core Services",
            ServiceCategory::Other => "📋 Other",
        }
    }
}

/// Classify a service by substring matching on its API name.
///
/// Order matters: the first matching bucket wins, as in the original listing.
pub fn classify_service(name: &str) -> ServiceCategory {
    let lower = name.to_lowercase();
    if lower.contains("firebase") || lower.contains("firestore") {
        ServiceCategory::Firebase
    } else if lower.contains("storage") {
        ServiceCategory::Storage
    } else if lower.contains("compute") {
        ServiceCategory::Compute
    } else if lower.contains("function") {
        ServiceCategory::Functions
    } else if lower.contains("bigquery") {
        ServiceCategory::BigQuery
    } else if lower.contains("iam") || lower.contains("auth") {
        ServiceCategory::Security
    } else if lower.contains("api") || lower.contains("cloud") {
        ServiceCategory::Core
    } else {
        ServiceCategory::Other
    }
}

impl ProbeClient {
    /// List the enabled services for the project
    pub async fn enabled_services(&self) -> ProbeResult<Vec<ServiceDescriptor>> {
        let url = format!(
            "{}/v1/projects/{}/services?filter=state:ENABLED&pageSize=200",
            self.endpoints.service_usage, self.project_id
        );
        self.get_json(&url).await.map(|v| {
            array_field(&v, "services")
                .into_iter()
                .map(|svc| {
                    let config = svc.get("config").cloned().unwrap_or_default();
                    let name = str_field(&config, "name");
                    let title = {
                        let t = str_field(&config, "title");
                        if t.is_empty() {
                            name.clone()
                        } else {
                            t
                        }
                    };
                    ServiceDescriptor { name, title }
                })
                .collect()
        })
    }

    /// Enable one service. 200/201 mean enabled, 409 already enabled.
    pub async fn enable_service(&self, api_name: &str) -> ProbeResult<()> {
        let url = format!(
            "{}/v1/projects/{}/services/{}:enable",
            self.endpoints.service_usage, self.project_id, api_name
        );
        match self.post_raw(&url, &json!({})).await {
            ProbeResult::Found((status, body)) => match status {
                200 | 201 | 409 => ProbeResult::Found(()),
                403 => ProbeResult::PermissionDenied,
                404 => ProbeResult::Missing,
                other => ProbeResult::Warning {
                    status: Some(other),
                    detail: body,
                },
            },
            other => other.map(|_| ()),
        }
    }
}

/// Whether a given API identifier appears among the enabled services
pub fn service_enabled(services: &[ServiceDescriptor], api_name: &str) -> bool {
    services.iter().any(|s| s.name == api_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_buckets() {
        assert_eq!(
            classify_service("firestore.googleapis.com"),
            ServiceCategory::Firebase
        );
        assert_eq!(
            classify_service("storage-component.googleapis.com"),
            ServiceCategory::Storage
        );
        assert_eq!(
            classify_service("compute.googleapis.com"),
            ServiceCategory::Compute
        );
        assert_eq!(
            classify_service("cloudfunctions.googleapis.com"),
            ServiceCategory::Functions
        );
        assert_eq!(
            classify_service("bigquerystorage.googleapis.com"),
            ServiceCategory::Storage,
            "storage wins before bigquery, matching the original ordering"
        );
        assert_eq!(
            classify_service("iamcredentials.googleapis.com"),
            ServiceCategory::Security
        );
        assert_eq!(
            classify_service("cloudresourcemanager.googleapis.com"),
            ServiceCategory::Core
        );
        assert_eq!(classify_service("vision.googleapis.com"), ServiceCategory::Other);
    }

    #[test]
    fn test_key_service_check() {
        let services = vec![
            ServiceDescriptor {
                name: "iam.googleapis.com".to_string(),
                title: "Identity and Access Management (IAM) API".to_string(),
            },
            ServiceDescriptor {
                name: "firebase.googleapis.com".to_string(),
                title: "Firebase Management API".to_string(),
            },
        ];
        assert!(service_enabled(&services, "iam.googleapis.com"));
        assert!(!service_enabled(&services, "firestore.googleapis.com"));
    }
}
