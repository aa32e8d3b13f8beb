//! OAuth consent screen (brand) and IAP client probes

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};

/// An OAuth consent screen record
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    /// Full resource name, `projects/<number>/brands/<id>`
    pub name: String,
    pub application_title: String,
    pub support_email: String,
    pub org_internal_only: bool,
}

/// An Identity-Aware Proxy OAuth client under a brand
#[derive(Debug, Clone, PartialEq)]
pub struct IapClient {
    /// Full resource name; the client id is the last path segment
    pub name: String,
    pub display_name: String,
}

impl IapClient {
    /// Client identifier portion of the resource name
    pub fn client_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

impl ProbeClient {
    /// List the project's OAuth consent screens.
    ///
    /// 403 usually means the IAP API is not enabled for the project.
    pub async fn brands(&self) -> ProbeResult<Vec<Brand>> {
        let url = format!("{}/v1/projects/{}/brands", self.endpoints.iap, self.project_id);
        self.get_json(&url).await.map(|v| {
            array_field(&v, "brands")
                .into_iter()
                .map(|b| Brand {
                    name: str_field(b, "name"),
                    application_title: str_field(b, "applicationTitle"),
                    support_email: str_field(b, "supportEmail"),
                    org_internal_only: b
                        .get("orgInternalOnly")
                        .and_then(serde_json::Value::as_bool)
                        .unwrap_or(false),
                })
                .collect()
        })
    }

    /// List the IAP clients registered under one brand
    pub async fn iap_clients(&self, brand_name: &str) -> ProbeResult<Vec<IapClient>> {
        let url = format!(
            "{}/v1/{}/identityAwareProxyClients",
            self.endpoints.iap, brand_name
        );
        self.get_json(&url).await.map(|v| {
            array_field(&v, "identityAwareProxyClients")
                .into_iter()
                .map(|c| IapClient {
                    name: str_field(c, "name"),
                    display_name: str_field(c, "displayName"),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iap_client_id_extraction() {
        let client = IapClient {
            name: "projects/123/brands/456/identityAwareProxyClients/789.apps.example".to_string(),
            display_name: "web".to_string(),
        };
        assert_eq!(client.client_id(), "789.apps.example");
    }
}
