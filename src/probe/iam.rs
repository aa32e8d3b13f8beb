//! IAM policy probe and role membership checks

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};
use serde_json::json;

/// Roles the project's IAM policy grants to one principal
#[derive(Debug, Clone, PartialEq)]
pub struct RoleAssignments {
    /// The principal the roles were matched against
    pub member: String,
    /// Sorted role names, possibly empty
    pub roles: Vec<String>,
}

/// Whether any of the roles is owner or editor
pub fn has_owner_or_editor(roles: &[String]) -> bool {
    roles
        .iter()
        .any(|r| r.contains("roles/owner") || r.contains("roles/editor"))
}

/// One service account in the project
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAccountInfo {
    pub email: String,
    pub display_name: String,
}

impl ProbeClient {
    /// List the project's service accounts
    pub async fn service_accounts(&self) -> ProbeResult<Vec<ServiceAccountInfo>> {
        let url = format!(
            "{}/v1/projects/{}/serviceAccounts",
            self.endpoints.iam, self.project_id
        );
        self.get_json(&url).await.map(|v| {
            array_field(&v, "accounts")
                .into_iter()
                .map(|acc| ServiceAccountInfo {
                    email: str_field(acc, "email"),
                    display_name: str_field(acc, "displayName"),
                })
                .collect()
        })
    }

    /// Fetch the project IAM policy and keep the roles bound to `member`.
    ///
    /// Membership is a plain string test against each binding's members set.
    pub async fn iam_roles(&self, member: &str) -> ProbeResult<RoleAssignments> {
        let url = format!(
            "{}/v1/projects/{}:getIamPolicy",
            self.endpoints.resource_manager, self.project_id
        );
        self.post_json(&url, &json!({})).await.map(|policy| {
            let mut roles: Vec<String> = array_field(&policy, "bindings")
                .into_iter()
                .filter(|binding| {
                    array_field(binding, "members")
                        .iter()
                        .any(|m| m.as_str() == Some(member))
                })
                .map(|binding| str_field(binding, "role"))
                .filter(|role| !role.is_empty())
                .collect();
            roles.sort();
            RoleAssignments {
                member: member.to_string(),
                roles,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_editor_detection() {
        assert!(has_owner_or_editor(&["roles/owner".to_string()]));
        assert!(has_owner_or_editor(&[
            "roles/viewer".to_string(),
            "roles/editor".to_string()
        ]));
        assert!(!has_owner_or_editor(&["roles/storage.admin".to_string()]));
        assert!(!has_owner_or_editor(&[]));
    }
}
