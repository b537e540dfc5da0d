//! Purpose: Token inspection and legacy login-status DTOs.
//! Exports: `TokenInspection`, `ProjectScope`, `LoginStatus`, `LoginStatusEnvelope`.
//! Invariants: Capabilities are kept as raw JSON; ACL names are derived, never rewritten.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInspection {
    pub subject: String,
    #[serde(default)]
    pub projects: Vec<ProjectScope>,
    #[serde(default)]
    pub capabilities: Vec<Value>,
}

impl TokenInspection {
    /// ACL names granted by the token (`eventsAcl`, `rawAcl`, ...), deduplicated and sorted.
    pub fn acl_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .capabilities
            .iter()
            .filter_map(Value::as_object)
            .flat_map(|capability| capability.keys())
            .map(String::as_str)
            .filter(|key| key.ends_with("Acl"))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn has_project(&self, project: &str) -> bool {
        self.projects
            .iter()
            .any(|scope| scope.project_url_name == project)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScope {
    pub project_url_name: String,
    #[serde(default)]
    pub groups: Vec<i64>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LoginStatusEnvelope {
    pub data: LoginStatus,
}
