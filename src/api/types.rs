use crate::connector::ConnectorPayload;
use crate::shared::ids::{AccountId, BranchName, OrgId, ProjectId, SecretRef};
use serde::{Deserialize, Serialize};

/// Response body shared by create and update. `branch` is the branch the
/// platform actually committed to, which may differ from the requested one
/// when a new branch was created on the fly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConnector {
    pub connector: ConnectorPayload,
    pub object_id: String,
    #[serde(default)]
    pub branch: Option<BranchName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestInfo {
    pub number: u64,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretInfo {
    pub identifier: SecretRef,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Git metadata carried on create/update calls when the save targets a
/// version-controlled branch instead of the inline store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommitDetails {
    pub branch: BranchName,
    pub is_new_branch: bool,
    pub base_branch: Option<BranchName>,
    pub commit_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRequest {
    pub source_branch: BranchName,
    pub target_branch: BranchName,
    pub title: String,
    pub account_identifier: AccountId,
    pub org_identifier: Option<OrgId>,
    pub project_identifier: Option<ProjectId>,
}
