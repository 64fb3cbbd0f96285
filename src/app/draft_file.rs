use crate::connector::{AuthConfig, ConnectionMode, ConnectorKind, DelegateSelection};
use crate::save::{GitSaveDetails, SaveMode};
use crate::shared::ids::{BranchName, ConnectorId, SecretRef};
use crate::wizard::{
    DelegateStepOutput, DetailsStepOutput, GitStepOutput, OverviewStepOutput,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Non-interactive wizard answers, one YAML file per connector draft. Each
/// section maps to one wizard step's output.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftFile {
    pub kind: String,
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub auth: DraftAuth,
    #[serde(default)]
    pub connection: Option<DraftConnection>,
    #[serde(default)]
    pub git: Option<DraftGit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum DraftAuth {
    UsernamePassword {
        username: String,
        password: String,
    },
    ServiceToken {
        client_id: String,
        client_secret_ref: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftConnection {
    pub mode: String,
    #[serde(default)]
    pub delegate_selectors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftGit {
    pub branch: String,
    #[serde(default)]
    pub new_branch: bool,
    #[serde(default)]
    pub base_branch: Option<String>,
    pub commit_message: String,
    #[serde(default)]
    pub raise_pr: bool,
    #[serde(default)]
    pub target_branch: Option<String>,
}

/// The draft file's sections converted into typed step outputs.
#[derive(Debug, Clone)]
pub struct DraftSteps {
    pub kind: ConnectorKind,
    pub overview: OverviewStepOutput,
    pub details: DetailsStepOutput,
    pub delegate: Option<DelegateStepOutput>,
    pub git: Option<GitStepOutput>,
}

impl DraftFile {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("failed to read draft file {}: {e}", path.display()))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| format!("invalid yaml in draft file {}: {e}", path.display()))
    }

    pub fn into_steps(self) -> Result<DraftSteps, String> {
        let kind = ConnectorKind::parse(&self.kind)?;
        let identifier = ConnectorId::parse(&self.identifier)?;
        let overview = OverviewStepOutput {
            name: self.name,
            identifier,
            description: self.description,
        };
        let auth = match self.auth {
            DraftAuth::UsernamePassword { username, password } => {
                AuthConfig::UsernamePassword { username, password }
            }
            DraftAuth::ServiceToken {
                client_id,
                client_secret_ref,
            } => AuthConfig::ServiceToken {
                client_id,
                client_secret_ref: SecretRef::parse(&client_secret_ref)?,
            },
        };
        let details = DetailsStepOutput {
            url: self.url,
            auth,
        };
        let delegate = match self.connection {
            Some(connection) => {
                let mode = ConnectionMode::parse(&connection.mode)?;
                let selection = if connection.delegate_selectors.is_empty() {
                    DelegateSelection::AnyAvailable
                } else {
                    DelegateSelection::tagged(connection.delegate_selectors)?
                };
                Some(DelegateStepOutput {
                    connection_mode: mode,
                    selection,
                })
            }
            None => None,
        };
        let git = match self.git {
            Some(git) => {
                let base_branch = git
                    .base_branch
                    .as_deref()
                    .map(BranchName::parse)
                    .transpose()?;
                let target_branch = git
                    .target_branch
                    .as_deref()
                    .map(BranchName::parse)
                    .transpose()?;
                Some(GitStepOutput {
                    save_mode: SaveMode::CommitToBranch(GitSaveDetails {
                        branch: BranchName::parse(&git.branch)?,
                        new_branch: git.new_branch,
                        base_branch,
                        commit_message: git.commit_message,
                        raise_pr: git.raise_pr,
                        target_branch,
                    }),
                })
            }
            None => None,
        };
        Ok(DraftSteps {
            kind,
            overview,
            details,
            delegate,
            git,
        })
    }
}
