use crate::connector::AuthConfig;
use crate::shared::ids::{AccountId, ConnectorId, OrgId, ProjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ConnectorKind {
    DockerRegistry,
    KubernetesCluster,
    GitRepo,
    Jira,
}

impl ConnectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DockerRegistry => "DockerRegistry",
            Self::KubernetesCluster => "KubernetesCluster",
            Self::GitRepo => "GitRepo",
            Self::Jira => "Jira",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "DockerRegistry" => Ok(Self::DockerRegistry),
            "KubernetesCluster" => Ok(Self::KubernetesCluster),
            "GitRepo" => Ok(Self::GitRepo),
            "Jira" => Ok(Self::Jira),
            _ => Err(
                "connector kind must be one of: DockerRegistry, KubernetesCluster, GitRepo, Jira"
                    .to_string(),
            ),
        }
    }

    /// Whether this kind may route its traffic through an in-cluster delegate.
    pub fn supports_delegates(self) -> bool {
        !matches!(self, Self::Jira)
    }

    pub fn supports_git_sync(self) -> bool {
        !matches!(self, Self::Jira)
    }

    pub fn needs_delegate_selection(self, mode: ConnectionMode) -> bool {
        self.supports_delegates() && mode == ConnectionMode::ThroughDelegate
    }
}

impl std::fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionMode {
    Direct,
    ThroughDelegate,
}

impl ConnectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::ThroughDelegate => "through_delegate",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "through_delegate" | "delegate" => Ok(Self::ThroughDelegate),
            _ => Err("connection mode must be one of: direct, through_delegate".to_string()),
        }
    }
}

impl std::fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Either "any available delegate" or a non-empty tag constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateSelection {
    AnyAvailable,
    Tagged(Vec<String>),
}

impl DelegateSelection {
    pub fn tagged<I, S>(tags: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = Vec::new();
        for raw in tags {
            let tag = raw.as_ref().trim();
            if tag.is_empty() {
                return Err("delegate selector tags must be non-empty".to_string());
            }
            if !values.iter().any(|existing: &String| existing == tag) {
                values.push(tag.to_string());
            }
        }
        if values.is_empty() {
            return Err("tagged delegate selection requires at least one tag".to_string());
        }
        Ok(Self::Tagged(values))
    }

    pub fn selectors(&self) -> &[String] {
        match self {
            Self::AnyAvailable => &[],
            Self::Tagged(tags) => tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selectors().is_empty()
    }
}

impl Default for DelegateSelection {
    fn default() -> Self {
        Self::AnyAvailable
    }
}

/// Account/org/project scoping threaded explicitly through the payload
/// builder; org and project are absent for account-level connectors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scope {
    pub account_id: AccountId,
    #[serde(default)]
    pub org_id: Option<OrgId>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// Fully assembled wizard output for one connector, validated before any
/// payload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorDraft {
    pub kind: ConnectorKind,
    pub name: String,
    pub identifier: ConnectorId,
    pub description: Option<String>,
    pub url: String,
    pub auth: AuthConfig,
    pub connection_mode: ConnectionMode,
    pub delegate_selection: DelegateSelection,
}
