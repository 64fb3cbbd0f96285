use crate::connector::{AuthConfig, ConnectionMode, DelegateSelection};
use crate::save::SaveMode;
use crate::shared::ids::ConnectorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStepId {
    Overview,
    Details,
    DelegateSetup,
    GitDetails,
    Review,
}

impl WizardStepId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Details => "details",
            Self::DelegateSetup => "delegate_setup",
            Self::GitDetails => "git_details",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for WizardStepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewStepOutput {
    pub name: String,
    pub identifier: ConnectorId,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsStepOutput {
    pub url: String,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateStepOutput {
    pub connection_mode: ConnectionMode,
    pub selection: DelegateSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStepOutput {
    pub save_mode: SaveMode,
}

/// One wizard step's validated output; the typed replacement for merging an
/// untyped field bag into accumulated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutput {
    Overview(OverviewStepOutput),
    Details(DetailsStepOutput),
    Delegate(DelegateStepOutput),
    Git(GitStepOutput),
}

impl StepOutput {
    pub fn step(&self) -> WizardStepId {
        match self {
            Self::Overview(_) => WizardStepId::Overview,
            Self::Details(_) => WizardStepId::Details,
            Self::Delegate(_) => WizardStepId::DelegateSetup,
            Self::Git(_) => WizardStepId::GitDetails,
        }
    }
}
