use crate::api::ApiError;
use crate::connector::{ConnectionMode, ConnectorDraft, ConnectorKind, DelegateSelection};
use crate::save::SaveMode;
use crate::wizard::outputs::{
    DelegateStepOutput, DetailsStepOutput, GitStepOutput, OverviewStepOutput, StepOutput,
    WizardStepId,
};

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("step {step} has no submitted data yet")]
    IncompleteDraft { step: WizardStepId },
    #[error("identifier `{identifier}` is already taken")]
    IdentifierTaken { identifier: String },
    #[error("identifier check failed")]
    IdentifierCheck(#[source] ApiError),
    #[error("submitted {submitted} output while on step {current}")]
    StepMismatch {
        current: WizardStepId,
        submitted: WizardStepId,
    },
    #[error("the overview step must be submitted through submit_overview")]
    UniquenessCheckRequired,
    #[error("cannot go back from the first step")]
    AtFirstStep,
    #[error("in-cluster connection requires at least one delegate selector")]
    DelegateSelectionRequired,
}

/// Accumulated wizard state: one typed slot per step. A later submission of
/// the same step replaces its slot wholesale, which is the typed equivalent
/// of later-keys-win in a shallow merge; slots for other steps are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardDraft {
    overview: Option<OverviewStepOutput>,
    details: Option<DetailsStepOutput>,
    delegate: Option<DelegateStepOutput>,
    git: Option<GitStepOutput>,
}

/// Validated union of every step's output, ready for the payload builder and
/// the persistence orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDraft {
    pub connector: ConnectorDraft,
    pub save_mode: SaveMode,
}

impl WizardDraft {
    pub fn apply(&mut self, output: StepOutput) {
        match output {
            StepOutput::Overview(overview) => self.overview = Some(overview),
            StepOutput::Details(details) => self.details = Some(details),
            StepOutput::Delegate(delegate) => self.delegate = Some(delegate),
            StepOutput::Git(git) => self.git = Some(git),
        }
    }

    pub fn overview(&self) -> Option<&OverviewStepOutput> {
        self.overview.as_ref()
    }

    pub fn details(&self) -> Option<&DetailsStepOutput> {
        self.details.as_ref()
    }

    pub fn delegate(&self) -> Option<&DelegateStepOutput> {
        self.delegate.as_ref()
    }

    pub fn git(&self) -> Option<&GitStepOutput> {
        self.git.as_ref()
    }

    pub fn git_mut(&mut self) -> Option<&mut GitStepOutput> {
        self.git.as_mut()
    }

    /// Validates completeness against the step plan and enforces the
    /// delegate-selection invariant before anything touches the network.
    pub fn assemble(
        &self,
        kind: ConnectorKind,
        plan: &[WizardStepId],
    ) -> Result<AssembledDraft, WizardError> {
        let overview = self.overview.as_ref().ok_or(WizardError::IncompleteDraft {
            step: WizardStepId::Overview,
        })?;
        let details = self.details.as_ref().ok_or(WizardError::IncompleteDraft {
            step: WizardStepId::Details,
        })?;
        let (connection_mode, delegate_selection) = match &self.delegate {
            Some(delegate) => (delegate.connection_mode, delegate.selection.clone()),
            None if plan.contains(&WizardStepId::DelegateSetup) => {
                return Err(WizardError::IncompleteDraft {
                    step: WizardStepId::DelegateSetup,
                });
            }
            None => (ConnectionMode::Direct, DelegateSelection::AnyAvailable),
        };
        if kind.needs_delegate_selection(connection_mode) && delegate_selection.is_empty() {
            return Err(WizardError::DelegateSelectionRequired);
        }
        let save_mode = match &self.git {
            Some(git) => git.save_mode.clone(),
            None if plan.contains(&WizardStepId::GitDetails) => {
                return Err(WizardError::IncompleteDraft {
                    step: WizardStepId::GitDetails,
                });
            }
            None => SaveMode::Direct,
        };
        Ok(AssembledDraft {
            connector: ConnectorDraft {
                kind,
                name: overview.name.clone(),
                identifier: overview.identifier.clone(),
                description: overview.description.clone(),
                url: details.url.clone(),
                auth: details.auth.clone(),
                connection_mode,
                delegate_selection,
            },
            save_mode,
        })
    }
}
