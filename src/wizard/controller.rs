use crate::api::ApiError;
use crate::connector::ConnectorKind;
use crate::shared::ids::{BranchName, ConnectorId};
use crate::wizard::draft::{AssembledDraft, WizardDraft, WizardError};
use crate::save::SaveMode;
use crate::wizard::outputs::{OverviewStepOutput, StepOutput, WizardStepId};

/// Ordered step sequence plus the accumulated draft. Navigation is linear:
/// submit merges and advances, back steps without discarding anything already
/// merged. The review step never merges; the caller assembles the draft and
/// hands it to the persistence orchestrator instead.
#[derive(Debug, Clone)]
pub struct WizardController {
    kind: ConnectorKind,
    steps: Vec<WizardStepId>,
    index: usize,
    draft: WizardDraft,
}

impl WizardController {
    pub fn new(kind: ConnectorKind, git_sync_enabled: bool) -> Self {
        let mut steps = vec![WizardStepId::Overview, WizardStepId::Details];
        if kind.supports_delegates() {
            steps.push(WizardStepId::DelegateSetup);
        }
        if kind.supports_git_sync() && git_sync_enabled {
            steps.push(WizardStepId::GitDetails);
        }
        steps.push(WizardStepId::Review);
        Self {
            kind,
            steps,
            index: 0,
            draft: WizardDraft::default(),
        }
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }

    pub fn steps(&self) -> &[WizardStepId] {
        &self.steps
    }

    pub fn current_step(&self) -> WizardStepId {
        self.steps[self.index]
    }

    pub fn on_review(&self) -> bool {
        self.current_step() == WizardStepId::Review
    }

    /// The merged state from all prior steps, as handed to the active step.
    pub fn prev_step_data(&self) -> &WizardDraft {
        &self.draft
    }

    /// First-step submit. The identifier must pass the remote uniqueness
    /// check before its output is merged; a taken identifier blocks the
    /// advance entirely.
    pub fn submit_overview<F>(
        &mut self,
        output: OverviewStepOutput,
        check_identifier: F,
    ) -> Result<(), WizardError>
    where
        F: FnOnce(&ConnectorId) -> Result<bool, ApiError>,
    {
        if self.current_step() != WizardStepId::Overview {
            return Err(WizardError::StepMismatch {
                current: self.current_step(),
                submitted: WizardStepId::Overview,
            });
        }
        let available =
            check_identifier(&output.identifier).map_err(WizardError::IdentifierCheck)?;
        if !available {
            return Err(WizardError::IdentifierTaken {
                identifier: output.identifier.as_str().to_string(),
            });
        }
        self.draft.apply(StepOutput::Overview(output));
        self.advance();
        Ok(())
    }

    pub fn submit(&mut self, output: StepOutput) -> Result<(), WizardError> {
        if matches!(output, StepOutput::Overview(_)) {
            return Err(WizardError::UniquenessCheckRequired);
        }
        let submitted = output.step();
        if submitted != self.current_step() {
            return Err(WizardError::StepMismatch {
                current: self.current_step(),
                submitted,
            });
        }
        self.draft.apply(output);
        self.advance();
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        if self.index == 0 {
            return Err(WizardError::AtFirstStep);
        }
        self.index -= 1;
        Ok(())
    }

    fn advance(&mut self) {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
        }
    }

    pub fn assemble(&self) -> Result<AssembledDraft, WizardError> {
        self.draft.assemble(self.kind, &self.steps)
    }

    /// After-success hook for git-backed saves: the platform may have landed
    /// the commit on a different branch than requested (a silently created
    /// new branch), and later steps must see the actual one.
    pub fn rewrite_branch(&mut self, actual: BranchName) {
        if let Some(git) = self.draft.git_mut() {
            if let SaveMode::CommitToBranch(details) = &mut git.save_mode {
                details.branch = actual;
            }
        }
    }
}
