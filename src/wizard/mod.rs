mod controller;
mod draft;
mod outputs;

pub use controller::WizardController;
pub use draft::{AssembledDraft, WizardDraft, WizardError};
pub use outputs::{
    DelegateStepOutput, DetailsStepOutput, GitStepOutput, OverviewStepOutput, StepOutput,
    WizardStepId,
};
