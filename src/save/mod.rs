pub mod gating;
pub mod orchestrator;
pub mod stage;

pub use gating::save_enabled;
pub use orchestrator::{
    select_save_path, GitSaveDetails, PersistenceOrchestrator, PrOutcome, SaveIntent, SaveMode,
    SaveOutcome, SavePath,
};
pub use stage::{unix_now, SaveStage, StageError, StageRecord, StageStatus, StageTracker};
