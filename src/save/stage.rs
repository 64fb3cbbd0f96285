use serde::{Deserialize, Serialize};

pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStage {
    BranchSetup,
    CommitPush,
    CreateOrUpdate,
    PrCreate,
}

impl SaveStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BranchSetup => "branch_setup",
            Self::CommitPush => "commit_push",
            Self::CreateOrUpdate => "create_or_update",
            Self::PrCreate => "pr_create",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Self::BranchSetup => "Preparing branch",
            Self::CommitPush => "Committing changes",
            Self::CreateOrUpdate => "Saving connector",
            Self::PrCreate => "Raising pull request",
        }
    }
}

impl std::fmt::Display for SaveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotStarted,
    InProgress,
    Success,
    Error,
    Aborted,
}

impl StageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Success => "success",
            Self::Error => "error",
            Self::Aborted => "aborted",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Aborted)
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StageRecord {
    pub stage: SaveStage,
    pub status: StageStatus,
    pub label: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub finished_at: Option<i64>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StageError {
    #[error("stage {stage} is not part of this save plan")]
    UnknownStage { stage: SaveStage },
    #[error("cannot start {stage}: {blocker} is {blocker_status}")]
    PredecessorIncomplete {
        stage: SaveStage,
        blocker: SaveStage,
        blocker_status: StageStatus,
    },
    #[error("stage {stage} is {status}, expected {expected}")]
    UnexpectedStatus {
        stage: SaveStage,
        status: StageStatus,
        expected: StageStatus,
    },
}

/// Ordered stage sequence for one save attempt. The sequential-only invariant
/// is enforced here rather than by caller convention: a stage may begin only
/// when every earlier stage has succeeded, at most one stage is in progress
/// at a time, and a failure aborts everything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTracker {
    records: Vec<StageRecord>,
}

impl StageTracker {
    pub fn new(stages: &[SaveStage]) -> Self {
        Self {
            records: stages
                .iter()
                .map(|stage| StageRecord {
                    stage: *stage,
                    status: StageStatus::NotStarted,
                    label: stage.default_label().to_string(),
                    detail: None,
                    started_at: None,
                    finished_at: None,
                })
                .collect(),
        }
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub fn record(&self, stage: SaveStage) -> Option<&StageRecord> {
        self.records.iter().find(|record| record.stage == stage)
    }

    fn position(&self, stage: SaveStage) -> Result<usize, StageError> {
        self.records
            .iter()
            .position(|record| record.stage == stage)
            .ok_or(StageError::UnknownStage { stage })
    }

    /// The first stage that has not started yet, if no earlier stage failed.
    pub fn next_pending(&self) -> Option<SaveStage> {
        for record in &self.records {
            match record.status {
                StageStatus::Success => continue,
                StageStatus::NotStarted => return Some(record.stage),
                _ => return None,
            }
        }
        None
    }

    pub fn begin(&mut self, stage: SaveStage, now: i64) -> Result<(), StageError> {
        let index = self.position(stage)?;
        for earlier in &self.records[..index] {
            if earlier.status != StageStatus::Success {
                return Err(StageError::PredecessorIncomplete {
                    stage,
                    blocker: earlier.stage,
                    blocker_status: earlier.status,
                });
            }
        }
        let record = &mut self.records[index];
        if record.status != StageStatus::NotStarted {
            return Err(StageError::UnexpectedStatus {
                stage,
                status: record.status,
                expected: StageStatus::NotStarted,
            });
        }
        record.status = StageStatus::InProgress;
        record.started_at = Some(now);
        Ok(())
    }

    pub fn succeed(&mut self, stage: SaveStage, now: i64) -> Result<(), StageError> {
        self.finish(stage, StageStatus::Success, None, now)
    }

    pub fn fail(
        &mut self,
        stage: SaveStage,
        detail: impl Into<String>,
        now: i64,
    ) -> Result<(), StageError> {
        self.finish(stage, StageStatus::Error, Some(detail.into()), now)?;
        let index = self.position(stage)?;
        for later in &mut self.records[index + 1..] {
            later.status = StageStatus::Aborted;
        }
        Ok(())
    }

    fn finish(
        &mut self,
        stage: SaveStage,
        status: StageStatus,
        detail: Option<String>,
        now: i64,
    ) -> Result<(), StageError> {
        let index = self.position(stage)?;
        let record = &mut self.records[index];
        if record.status != StageStatus::InProgress {
            return Err(StageError::UnexpectedStatus {
                stage,
                status: record.status,
                expected: StageStatus::InProgress,
            });
        }
        record.status = status;
        record.detail = detail;
        record.finished_at = Some(now);
        Ok(())
    }

    pub fn has_error(&self) -> bool {
        self.records
            .iter()
            .any(|record| record.status == StageStatus::Error)
    }

    pub fn all_succeeded(&self) -> bool {
        self.records
            .iter()
            .all(|record| record.status == StageStatus::Success)
    }

    /// True once the attempt can no longer make progress: either everything
    /// succeeded or a stage failed and the tail was aborted.
    pub fn is_settled(&self) -> bool {
        self.has_error() || self.all_succeeded()
    }
}
