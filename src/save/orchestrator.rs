use crate::api::{
    ApiError, ConnectorApiClient, FieldError, GitCommitDetails, PullRequestInfo,
    PullRequestRequest, SavedConnector,
};
use crate::connector::{ConnectorPayload, Scope};
use crate::save::stage::{unix_now, SaveStage, StageError, StageTracker};
use crate::shared::ids::BranchName;
use crate::shared::logging::append_save_attempt_log_line;
use std::path::PathBuf;

/// How the final wizard step asked for the connector to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    Direct,
    CommitToBranch(GitSaveDetails),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSaveDetails {
    pub branch: BranchName,
    pub new_branch: bool,
    pub base_branch: Option<BranchName>,
    pub commit_message: String,
    pub raise_pr: bool,
    pub target_branch: Option<BranchName>,
}

impl GitSaveDetails {
    fn commit_details(&self, resumed: bool) -> GitCommitDetails {
        GitCommitDetails {
            branch: self.branch.clone(),
            // A conflict retry always lands on the branch created or found by
            // the first attempt.
            is_new_branch: self.new_branch && !resumed,
            base_branch: self.base_branch.clone(),
            commit_message: self.commit_message.clone(),
        }
    }

    fn pr_target(&self) -> Option<&BranchName> {
        self.target_branch.as_ref().or(self.base_branch.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePath {
    Direct,
    GitPr,
}

/// The git-PR path is taken only when the account has version-controlled
/// sync enabled AND the user chose to raise a change request; a plain commit
/// to a branch still goes through the direct single-stage path.
pub fn select_save_path(git_sync_enabled: bool, mode: &SaveMode) -> SavePath {
    match mode {
        SaveMode::CommitToBranch(details) if git_sync_enabled && details.raise_pr => {
            SavePath::GitPr
        }
        _ => SavePath::Direct,
    }
}

pub fn plan_stages(path: SavePath, mode: &SaveMode) -> Vec<SaveStage> {
    match path {
        SavePath::Direct => vec![SaveStage::CreateOrUpdate],
        SavePath::GitPr => {
            let mut stages = Vec::new();
            if let SaveMode::CommitToBranch(details) = mode {
                if details.new_branch {
                    stages.push(SaveStage::BranchSetup);
                }
            }
            stages.push(SaveStage::CommitPush);
            stages.push(SaveStage::PrCreate);
            stages
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveIntent {
    CreateNew,
    UpdateExisting { last_object_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrOutcome {
    NotRequested,
    Raised(PullRequestInfo),
    /// The connector itself was persisted; only the PR raise failed.
    Failed(String),
}

#[derive(Debug)]
pub enum SaveOutcome {
    Saved {
        resource: SavedConnector,
        pr: PrOutcome,
    },
    /// The remote branch changed underneath the commit; the caller should
    /// open a diff view and call `resume_after_conflict` with the resolved
    /// payload and this object id.
    Conflict {
        object_id: String,
        remote: Box<ConnectorPayload>,
    },
    Failed {
        stage: SaveStage,
        message: String,
        field_errors: Vec<FieldError>,
    },
}

/// Executes exactly one save path for one built payload, driving the stage
/// tracker strictly sequentially: at most one platform call is in flight at
/// any point, and stage N+1 starts only from stage N's completion.
pub struct PersistenceOrchestrator<'a> {
    api: &'a ConnectorApiClient,
    scope: Scope,
    path: SavePath,
    tracker: StageTracker,
    state_root: Option<PathBuf>,
    in_flight: bool,
}

impl<'a> PersistenceOrchestrator<'a> {
    pub fn new(
        api: &'a ConnectorApiClient,
        scope: Scope,
        git_sync_enabled: bool,
        mode: &SaveMode,
        state_root: Option<PathBuf>,
    ) -> Self {
        let path = select_save_path(git_sync_enabled, mode);
        let tracker = StageTracker::new(&plan_stages(path, mode));
        Self {
            api,
            scope,
            path,
            tracker,
            state_root,
            in_flight: false,
        }
    }

    pub fn tracker(&self) -> &StageTracker {
        &self.tracker
    }

    pub fn path(&self) -> SavePath {
        self.path
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn run(
        &mut self,
        payload: &ConnectorPayload,
        intent: &SaveIntent,
        mode: &SaveMode,
    ) -> SaveOutcome {
        self.in_flight = true;
        let outcome = self.drive(payload, intent, mode, false);
        self.in_flight = false;
        outcome
    }

    /// Retry after a git conflict. The payload is supplied here, at resume
    /// time, so the retried commit reflects any edits made while the diff
    /// view was open; `resolved_object_id` is the conflicting revision
    /// reported by the failed commit.
    pub fn resume_after_conflict(
        &mut self,
        payload: &ConnectorPayload,
        resolved_object_id: &str,
        mode: &SaveMode,
    ) -> SaveOutcome {
        // The retry re-runs the original path's commit stage, so a conflict
        // hit on the direct path keeps its create-or-update label.
        let stages = match self.path {
            SavePath::Direct => vec![SaveStage::CreateOrUpdate],
            SavePath::GitPr => vec![SaveStage::CommitPush, SaveStage::PrCreate],
        };
        self.tracker = StageTracker::new(&stages);
        let intent = SaveIntent::UpdateExisting {
            last_object_id: resolved_object_id.to_string(),
        };
        self.in_flight = true;
        let outcome = self.drive(payload, &intent, mode, true);
        self.in_flight = false;
        outcome
    }

    fn drive(
        &mut self,
        payload: &ConnectorPayload,
        intent: &SaveIntent,
        mode: &SaveMode,
        resumed: bool,
    ) -> SaveOutcome {
        let mut saved: Option<SavedConnector> = None;
        let mut pr = PrOutcome::NotRequested;
        while let Some(stage) = self.tracker.next_pending() {
            if let Err(err) = self.begin_stage(stage) {
                return Self::invariant_failure(stage, err);
            }
            match stage {
                SaveStage::BranchSetup => {
                    if let Some(message) = branch_plan_error(mode) {
                        self.end_error(stage, &message);
                        return SaveOutcome::Failed {
                            stage,
                            message,
                            field_errors: Vec::new(),
                        };
                    }
                    self.end_success(stage);
                }
                SaveStage::CommitPush | SaveStage::CreateOrUpdate => {
                    let git = match mode {
                        SaveMode::CommitToBranch(details) => {
                            Some(details.commit_details(resumed))
                        }
                        SaveMode::Direct => None,
                    };
                    let result = match intent {
                        SaveIntent::CreateNew => {
                            self.api.create_connector(payload, git.as_ref())
                        }
                        SaveIntent::UpdateExisting { last_object_id } => {
                            self.api
                                .update_connector(payload, last_object_id, git.as_ref())
                        }
                    };
                    match result {
                        Ok(resource) => {
                            self.end_success(stage);
                            saved = Some(resource);
                        }
                        Err(ApiError::GitConflict { object_id, remote }) => {
                            self.end_error(stage, "remote branch holds conflicting changes");
                            return SaveOutcome::Conflict { object_id, remote };
                        }
                        Err(err) => {
                            let field_errors = err.field_errors().to_vec();
                            let message = err.to_string();
                            self.end_error(stage, &message);
                            return SaveOutcome::Failed {
                                stage,
                                message,
                                field_errors,
                            };
                        }
                    }
                }
                SaveStage::PrCreate => {
                    let Some(resource) = saved.as_ref() else {
                        return Self::invariant_failure(
                            stage,
                            StageError::PredecessorIncomplete {
                                stage,
                                blocker: SaveStage::CommitPush,
                                blocker_status: crate::save::StageStatus::NotStarted,
                            },
                        );
                    };
                    let SaveMode::CommitToBranch(details) = mode else {
                        let message =
                            "pull request requested without git commit details".to_string();
                        self.end_error(stage, &message);
                        pr = PrOutcome::Failed(message);
                        break;
                    };
                    let source = resource
                        .branch
                        .clone()
                        .unwrap_or_else(|| details.branch.clone());
                    let Some(target) = details.pr_target().cloned() else {
                        let message = "no target branch for pull request".to_string();
                        self.end_error(stage, &message);
                        pr = PrOutcome::Failed(message);
                        break;
                    };
                    let request = PullRequestRequest {
                        source_branch: source,
                        target_branch: target,
                        title: details.commit_message.clone(),
                        account_identifier: self.scope.account_id.clone(),
                        org_identifier: self.scope.org_id.clone(),
                        project_identifier: self.scope.project_id.clone(),
                    };
                    match self.api.create_pull_request(&request) {
                        Ok(info) => {
                            self.end_success(stage);
                            pr = PrOutcome::Raised(info);
                        }
                        Err(err) => {
                            let message = err.to_string();
                            self.end_error(stage, &message);
                            pr = PrOutcome::Failed(message);
                            break;
                        }
                    }
                }
            }
        }
        match saved {
            Some(resource) => SaveOutcome::Saved { resource, pr },
            None => SaveOutcome::Failed {
                stage: SaveStage::CreateOrUpdate,
                message: "save plan finished without persisting the connector".to_string(),
                field_errors: Vec::new(),
            },
        }
    }

    fn begin_stage(&mut self, stage: SaveStage) -> Result<(), StageError> {
        let now = unix_now();
        self.tracker.begin(stage, now)?;
        self.log_transition(stage, "in_progress", None, now);
        Ok(())
    }

    fn end_success(&mut self, stage: SaveStage) {
        let now = unix_now();
        // Transitions are driven from drive() only, so these cannot fail; a
        // broken invariant would already have surfaced in begin_stage.
        let _ = self.tracker.succeed(stage, now);
        self.log_transition(stage, "success", None, now);
    }

    fn end_error(&mut self, stage: SaveStage, detail: &str) {
        let now = unix_now();
        let _ = self.tracker.fail(stage, detail, now);
        self.log_transition(stage, "error", Some(detail), now);
    }

    fn log_transition(&self, stage: SaveStage, status: &str, detail: Option<&str>, now: i64) {
        let Some(state_root) = &self.state_root else {
            return;
        };
        let line = match detail {
            Some(detail) => format!("{now} stage={stage} status={status} detail={detail}"),
            None => format!("{now} stage={stage} status={status}"),
        };
        // Logging is best-effort; a full log disk must not fail the save.
        let _ = append_save_attempt_log_line(state_root, &line);
    }

    fn invariant_failure(stage: SaveStage, err: StageError) -> SaveOutcome {
        SaveOutcome::Failed {
            stage,
            message: err.to_string(),
            field_errors: Vec::new(),
        }
    }
}

fn branch_plan_error(mode: &SaveMode) -> Option<String> {
    match mode {
        SaveMode::CommitToBranch(details) => {
            if details.new_branch && details.base_branch.is_none() {
                return Some("a new branch needs a base branch to start from".to_string());
            }
            None
        }
        SaveMode::Direct => Some("branch setup requested without git details".to_string()),
    }
}
