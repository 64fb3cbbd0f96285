mod client;
mod error;
mod types;

pub use client::ConnectorApiClient;
pub use error::ApiError;
pub use types::{
    FieldError, GitCommitDetails, PullRequestInfo, PullRequestRequest, SavedConnector, SecretInfo,
};

pub const GIT_CONFLICT_CODE: &str = "SCM_CONFLICT";
