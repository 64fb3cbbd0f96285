use crate::api::FieldError;
use crate::connector::ConnectorPayload;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("platform rejected {path}: {message}")]
    Response {
        path: String,
        code: Option<String>,
        message: String,
        field_errors: Vec<FieldError>,
    },
    #[error("remote branch holds conflicting changes for object {object_id}")]
    GitConflict {
        object_id: String,
        remote: Box<ConnectorPayload>,
    },
    #[error("failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    /// Server-provided field errors, if the failure carried any.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Response { field_errors, .. } => field_errors,
            _ => &[],
        }
    }
}
