mod auth;
mod payload;
mod types;

pub use auth::AuthConfig;
pub use payload::{build_connector_payload, ConnectorPayload, ConnectorSpec};
pub use types::{ConnectionMode, ConnectorDraft, ConnectorKind, DelegateSelection, Scope};
