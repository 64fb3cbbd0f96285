use crate::connector::{AuthConfig, ConnectionMode, ConnectorDraft, ConnectorKind, Scope};
use crate::shared::ids::{AccountId, ConnectorId, OrgId, ProjectId, SecretRef};
use serde::{Deserialize, Serialize};

/// Wire-format body for POST /connectors and PUT /connectors/{id}. Built once
/// per save attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorPayload {
    pub name: String,
    pub identifier: ConnectorId,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ConnectorKind,
    pub account_identifier: AccountId,
    pub org_identifier: Option<OrgId>,
    pub project_identifier: Option<ProjectId>,
    pub spec: ConnectorSpec,
}

/// The credential fields are all present on the wire regardless of mode;
/// see [`AuthConfig`] for why the inactive pair is explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorSpec {
    pub url: String,
    pub auth_type: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub client_secret_ref: Option<SecretRef>,
    pub connection_mode: ConnectionMode,
    pub delegate_selectors: Vec<String>,
}

/// Pure mapping from an assembled draft plus explicit scope to the wire body.
/// No I/O, no mutation of the input; callers have already validated the draft.
pub fn build_connector_payload(draft: &ConnectorDraft, scope: &Scope) -> ConnectorPayload {
    let (username, password, client_id, client_secret_ref) = match &draft.auth {
        AuthConfig::UsernamePassword { username, password } => {
            (Some(username.clone()), Some(password.clone()), None, None)
        }
        AuthConfig::ServiceToken {
            client_id,
            client_secret_ref,
        } => (
            None,
            None,
            Some(client_id.clone()),
            Some(client_secret_ref.clone()),
        ),
    };
    ConnectorPayload {
        name: draft.name.clone(),
        identifier: draft.identifier.clone(),
        description: draft.description.clone(),
        kind: draft.kind,
        account_identifier: scope.account_id.clone(),
        org_identifier: scope.org_id.clone(),
        project_identifier: scope.project_id.clone(),
        spec: ConnectorSpec {
            url: draft.url.clone(),
            auth_type: draft.auth.auth_type().to_string(),
            username,
            password,
            client_id,
            client_secret_ref,
            connection_mode: draft.connection_mode,
            delegate_selectors: draft.delegate_selection.selectors().to_vec(),
        },
    }
}
