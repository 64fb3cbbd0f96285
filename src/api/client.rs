use crate::api::{
    ApiError, FieldError, GitCommitDetails, PullRequestInfo, PullRequestRequest, SavedConnector,
    SecretInfo, GIT_CONFLICT_CODE,
};
use crate::connector::{ConnectorPayload, Scope};
use crate::shared::ids::{ConnectorId, SecretRef};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct ConnectorApiClient {
    api_base: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "fieldErrors")]
    field_errors: Vec<FieldError>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConflictData {
    object_id: String,
    connector: ConnectorPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    field_errors: Vec<FieldError>,
    #[serde(default)]
    data: Option<ConflictData>,
}

impl ConnectorApiClient {
    pub fn new(api_base: String, api_token: String) -> Self {
        Self {
            api_base,
            api_token,
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.api_base.trim_end_matches('/'), path);
        if !query.is_empty() {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{url}?{encoded}");
        }
        url
    }

    fn call<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        request: ureq::Request,
        body: Option<&impl serde::Serialize>,
    ) -> Result<T, ApiError> {
        let request = request.set("Authorization", &format!("Bearer {}", self.api_token));
        let result = match body {
            Some(body) => {
                let value = serde_json::to_value(body).map_err(|e| ApiError::Decode {
                    path: path.to_string(),
                    message: e.to_string(),
                })?;
                request.send_json(value)
            }
            None => request.call(),
        };
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => {
                return Err(self.failure_from_response(path, response));
            }
            Err(err) => {
                return Err(ApiError::Transport {
                    path: path.to_string(),
                    message: err.to_string(),
                });
            }
        };
        let envelope: ApiEnvelope<T> =
            response.into_json().map_err(|e| ApiError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        if envelope.status != "SUCCESS" {
            return Err(ApiError::Response {
                path: path.to_string(),
                code: envelope.code,
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("{path} failed")),
                field_errors: envelope.field_errors,
            });
        }
        envelope.data.ok_or_else(|| ApiError::Decode {
            path: path.to_string(),
            message: "response envelope is missing data".to_string(),
        })
    }

    fn failure_from_response(&self, path: &str, response: ureq::Response) -> ApiError {
        let body: FailureBody = match response.into_json() {
            Ok(body) => body,
            Err(e) => {
                return ApiError::Decode {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        };
        if body.code.as_deref() == Some(GIT_CONFLICT_CODE) {
            if let Some(data) = body.data {
                return ApiError::GitConflict {
                    object_id: data.object_id,
                    remote: Box::new(data.connector),
                };
            }
        }
        ApiError::Response {
            path: path.to_string(),
            code: body.code,
            message: body.message.unwrap_or_else(|| format!("{path} failed")),
            field_errors: body.field_errors,
        }
    }

    fn scope_query(scope: &Scope) -> Vec<(&'static str, String)> {
        let mut query = vec![("accountIdentifier", scope.account_id.as_str().to_string())];
        if let Some(org) = &scope.org_id {
            query.push(("orgIdentifier", org.as_str().to_string()));
        }
        if let Some(project) = &scope.project_id {
            query.push(("projectIdentifier", project.as_str().to_string()));
        }
        query
    }

    fn git_query(git: &GitCommitDetails) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("branch", git.branch.as_str().to_string()),
            ("isNewBranch", git.is_new_branch.to_string()),
            ("commitMsg", git.commit_message.clone()),
        ];
        if let Some(base) = &git.base_branch {
            query.push(("baseBranch", base.as_str().to_string()));
        }
        query
    }

    /// GET /connectors:validateIdentifier. True when the identifier is free.
    pub fn validate_identifier(
        &self,
        identifier: &ConnectorId,
        scope: &Scope,
    ) -> Result<bool, ApiError> {
        let path = "connectors:validateIdentifier";
        let mut query = vec![("identifier", identifier.as_str().to_string())];
        query.extend(Self::scope_query(scope));
        let url = self.endpoint(path, &query);
        self.call(path, ureq::get(&url), None::<&()>)
    }

    /// POST /connectors.
    pub fn create_connector(
        &self,
        payload: &ConnectorPayload,
        git: Option<&GitCommitDetails>,
    ) -> Result<SavedConnector, ApiError> {
        let path = "connectors";
        let query = git.map(Self::git_query).unwrap_or_default();
        let url = self.endpoint(path, &query);
        self.call(path, ureq::post(&url), Some(payload))
    }

    /// PUT /connectors/{identifier}; `last_object_id` is the last-known
    /// object revision, used server-side for optimistic concurrency.
    pub fn update_connector(
        &self,
        payload: &ConnectorPayload,
        last_object_id: &str,
        git: Option<&GitCommitDetails>,
    ) -> Result<SavedConnector, ApiError> {
        let path = format!("connectors/{}", payload.identifier.as_str());
        let mut query = vec![("lastObjectId", last_object_id.to_string())];
        if let Some(git) = git {
            query.extend(Self::git_query(git));
        }
        let url = self.endpoint(&path, &query);
        self.call(&path, ureq::put(&url), Some(payload))
    }

    /// POST /git/pull-requests.
    pub fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<PullRequestInfo, ApiError> {
        let path = "git/pull-requests";
        let url = self.endpoint(path, &[]);
        self.call(path, ureq::post(&url), Some(request))
    }

    /// GET /secrets/{ref}: rehydrates a stored secret reference into a
    /// displayable name. Never returns the secret value.
    pub fn resolve_secret(
        &self,
        secret_ref: &SecretRef,
        scope: &Scope,
    ) -> Result<SecretInfo, ApiError> {
        let path = format!("secrets/{}", secret_ref.as_str());
        let query = Self::scope_query(scope);
        let url = self.endpoint(&path, &query);
        self.call(&path, ureq::get(&url), None::<&()>)
    }
}
