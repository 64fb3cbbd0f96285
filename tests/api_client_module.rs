use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use wireup::api::{ApiError, ConnectorApiClient, PullRequestRequest};
use wireup::connector::{
    build_connector_payload, AuthConfig, ConnectionMode, ConnectorDraft, ConnectorKind,
    DelegateSelection, Scope,
};
use wireup::shared::ids::{AccountId, BranchName, ConnectorId, SecretRef};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    auth_header: String,
    body: String,
}

struct MockPlatformServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockPlatformServer {
    fn start<F>(expected_requests: usize, responder: F) -> Self
    where
        F: Fn(usize, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let requests_for_thread = Arc::clone(&requests);
        let responder = Arc::new(responder);

        let handle = thread::spawn(move || {
            for index in 0..expected_requests {
                let (mut stream, _) = listener.accept().expect("accept");
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

                let mut request_line = String::new();
                reader
                    .read_line(&mut request_line)
                    .expect("read request line");
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or("GET").to_string();
                let path = parts.next().unwrap_or("/").to_string();

                let mut auth_header = String::new();
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).expect("read header");
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if lower.starts_with("authorization:") {
                        auth_header = line
                            .split_once(':')
                            .map(|(_, v)| v.trim().to_string())
                            .unwrap_or_default();
                    }
                    if lower.starts_with("content-length:") {
                        content_length = line
                            .split_once(':')
                            .map(|(_, v)| v.trim().parse::<usize>().unwrap_or(0))
                            .unwrap_or(0);
                    }
                }

                let mut body = vec![0_u8; content_length];
                if content_length > 0 {
                    reader.read_exact(&mut body).expect("read body");
                }
                let body = String::from_utf8_lossy(&body).to_string();

                requests_for_thread
                    .lock()
                    .expect("lock requests")
                    .push(RecordedRequest {
                        method,
                        path: path.clone(),
                        auth_header,
                        body,
                    });

                let (status, response_body) = responder(index, &path);
                let reason = if status < 400 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response_body.len(),
                    response_body
                );
                stream
                    .write_all(response.as_bytes())
                    .expect("write response");
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle: Some(handle),
        }
    }

    fn finish(mut self) -> Vec<RecordedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("join mock server");
        }
        self.requests.lock().expect("lock requests").clone()
    }
}

fn scope() -> Scope {
    Scope {
        account_id: AccountId::parse("semi-auto").expect("account"),
        org_id: None,
        project_id: None,
    }
}

fn sample_payload() -> wireup::connector::ConnectorPayload {
    let draft = ConnectorDraft {
        kind: ConnectorKind::DockerRegistry,
        name: "Docker Hub".to_string(),
        identifier: ConnectorId::parse("docker-hub").expect("id"),
        description: None,
        url: "https://hub.example.com".to_string(),
        auth: AuthConfig::UsernamePassword {
            username: "u".to_string(),
            password: "p".to_string(),
        },
        connection_mode: ConnectionMode::Direct,
        delegate_selection: DelegateSelection::AnyAvailable,
    };
    build_connector_payload(&draft, &scope())
}

#[test]
fn validate_identifier_sends_scoped_query_and_bearer_token() {
    let server = MockPlatformServer::start(1, |_, _| {
        (200, json!({"status": "SUCCESS", "data": true}).to_string())
    });
    let client = ConnectorApiClient::new(server.base_url.clone(), "token-1".to_string());

    let available = client
        .validate_identifier(&ConnectorId::parse("docker-hub").expect("id"), &scope())
        .expect("validate");
    assert!(available);

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert!(requests[0]
        .path
        .starts_with("/connectors:validateIdentifier?identifier=docker-hub"));
    assert!(requests[0].path.contains("accountIdentifier=semi-auto"));
    assert_eq!(requests[0].auth_header, "Bearer token-1");
}

#[test]
fn failure_body_maps_to_a_structured_response_error() {
    let server = MockPlatformServer::start(1, |_, _| {
        (
            400,
            json!({
                "code": "INVALID_REQUEST",
                "message": "url is malformed",
                "fieldErrors": [{"field": "spec.url", "message": "must be https"}]
            })
            .to_string(),
        )
    });
    let client = ConnectorApiClient::new(server.base_url.clone(), "token-1".to_string());

    let err = client
        .create_connector(&sample_payload(), None)
        .expect_err("rejected");
    match err {
        ApiError::Response {
            code,
            message,
            field_errors,
            ..
        } => {
            assert_eq!(code.as_deref(), Some("INVALID_REQUEST"));
            assert_eq!(message, "url is malformed");
            assert_eq!(field_errors.len(), 1);
            assert_eq!(field_errors[0].field, "spec.url");
        }
        other => panic!("expected response error, got {other:?}"),
    }
    server.finish();
}

#[test]
fn conflict_code_surfaces_the_remote_payload() {
    let remote = sample_payload();
    let remote_json = serde_json::to_value(&remote).expect("remote json");
    let server = MockPlatformServer::start(1, move |_, _| {
        (
            409,
            json!({
                "code": "SCM_CONFLICT",
                "message": "branch moved",
                "data": {"objectId": "obj-9", "connector": remote_json}
            })
            .to_string(),
        )
    });
    let client = ConnectorApiClient::new(server.base_url.clone(), "token-1".to_string());

    let err = client
        .update_connector(&sample_payload(), "obj-8", None)
        .expect_err("conflict");
    match err {
        ApiError::GitConflict { object_id, remote } => {
            assert_eq!(object_id, "obj-9");
            assert_eq!(remote.identifier.as_str(), "docker-hub");
        }
        other => panic!("expected git conflict, got {other:?}"),
    }

    let requests = server.finish();
    assert_eq!(requests[0].method, "PUT");
    assert!(requests[0].path.starts_with("/connectors/docker-hub"));
    assert!(requests[0].path.contains("lastObjectId=obj-8"));
}

#[test]
fn pull_request_body_uses_wire_field_names() {
    let server = MockPlatformServer::start(1, |_, _| {
        (
            200,
            json!({"status": "SUCCESS", "data": {"number": 17, "url": "https://git/pr/17"}})
                .to_string(),
        )
    });
    let client = ConnectorApiClient::new(server.base_url.clone(), "token-1".to_string());

    let info = client
        .create_pull_request(&PullRequestRequest {
            source_branch: BranchName::parse("feature/connector").expect("branch"),
            target_branch: BranchName::parse("main").expect("branch"),
            title: "add connector".to_string(),
            account_identifier: AccountId::parse("semi-auto").expect("account"),
            org_identifier: None,
            project_identifier: None,
        })
        .expect("pr");
    assert_eq!(info.number, 17);

    let requests = server.finish();
    assert_eq!(requests[0].path, "/git/pull-requests");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).expect("body");
    assert_eq!(body["sourceBranch"], "feature/connector");
    assert_eq!(body["targetBranch"], "main");
    assert_eq!(body["accountIdentifier"], "semi-auto");
}

#[test]
fn success_envelope_without_data_is_a_decode_error() {
    let server =
        MockPlatformServer::start(1, |_, _| (200, json!({"status": "SUCCESS"}).to_string()));
    let client = ConnectorApiClient::new(server.base_url.clone(), "token-1".to_string());

    let err = client
        .resolve_secret(&SecretRef::parse("account.dockerPat").expect("ref"), &scope())
        .expect_err("missing data");
    assert!(matches!(err, ApiError::Decode { .. }));
    server.finish();
}

#[test]
fn resolve_secret_returns_a_display_name_only() {
    let server = MockPlatformServer::start(1, |_, _| {
        (
            200,
            json!({
                "status": "SUCCESS",
                "data": {"identifier": "account.dockerPat", "name": "Docker PAT"}
            })
            .to_string(),
        )
    });
    let client = ConnectorApiClient::new(server.base_url.clone(), "token-1".to_string());

    let secret = client
        .resolve_secret(&SecretRef::parse("account.dockerPat").expect("ref"), &scope())
        .expect("secret");
    assert_eq!(secret.name, "Docker PAT");

    let requests = server.finish();
    assert!(requests[0].path.starts_with("/secrets/account.dockerPat"));
}
