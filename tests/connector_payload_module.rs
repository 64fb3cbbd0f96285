use serde_json::Value;
use wireup::connector::{
    build_connector_payload, AuthConfig, ConnectionMode, ConnectorDraft, ConnectorKind,
    DelegateSelection, Scope,
};
use wireup::shared::ids::{AccountId, ConnectorId, SecretRef};

fn scope(account: &str) -> Scope {
    Scope {
        account_id: AccountId::parse(account).expect("account"),
        org_id: None,
        project_id: None,
    }
}

fn basic_auth_draft() -> ConnectorDraft {
    ConnectorDraft {
        kind: ConnectorKind::DockerRegistry,
        name: "Docker Hub".to_string(),
        identifier: ConnectorId::parse("docker-hub").expect("id"),
        description: None,
        url: "https://sdfs.com".to_string(),
        auth: AuthConfig::UsernamePassword {
            username: "username-something".to_string(),
            password: "some-password".to_string(),
        },
        connection_mode: ConnectionMode::Direct,
        delegate_selection: DelegateSelection::AnyAvailable,
    }
}

#[test]
fn username_password_payload_carries_all_fields_verbatim() {
    let payload = build_connector_payload(&basic_auth_draft(), &scope("semi-auto"));
    let value = serde_json::to_value(&payload).expect("json");

    assert_eq!(value["accountIdentifier"], "semi-auto");
    assert_eq!(value["type"], "DockerRegistry");
    assert_eq!(value["spec"]["url"], "https://sdfs.com");
    assert_eq!(value["spec"]["authType"], "UsernamePassword");
    assert_eq!(value["spec"]["username"], "username-something");
    assert_eq!(value["spec"]["password"], "some-password");
    assert_eq!(value["spec"]["clientId"], Value::Null);
    assert_eq!(value["spec"]["clientSecretRef"], Value::Null);
}

#[test]
fn switching_auth_mode_nulls_out_the_inactive_pair() {
    // Editing a token connector down to username/password must clear the
    // token fields explicitly rather than omitting them.
    let mut draft = basic_auth_draft();
    draft.auth = AuthConfig::ServiceToken {
        client_id: "svc-client".to_string(),
        client_secret_ref: SecretRef::parse("account.dockerPat").expect("ref"),
    };
    let token_value =
        serde_json::to_value(build_connector_payload(&draft, &scope("semi-auto"))).expect("json");
    assert_eq!(token_value["spec"]["authType"], "ServiceToken");
    assert_eq!(token_value["spec"]["clientId"], "svc-client");
    assert_eq!(token_value["spec"]["clientSecretRef"], "account.dockerPat");
    assert_eq!(token_value["spec"]["username"], Value::Null);
    assert_eq!(token_value["spec"]["password"], Value::Null);

    let spec_obj = token_value["spec"].as_object().expect("spec object");
    assert!(spec_obj.contains_key("username"));
    assert!(spec_obj.contains_key("password"));

    draft.auth = AuthConfig::UsernamePassword {
        username: "u".to_string(),
        password: "p".to_string(),
    };
    let basic_value =
        serde_json::to_value(build_connector_payload(&draft, &scope("semi-auto"))).expect("json");
    assert_eq!(basic_value["spec"]["clientId"], Value::Null);
    assert_eq!(basic_value["spec"]["clientSecretRef"], Value::Null);
}

#[test]
fn builder_is_pure_and_idempotent() {
    let draft = basic_auth_draft();
    let before = draft.clone();
    let scope = scope("semi-auto");
    let first = build_connector_payload(&draft, &scope);
    let second = build_connector_payload(&draft, &scope);
    assert_eq!(first, second);
    assert_eq!(draft, before);
}

#[test]
fn delegate_selectors_ride_along_and_default_to_empty() {
    let mut draft = basic_auth_draft();
    let payload = build_connector_payload(&draft, &scope("acct"));
    assert!(payload.spec.delegate_selectors.is_empty());

    draft.connection_mode = ConnectionMode::ThroughDelegate;
    draft.delegate_selection = DelegateSelection::tagged(["k8s", "prod"]).expect("tags");
    let payload = build_connector_payload(&draft, &scope("acct"));
    assert_eq!(payload.spec.delegate_selectors, ["k8s", "prod"]);
    assert_eq!(payload.spec.connection_mode, ConnectionMode::ThroughDelegate);
}

#[test]
fn scope_ids_are_attached_when_present() {
    let scope = Scope {
        account_id: AccountId::parse("acct").expect("account"),
        org_id: Some(wireup::shared::ids::OrgId::parse("default").expect("org")),
        project_id: Some(wireup::shared::ids::ProjectId::parse("delivery").expect("project")),
    };
    let value =
        serde_json::to_value(build_connector_payload(&basic_auth_draft(), &scope)).expect("json");
    assert_eq!(value["orgIdentifier"], "default");
    assert_eq!(value["projectIdentifier"], "delivery");
}
