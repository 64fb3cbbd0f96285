use tempfile::tempdir;
use wireup::app::{parse_cli_verb, CliVerb, DraftFile};
use wireup::connector::{AuthConfig, ConnectionMode, ConnectorKind};
use wireup::save::SaveMode;

fn write_draft(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("draft.yaml");
    std::fs::write(&path, contents).expect("write draft");
    (dir, path)
}

#[test]
fn verbs_parse_with_help_aliases() {
    assert_eq!(parse_cli_verb("create"), CliVerb::Create);
    assert_eq!(parse_cli_verb("edit"), CliVerb::Edit);
    assert_eq!(parse_cli_verb("check-id"), CliVerb::CheckId);
    assert_eq!(parse_cli_verb("help"), CliVerb::Help);
    assert_eq!(parse_cli_verb("--help"), CliVerb::Help);
    assert_eq!(parse_cli_verb("-h"), CliVerb::Help);
    assert_eq!(parse_cli_verb("delete"), CliVerb::Unknown);
}

#[test]
fn minimal_draft_maps_to_overview_and_details_steps() {
    let (_dir, path) = write_draft(
        r#"
kind: Jira
name: Team Jira
identifier: team-jira
url: https://jira.example.com
auth:
  mode: username_password
  username: bot
  password: hunter2
"#,
    );
    let steps = DraftFile::from_path(&path)
        .expect("parse")
        .into_steps()
        .expect("steps");
    assert_eq!(steps.kind, ConnectorKind::Jira);
    assert_eq!(steps.overview.identifier.as_str(), "team-jira");
    assert_eq!(steps.overview.description, None);
    assert!(matches!(
        steps.details.auth,
        AuthConfig::UsernamePassword { .. }
    ));
    assert!(steps.delegate.is_none());
    assert!(steps.git.is_none());
}

#[test]
fn full_draft_maps_delegate_and_git_sections() {
    let (_dir, path) = write_draft(
        r#"
kind: KubernetesCluster
name: Prod Cluster
identifier: prod-cluster
description: main production cluster
url: https://k8s.example.com
auth:
  mode: service_token
  client_id: svc-deploy
  client_secret_ref: account.k8sToken
connection:
  mode: through_delegate
  delegate_selectors: [k8s, prod]
git:
  branch: feature/prod-cluster
  new_branch: true
  base_branch: main
  commit_message: add prod cluster connector
  raise_pr: true
"#,
    );
    let steps = DraftFile::from_path(&path)
        .expect("parse")
        .into_steps()
        .expect("steps");

    let delegate = steps.delegate.expect("delegate section");
    assert_eq!(delegate.connection_mode, ConnectionMode::ThroughDelegate);
    assert_eq!(delegate.selection.selectors(), ["k8s", "prod"]);

    match steps.git.expect("git section").save_mode {
        SaveMode::CommitToBranch(details) => {
            assert_eq!(details.branch.as_str(), "feature/prod-cluster");
            assert!(details.new_branch);
            assert_eq!(details.base_branch.as_ref().map(|b| b.as_str()), Some("main"));
            assert!(details.raise_pr);
            assert_eq!(details.target_branch, None);
        }
        SaveMode::Direct => panic!("expected git save mode"),
    }

    match steps.details.auth {
        AuthConfig::ServiceToken {
            client_id,
            client_secret_ref,
        } => {
            assert_eq!(client_id, "svc-deploy");
            assert_eq!(client_secret_ref.as_str(), "account.k8sToken");
        }
        other => panic!("expected service token auth, got {other:?}"),
    }
}

#[test]
fn unknown_keys_and_bad_values_are_rejected() {
    let (_dir, path) = write_draft(
        r#"
kind: DockerRegistry
name: Hub
identifier: hub
url: https://hub.example.com
surprise: true
auth:
  mode: username_password
  username: u
  password: p
"#,
    );
    assert!(DraftFile::from_path(&path).is_err());

    let (_dir, path) = write_draft(
        r#"
kind: FtpServer
name: Old FTP
identifier: old-ftp
url: ftp://x
auth:
  mode: username_password
  username: u
  password: p
"#,
    );
    let err = DraftFile::from_path(&path)
        .expect("parse")
        .into_steps()
        .expect_err("bad kind");
    assert!(err.contains("connector kind"));

    let (_dir, path) = write_draft(
        r#"
kind: DockerRegistry
name: Hub
identifier: "has spaces"
url: https://hub.example.com
auth:
  mode: username_password
  username: u
  password: p
"#,
    );
    assert!(DraftFile::from_path(&path)
        .expect("parse")
        .into_steps()
        .is_err());
}
