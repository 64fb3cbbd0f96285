use crate::api::ConnectorApiClient;
use crate::app::cli::{help_text, parse_cli_verb, CliVerb};
use crate::app::draft_file::{DraftFile, DraftSteps};
use crate::config::{default_global_config_path, Settings};
use crate::connector::{build_connector_payload, AuthConfig, ConnectionMode, DelegateSelection};
use crate::overlay::status_glyph;
use crate::save::{
    save_enabled, PersistenceOrchestrator, PrOutcome, SaveIntent, SaveMode, SaveOutcome,
};
use crate::shared::ids::ConnectorId;
use crate::wizard::{
    DelegateStepOutput, GitStepOutput, StepOutput, WizardController, WizardStepId,
};
use std::path::PathBuf;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let Some(verb) = args.first() else {
        return Ok(help_text());
    };
    match parse_cli_verb(verb) {
        CliVerb::Create => handle_save(&args[1..], None),
        CliVerb::Edit => {
            let object_id = flag_value(&args[1..], "--object-id")
                .ok_or_else(|| "edit requires --object-id <id>".to_string())?;
            handle_save(&args[1..], Some(object_id))
        }
        CliVerb::CheckId => handle_check_id(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{verb}`\n\n{}", help_text())),
    }
}

fn load_settings() -> Result<Settings, String> {
    let path = match std::env::var_os("WIREUP_CONFIG") {
        Some(raw) => PathBuf::from(raw),
        None => default_global_config_path().map_err(|e| e.to_string())?,
    };
    Settings::from_path(&path).map_err(|e| e.to_string())
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == name {
            return iter.next().cloned();
        }
    }
    None
}

fn handle_check_id(args: &[String]) -> Result<String, String> {
    let raw = args
        .first()
        .ok_or_else(|| "check-id requires an identifier argument".to_string())?;
    let identifier = ConnectorId::parse(raw)?;
    let settings = load_settings()?;
    let api = ConnectorApiClient::new(settings.api_base.clone(), settings.api_token.clone());
    let available = api
        .validate_identifier(&identifier, &settings.scope())
        .map_err(|e| e.to_string())?;
    if available {
        Ok(format!("identifier `{identifier}` is available"))
    } else {
        Ok(format!("identifier `{identifier}` is already taken"))
    }
}

fn handle_save(args: &[String], edit_object_id: Option<String>) -> Result<String, String> {
    let file = flag_value(args, "--file")
        .ok_or_else(|| "a draft answers file is required: --file <draft.yaml>".to_string())?;
    let resolve_object_id = flag_value(args, "--resolve");
    let settings = load_settings()?;
    let steps = DraftFile::from_path(&PathBuf::from(&file))?.into_steps()?;
    let scope = settings.scope();
    let api = ConnectorApiClient::new(settings.api_base.clone(), settings.api_token.clone());

    let mut lines = Vec::new();
    if edit_object_id.is_some() {
        if let AuthConfig::ServiceToken {
            client_secret_ref, ..
        } = &steps.details.auth
        {
            let secret = api
                .resolve_secret(client_secret_ref, &scope)
                .map_err(|e| e.to_string())?;
            lines.push(format!(
                "using secret <{}> ({})",
                secret.name, secret.identifier
            ));
        }
    }

    let mut controller = replay_wizard(&steps, &settings, &api, edit_object_id.is_some())?;
    let assembled = controller.assemble().map_err(|e| e.to_string())?;

    if !save_enabled(
        false,
        steps.kind,
        assembled.connector.connection_mode,
        &assembled.connector.delegate_selection,
    ) {
        return Err(
            "save is disabled: in-cluster connections need at least one delegate selector"
                .to_string(),
        );
    }

    let payload = build_connector_payload(&assembled.connector, &scope);
    let state_root = settings.resolve_state_root().map_err(|e| e.to_string())?;
    let mut orchestrator = PersistenceOrchestrator::new(
        &api,
        scope.clone(),
        settings.git_sync_enabled,
        &assembled.save_mode,
        Some(state_root),
    );

    let outcome = match &resolve_object_id {
        Some(object_id) => {
            orchestrator.resume_after_conflict(&payload, object_id, &assembled.save_mode)
        }
        None => {
            let intent = match edit_object_id {
                Some(last_object_id) => SaveIntent::UpdateExisting { last_object_id },
                None => SaveIntent::CreateNew,
            };
            orchestrator.run(&payload, &intent, &assembled.save_mode)
        }
    };

    for record in orchestrator.tracker().records() {
        let mut line = format!("  {} {} [{}]", status_glyph(record.status), record.label, record.status);
        if let Some(detail) = &record.detail {
            line.push_str(&format!(" {detail}"));
        }
        lines.push(line);
    }

    match outcome {
        SaveOutcome::Saved { resource, pr } => {
            if let Some(actual) = &resource.branch {
                controller.rewrite_branch(actual.clone());
                lines.push(format!("committed to branch {actual}"));
            }
            lines.push(format!(
                "connector `{}` saved (object {})",
                resource.connector.identifier, resource.object_id
            ));
            match pr {
                PrOutcome::NotRequested => {}
                PrOutcome::Raised(info) => {
                    let mut line = format!("pull request #{} raised", info.number);
                    if let Some(url) = info.url {
                        line.push_str(&format!(": {url}"));
                    }
                    lines.push(line);
                }
                PrOutcome::Failed(message) => {
                    lines.push(format!(
                        "connector saved, but the pull request could not be raised: {message}"
                    ));
                }
            }
            Ok(lines.join("\n"))
        }
        SaveOutcome::Conflict { object_id, remote } => {
            lines.push(format!(
                "remote branch holds conflicting changes (object {object_id})"
            ));
            lines.push("remote version:".to_string());
            lines.push(
                serde_json::to_string_pretty(remote.as_ref()).map_err(|e| e.to_string())?,
            );
            lines.push(format!(
                "reconcile the draft file against the remote version, then re-run with --resolve {object_id}"
            ));
            Ok(lines.join("\n"))
        }
        SaveOutcome::Failed {
            stage,
            message,
            field_errors,
        } => {
            lines.push(format!("save failed at stage {stage}: {message}"));
            for field_error in field_errors {
                lines.push(format!("  {}: {}", field_error.field, field_error.message));
            }
            Err(lines.join("\n"))
        }
    }
}

fn replay_wizard(
    steps: &DraftSteps,
    settings: &Settings,
    api: &ConnectorApiClient,
    is_edit: bool,
) -> Result<WizardController, String> {
    let mut controller = WizardController::new(steps.kind, settings.git_sync_enabled);
    let scope = settings.scope();
    if is_edit {
        // Editing keeps the existing identifier, so the remote check is moot.
        controller
            .submit_overview(steps.overview.clone(), |_| Ok(true))
            .map_err(|e| e.to_string())?;
    } else {
        controller
            .submit_overview(steps.overview.clone(), |identifier| {
                api.validate_identifier(identifier, &scope)
            })
            .map_err(|e| e.to_string())?;
    }
    controller
        .submit(StepOutput::Details(steps.details.clone()))
        .map_err(|e| e.to_string())?;
    if controller.steps().contains(&WizardStepId::DelegateSetup) {
        let delegate = steps.delegate.clone().unwrap_or(DelegateStepOutput {
            connection_mode: ConnectionMode::Direct,
            selection: DelegateSelection::AnyAvailable,
        });
        controller
            .submit(StepOutput::Delegate(delegate))
            .map_err(|e| e.to_string())?;
    }
    if controller.steps().contains(&WizardStepId::GitDetails) {
        let git = steps.git.clone().unwrap_or(GitStepOutput {
            save_mode: SaveMode::Direct,
        });
        controller
            .submit(StepOutput::Git(git))
            .map_err(|e| e.to_string())?;
    }
    Ok(controller)
}
