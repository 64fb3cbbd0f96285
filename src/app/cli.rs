#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Create,
    Edit,
    CheckId,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "create" => CliVerb::Create,
        "edit" => CliVerb::Edit,
        "check-id" => CliVerb::CheckId,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  create --file <draft.yaml> [--resolve <object-id>]".to_string(),
        "      Create a connector from a draft answers file. With --resolve,".to_string(),
        "      retry a conflicted git commit using the reported object id.".to_string(),
        "  edit --file <draft.yaml> --object-id <id>".to_string(),
        "      Update an existing connector; carries the last-known object id".to_string(),
        "      for conflict detection.".to_string(),
        "  check-id <identifier>".to_string(),
        "      Ask the platform whether a connector identifier is free.".to_string(),
        "  help".to_string(),
        "      Show this help.".to_string(),
    ]
}

pub fn help_text() -> String {
    cli_help_lines().join("\n")
}
