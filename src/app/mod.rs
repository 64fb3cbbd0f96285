pub mod cli;
pub mod commands;
pub mod draft_file;

pub use cli::{cli_help_lines, help_text, parse_cli_verb, CliVerb};
pub use commands::run_cli;
pub use draft_file::{DraftFile, DraftSteps};
