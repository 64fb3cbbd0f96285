mod error;
mod paths;
mod settings;

pub use error::ConfigError;
pub use paths::{default_global_config_path, default_state_root, GLOBAL_STATE_DIR};
pub use settings::Settings;
