use super::{default_state_root, ConfigError};
use crate::connector::Scope;
use crate::shared::ids::{AccountId, OrgId, ProjectId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api_base: String,
    pub api_token: String,
    pub account_id: AccountId,
    #[serde(default)]
    pub org_id: Option<OrgId>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub git_sync_enabled: bool,
    #[serde(default)]
    pub state_root: Option<PathBuf>,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base.trim();
        if base.is_empty() {
            return Err(ConfigError::Settings("api_base must be non-empty".into()));
        }
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigError::Settings(
                "api_base must start with http:// or https://".into(),
            ));
        }
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Settings("api_token must be non-empty".into()));
        }
        if self.project_id.is_some() && self.org_id.is_none() {
            return Err(ConfigError::Settings(
                "project_id requires org_id to be set".into(),
            ));
        }
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let encoded = serde_yaml::to_string(self).map_err(|source| ConfigError::Encode {
            path: path.display().to_string(),
            source,
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        atomic_write(path, encoded.as_bytes()).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn scope(&self) -> Scope {
        Scope {
            account_id: self.account_id.clone(),
            org_id: self.org_id.clone(),
            project_id: self.project_id.clone(),
        }
    }

    pub fn resolve_state_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.state_root {
            Some(root) => Ok(root.clone()),
            None => default_state_root(),
        }
    }
}

fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("path has no parent"))?;
    let tmp_name = format!(
        ".{}.tmp-{}-{}",
        path.file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("settings"),
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    let tmp_path = parent.join(tmp_name);
    {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}
