//! Studio configuration and credential resolution

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::paths::{get_db_path, get_outputs_dir, get_studio_config_path};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StudioConfig {
    /// Credential used when the GEMINI_API_KEY environment variable is unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Where generated images land; unset keeps outputs in memory only
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Session database location; unset keeps history in memory only
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_aspect_ratio() -> String {
    "9:16".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            aspect_ratio: default_aspect_ratio(),
            temperature: default_temperature(),
            output_dir: None,
            database_path: None,
        }
    }
}

impl StudioConfig {
    /// Resolves the credential for a batch. The environment wins over the
    /// stored key; an empty value counts as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.is_empty()))
    }

    /// Fills unset storage locations with the standard app data paths
    pub fn with_default_storage(mut self) -> Result<Self, StudioError> {
        if self.output_dir.is_none() {
            self.output_dir = Some(get_outputs_dir()?);
        }
        if self.database_path.is_none() {
            self.database_path = Some(get_db_path()?);
        }
        Ok(self)
    }
}

/// Reads the stored configuration as-is, without environment overrides.
/// Callers that persist changes go through this so a transient override
/// never ends up written to disk.
pub fn load_stored_config() -> Result<StudioConfig, StudioError> {
    let config_path = get_studio_config_path()?;
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(StudioConfig::default())
    }
}

pub fn load_studio_config() -> Result<StudioConfig, StudioError> {
    let mut config = load_stored_config()?;

    // Environment override for proxy deployments
    if let Ok(base_url) = env::var("GOOGLE_GEMINI_BASE_URL") {
        if !base_url.is_empty() {
            config.base_url = base_url;
        }
    }

    Ok(config)
}

pub fn save_studio_config(config: &StudioConfig) -> Result<(), StudioError> {
    let config_path = get_studio_config_path()?;
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(&config_path, content)?;
    Ok(())
}
