//! Orchestrator configuration
//!
//! Carries the platform project/location pair checked by the readiness gate
//! and the workflow's missing-stage policy. Loaded from TOML or built in
//! memory with defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Files checked, in order, when no configuration path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["agentzero.toml", "config/agentzero.toml"];

/// Main orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorConfig {
    pub platform: PlatformSection,
    #[serde(default)]
    pub workflow: WorkflowSection,
}

/// Cloud platform the orchestrator must be initialized against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformSection {
    /// Platform project identifier
    pub project_id: String,
    /// Platform region
    #[serde(default = "default_location")]
    pub location: String,
    /// Environment variable naming the service-account credentials file
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_credentials_env() -> String {
    "GOOGLE_APPLICATION_CREDENTIALS".to_string()
}

/// Workflow pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowSection {
    /// What to do when a pipeline stage is unregistered or fails
    #[serde(default)]
    pub missing_stage: MissingStagePolicy,
}

/// Behavior for a workflow stage that is unavailable or fails
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingStagePolicy {
    /// Abort the workflow with an error envelope naming the stage
    #[default]
    Fail,
    /// Omit the stage and list it under `skipped_stages`
    Skip,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid project ID: {0}")]
    InvalidProjectId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OrchestratorConfig {
    /// Build a configuration from a project/location pair with default settings
    pub fn new<P: Into<String>, L: Into<String>>(project_id: P, location: L) -> Self {
        Self {
            platform: PlatformSection {
                project_id: project_id.into(),
                location: location.into(),
                credentials_env: default_credentials_env(),
            },
            workflow: WorkflowSection::default(),
        }
    }

    /// Builder method to set the workflow missing-stage policy
    pub fn with_missing_stage_policy(mut self, policy: MissingStagePolicy) -> Self {
        self.workflow.missing_stage = policy;
        self
    }

    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: OrchestratorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `explicit` if given, else the first existing `search_paths`
    /// entry, else the environment
    pub fn resolve<P: AsRef<Path>>(
        explicit: Option<&Path>,
        search_paths: &[P],
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            info!("Loading configuration from: {}", path.display());
            return Self::load_from_file(path);
        }

        for candidate in search_paths {
            let path: &Path = candidate.as_ref();
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, reading AGENTZERO_PROJECT / AGENTZERO_LOCATION");
        Self::from_env()
    }

    /// Build configuration from `AGENTZERO_PROJECT` and `AGENTZERO_LOCATION`
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id = get_env_var_required("AGENTZERO_PROJECT")?;
        let location = std::env::var("AGENTZERO_LOCATION").unwrap_or_else(|_| default_location());

        let config = Self::new(project_id, location);
        config.validate()?;
        Ok(config)
    }

    /// Validate field formats
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_project_id(&self.platform.project_id)?;

        if self.platform.location.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "platform.location must not be empty".to_string(),
            ));
        }

        if self.platform.credentials_env.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "platform.credentials_env must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn get_env_var_required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarNotFound(name.to_string()))
}

/// Project IDs are 6-30 characters of lowercase letters, digits and hyphens
fn validate_project_id(project_id: &str) -> Result<(), ConfigError> {
    let valid_chars = project_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid_len = (6..=30).contains(&project_id.len());

    if !valid_chars || !valid_len {
        return Err(ConfigError::InvalidProjectId(format!(
            "Project ID '{project_id}' must match pattern [a-z0-9-]{{6,30}}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[platform]
project_id = "agentzero-457213"
location = "europe-west4"
credentials_env = "SERVICE_ACCOUNT_FILE"

[workflow]
missing_stage = "skip"
"#;

        let config = OrchestratorConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.platform.project_id, "agentzero-457213");
        assert_eq!(config.platform.location, "europe-west4");
        assert_eq!(config.platform.credentials_env, "SERVICE_ACCOUNT_FILE");
        assert_eq!(config.workflow.missing_stage, MissingStagePolicy::Skip);
    }

    #[test]
    fn test_minimal_config_defaults() {
        let toml_content = r#"
[platform]
project_id = "agentzero-457213"
"#;

        let config = OrchestratorConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.platform.location, "us-central1");
        assert_eq!(
            config.platform.credentials_env,
            "GOOGLE_APPLICATION_CREDENTIALS"
        );
        assert_eq!(config.workflow.missing_stage, MissingStagePolicy::Fail);
    }

    #[test]
    fn test_invalid_project_id() {
        assert!(validate_project_id("Bad_Project").is_err());
        assert!(validate_project_id("short").is_err());
        assert!(validate_project_id(&"a".repeat(31)).is_err());
        assert!(validate_project_id("agentzero-457213").is_ok());
    }

    #[test]
    fn test_unknown_missing_stage_policy_rejected() {
        let toml_content = r#"
[platform]
project_id = "agentzero-457213"

[workflow]
missing_stage = "retry"
"#;

        let result = OrchestratorConfig::from_toml_str(toml_content);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_empty_location_rejected() {
        let config = OrchestratorConfig::new("agentzero-457213", "  ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builder_sets_policy() {
        let config = OrchestratorConfig::new("agentzero-457213", "us-central1")
            .with_missing_stage_policy(MissingStagePolicy::Skip);
        assert_eq!(config.workflow.missing_stage, MissingStagePolicy::Skip);
    }
}
