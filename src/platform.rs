//! Platform readiness gate
//!
//! The orchestrator is always constructible. Before it accepts any request it
//! asks a [`PlatformReadiness`] collaborator whether the cloud platform is
//! initialized and credentials are available; a failed check leaves the
//! orchestrator constructed but not ready, with a diagnostic that tells
//! credential failures apart from general initialization failures.

use crate::config::PlatformSection;
use crate::error::{RouterError, RouterResult};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// Platform identity established by a successful readiness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    pub project_id: String,
    pub location: String,
    /// Where the credentials came from (file path or description)
    pub credential_source: String,
}

/// Why the platform is not ready
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("{0}")]
    Credentials(String),
    #[error("{0}")]
    Initialization(String),
}

/// Collaborator that initializes the platform and verifies credentials
pub trait PlatformReadiness: Send + Sync {
    fn check(&self, platform: &PlatformSection) -> Result<PlatformIdentity, PlatformError>;
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Readiness check backed by a service-account credentials file named by an
/// environment variable
pub struct EnvCredentialsCheck {
    lookup: EnvLookup,
}

impl Default for EnvCredentialsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvCredentialsCheck {
    /// Check against the process environment
    pub fn new() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Check against a custom variable lookup
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl PlatformReadiness for EnvCredentialsCheck {
    fn check(&self, platform: &PlatformSection) -> Result<PlatformIdentity, PlatformError> {
        if platform.project_id.trim().is_empty() {
            return Err(PlatformError::Initialization(
                "project ID is empty".to_string(),
            ));
        }
        if platform.location.trim().is_empty() {
            return Err(PlatformError::Initialization("location is empty".to_string()));
        }

        let path = (self.lookup)(&platform.credentials_env)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                PlatformError::Credentials(format!(
                    "Could not automatically determine credentials: {} is not set",
                    platform.credentials_env
                ))
            })?;

        if !Path::new(&path).is_file() {
            return Err(PlatformError::Credentials(format!(
                "Credentials file named by {} does not exist: {path}",
                platform.credentials_env
            )));
        }

        Ok(PlatformIdentity {
            project_id: platform.project_id.clone(),
            location: platform.location.clone(),
            credential_source: path,
        })
    }
}

/// Outcome of the readiness check, fixed for the orchestrator's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessGate {
    identity: Option<PlatformIdentity>,
    status_message: Option<String>,
}

impl ReadinessGate {
    /// Run the readiness check; never fails
    pub fn evaluate(readiness: &dyn PlatformReadiness, platform: &PlatformSection) -> Self {
        match readiness.check(platform) {
            Ok(identity) => {
                info!(
                    project_id = %identity.project_id,
                    location = %identity.location,
                    credential_source = %identity.credential_source,
                    "Platform initialized"
                );
                Self {
                    identity: Some(identity),
                    status_message: None,
                }
            }
            Err(PlatformError::Credentials(e)) => {
                let message = format!(
                    "Authentication error: {e}. Run 'gcloud auth application-default login' or configure service account credentials."
                );
                error!("{}", message);
                Self::not_ready(message)
            }
            Err(PlatformError::Initialization(e)) => {
                let message = format!("Failed to initialize platform: {e}");
                error!("{}", message);
                Self::not_ready(message)
            }
        }
    }

    fn not_ready(message: String) -> Self {
        Self {
            identity: None,
            status_message: Some(message),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.identity.is_some()
    }

    /// Diagnostic for a failed check, `None` when ready
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn identity(&self) -> Option<&PlatformIdentity> {
        self.identity.as_ref()
    }

    /// Short-circuit helper for every public operation
    pub fn ensure_ready(&self) -> RouterResult<()> {
        match &self.status_message {
            None => Ok(()),
            Some(message) => Err(RouterError::not_ready(message.clone())),
        }
    }
}
