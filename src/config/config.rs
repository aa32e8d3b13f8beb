//! Configuration management for gcpdoctor

use crate::error::{DoctorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Default functions for serde
fn default_credentials_path() -> String {
    "~/.config/gcpdoctor/service-account.json".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_api_key_timeout() -> u64 {
    10
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the service account key file (supports ~ and $VAR expansion)
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    /// Project ID override; normally taken from the credentials file
    pub project_id: Option<String>,
    /// API key used by the key tester; only ever supplied via environment
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Workspace directory for the file dispatcher
    pub workspace_dir: Option<PathBuf>,
    /// Cloud management endpoint base URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// LLM provider configuration
    pub llm: Option<LlmConfig>,
    /// Timeout for authenticated probe calls, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    /// Timeout for unauthenticated API key tests, in seconds
    #[serde(default = "default_api_key_timeout")]
    pub api_key_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            project_id: None,
            api_key: None,
            workspace_dir: None,
            endpoints: EndpointConfig::default(),
            llm: None,
            http_timeout_secs: default_http_timeout(),
            api_key_timeout_secs: default_api_key_timeout(),
        }
    }
}

/// Base URLs for every cloud management endpoint the probes talk to.
///
/// Defaults are the real Google endpoints; tests point them at a local mock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Cloud Resource Manager (project metadata, IAM policy)
    pub resource_manager: String,
    /// Service Usage (enabled API listing, enablement)
    pub service_usage: String,
    /// Identity-Aware Proxy (OAuth brands and clients)
    pub iap: String,
    /// IAM (service account listing)
    pub iam: String,
    /// Cloud Storage JSON API
    pub storage: String,
    /// Cloud Functions
    pub functions: String,
    /// Compute Engine
    pub compute: String,
    /// Firebase management
    pub firebase: String,
    /// Firebase Realtime Database host template; `{project}` is substituted
    pub firebase_db_template: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            resource_manager: "https://cloudresourcemanager.googleapis.com".to_string(),
            service_usage: "https://serviceusage.googleapis.com".to_string(),
            iap: "https://iap.googleapis.com".to_string(),
            iam: "https://iam.googleapis.com".to_string(),
            storage: "https://storage.googleapis.com".to_string(),
            functions: "https://cloudfunctions.googleapis.com".to_string(),
            compute: "https://compute.googleapis.com".to_string(),
            firebase: "https://firebase.googleapis.com".to_string(),
            firebase_db_template: "https://{project}.firebaseio.com".to_string(),
        }
    }
}

/// LLM provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Direct Anthropic messages API
    Anthropic,
    /// Routed through OpenRouter
    OpenRouter,
}

/// LLM client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which provider to use
    pub provider: LlmProvider,
    /// Model alias or full model identifier
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Override for the provider base URL
    pub api_base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Config {
    /// Load a `.env` file if one is present in the working directory
    fn load_env_file() {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!("Loaded environment variables from {}", path.display());
            }
            Err(e) if e.not_found() => {
                tracing::debug!("No .env file found, skipping");
            }
            Err(e) => {
                tracing::warn!("Failed to load .env file: {}", e);
            }
        }
    }

    /// Load configuration from a YAML file with environment variable overrides
    ///
    /// Precedence: defaults < file < environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        Self::load_env_file();

        let mut config = match path {
            Some(p) if p.as_ref().exists() => {
                let content = std::fs::read_to_string(&p).map_err(|e| {
                    DoctorError::config(format!("Failed to read config file: {}", e))
                })?;
                serde_yaml::from_str(&content).map_err(|e| {
                    DoctorError::config(format!("Failed to parse config file: {}", e))
                })?
            }
            _ => {
                tracing::debug!("Config file not found, using defaults");
                Self::default()
            }
        };

        config.apply_environment_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_environment_overrides(&mut self) {
        if let Ok(path) = std::env::var("GCPDOCTOR_CREDENTIALS") {
            if !path.is_empty() {
                self.credentials_path = path;
            }
        }
        if let Ok(project) = std::env::var("GCP_PROJECT_ID") {
            if !project.is_empty() {
                self.project_id = Some(project);
            }
        }
        if let Ok(key) = std::env::var("GCP_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(dir) = std::env::var("GCPDOCTOR_WORKSPACE") {
            if !dir.is_empty() {
                self.workspace_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials_path.is_empty() {
            return Err(DoctorError::config("credentials_path must not be empty"));
        }
        if self.http_timeout_secs == 0 || self.api_key_timeout_secs == 0 {
            return Err(DoctorError::config("timeouts must be greater than zero"));
        }
        Ok(())
    }

    /// Credentials path with `~` and environment variables expanded
    pub fn resolved_credentials_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::full(&self.credentials_path).map_or_else(
            |_| self.credentials_path.clone(),
            |expanded| expanded.into_owned(),
        ))
    }

    /// Workspace directory for the dispatcher, defaulting under the user's data dir
    pub fn resolved_workspace_dir(&self) -> PathBuf {
        self.workspace_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gcpdoctor")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints_point_at_google() {
        let endpoints = EndpointConfig::default();
        assert!(endpoints.resource_manager.contains("cloudresourcemanager"));
        assert!(endpoints.service_usage.contains("serviceusage"));
        assert!(endpoints.iap.contains("iap"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            http_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
credentials_path: /tmp/key.json
project_id: demo-project
llm:
  provider: openrouter
  model: opus_4
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.credentials_path, "/tmp/key.json");
        assert_eq!(config.project_id.as_deref(), Some("demo-project"));
        let llm = config.llm.unwrap();
        assert_eq!(llm.provider, LlmProvider::OpenRouter);
        assert_eq!(llm.max_tokens, 4096);
    }
}
