//! Error types and handling for gcpdoctor

use thiserror::Error;

/// Result type alias for gcpdoctor operations
pub type Result<T> = std::result::Result<T, DoctorError>;

/// Main error type for gcpdoctor
///
/// The taxonomy is deliberately coarse: every external call resolves to one of
/// these buckets, and finer detail survives only in the diagnostic text.
#[derive(Error, Debug)]
pub enum DoctorError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Authentication errors (cannot obtain a usable token)
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Permission errors (HTTP 403 from a probe endpoint)
    #[error("Permission denied: {message}")]
    Permission { message: String },

    /// Resource absent (HTTP 404, or an empty result where one was required)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other non-2xx status or network failure
    #[error("Transient or unknown error: {message}")]
    Transient { message: String },

    /// Invalid JSON from an upload or a dispatcher request line
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DoctorError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a permission error
    pub fn permission<S: Into<String>>(message: S) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a transient/unknown error
    pub fn transient<S: Into<String>>(message: S) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    /// Create a malformed-input error
    pub fn malformed_input<S: Into<String>>(message: S) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DoctorError::Config { .. } => "config",
            DoctorError::Auth { .. } => "auth",
            DoctorError::Permission { .. } => "permission",
            DoctorError::NotFound { .. } => "not_found",
            DoctorError::Transient { .. } => "transient",
            DoctorError::MalformedInput { .. } => "malformed_input",
            DoctorError::Io(_) => "io",
            DoctorError::Serde(_) => "serialization",
            DoctorError::Yaml(_) => "yaml",
            DoctorError::Http(_) => "http",
            DoctorError::Internal(_) => "internal",
        }
    }
}
