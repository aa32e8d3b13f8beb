//! gcpdoctor - Diagnostics and configuration assistance for a Google Cloud project
//!
//! This crate probes a project's OAuth consent configuration, enabled APIs, IAM
//! roles and resources through the public management endpoints, formats findings
//! as remediation reports, and ships two helper binaries: a line-delimited JSON
//! file dispatcher and a remote SSH command runner.

pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod llm;
pub mod probe;
pub mod report;
pub mod ssh;

pub use config::Config;
pub use error::{DoctorError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
