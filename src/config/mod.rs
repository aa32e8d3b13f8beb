//! Configuration module for gcpdoctor
//!
//! This module provides configuration management and loading utilities.

mod config;

// Re-export the main configuration types
pub use config::{Config, EndpointConfig, LlmConfig, LlmProvider};
