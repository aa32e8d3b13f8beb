//! Error handling module for gcpdoctor
//!
//! This module provides the error taxonomy shared by every diagnostic command.

mod error;

// Re-export the main error types and utilities
pub use error::{DoctorError, Result};
