//! Credential bootstrap shared by every diagnostic command
//!
//! Loads a service account key file, validates the caller identity fields and
//! mints a short-lived bearer token via the jwt-bearer grant. No token is ever
//! cached across invocations.

mod credentials;
mod token;

pub use credentials::ServiceAccountKey;
pub use token::{Token, TokenProvider, CLOUD_PLATFORM_SCOPE};
