//! Diagnostic probes against the cloud management endpoints
//!
//! Every probe is a bounded set of read-only calls returning a structured
//! [`ProbeResult`]; the console text lives in the `report` module. One probe's
//! failure never aborts the others: 403 maps to `PermissionDenied`, 404 to
//! `Missing`, anything else unexpected to `Warning`.

mod api_key;
mod client;
mod compute;
mod firebase;
mod functions;
mod iam;
mod oauth;
mod project;
mod services;
mod storage;
mod types;

pub use api_key::{ApiKeyTestResult, ApiKeyTester};
pub use client::ProbeClient;
pub use compute::InstanceSummary;
pub use firebase::FirebaseInfo;
pub use functions::FunctionSummary;
pub use iam::{has_owner_or_editor, RoleAssignments, ServiceAccountInfo};
pub use oauth::{Brand, IapClient};
pub use project::{ProjectInfo, ProjectSummary};
pub use services::{
    classify_service, service_enabled, ServiceCategory, ServiceDescriptor, KEY_SERVICES,
};
pub use storage::{BucketSummary, ObjectSummary};
pub use types::ProbeResult;
