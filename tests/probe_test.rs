//! Probe behavior against a mock management endpoint

use gcpdoctor::config::EndpointConfig;
use gcpdoctor::probe::{ProbeClient, ProbeResult};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoints(uri: &str) -> EndpointConfig {
    EndpointConfig {
        resource_manager: uri.to_string(),
        service_usage: uri.to_string(),
        iap: uri.to_string(),
        iam: uri.to_string(),
        storage: uri.to_string(),
        functions: uri.to_string(),
        compute: uri.to_string(),
        firebase: uri.to_string(),
        firebase_db_template: format!("{}/db", uri),
    }
}

fn client(uri: &str) -> ProbeClient {
    ProbeClient::new(
        endpoints(uri),
        "demo".to_string(),
        "test-token".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_forbidden_probe_does_not_stop_later_probes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/b"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [
                {"config": {"name": "iam.googleapis.com", "title": "IAM API"}}
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server.uri());

    let buckets = client.buckets().await;
    assert!(matches!(buckets, ProbeResult::PermissionDenied));

    // The 403 above must not prevent this probe from succeeding
    let services = client.enabled_services().await;
    match services {
        ProbeResult::Found(services) => {
            assert_eq!(services.len(), 1);
            assert_eq!(services[0].name, "iam.googleapis.com");
            assert_eq!(services[0].title, "IAM API");
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_collection_is_found_and_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let buckets = client(&server.uri()).buckets().await;
    match buckets {
        ProbeResult::Found(buckets) => assert!(buckets.is_empty()),
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_resource_maps_to_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let project = client(&server.uri()).project_info().await;
    assert!(matches!(project, ProbeResult::Missing));
}

#[tokio::test]
async fn test_unexpected_status_is_warning_with_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let project = client(&server.uri()).project_info().await;
    match project {
        ProbeResult::Warning { status, detail } => {
            assert_eq!(status, Some(500));
            assert!(detail.contains("backend exploded"));
        }
        other => panic!("expected Warning, got {:?}", other),
    }
}

#[tokio::test]
async fn test_enable_service_treats_conflict_as_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/demo/services/iap.googleapis.com:enable"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already enabled"))
        .mount(&server)
        .await;

    let result = client(&server.uri())
        .enable_service("iap.googleapis.com")
        .await;
    assert!(matches!(result, ProbeResult::Found(())));
}

#[tokio::test]
async fn test_iam_roles_filters_by_member() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/demo:getIamPolicy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bindings": [
                {
                    "role": "roles/editor",
                    "members": ["serviceAccount:svc@demo.iam.gserviceaccount.com"]
                },
                {
                    "role": "roles/viewer",
                    "members": ["user:someone@example.com"]
                },
                {
                    "role": "roles/storage.admin",
                    "members": [
                        "user:someone@example.com",
                        "serviceAccount:svc@demo.iam.gserviceaccount.com"
                    ]
                }
            ]
        })))
        .mount(&server)
        .await;

    let roles = client(&server.uri())
        .iam_roles("serviceAccount:svc@demo.iam.gserviceaccount.com")
        .await;
    match roles {
        ProbeResult::Found(assignments) => {
            assert_eq!(assignments.roles, vec!["roles/editor", "roles/storage.admin"]);
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_network_error_is_warning_without_status() {
    // Point the client at a closed port so the request itself fails
    let client = client("http://127.0.0.1:1");
    let buckets = client.buckets().await;
    match buckets {
        ProbeResult::Warning { status, detail } => {
            assert_eq!(status, None);
            assert!(!detail.is_empty());
        }
        other => panic!("expected Warning, got {:?}", other),
    }
}
