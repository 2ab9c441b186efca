#![allow(clippy::unwrap_used)]
// Session establishment: HA resolution and version gate, using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vdirect_core::{ActiveRole, ClientConfig, CoreError, Scheme, Session};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer, primary: &str) -> ClientConfig {
    let mut config = ClientConfig::new(primary, "vdirect", SecretString::from("radware".to_string()));
    config.scheme = Scheme::Http;
    config.port = server.address().port();
    config
}

async fn mount_ha(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/ha/active"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_version(server: &MockServer, version: &str) {
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vDirectVersion": version })))
        .mount(server)
        .await;
}

// ── HA resolution ───────────────────────────────────────────────────

#[tokio::test]
async fn test_active_primary_is_used() {
    let server = MockServer::start().await;
    mount_ha(&server, 204).await;
    mount_version(&server, "4.10.0 build 12").await;

    let session = Session::establish(&config_for(&server, "127.0.0.1")).await.unwrap();

    assert_eq!(session.endpoint().active(), ActiveRole::Primary);
    assert_eq!(session.version().components(), &[4, 10, 0]);
}

#[tokio::test]
async fn test_unreachable_primary_fails_over_to_secondary() {
    let server = MockServer::start().await;
    mount_ha(&server, 204).await;
    mount_version(&server, "4.10.0").await;

    // nothing listens on 127.0.0.2 at the mock server's port
    let mut config = config_for(&server, "127.0.0.2");
    config.secondary = Some("127.0.0.1".into());

    let session = Session::establish(&config).await.unwrap();

    assert_eq!(session.endpoint().active(), ActiveRole::Secondary);
    assert_eq!(session.endpoint().active_address(), "127.0.0.1");
}

#[tokio::test]
async fn test_standby_primary_without_secondary_is_reported() {
    let server = MockServer::start().await;
    mount_ha(&server, 404).await;

    let err = Session::establish(&config_for(&server, "127.0.0.1"))
        .await
        .unwrap_err();

    match err {
        CoreError::Connectivity { reason, .. } => {
            assert!(reason.contains("primary not supplied"), "{reason}");
        }
        other => panic!("expected connectivity error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_inactive_secondary_is_a_connectivity_error() {
    let server = MockServer::start().await;
    mount_ha(&server, 500).await;

    let mut config = config_for(&server, "127.0.0.2");
    config.secondary = Some("127.0.0.1".into());

    let err = Session::establish(&config).await.unwrap_err();
    assert!(err.to_string().contains("failed to contact vDirect server"));
}

// ── Version gate ────────────────────────────────────────────────────

#[tokio::test]
async fn test_old_version_is_rejected() {
    let server = MockServer::start().await;
    mount_ha(&server, 204).await;
    mount_version(&server, "3.4.1").await;

    let err = Session::establish(&config_for(&server, "127.0.0.1"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedVersion { ref actual, .. } if actual == "3.4.1"));
}

#[tokio::test]
async fn test_snapshot_version_is_accepted() {
    let server = MockServer::start().await;
    mount_ha(&server, 204).await;
    mount_version(&server, "3.41-SNAPSHOT").await;

    let session = Session::establish(&config_for(&server, "127.0.0.1")).await.unwrap();
    assert_eq!(session.version().raw(), "3.41-SNAPSHOT");
}

#[tokio::test]
async fn test_malformed_metadata_carries_body() {
    let server = MockServer::start().await;
    mount_ha(&server, 204).await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = Session::establish(&config_for(&server, "127.0.0.1"))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), Some("<html>proxy</html>"));
}
