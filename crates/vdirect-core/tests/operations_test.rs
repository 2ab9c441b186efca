#![allow(clippy::unwrap_used)]
// Template, upload, workflow and device operations against a mock vDirect.

use std::time::Duration;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use url::Url;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vdirect_api::{Credentials, VdirectClient};
use vdirect_core::{
    Completion, CoreError, DeviceFamily, DeviceTarget, Endpoint, Scheme, ServiceVersion, Session,
    TemplateOptions, UploadOptions, WorkflowArchive, WorkflowOptions, WorkflowTarget,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let credentials = Credentials::new("vdirect", SecretString::from("radware".to_string()));
    let client = VdirectClient::new(reqwest::Client::new(), base_url, credentials);
    let endpoint = Endpoint::new("127.0.0.1", None, server.address().port(), Scheme::Http);
    let session = Session::from_parts(client, endpoint, ServiceVersion::parse("4.10").unwrap());
    (server, session)
}

fn values(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn sync() -> WorkflowOptions {
    WorkflowOptions {
        completion: Completion::Wait {
            delay: Duration::from_millis(5),
        },
        check_mode: false,
    }
}

async fn mount_template(server: &MockServer, name: &str, device_type: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/template/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "info": {
                "devices": [{ "name": "adc", "type": device_type }],
                "parameters": [
                    { "name": "vip", "type": "ip" },
                    { "name": "port", "type": "int", "defaultValue": 80 },
                    { "name": "status", "type": "string", "direction": "out" }
                ]
            }
        })))
        .mount(server)
        .await;
}

// ── Template uploads ────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_new_template_posts_once() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/template/idle.vm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/template"))
        .and(query_param("name", "idle.vm"))
        .and(header("content-type", "text/x-velocity"))
        .and(body_string("#property('description', 'idle')"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session
        .upload_template(
            "idle.vm",
            Bytes::from_static(b"#property('description', 'idle')"),
            UploadOptions {
                overwrite: false,
                check_mode: false,
            },
        )
        .await
        .unwrap();

    assert!(outcome.changed);
}

#[tokio::test]
async fn test_identical_overwrite_sends_no_put() {
    let (server, session) = setup().await;
    mount_template(&server, "idle.vm", "alteon").await;

    Mock::given(method("GET"))
        .and(path("/api/template/idle.vm/source"))
        .respond_with(ResponseTemplate::new(200).set_body_string("#set($x = 1)"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = session
        .upload_template(
            "idle.vm",
            Bytes::from_static(b"#set($x = 1)"),
            UploadOptions {
                overwrite: true,
                check_mode: false,
            },
        )
        .await
        .unwrap();

    assert!(!outcome.changed);
}

#[tokio::test]
async fn test_changed_overwrite_replaces_source() {
    let (server, session) = setup().await;
    mount_template(&server, "idle.vm", "alteon").await;

    Mock::given(method("GET"))
        .and(path("/api/template/idle.vm/source"))
        .respond_with(ResponseTemplate::new(200).set_body_string("#set($x = 1)"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/template/idle.vm/source"))
        .and(query_param("failIfInvalid", "true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session
        .upload_template(
            "idle.vm",
            Bytes::from_static(b"#set($x = 2)"),
            UploadOptions {
                overwrite: true,
                check_mode: false,
            },
        )
        .await
        .unwrap();

    assert!(outcome.changed);
}

#[tokio::test]
async fn test_existing_template_without_overwrite_conflicts() {
    let (server, session) = setup().await;
    mount_template(&server, "idle.vm", "alteon").await;

    let err = session
        .upload_template("idle.vm", Bytes::from_static(b"x"), UploadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[tokio::test]
async fn test_invalid_velocity_source_carries_detail() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/template/broken.vm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/template"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Encountered \"#end\" at line 3" })),
        )
        .mount(&server)
        .await;

    let err = session
        .upload_template("broken.vm", Bytes::from_static(b"#end"), UploadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidParameters { .. }));
    assert_eq!(err.detail(), Some("Encountered \"#end\" at line 3"));
}

#[tokio::test]
async fn test_upload_check_mode_sends_nothing() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/template/idle.vm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = session
        .upload_template(
            "idle.vm",
            Bytes::from_static(b"x"),
            UploadOptions {
                overwrite: false,
                check_mode: true,
            },
        )
        .await
        .unwrap();

    assert!(!outcome.changed);
}

// ── Workflow archive uploads ────────────────────────────────────────

#[tokio::test]
async fn test_workflow_archive_replaces_existing_template() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflowTemplate/idle_tmpl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "idle_tmpl" })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/workflowTemplate/idle_tmpl/archive"))
        .and(header("content-type", "application/x-zip-compressed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let archive = WorkflowArchive {
        name: "idle_tmpl".into(),
        data: Bytes::from_static(b"PK\x03\x04"),
    };
    let outcome = session
        .upload_workflow_archive(
            archive,
            UploadOptions {
                overwrite: true,
                check_mode: false,
            },
        )
        .await
        .unwrap();

    assert!(outcome.changed);
}

#[tokio::test]
async fn test_new_workflow_archive_is_posted() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflowTemplate/idle_tmpl"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/workflowTemplate"))
        .and(query_param("failIfInvalid", "true"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let archive = WorkflowArchive {
        name: "idle_tmpl".into(),
        data: Bytes::from_static(b"PK\x03\x04"),
    };
    let outcome = session
        .upload_workflow_archive(archive, UploadOptions::default())
        .await
        .unwrap();

    assert!(outcome.changed);
}

// ── Workflows ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_action_polls_until_complete() {
    let (server, session) = setup().await;
    let status_uri = format!("{}/api/status?token=42", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/workflow/idle/action/update_idle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [],
            "properties": [{ "name": "idle_timeout", "type": "int" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/workflow/idle/action/update_idle"))
        .and(body_json(json!({ "parameters": { "idle_timeout": 300 } })))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({ "uri": status_uri, "complete": false })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "complete": false })))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "complete": true,
            "success": true,
            "messages": ["idle timeout updated"],
            "duration": 1.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session
        .run_action("idle", "update_idle", values(json!({ "idle_timeout": "300" })), sync())
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.complete, Some(true));
    assert_eq!(outcome.duration, Some(1.5));
    assert_eq!(outcome.log, vec!["idle timeout updated".to_string()]);
}

async fn mount_update_idle_schema(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/workflow/idle/action/update_idle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [],
            "properties": [{ "name": "idle_timeout", "type": "int" }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_action_complete_on_acceptance_is_not_polled() {
    let (server, session) = setup().await;
    mount_update_idle_schema(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/workflow/idle/action/update_idle"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "complete": true,
            "success": true,
            "messages": ["done"],
            "duration": 1.5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = session
        .run_action("idle", "update_idle", values(json!({ "idle_timeout": 300 })), sync())
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.complete, Some(true));
    assert_eq!(outcome.duration, Some(1.5));
    assert_eq!(outcome.log, vec!["done".to_string()]);
}

#[tokio::test]
async fn test_failed_status_poll_fails_the_operation() {
    let (server, session) = setup().await;
    mount_update_idle_schema(&server).await;
    let status_uri = format!("{}/api/status?token=13", server.uri());

    Mock::given(method("POST"))
        .and(path("/api/workflow/idle/action/update_idle"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({ "uri": status_uri, "complete": false })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("status store unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = session
        .run_action("idle", "update_idle", values(json!({ "idle_timeout": 300 })), sync())
        .await
        .unwrap_err();

    match err {
        CoreError::Service { status, body, .. } => {
            assert_eq!(status, Some(500));
            assert!(body.unwrap().contains("status store unavailable"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_async_operation_carries_log() {
    let (server, session) = setup().await;
    let status_uri = format!("{}/api/status?token=7", server.uri());

    Mock::given(method("DELETE"))
        .and(path("/api/workflow/idle"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "uri": status_uri })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "complete": true,
            "success": false,
            "messages": ["device adc1 unreachable"],
            "duration": 0.4
        })))
        .mount(&server)
        .await;

    let err = session.delete_workflow("idle", sync()).await.unwrap_err();

    match err {
        CoreError::OperationFailed { log, duration, .. } => {
            assert_eq!(log, vec!["device adc1 unreachable".to_string()]);
            assert_eq!(duration, Some(0.4));
        }
        other => panic!("expected operation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fire_and_forget_does_not_poll() {
    let (server, session) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/workflow/idle"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "uri": format!("{}/api/status?token=1", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let options = WorkflowOptions {
        completion: Completion::FireAndForget,
        check_mode: false,
    };
    let outcome = session.delete_workflow("idle", options).await.unwrap();

    assert_eq!(outcome.complete, Some(false));
}

#[tokio::test]
async fn test_create_workflow_binds_device_roles() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflowTemplate/idle_tmpl/action/createWorkflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{ "name": "adc", "maxLength": 1 }],
            "properties": [{ "name": "idle_timeout", "type": "int", "defaultValue": 60 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/workflowTemplate/idle_tmpl"))
        .and(query_param("name", "idle"))
        .and(body_json(json!({
            "parameters": {},
            "deviceConnections": { "adc": [{ "deviceId": { "name": "adc1" } }] }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session
        .create_workflow("idle_tmpl", "idle", values(json!({ "adc": "adc1" })), sync())
        .await
        .unwrap();

    assert!(outcome.changed);
}

#[tokio::test]
async fn test_existing_workflow_conflicts() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflowTemplate/idle_tmpl/action/createWorkflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "properties": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/workflowTemplate/idle_tmpl"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = session
        .create_workflow("idle_tmpl", "idle", Map::new(), sync())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Conflict { ref identifier, .. } if identifier == "idle"));
}

#[tokio::test]
async fn test_workflow_check_mode_validates_without_submitting() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflow/idle/action/update_idle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": [{ "name": "idle_timeout", "type": "int" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let options = WorkflowOptions {
        check_mode: true,
        ..sync()
    };

    let outcome = session
        .run_action("idle", "update_idle", values(json!({ "idle_timeout": 10 })), options)
        .await
        .unwrap();
    assert!(!outcome.changed);

    let err = session
        .run_action("idle", "update_idle", values(json!({ "idle": 10 })), options)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidParameters { .. }));
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflow/idle/action/reboot"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = session
        .describe_workflow(WorkflowTarget::Action {
            workflow: "idle",
            action: "reboot",
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotFound { ref identifier, .. } if identifier == "reboot"));
}

#[tokio::test]
async fn test_describe_workflow_lists_device_roles() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/workflowTemplate/idle_tmpl/action/createWorkflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{ "name": "adcs", "maxLength": 2 }],
            "properties": [{ "name": "idle_timeout", "type": "int", "prompt": "Idle timeout" }]
        })))
        .mount(&server)
        .await;

    let outcome = session
        .describe_workflow(WorkflowTarget::Create {
            template: "idle_tmpl",
        })
        .await
        .unwrap();

    assert_eq!(
        outcome.usage,
        Some(json!({
            "adcs": { "type": "list", "required": true },
            "idle_timeout": { "type": "int", "required": true, "prompt": "Idle timeout" }
        }))
    );
}

// ── Template execution ──────────────────────────────────────────────

#[tokio::test]
async fn test_alteon_template_change_is_detected_by_diff() {
    let (server, session) = setup().await;
    mount_template(&server, "vip.vm", "alteon").await;

    Mock::given(method("GET"))
        .and(path("/api/adc/adc1/config"))
        .and(query_param("diff", "cur"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/adc/adc1/config"))
        .and(query_param("diff", "cur"))
        .respond_with(ResponseTemplate::new(200).set_body_string("/c/slb/virt 1\n\tena"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/template/vip.vm"))
        .and(body_json(json!({
            "parameters": { "vip": "10.0.0.1" },
            "deviceConnections": { "adc": [{ "deviceId": { "name": "adc1" } }] }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "parameters": { "status": "created" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let device = DeviceTarget::new(DeviceFamily::Alteon, "adc1");
    let outcome = session
        .run_template(
            "vip.vm",
            &device,
            values(json!({ "vip": "10.0.0.1" })),
            TemplateOptions::default(),
        )
        .await
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.facts.unwrap()["status"], json!("created"));
}

#[tokio::test]
async fn test_identical_diff_snapshots_report_unchanged() {
    let (server, session) = setup().await;
    mount_template(&server, "vip.vm", "alteon").await;

    Mock::given(method("GET"))
        .and(path("/api/adc/adc1/config"))
        .respond_with(ResponseTemplate::new(200).set_body_string("/c/slb/virt 1"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/template/vip.vm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let device = DeviceTarget::new(DeviceFamily::Alteon, "adc1");
    let outcome = session
        .run_template(
            "vip.vm",
            &device,
            values(json!({ "vip": "10.0.0.1" })),
            TemplateOptions::default(),
        )
        .await
        .unwrap();

    assert!(!outcome.changed);
    assert!(outcome.facts.is_none());
}

#[tokio::test]
async fn test_defensepro_check_mode_is_a_dry_run() {
    let (server, session) = setup().await;
    mount_template(&server, "policy.vm", "defensePro").await;

    Mock::given(method("POST"))
        .and(path("/api/template/policy.vm"))
        .and(body_json(json!({
            "parameters": { "vip": "10.0.0.1" },
            "deviceConnections": { "adc": [{ "deviceId": { "name": "dp1" } }] },
            "dryRun": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cliOutput": "ok",
            "generatedScript": "/c/sys/access",
            "parameters": {}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/defensePro/dp1/device"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let device = DeviceTarget::new(DeviceFamily::DefensePro, "dp1");
    let outcome = session
        .run_template(
            "policy.vm",
            &device,
            values(json!({ "vip": "10.0.0.1" })),
            TemplateOptions {
                check_mode: true,
                commit: true,
            },
        )
        .await
        .unwrap();

    assert!(!outcome.changed);
    let facts = outcome.facts.unwrap();
    assert_eq!(facts["generatedScript"], json!("/c/sys/access"));
    assert_eq!(facts["sent_params"]["dryRun"], json!(true));
}

#[tokio::test]
async fn test_defensepro_run_is_assumed_changed() {
    let (server, session) = setup().await;
    mount_template(&server, "policy.vm", "defensepro").await;

    Mock::given(method("POST"))
        .and(path("/api/template/policy.vm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let device = DeviceTarget::new(DeviceFamily::DefensePro, "dp1");
    let outcome = session
        .run_template(
            "policy.vm",
            &device,
            values(json!({ "vip": "10.0.0.1" })),
            TemplateOptions::default(),
        )
        .await
        .unwrap();

    assert!(outcome.changed);
}

#[tokio::test]
async fn test_appwall_template_is_unsupported_before_any_request() {
    let (server, session) = setup().await;

    let device = DeviceTarget::new(DeviceFamily::AppWall, "aw1");
    let err = session
        .run_template("waf.vm", &device, Map::new(), TemplateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Unsupported { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_template_device_type_mismatch() {
    let (server, session) = setup().await;
    mount_template(&server, "vip.vm", "alteon").await;

    let device = DeviceTarget::new(DeviceFamily::DefensePro, "dp1");
    let err = session
        .run_template(
            "vip.vm",
            &device,
            values(json!({ "vip": "10.0.0.1" })),
            TemplateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Schema { .. }));
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_commit_without_pending_changes_is_unchanged() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/adc/adc1/device"))
        .and(query_param("action", "commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "commitNeeded": false })))
        .expect(1)
        .mount(&server)
        .await;

    let device = DeviceTarget::new(DeviceFamily::Alteon, "adc1");
    let outcome = session.commit(&device, false).await.unwrap();

    assert!(!outcome.changed);
}

#[tokio::test]
async fn test_commit_uses_family_path_segment() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/appWall/aw1/device"))
        .and(query_param("action", "commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "commitNeeded": true })))
        .expect(1)
        .mount(&server)
        .await;

    let device = DeviceTarget::new(DeviceFamily::AppWall, "aw1");
    let outcome = session.commit(&device, false).await.unwrap();

    assert!(outcome.changed);
}

#[tokio::test]
async fn test_diff_is_alteon_only() {
    let (_server, session) = setup().await;

    let device = DeviceTarget::new(DeviceFamily::DefensePro, "dp1");
    let err = session.config_diff(&device).await.unwrap_err();

    assert!(matches!(err, CoreError::Unsupported { .. }));
}

#[tokio::test]
async fn test_describe_template_reports_device_type() {
    let (server, session) = setup().await;
    mount_template(&server, "policy.vm", "defensePro").await;

    let outcome = session.describe_template("policy.vm").await.unwrap();

    let facts = outcome.facts.unwrap();
    assert_eq!(facts["device_type"], json!("defensePro"));
    assert_eq!(facts["device_role"], json!("adc"));
    assert_eq!(
        outcome.usage.unwrap()["port"],
        json!({ "type": "int", "required": false, "default": 80 })
    );
}
