/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, unique, TestFixture};
use async_trait::async_trait;
use diesel::sql_types::Text;
use diesel::RunQueryDsl;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use serial_test::serial;
use shiptrack_models::models::api_tokens::{SOURCE_DEPLOY, SOURCE_SNAPSHOT};
use shiptrack_models::models::deploy_alert_jobs::{JOB_STATUS_PENDING, JOB_STATUS_SUCCESS};
use shiptrack_models::models::repo_ownerships::NewRepoOwnership;
use shiptrack_server::notifications::email::{Email, EmailRenderer};
use shiptrack_server::notifications::mailer::{LogMailer, Mailer};
use shiptrack_server::notifications::{AlertNotifier, NotifyError};
use shiptrack_server::utils::background_tasks::{process_pending_alerts, AlertWorkerConfig};
use std::sync::Arc;
use uuid::Uuid;

struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &Email) -> Result<(), NotifyError> {
        Err(NotifyError::Status {
            status: 503,
            body: "relay unavailable".into(),
        })
    }
}

fn notifier(mailer: Arc<dyn Mailer>) -> AlertNotifier {
    AlertNotifier::new(
        mailer,
        EmailRenderer::new("alerts@example.com").unwrap(),
        None,
        "#deploys",
        "https://shiptrack.example.com/releases",
    )
}

fn deploy_event(app: &str, server: &str, version: &str, at: &str) -> Value {
    json!({
        "app_name": app,
        "server": server,
        "version": version,
        "deployed_by": "dev@example.com",
        "region": "GB",
        "event_created_at": at,
    })
}

#[tokio::test]
#[serial]
async fn test_unapproved_deploy_queues_alert() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let (_, key) = fixture.create_token(SOURCE_DEPLOY);
    let server = unique("server");
    let version = unique("v");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/events/deploy",
        Some(key.as_str()),
        Some(deploy_event("api", &server, &version, "2019-02-19T16:29:00Z")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["deploy"]["region"], "gb");
    assert_eq!(
        body["alert"],
        format!("Release not authorised; no approved ticket covers version {}.", version)
    );

    let job_id: Uuid = body["alert_job_id"].as_str().unwrap().parse().unwrap();
    let job = fixture.dal.deploy_alert_jobs().get(job_id).unwrap().unwrap();
    assert_eq!(job.status, JOB_STATUS_PENDING);
    let payload = job.decode_payload().unwrap();
    assert_eq!(payload.deploy.event_created_at, "2019-02-19T16:29:00Z");
    assert!(payload.previous.is_none());
}

#[tokio::test]
#[serial]
async fn test_approved_deploy_passes() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let server = unique("server");
    let version = unique("v");
    fixture.approve_version(&version);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/events/deploy",
        Some(fixture.admin_pak.as_str()),
        Some(deploy_event("api", &server, &version, "2019-02-19T16:29:00Z")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["alert"].is_null());
    assert!(body["alert_job_id"].is_null());
}

#[tokio::test]
#[serial]
async fn test_rollback_is_flagged() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let server = unique("server");
    let (old, new) = (unique("v"), unique("v"));
    fixture.approve_version(&old);
    fixture.approve_version(&new);

    for (version, at) in [
        (&old, "2019-02-19T16:00:00Z"),
        (&new, "2019-02-19T16:10:00Z"),
    ] {
        send(
            &app,
            Method::POST,
            "/api/v1/events/deploy",
            Some(fixture.admin_pak.as_str()),
            Some(deploy_event("api", &server, version, at)),
        )
        .await;
    }

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/events/deploy",
        Some(fixture.admin_pak.as_str()),
        Some(deploy_event("api", &server, &old, "2019-02-19T16:20:00Z")),
    )
    .await;

    assert_eq!(
        body["alert"],
        format!("Old release deployed. Was {}, now {}.", new, old)
    );
}

#[tokio::test]
#[serial]
async fn test_deploy_events_need_deploy_source() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let (_, key) = fixture.create_token(SOURCE_SNAPSHOT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/events/deploy",
        Some(key.as_str()),
        Some(deploy_event("api", "server", "v1", "2019-02-19T16:29:00Z")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/events/deploy",
        Some(fixture.admin_pak.as_str()),
        Some(deploy_event("  ", "server", "v1", "2019-02-19T16:29:00Z")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Deploy app_name cannot be empty");
}

async fn queue_alert(fixture: &TestFixture, app_name: &str) -> Uuid {
    let app = fixture.create_test_router();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/events/deploy",
        Some(fixture.admin_pak.as_str()),
        Some(deploy_event(app_name, &unique("server"), &unique("v"), "2019-02-19T16:29:00Z")),
    )
    .await;
    body["alert_job_id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[serial]
async fn test_worker_delivers_alert() {
    let fixture = TestFixture::new();
    let job_id = queue_alert(&fixture, "api").await;

    let processed = process_pending_alerts(
        &fixture.dal,
        &notifier(Arc::new(LogMailer)),
        &AlertWorkerConfig::default(),
    )
    .await;

    assert_eq!(processed, 1);
    let job = fixture.dal.deploy_alert_jobs().get(job_id).unwrap().unwrap();
    assert_eq!(job.status, JOB_STATUS_SUCCESS);
    assert!(job.completed_at.is_some());
}

#[tokio::test]
#[serial]
async fn test_worker_reschedules_failed_delivery() {
    let fixture = TestFixture::new();
    let job_id = queue_alert(&fixture, "api").await;
    let config = AlertWorkerConfig {
        max_retries: 3,
        ..AlertWorkerConfig::default()
    };
    let failing = notifier(Arc::new(FailingMailer));

    assert_eq!(process_pending_alerts(&fixture.dal, &failing, &config).await, 1);
    let job = fixture.dal.deploy_alert_jobs().get(job_id).unwrap().unwrap();
    assert_eq!(job.status, JOB_STATUS_PENDING);
    assert_eq!(job.attempts, 1);
    assert!(job.last_error.unwrap().contains("503"));

    // Not due again until the backoff expires.
    assert_eq!(process_pending_alerts(&fixture.dal, &failing, &config).await, 0);
}

#[tokio::test]
#[serial]
async fn test_worker_reschedules_when_owners_unreadable() {
    let fixture = TestFixture::new();
    let app_name = unique("app");
    let ownership = NewRepoOwnership::new(
        app_name.clone(),
        vec!["owner@example.com".to_string()],
        vec![],
    )
    .unwrap();
    fixture.dal.repo_ownerships().upsert(&ownership).unwrap();

    // An infinite timestamp has no chrono equivalent, so loading the row fails.
    let mut conn = fixture.dal.pool.get().unwrap();
    diesel::sql_query("UPDATE repo_ownerships SET updated_at = 'infinity' WHERE app_name = $1")
        .bind::<Text, _>(&app_name)
        .execute(&mut conn)
        .unwrap();
    drop(conn);
    assert!(fixture.dal.repo_ownerships().get(&app_name).is_err());

    let job_id = queue_alert(&fixture, &app_name).await;
    let config = AlertWorkerConfig::default();
    let log_notifier = notifier(Arc::new(LogMailer));

    assert_eq!(process_pending_alerts(&fixture.dal, &log_notifier, &config).await, 1);
    let job = fixture.dal.deploy_alert_jobs().get(job_id).unwrap().unwrap();
    assert_eq!(job.status, JOB_STATUS_PENDING);
    assert_eq!(job.attempts, 1);
    assert!(job
        .last_error
        .unwrap()
        .contains("Failed to load repo owners"));

    // Backed off, so the next tick leaves it alone.
    assert_eq!(process_pending_alerts(&fixture.dal, &log_notifier, &config).await, 0);
}
