/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, unique, TestFixture};
use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use shiptrack_models::models::api_tokens::SOURCE_SNAPSHOT;

#[tokio::test]
#[serial]
async fn test_repo_ownership_roundtrip() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let app_name = unique("app");
    let uri = format!("/api/v1/repo-ownerships/{}", app_name);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(fixture.admin_pak.as_str()),
        Some(json!({
            "repo_owners": ["owner@example.com, lead@example.com"],
            "repo_approvers": ["approver@example.com"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["repo_owners"], json!(["owner@example.com", "lead@example.com"]));

    let (_, key) = fixture.create_token(SOURCE_SNAPSHOT);
    let (status, body) = send(&app, Method::GET, &uri, Some(key.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["app_name"], app_name.as_str());
    assert_eq!(body["repo_approvers"], json!(["approver@example.com"]));

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/repo-ownerships/{}", unique("missing")),
        Some(key.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_repo_ownership_writes_are_guarded() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let (_, key) = fixture.create_token(SOURCE_SNAPSHOT);
    let uri = format!("/api/v1/repo-ownerships/{}", unique("app"));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(key.as_str()),
        Some(json!({"repo_owners": ["owner@example.com"]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(fixture.admin_pak.as_str()),
        Some(json!({"repo_owners": ["not-an-email"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["repo_owners"].as_array().unwrap().len(), 1);
    assert!(body["errors"]["repo_approvers"].is_null());
}

#[tokio::test]
#[serial]
async fn test_tickets_are_searchable() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let key = unique("FIN");
    let marker = unique("ledger").replace('-', "");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/tickets/{}", key),
        Some(fixture.admin_pak.as_str()),
        Some(json!({
            "summary": format!("Invoices for {}", marker),
            "status": "Done",
            "approved_at": "2019-02-19T15:00:00Z",
            "versions": ["v42"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], key.as_str());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/tickets/search?q=invoice%20{}", marker),
        Some(fixture.admin_pak.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["key"], key.as_str());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/tickets/search?q=%20%20",
        Some(fixture.admin_pak.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
#[serial]
async fn test_ticket_without_status_is_rejected() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/tickets/{}", unique("FIN")),
        Some(fixture.admin_pak.as_str()),
        Some(json!({"status": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ticket status cannot be empty");
}

#[tokio::test]
#[serial]
async fn test_event_count_watermark() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let snapshot = unique("snapshot");
    let uri = format!("/api/v1/event-counts/{}", snapshot);

    for event_id in [10, 25] {
        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(fixture.admin_pak.as_str()),
            Some(json!({ "event_id": event_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event_id"], event_id);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/event-counts",
        Some(fixture.admin_pak.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["snapshot_name"] == snapshot.as_str())
        .collect();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0]["event_id"], 25);
}

#[tokio::test]
#[serial]
async fn test_git_repository_locations() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let name = unique("app");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/git-repository-locations/{}", name),
        Some(fixture.admin_pak.as_str()),
        Some(json!({
            "uri": "https://github.com/example/app.git",
            "remote_head": "abc123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], name.as_str());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/git-repository-locations",
        Some(fixture.admin_pak.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l["name"] == name.as_str() && l["remote_head"] == "abc123"));
}
