/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{send, TestFixture};
use axum::http::{Method, StatusCode};
use serial_test::serial;
use shiptrack_models::models::api_tokens::SOURCE_SNAPSHOT;

#[tokio::test]
#[serial]
async fn test_admin_pak_resolves_to_admin() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();

    let (status, body) = send(&app, Method::POST, "/api/v1/auth/pak", Some(fixture.admin_pak.as_str()), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"], true);
    assert!(body["token_id"].is_null());
}

#[tokio::test]
#[serial]
async fn test_token_pak_resolves_to_token() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let (token, key) = fixture.create_token(SOURCE_SNAPSHOT);

    let bearer = format!("Bearer {}", key);
    let (status, body) = send(&app, Method::POST, "/api/v1/auth/pak", Some(bearer.as_str()), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"], false);
    assert_eq!(body["token_id"], token.id.to_string());
    assert_eq!(body["source"], SOURCE_SNAPSHOT);
}

#[tokio::test]
#[serial]
async fn test_token_query_parameter() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();
    let (_, key) = fixture.create_token(SOURCE_SNAPSHOT);

    let uri = format!("/api/v1/auth/pak?token={}", key);
    let (status, _) = send(&app, Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_invalid_and_deleted_keys_are_rejected() {
    let fixture = TestFixture::new();
    let app = fixture.create_test_router();

    let (status, _) = send(&app, Method::POST, "/api/v1/auth/pak", Some("shiptrack_nope_nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, key) = fixture.create_token(SOURCE_SNAPSHOT);
    fixture.dal.api_tokens().soft_delete(token.id).unwrap();
    let (status, _) = send(&app, Method::POST, "/api/v1/auth/pak", Some(key.as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
