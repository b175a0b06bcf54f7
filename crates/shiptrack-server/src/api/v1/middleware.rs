/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Authentication middleware for the shiptrack API v1.
//!
//! Callers present a prefixed API key (PAK) in the `Authorization` header,
//! optionally as `Bearer <pak>`, or in a `token` query parameter. The key is
//! checked against the admin role first and then against the active API
//! tokens.

use crate::api::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use shiptrack_utils::logging::prelude::*;
use utoipa::ToSchema;
use uuid::Uuid;

/// The identity resolved for an authenticated request.
#[derive(Clone, Debug)]
pub struct AuthPayload {
    /// Whether the caller holds the admin key.
    pub admin: bool,
    /// The API token the caller authenticated with, if not admin.
    pub token_id: Option<Uuid>,
    /// The source the token was issued for (`deploy`, `snapshot`, `metrics`).
    pub source: Option<String>,
}

impl AuthPayload {
    pub fn is_source(&self, source: &str) -> bool {
        self.source.as_deref() == Some(source)
    }
}

/// Response body describing the caller's identity.
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub admin: bool,
    pub token_id: Option<String>,
    pub source: Option<String>,
}

impl From<&AuthPayload> for AuthResponse {
    fn from(payload: &AuthPayload) -> Self {
        AuthResponse {
            admin: payload.admin,
            token_id: payload.token_id.map(|id| id.to_string()),
            source: payload.source.clone(),
        }
    }
}

/// Resolves the caller's PAK and stores an [`AuthPayload`] in the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let pak = match extract_pak(&request) {
        Some(pak) => pak,
        None => {
            warn!("Request to {} without credentials", request.uri().path());
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let auth_payload = verify_pak(&state, &pak)?;
    debug!(
        "Authenticated request (admin: {}, token: {:?})",
        auth_payload.admin, auth_payload.token_id
    );
    request.extensions_mut().insert(auth_payload);
    Ok(next.run(request).await)
}

/// Reads the PAK from the `Authorization` header or the `token` query parameter.
fn extract_pak(request: &Request<Body>) -> Option<String> {
    let from_header = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .filter(|value| !value.is_empty());
    if let Some(pak) = from_header {
        return Some(pak.to_string());
    }

    request.uri().query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    })
}

fn verify_pak(state: &AppState, pak: &str) -> Result<AuthPayload, StatusCode> {
    let admin_hash = state.dal.admin().pak_hash().map_err(|e| {
        error!("Failed to fetch admin role: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if let Some(admin_hash) = admin_hash {
        if state.pak.verify(pak, &admin_hash) {
            return Ok(AuthPayload {
                admin: true,
                token_id: None,
                source: None,
            });
        }
    }

    let tokens = state.dal.api_tokens().list().map_err(|e| {
        error!("Failed to fetch API tokens: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    for token in tokens {
        if state.pak.verify(pak, &token.pak_hash) {
            return Ok(AuthPayload {
                admin: false,
                token_id: Some(token.id),
                source: Some(token.source),
            });
        }
    }

    warn!("PAK verification failed");
    Err(StatusCode::UNAUTHORIZED)
}
