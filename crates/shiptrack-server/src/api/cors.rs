/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! CORS layer built from the `[cors]` settings.

use axum::http::{HeaderName, HeaderValue, Method};
use shiptrack_utils::config::Cors;
use shiptrack_utils::logging::prelude::*;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn cors_layer(config: &Cors) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.allowed_origins))
        .allow_methods(parse_all::<Method>(&config.allowed_methods, "method"))
        .allow_headers(parse_all::<HeaderName>(&config.allowed_headers, "header"))
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn allowed_origins(configured: &[String]) -> AllowOrigin {
    if configured.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>(configured, "origin"))
    }
}

/// Parses every entry, dropping (and logging) the ones that do not parse.
fn parse_all<T: std::str::FromStr>(values: &[String], what: &str) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Ignoring invalid CORS {} '{}'", what, value);
                None
            }
        })
        .collect()
}
