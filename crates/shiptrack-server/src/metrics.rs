/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Metrics Module
//!
//! Prometheus metrics for the shiptrack server.
//!
//! The collector owns its registry and is shared through `AppState`. The
//! GitHub rate-limit gauge is updated and rendered under one lock, so an
//! export never interleaves with an ingestion; concurrent reports resolve as
//! last write wins.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use shiptrack_utils::logging::prelude::*;
use std::sync::Mutex;
use utoipa::ToSchema;

/// Response header GitHub uses to report the remaining request budget.
pub const GITHUB_RATE_LIMIT_HEADER: &str = "x-ratelimit-remaining";

/// A metrics report posted by a GitHub client.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GithubMetricsReport {
    /// Remaining requests in the current rate-limit window.
    pub github_rate_limit_requests_remaining: Option<i64>,
}

pub struct MetricsCollector {
    registry: Registry,
    github_rate_limit_remaining: Mutex<IntGauge>,
    http_requests_total: IntCounterVec,
}

impl MetricsCollector {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let gauge = IntGauge::new(
            "github_rate_limit_requests_remaining",
            "Requests remaining in the current GitHub API rate-limit window",
        )?;
        registry.register(Box::new(gauge.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "shiptrack_http_requests_total",
                "Total number of HTTP requests by method and status",
            ),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(MetricsCollector {
            registry,
            github_rate_limit_remaining: Mutex::new(gauge),
            http_requests_total,
        })
    }

    /// Ingests a JSON-encoded [`GithubMetricsReport`].
    ///
    /// A report without a remaining count leaves the gauge unchanged.
    pub fn ingest(&self, json: &str) -> Result<(), serde_json::Error> {
        let report: GithubMetricsReport = serde_json::from_str(json)?;
        self.ingest_report(&report);
        Ok(())
    }

    pub fn ingest_report(&self, report: &GithubMetricsReport) {
        if let Some(remaining) = report.github_rate_limit_requests_remaining {
            let gauge = self
                .github_rate_limit_remaining
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            gauge.set(remaining);
        }
    }

    /// Records the rate-limit header of a GitHub API response, if present.
    pub fn observe_github_headers(&self, headers: &HeaderMap) {
        let remaining = headers
            .get(GITHUB_RATE_LIMIT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok());

        match remaining {
            Some(remaining) => self.ingest_report(&GithubMetricsReport {
                github_rate_limit_requests_remaining: Some(remaining),
            }),
            None => debug!("GitHub response carried no usable rate-limit header"),
        }
    }

    pub fn record_http_request(&self, method: &str, status: u16) {
        self.http_requests_total
            .with_label_values(&[method, &status.to_string()])
            .inc();
    }

    /// Renders all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let _guard = self
            .github_rate_limit_remaining
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
