/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Test fixture for the shiptrack integration tests.
//!
//! Each fixture owns a single-connection pool whose connection sits inside a
//! test transaction, so nothing a test writes is ever committed. Requires
//! `DATABASE_URL` (the server URL; the database name comes from settings).

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::Connection;
use diesel_migrations::MigrationHarness;
use dotenv::dotenv;
use serde_json::Value;
use shiptrack_models::models::api_tokens::{ApiToken, NewApiToken};
use shiptrack_models::models::deploys::{Deploy, NewDeploy};
use shiptrack_models::models::tickets::{NewTicket, Ticket};
use shiptrack_server::api::{self, AppState};
use shiptrack_server::cli::commands::MIGRATIONS;
use shiptrack_server::dal::DAL;
use shiptrack_server::db::create_shared_connection_pool;
use shiptrack_server::metrics::MetricsCollector;
use shiptrack_server::utils::pak::PakService;
use shiptrack_utils::Settings;
use std::env;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestFixture {
    pub dal: DAL,
    pub pak: Arc<PakService>,
    pub metrics: Arc<MetricsCollector>,
    pub settings: Settings,
    /// Admin key valid for the lifetime of the fixture.
    pub admin_pak: String,
}

impl TestFixture {
    /// Connects, opens the test transaction, runs migrations inside it and
    /// creates an admin key.
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is unset or the database is unreachable.
    pub fn new() -> Self {
        dotenv().ok();
        let settings = Settings::new(None).expect("Failed to load settings");
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        // One connection, so every DAL call lands in the same transaction.
        let pool = create_shared_connection_pool(&database_url, &settings.database.name, 1)
            .expect("Failed to create connection pool");
        {
            let mut conn = pool.get().expect("Failed to get DB connection");
            conn.begin_test_transaction()
                .expect("Failed to start test transaction");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("Failed to run migrations");
        }

        let dal = DAL::new(pool);
        let pak = Arc::new(PakService::new(&settings.pak).expect("Failed to build PAK service"));
        let (admin_pak, admin_hash) = pak.generate().expect("Failed to generate admin PAK");
        dal.admin()
            .set_pak_hash(&admin_hash)
            .expect("Failed to store admin PAK");

        TestFixture {
            dal,
            pak,
            metrics: Arc::new(MetricsCollector::new().expect("Failed to build metrics")),
            settings,
            admin_pak,
        }
    }

    pub fn create_test_router(&self) -> Router {
        let state = AppState {
            dal: self.dal.clone(),
            pak: self.pak.clone(),
            metrics: self.metrics.clone(),
            alerts: Arc::new(self.settings.alerts.clone()),
        };
        api::configure_api_routes(state.clone(), &self.settings.cors).with_state(state)
    }

    /// Creates an API token, returning it with its plaintext key.
    pub fn create_token(&self, source: &str) -> (ApiToken, String) {
        let (key, hash) = self.pak.generate().expect("Failed to generate PAK");
        let token = NewApiToken::new(unique("token"), source.to_string(), hash)
            .expect("Failed to build token");
        let token = self
            .dal
            .api_tokens()
            .create(&token)
            .expect("Failed to create token");
        (token, key)
    }

    pub fn insert_deploy(
        &self,
        app_name: &str,
        server: &str,
        version: Option<&str>,
        at: DateTime<Utc>,
    ) -> Deploy {
        let new_deploy = NewDeploy::new(
            app_name.to_string(),
            server.to_string(),
            version.map(str::to_string),
            Some("dev@example.com".to_string()),
            Some("gb".to_string()),
            at,
        )
        .expect("Failed to build deploy");
        self.dal
            .deploys()
            .create(&new_deploy)
            .expect("Failed to create deploy")
    }

    pub fn approve_version(&self, version: &str) -> Ticket {
        let ticket = NewTicket::new(
            unique("TICKET"),
            format!("Release {}", version),
            String::new(),
            "done".to_string(),
            Some(Utc::now()),
            vec![version.to_string()],
            Utc::now(),
        )
        .expect("Failed to build ticket");
        self.dal
            .tickets()
            .upsert(&ticket)
            .expect("Failed to create ticket")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A name no other test will use.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// `minutes` after a fixed base time.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 2, 19, 16, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Sends a request and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    pak: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(pak) = pak {
        builder = builder.header("Authorization", pak);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
