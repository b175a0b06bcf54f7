/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::{self, AppState};
use crate::dal::DAL;
use crate::db::{create_shared_connection_pool, ConnectionPool};
use crate::metrics::MetricsCollector;
use crate::notifications::AlertNotifier;
use crate::utils;
use crate::utils::background_tasks::{AlertCleanupConfig, AlertWorkerConfig};
use crate::utils::pak::PakService;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_query;
use diesel::sql_types::BigInt;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use shiptrack_models::models::api_tokens::NewApiToken;
use shiptrack_utils::config::Settings;
use shiptrack_utils::logging::prelude::*;
use std::error::Error;
use std::sync::Arc;
use tokio::signal;
use uuid::Uuid;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../shiptrack-models/migrations");

#[derive(QueryableByName, Debug)]
struct Count {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

fn connect(config: &Settings, max_size: u32) -> Result<ConnectionPool, Box<dyn Error>> {
    Ok(create_shared_connection_pool(
        &config.database.url,
        &config.database.name,
        max_size,
    )?)
}

/// Starts the shiptrack server.
///
/// Runs migrations, performs first-run setup, starts the alert worker and
/// serves the API until ctrl+c.
pub async fn serve(config: &Settings) -> Result<(), Box<dyn Error>> {
    info!("Starting shiptrack server");

    let connection_pool = connect(config, config.database.pool_size)?;
    info!("Database connection pool created successfully");

    let mut conn = connection_pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| format!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed successfully");

    let is_first_run = conn.transaction(|conn| {
        let result: Count =
            sql_query("SELECT COUNT(*) as count FROM app_initialization").get_result(conn)?;
        if result.count == 0 {
            sql_query("INSERT INTO app_initialization DEFAULT VALUES").execute(conn)?;
            Ok::<bool, DieselError>(true)
        } else {
            Ok::<bool, DieselError>(false)
        }
    })?;
    drop(conn);

    let dal = DAL::new(connection_pool);
    let pak = Arc::new(PakService::new(&config.pak)?);

    if is_first_run {
        info!("First time application startup detected. Creating admin role...");
        if let Some(key) = utils::first_startup(&dal, &pak, config)? {
            println!("Admin PAK: {}", key);
        }
    } else {
        info!("Existing application detected. Proceeding with normal startup.");
    }

    let metrics = Arc::new(MetricsCollector::new()?);
    let notifier = Arc::new(AlertNotifier::from_settings(config)?);

    utils::background_tasks::start_alert_worker_task(
        dal.clone(),
        notifier,
        AlertWorkerConfig::from(&config.alerts),
    );
    utils::background_tasks::start_alert_cleanup_task(
        dal.clone(),
        AlertCleanupConfig {
            retention_days: config.alerts.retention_days,
            ..AlertCleanupConfig::default()
        },
    );

    let state = AppState {
        dal,
        pak,
        metrics,
        alerts: Arc::new(config.alerts.clone()),
    };
    let app = api::configure_api_routes(state.clone(), &config.cors).with_state(state);

    let addr = config.server.bind_address.as_str();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
        }
        shutdown_tx.send(()).ok();
    });

    info!("Shiptrack is now running");
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown(shutdown_rx))
        .await?;

    Ok(())
}

/// Replaces the admin key and prints the new one.
///
/// A hash configured in `server.admin_pak_hash` takes precedence.
pub fn rotate_admin(config: &Settings) -> Result<(), Box<dyn Error>> {
    info!("Rotating admin key");

    let dal = DAL::new(connect(config, 1)?);
    let pak = PakService::new(&config.pak)?;

    match utils::upsert_admin(&dal, &pak, config)? {
        Some(key) => println!("New admin PAK: {}", key),
        None => println!("Admin PAK hash set from configuration"),
    }

    info!("Admin key rotated successfully");
    Ok(())
}

pub fn create_token(config: &Settings, name: String, source: String) -> Result<(), Box<dyn Error>> {
    info!("Creating API token: {}", name);

    let dal = DAL::new(connect(config, 1)?);
    let (key, pak_hash) = PakService::new(&config.pak)?.generate()?;

    let new_token = NewApiToken::new(name, source, pak_hash)
        .map_err(|e| format!("Failed to create token: {}", e))?;
    let token = dal.api_tokens().create(&new_token)?;

    info!("Successfully created token with ID: {}", token.id);
    println!("Token created successfully:");
    println!("ID: {}", token.id);
    println!("Name: {}", token.name);
    println!("Source: {}", token.source);
    println!("PAK: {}", key);

    Ok(())
}

pub fn rotate_token(config: &Settings, id: Uuid) -> Result<(), Box<dyn Error>> {
    info!("Rotating token key");

    let dal = DAL::new(connect(config, 1)?);
    let token = dal.api_tokens().get(id)?.ok_or("Token not found")?;

    let (key, pak_hash) = PakService::new(&config.pak)?.generate()?;
    dal.api_tokens().update_pak_hash(token.id, pak_hash)?;

    info!("Token key rotated successfully for token: {}", token.name);
    println!("New PAK for {}: {}", token.name, key);
    Ok(())
}
