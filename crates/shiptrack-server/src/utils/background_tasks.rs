/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Background tasks for the shiptrack server.
//!
//! The alert worker drains the deploy alert queue; the cleanup task prunes
//! finished jobs. Both run on a fixed interval for the life of the process.

use crate::dal::DAL;
use crate::notifications::AlertNotifier;
use shiptrack_models::models::deploy_alert_jobs::{DeployAlertJob, JOB_STATUS_DEAD};
use shiptrack_utils::config::Alerts;
use shiptrack_utils::logging::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Configuration for the deploy alert worker.
#[derive(Debug, Clone)]
pub struct AlertWorkerConfig {
    /// How often to poll for due jobs (in seconds).
    pub interval_seconds: u64,
    /// Maximum number of jobs to process per poll.
    pub batch_size: i64,
    /// Attempts before a job is marked dead.
    pub max_retries: i32,
}

impl Default for AlertWorkerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 5,
            batch_size: 50,
            max_retries: 5,
        }
    }
}

impl From<&Alerts> for AlertWorkerConfig {
    fn from(alerts: &Alerts) -> Self {
        Self {
            interval_seconds: alerts.worker_interval_seconds.max(1),
            batch_size: alerts.batch_size,
            max_retries: alerts.max_retries,
        }
    }
}

/// Configuration for the alert job cleanup task.
#[derive(Debug, Clone)]
pub struct AlertCleanupConfig {
    /// How often to run the cleanup (in seconds).
    pub interval_seconds: u64,
    /// Days to retain finished jobs.
    pub retention_days: i64,
}

impl Default for AlertCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            retention_days: 7,
        }
    }
}

/// Tick period for a task interval, never shorter than one second.
fn tick_period(seconds: u64) -> Duration {
    Duration::from_secs(seconds.max(1))
}

/// Starts the deploy alert worker.
///
/// Every tick it fetches up to `batch_size` due jobs and delivers them one at
/// a time.
pub fn start_alert_worker_task(
    dal: DAL,
    notifier: Arc<AlertNotifier>,
    config: AlertWorkerConfig,
) -> JoinHandle<()> {
    info!(
        "Starting deploy alert worker (interval: {}s, batch_size: {})",
        config.interval_seconds, config.batch_size
    );

    tokio::spawn(async move {
        let mut ticker = interval(tick_period(config.interval_seconds));

        loop {
            ticker.tick().await;
            let processed = process_pending_alerts(&dal, &notifier, &config).await;
            if processed > 0 {
                debug!("Processed {} deploy alert jobs", processed);
            }
        }
    })
}

/// Processes one batch of due alert jobs. Returns how many were attempted.
pub async fn process_pending_alerts(
    dal: &DAL,
    notifier: &AlertNotifier,
    config: &AlertWorkerConfig,
) -> usize {
    let jobs = match dal.deploy_alert_jobs().get_pending(config.batch_size) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to fetch pending deploy alert jobs: {:?}", e);
            return 0;
        }
    };

    let count = jobs.len();
    for job in jobs {
        process_job(dal, notifier, config, job).await;
    }
    count
}

async fn process_job(
    dal: &DAL,
    notifier: &AlertNotifier,
    config: &AlertWorkerConfig,
    job: DeployAlertJob,
) {
    let payload = match job.decode_payload() {
        Ok(payload) => payload,
        Err(e) => {
            error!("Deploy alert job {} has an unreadable payload: {}", job.id, e);
            // Zero retries sends it straight to dead; a bad payload never heals.
            if let Err(e) = dal
                .deploy_alert_jobs()
                .mark_failed(job.id, &format!("Invalid payload: {}", e), 0)
            {
                error!("Failed to mark job {} as dead: {:?}", job.id, e);
            }
            return;
        }
    };

    let delivery = match dal.repo_ownerships().get(&payload.app_name) {
        Ok(ownership) => notifier
            .deliver(&payload, ownership.as_ref())
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(format!("Failed to load repo owners: {}", e)),
    };

    match delivery {
        Ok(()) => {
            if let Err(e) = dal.deploy_alert_jobs().mark_success(job.id) {
                error!("Failed to mark job {} as success: {:?}", job.id, e);
            } else {
                info!("Delivered deploy alert for {} (job {})", payload.app_name, job.id);
            }
        }
        Err(message) => record_failure(dal, &job, &message, config.max_retries),
    }
}

fn record_failure(dal: &DAL, job: &DeployAlertJob, message: &str, max_retries: i32) {
    match dal.deploy_alert_jobs().mark_failed(job.id, message, max_retries) {
        Ok(updated) if updated.status == JOB_STATUS_DEAD => warn!(
            "Deploy alert job {} dead after {} attempts: {}",
            job.id, updated.attempts, message
        ),
        Ok(updated) => debug!(
            "Deploy alert job {} failed (attempt {}), will retry: {}",
            job.id, updated.attempts, message
        ),
        Err(e) => error!("Failed to mark job {} as failed: {:?}", job.id, e),
    }
}

/// Starts the alert job cleanup task.
pub fn start_alert_cleanup_task(dal: DAL, config: AlertCleanupConfig) -> JoinHandle<()> {
    info!(
        "Starting deploy alert cleanup task (interval: {}s, retention: {}d)",
        config.interval_seconds, config.retention_days
    );

    tokio::spawn(async move {
        let mut ticker = interval(tick_period(config.interval_seconds));

        loop {
            ticker.tick().await;

            match dal.deploy_alert_jobs().cleanup_old(config.retention_days) {
                Ok(deleted) if deleted > 0 => {
                    info!("Cleaned up {} finished deploy alert jobs", deleted)
                }
                Ok(_) => {}
                Err(e) => error!("Failed to clean up deploy alert jobs: {:?}", e),
            }
        }
    })
}
