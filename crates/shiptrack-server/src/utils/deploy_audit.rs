/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Audits freshly recorded deploys and queues alerts for the ones that fail.
//!
//! Gathers the history [`audit_deploy`] needs from the DAL, applies the
//! configured region filter, and enqueues one [`DeployAlertJob`] per alert.

use crate::dal::{DalError, DAL};
use shiptrack_models::audit::{audit_deploy, DeployAudit};
use shiptrack_models::models::deploy_alert_jobs::{
    DeployAlertJob, DeployAlertPayload, NewDeployAlertJob,
};
use shiptrack_models::models::deploys::Deploy;
use shiptrack_utils::config::Alerts;
use shiptrack_utils::logging::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    Dal(#[from] DalError),
    #[error("failed to build alert job: {0}")]
    Payload(String),
}

/// The outcome of auditing one deploy.
#[derive(Debug)]
pub enum AuditOutcome {
    /// Alerts are disabled or the deploy's region is not audited.
    Skipped,
    /// The deploy passed.
    Passed,
    /// The deploy failed and an alert job was queued.
    Alerted(DeployAlertJob),
}

/// Audits `deploy` against its history and enqueues an alert if needed.
pub fn audit_recorded_deploy(
    dal: &DAL,
    alerts: &Alerts,
    deploy: &Deploy,
) -> Result<AuditOutcome, AuditError> {
    if !alerts.enabled || !alerts.audits_region(deploy.region.as_deref()) {
        debug!(
            "Skipping audit of deploy {} ({} in region {:?})",
            deploy.id, deploy.app_name, deploy.region
        );
        return Ok(AuditOutcome::Skipped);
    }

    let deploys = dal.deploys();
    let previous = deploys.previous_for(deploy)?;

    let (approved, version_first_deployed_at) = match deploy.version.as_deref() {
        Some(version) => (
            dal.tickets().is_version_approved(version)?,
            deploys.first_deployed_at(version, deploy)?,
        ),
        None => (false, None),
    };
    let previous_version_first_deployed_at = match previous.as_ref().and_then(|p| p.version.as_deref()) {
        Some(version) => deploys.first_deployed_at(version, deploy)?,
        None => None,
    };

    let message = audit_deploy(&DeployAudit {
        deploy,
        previous: previous.as_ref(),
        version_first_deployed_at,
        previous_version_first_deployed_at,
        approved,
    });

    let Some(message) = message else {
        return Ok(AuditOutcome::Passed);
    };

    info!(
        "Deploy {} of {} to {} flagged: {}",
        deploy.id, deploy.app_name, deploy.server, message
    );
    let payload = DeployAlertPayload::new(deploy, previous.as_ref(), message);
    let job = NewDeployAlertJob::new(&payload).map_err(AuditError::Payload)?;
    Ok(AuditOutcome::Alerted(dal.deploy_alert_jobs().enqueue(&job)?))
}
