/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy auditing.
//!
//! Decides whether a newly recorded deploy warrants an alert. The caller
//! gathers the history (previous deploy, first-seen times, ticket approval)
//! and this module applies the rules in order, returning the first message
//! that matches.

use crate::models::deploys::Deploy;
use chrono::{DateTime, Utc};

/// Everything the auditor needs to judge one deploy.
#[derive(Debug, Clone)]
pub struct DeployAudit<'a> {
    /// The deploy being audited.
    pub deploy: &'a Deploy,
    /// The deploy it replaced on the same server and app.
    pub previous: Option<&'a Deploy>,
    /// When the new deploy's version was first deployed to this server and
    /// app, counting only deploys before this one.
    pub version_first_deployed_at: Option<DateTime<Utc>>,
    /// When the previous deploy's version was first deployed to this server and app.
    pub previous_version_first_deployed_at: Option<DateTime<Utc>>,
    /// Whether an approved ticket covers the new version.
    pub approved: bool,
}

/// Returns an alert message for the deploy, or `None` when it is fine.
///
/// Redeploying the version that is already live produces no alert.
pub fn audit_deploy(audit: &DeployAudit<'_>) -> Option<String> {
    let version = match audit.deploy.version.as_deref() {
        Some(version) => version,
        None => return Some("Deploy failed: no version was reported.".to_string()),
    };

    if let Some(previous) = audit.previous {
        let previous_version = previous.version.as_deref();
        if previous_version == Some(version) {
            return None;
        }

        if let (Some(prev), Some(new_first), Some(prev_first)) = (
            previous_version,
            audit.version_first_deployed_at,
            audit.previous_version_first_deployed_at,
        ) {
            if new_first < prev_first {
                return Some(format!("Old release deployed. Was {}, now {}.", prev, version));
            }
        }
    }

    if !audit.approved {
        return Some(format!(
            "Release not authorised; no approved ticket covers version {}.",
            version
        ));
    }

    None
}
