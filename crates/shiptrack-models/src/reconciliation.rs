/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy reconciliation.
//!
//! Selects the latest deploy per application on a server as of a cutoff and
//! annotates each with whether it matches an expected version. The database
//! performs the same selection with `DISTINCT ON`; these functions are the
//! in-memory form used by tests and by callers that already hold records.

use crate::models::deploys::Deploy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

/// A deploy with its correctness relative to an expected-version mapping.
///
/// `correct` is `None` when no mapping was supplied or the app is missing
/// from it; it is never defaulted to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeployStatus {
    #[serde(flatten)]
    pub deploy: Deploy,
    pub correct: Option<bool>,
}

/// Returns the latest deploy per `app_name` on `server` at or before `at`.
///
/// Latest means the largest `(event_created_at, id)` pair. The result is
/// ordered by `app_name`.
pub fn latest_per_app<'a, I>(records: I, server: &str, at: DateTime<Utc>) -> Vec<Deploy>
where
    I: IntoIterator<Item = &'a Deploy>,
{
    let mut latest: BTreeMap<&str, &Deploy> = BTreeMap::new();
    for deploy in records {
        if deploy.server != server || deploy.event_created_at > at {
            continue;
        }
        let newer = match latest.get(deploy.app_name.as_str()) {
            Some(current) => {
                (deploy.event_created_at, deploy.id) > (current.event_created_at, current.id)
            }
            None => true,
        };
        if newer {
            latest.insert(deploy.app_name.as_str(), deploy);
        }
    }
    latest.into_values().cloned().collect()
}

/// Annotates deploys with correctness against `expected` (app_name → version).
pub fn annotate(deploys: Vec<Deploy>, expected: Option<&HashMap<String, String>>) -> Vec<DeployStatus> {
    deploys
        .into_iter()
        .map(|deploy| {
            let correct = expected
                .and_then(|mapping| mapping.get(&deploy.app_name))
                .map(|version| deploy.version.as_deref() == Some(version.as_str()));
            DeployStatus { deploy, correct }
        })
        .collect()
}
