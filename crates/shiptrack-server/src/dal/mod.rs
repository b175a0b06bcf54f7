/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer.
//!
//! [`DAL`] owns the connection pool and hands out one accessor per table.
//! Accessors borrow the DAL and open a pooled connection per call.

use crate::db::ConnectionPool;
use diesel::r2d2::PoolError;

mod admin;
mod api_tokens;
mod deploy_alert_jobs;
mod deploys;
mod event_counts;
mod git_repository_locations;
mod released_tickets;
mod repo_ownerships;
mod tickets;

pub use admin::AdminDAL;
pub use api_tokens::ApiTokensDAL;
pub use deploy_alert_jobs::DeployAlertJobsDAL;
pub use deploys::DeploysDAL;
pub use event_counts::EventCountsDAL;
pub use git_repository_locations::GitRepositoryLocationsDAL;
pub use released_tickets::ReleasedTicketsDAL;
pub use repo_ownerships::RepoOwnershipsDAL;
pub use tickets::TicketsDAL;

/// Failure of a data access call.
#[derive(Debug, thiserror::Error)]
pub enum DalError {
    #[error("database connection unavailable: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Query(#[from] diesel::result::Error),
}

#[derive(Clone)]
pub struct DAL {
    pub pool: ConnectionPool,
}

impl DAL {
    pub fn new(pool: ConnectionPool) -> Self {
        DAL { pool }
    }

    pub fn admin(&self) -> AdminDAL {
        AdminDAL { dal: self }
    }

    pub fn api_tokens(&self) -> ApiTokensDAL {
        ApiTokensDAL { dal: self }
    }

    pub fn deploy_alert_jobs(&self) -> DeployAlertJobsDAL {
        DeployAlertJobsDAL { dal: self }
    }

    pub fn deploys(&self) -> DeploysDAL {
        DeploysDAL { dal: self }
    }

    pub fn event_counts(&self) -> EventCountsDAL {
        EventCountsDAL { dal: self }
    }

    pub fn git_repository_locations(&self) -> GitRepositoryLocationsDAL {
        GitRepositoryLocationsDAL { dal: self }
    }

    pub fn released_tickets(&self) -> ReleasedTicketsDAL {
        ReleasedTicketsDAL { dal: self }
    }

    pub fn repo_ownerships(&self) -> RepoOwnershipsDAL {
        RepoOwnershipsDAL { dal: self }
    }

    pub fn tickets(&self) -> TicketsDAL {
        TicketsDAL { dal: self }
    }
}
