/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data models for our application to interact with
pub mod api_tokens;
pub mod deploy_alert_jobs;
pub mod deploys;
pub mod event_counts;
pub mod git_repository_locations;
pub mod released_tickets;
pub mod repo_ownerships;
pub mod tickets;

pub use api_tokens::{ApiToken, NewApiToken};
pub use deploy_alert_jobs::{DeployAlertJob, DeployAlertPayload, NewDeployAlertJob};
pub use deploys::{Deploy, DeployAttributes, NewDeploy};
pub use event_counts::{EventCount, NewEventCount};
pub use git_repository_locations::{GitRepositoryLocation, NewGitRepositoryLocation};
pub use released_tickets::{NewReleasedTicket, ReleasedTicket};
pub use repo_ownerships::{NewRepoOwnership, RepoOwnership};
pub use tickets::{NewTicket, Ticket};
