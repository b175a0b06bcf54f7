/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::v1::deploys::ReconcileRequest;
use crate::api::v1::event_counts::EventCountRequest;
use crate::api::v1::events::{DeployEvent, DeployEventResponse};
use crate::api::v1::git_repository_locations::GitRepositoryLocationRequest;
use crate::api::v1::middleware::AuthResponse;
use crate::api::v1::repo_ownerships::RepoOwnershipRequest;
use crate::api::v1::tickets::{ReleasedTicketRequest, TicketRequest};
use crate::api::v1::{
    auth, deploys, event_counts, events, git_repository_locations, metrics, repo_ownerships,
    tickets,
};
use crate::api::AppState;
use crate::metrics::GithubMetricsReport;
use axum::Router;
use shiptrack_models::models::{
    deploys::Deploy, event_counts::EventCount, git_repository_locations::GitRepositoryLocation,
    released_tickets::ReleasedTicket, repo_ownerships::RepoOwnership, tickets::Ticket,
};
use shiptrack_models::reconciliation::DeployStatus;
use shiptrack_models::validation::ValidationErrors;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::verify_pak,
        deploys::list_server_deploys,
        deploys::reconcile_deploys,
        events::record_deploy,
        repo_ownerships::list_repo_ownerships,
        repo_ownerships::get_repo_ownership,
        repo_ownerships::put_repo_ownership,
        git_repository_locations::list_git_repository_locations,
        git_repository_locations::put_git_repository_location,
        tickets::put_ticket,
        tickets::search_tickets,
        tickets::put_released_ticket,
        tickets::search_released_tickets,
        event_counts::list_event_counts,
        event_counts::put_event_count,
        metrics::ingest_github_metrics,
    ),
    components(
        schemas(
            AuthResponse,
            Deploy,
            DeployStatus,
            ReconcileRequest,
            DeployEvent,
            DeployEventResponse,
            RepoOwnership,
            RepoOwnershipRequest,
            ValidationErrors,
            GitRepositoryLocation,
            GitRepositoryLocationRequest,
            Ticket,
            TicketRequest,
            ReleasedTicket,
            ReleasedTicketRequest,
            EventCount,
            EventCountRequest,
            GithubMetricsReport,
        )
    ),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "deploys", description = "Deploy reconciliation API"),
        (name = "events", description = "Deploy event ingestion API"),
        (name = "repo-ownerships", description = "Repo ownership snapshot API"),
        (name = "git-repository-locations", description = "Git repository location snapshot API"),
        (name = "tickets", description = "Ticket and released ticket snapshot API"),
        (name = "event-counts", description = "Snapshot watermark API"),
        (name = "metrics", description = "Third-party metrics ingestion API"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "pak",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

/// Serves the OpenAPI document at `/docs/openapi.json` and Swagger UI at `/swagger-ui`.
pub fn configure_openapi() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/docs/openapi.json", ApiDoc::openapi()))
}
