/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Repo Ownerships Module
//!
//! Maps an application to the people who own it and may approve its releases.
//! Owners receive deploy alert emails for the application.

use crate::validation::{validate_emails, ValidationErrors};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents a repo ownership record in the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::repo_ownerships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RepoOwnership {
    pub id: i64,
    pub app_name: String,
    pub repo_owners: Vec<Option<String>>,
    pub repo_approvers: Vec<Option<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RepoOwnership {
    /// Owner emails with null array entries dropped.
    pub fn owner_emails(&self) -> Vec<String> {
        self.repo_owners.iter().flatten().cloned().collect()
    }
}

/// Represents a repo ownership to be inserted or upserted.
#[derive(Insertable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::repo_ownerships)]
pub struct NewRepoOwnership {
    pub app_name: String,
    pub repo_owners: Vec<Option<String>>,
    pub repo_approvers: Vec<Option<String>>,
}

impl NewRepoOwnership {
    /// Creates a new `NewRepoOwnership`, validating every email.
    ///
    /// Owner lists may be given as separate entries or as comma/whitespace
    /// separated strings; both are split and trimmed.
    pub fn new(
        app_name: String,
        repo_owners: Vec<String>,
        repo_approvers: Vec<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let app_name = app_name.trim().to_string();
        if app_name.is_empty() {
            errors.add("app_name", "can't be blank");
        }

        let owners = split_emails(&repo_owners);
        let approvers = split_emails(&repo_approvers);
        validate_emails("repo_owners", &owners, &mut errors);
        validate_emails("repo_approvers", &approvers, &mut errors);

        errors.into_result(NewRepoOwnership {
            app_name,
            repo_owners: owners.into_iter().map(Some).collect(),
            repo_approvers: approvers.into_iter().map(Some).collect(),
        })
    }
}

fn split_emails(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}
