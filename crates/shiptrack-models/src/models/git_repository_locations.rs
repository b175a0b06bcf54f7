/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Git Repository Locations Module
//!
//! Where each application's source lives. `name` matches a deploy's `app_name`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::git_repository_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GitRepositoryLocation {
    pub id: i64,
    pub name: String,
    pub uri: String,
    pub remote_head: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::git_repository_locations)]
#[diesel(treat_none_as_null = true)]
pub struct NewGitRepositoryLocation {
    pub name: String,
    pub uri: String,
    pub remote_head: Option<String>,
}

impl NewGitRepositoryLocation {
    /// Creates a new location. When `name` is empty it is derived from the
    /// last path segment of `uri`, without a trailing `.git`.
    pub fn new(name: Option<String>, uri: String, remote_head: Option<String>) -> Result<Self, String> {
        let uri = uri.trim().to_string();
        if uri.is_empty() {
            return Err("Repository uri cannot be empty".to_string());
        }

        let name = match name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => name_from_uri(&uri).ok_or_else(|| format!("Cannot derive a name from '{}'", uri))?,
        };

        Ok(NewGitRepositoryLocation {
            name,
            uri,
            remote_head,
        })
    }
}

fn name_from_uri(uri: &str) -> Option<String> {
    let last = uri.trim_end_matches('/').rsplit(|c: char| c == '/' || c == ':').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}
