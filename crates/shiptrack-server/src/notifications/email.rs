/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy alert emails.
//!
//! Owners of the repository are the primary recipients; the person who ran the
//! deploy is copied in. The body comes from the `deploy_alert.txt` tera template.

use super::NotifyError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shiptrack_models::validation::is_valid_email;
use tera::{Context, Tera};

const DEPLOY_ALERT_TEMPLATE: &str = include_str!("../../templates/deploy_alert.txt");
const DEPLOY_ALERT_TEMPLATE_NAME: &str = "deploy_alert.txt";

/// A rendered email ready to hand to a [`super::mailer::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Named inputs of a deploy alert email.
#[derive(Debug, Clone)]
pub struct DeployAlertEmail<'a> {
    pub repo_owners: &'a [String],
    pub repo: &'a str,
    pub region: Option<&'a str>,
    pub deployer: Option<&'a str>,
    pub deployed_at: DateTime<Utc>,
    pub previous_version: Option<&'a str>,
    pub alert: &'a str,
    pub releases_url: &'a str,
}

impl DeployAlertEmail<'_> {
    /// `Deploy alert for <repo> - <YYYY-MM-DD HH:MM:SS +ZZZZ>`
    pub fn subject(&self) -> String {
        format!(
            "Deploy alert for {} - {}",
            self.repo,
            self.deployed_at.format("%Y-%m-%d %H:%M:%S %z")
        )
    }

    /// Owners go in `to`, the deployer in `cc`. When no owner is known the
    /// deployer is addressed directly. Returns `None` with nobody to address.
    fn recipients(&self) -> Option<(Vec<String>, Vec<String>)> {
        let deployer = self
            .deployer
            .filter(|d| is_valid_email(d))
            .map(str::to_string);

        let mut to: Vec<String> = self.repo_owners.to_vec();
        let mut cc: Vec<String> = Vec::new();
        match deployer {
            Some(d) if to.is_empty() => to.push(d),
            Some(d) if !to.contains(&d) => cc.push(d),
            _ => {}
        }

        (!to.is_empty()).then_some((to, cc))
    }
}

/// Renders deploy alert emails.
pub struct EmailRenderer {
    tera: Tera,
    from: String,
}

impl EmailRenderer {
    pub fn new(from: impl Into<String>) -> Result<Self, NotifyError> {
        let mut tera = Tera::default();
        tera.add_raw_template(DEPLOY_ALERT_TEMPLATE_NAME, DEPLOY_ALERT_TEMPLATE)?;
        Ok(EmailRenderer {
            tera,
            from: from.into(),
        })
    }

    /// Renders the email, or `None` when it has no recipients.
    pub fn render(&self, params: &DeployAlertEmail<'_>) -> Result<Option<Email>, NotifyError> {
        let Some((to, cc)) = params.recipients() else {
            return Ok(None);
        };

        let mut context = Context::new();
        context.insert("alert", params.alert);
        context.insert("repo", params.repo);
        context.insert("region", params.region.unwrap_or("unknown"));
        context.insert("deployer", params.deployer.unwrap_or("unknown"));
        context.insert(
            "deployed_at",
            &params.deployed_at.format("%Y-%m-%d %H:%M:%S %z").to_string(),
        );
        context.insert("previous_version", &params.previous_version);
        context.insert("repo_owners", params.repo_owners);
        context.insert("releases_url", params.releases_url);

        let body = self.tera.render(DEPLOY_ALERT_TEMPLATE_NAME, &context)?;

        Ok(Some(Email {
            from: self.from.clone(),
            to,
            cc,
            subject: params.subject(),
            body,
        }))
    }
}
