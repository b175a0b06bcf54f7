/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy alert notifications.
//!
//! [`AlertNotifier`] turns a queued [`DeployAlertPayload`] into an email to
//! the repository owners and a chat message. It is built once at startup
//! and handed to the alert worker.

pub mod chat;
pub mod email;
pub mod mailer;

use chat::ChatNotifier;
use email::{DeployAlertEmail, EmailRenderer};
use mailer::{mailer_from_settings, Mailer};
use shiptrack_models::models::deploy_alert_jobs::DeployAlertPayload;
use shiptrack_models::models::repo_ownerships::RepoOwnership;
use shiptrack_utils::config::Settings;
use shiptrack_utils::logging::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to render template: {0}")]
    Template(#[from] tera::Error),
    #[error("failed to encode payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid deploy timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("{0}")]
    Config(String),
}

/// Delivers deploy alerts by email and chat.
pub struct AlertNotifier {
    mailer: Arc<dyn Mailer>,
    renderer: EmailRenderer,
    chat: Option<ChatNotifier>,
    channel: String,
    releases_url: String,
}

impl AlertNotifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        renderer: EmailRenderer,
        chat: Option<ChatNotifier>,
        channel: impl Into<String>,
        releases_url: impl Into<String>,
    ) -> Self {
        AlertNotifier {
            mailer,
            renderer,
            chat,
            channel: channel.into(),
            releases_url: releases_url.into(),
        }
    }

    /// Builds the notifier from the `mailer`, `chat`, `alerts` and `server` settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, NotifyError> {
        let mailer = mailer_from_settings(&settings.mailer)?;
        let renderer = EmailRenderer::new(settings.mailer.from.clone())?;

        let chat = if settings.chat.enabled {
            let url = settings.chat.webhook_url.clone().ok_or_else(|| {
                NotifyError::Config("chat.webhook_url is required when chat is enabled".to_string())
            })?;
            Some(ChatNotifier::new(
                url,
                settings.chat.username.clone(),
                Duration::from_secs(settings.chat.timeout_seconds),
            )?)
        } else {
            None
        };

        Ok(AlertNotifier::new(
            mailer,
            renderer,
            chat,
            settings.alerts.channel.clone(),
            settings.server.releases_url.clone(),
        ))
    }

    /// Sends the email and the chat message for one alert.
    ///
    /// Both are attempted; the first failure is returned.
    pub async fn deliver(
        &self,
        payload: &DeployAlertPayload,
        ownership: Option<&RepoOwnership>,
    ) -> Result<(), NotifyError> {
        let email_result = self.send_email(payload, ownership).await;
        let chat_result = match &self.chat {
            Some(chat) => chat.notify(&chat_text(payload), &self.channel).await,
            None => Ok(()),
        };
        email_result.and(chat_result)
    }

    async fn send_email(
        &self,
        payload: &DeployAlertPayload,
        ownership: Option<&RepoOwnership>,
    ) -> Result<(), NotifyError> {
        let owners = ownership.map(|o| o.owner_emails()).unwrap_or_default();
        let params = DeployAlertEmail {
            repo_owners: &owners,
            repo: &payload.app_name,
            region: payload.region.as_deref(),
            deployer: payload.deploy.deployed_by.as_deref(),
            deployed_at: payload.deploy.deployed_at()?,
            previous_version: payload.previous.as_ref().and_then(|p| p.version.as_deref()),
            alert: &payload.message,
            releases_url: &self.releases_url,
        };

        match self.renderer.render(&params)? {
            Some(email) => self.mailer.send(&email).await,
            None => {
                warn!(
                    "No recipients for deploy alert on {}; skipping email",
                    payload.app_name
                );
                Ok(())
            }
        }
    }
}

/// One-line chat summary of an alert.
pub fn chat_text(payload: &DeployAlertPayload) -> String {
    let region = payload
        .region
        .as_deref()
        .map(|r| format!(" ({})", r))
        .unwrap_or_default();
    format!(
        "Deploy alert for {} on {}{}: {}",
        payload.app_name, payload.server, region, payload.message
    )
}
