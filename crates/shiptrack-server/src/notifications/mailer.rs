/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Email delivery.
//!
//! [`Mailer`] is the seam between alert rendering and transport. The HTTP
//! mailer posts the email as JSON to a mail relay; the log mailer only writes
//! it to the log, which is the default outside production.

use super::email::Email;
use super::NotifyError;
use async_trait::async_trait;
use shiptrack_utils::config;
use shiptrack_utils::logging::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), NotifyError>;
}

/// Posts emails to an HTTP mail relay.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    auth_header: Option<String>,
}

impl HttpMailer {
    pub fn new(
        endpoint: impl Into<String>,
        auth_header: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpMailer {
            client,
            endpoint: endpoint.into(),
            auth_header,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.endpoint).json(email);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!("Mail relay accepted '{}'", email.subject);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            })
        }
    }
}

/// Writes emails to the log instead of sending them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        info!(
            "Email to {:?} cc {:?}: {}\n{}",
            email.to, email.cc, email.subject, email.body
        );
        Ok(())
    }
}

/// Builds the mailer selected by `mailer.kind`.
pub fn mailer_from_settings(settings: &config::Mailer) -> Result<Arc<dyn Mailer>, NotifyError> {
    match settings.kind.as_str() {
        "http" => {
            let endpoint = settings.endpoint.clone().ok_or_else(|| {
                NotifyError::Config("mailer.endpoint is required for the http mailer".to_string())
            })?;
            Ok(Arc::new(HttpMailer::new(
                endpoint,
                settings.auth_header.clone(),
                Duration::from_secs(settings.timeout_seconds),
            )?))
        }
        "log" => Ok(Arc::new(LogMailer)),
        other => Err(NotifyError::Config(format!("unknown mailer kind '{}'", other))),
    }
}
