/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Chat notifications through an incoming webhook.

use super::NotifyError;
use serde::Serialize;
use shiptrack_utils::logging::prelude::*;
use std::time::Duration;

/// Prefixes `#` unless the channel already has it.
pub fn normalize_channel(channel: &str) -> String {
    if channel.starts_with('#') {
        channel.to_string()
    } else {
        format!("#{}", channel)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    text: &'a str,
    channel: String,
    username: &'a str,
}

/// Posts messages to one chat webhook.
pub struct ChatNotifier {
    client: reqwest::Client,
    webhook_url: String,
    username: String,
}

impl ChatNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        username: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        Ok(ChatNotifier {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            webhook_url: webhook_url.into(),
            username: username.into(),
        })
    }

    /// Posts `text` to `channel`.
    pub async fn notify(&self, text: &str, channel: &str) -> Result<(), NotifyError> {
        let message = ChatMessage {
            text,
            channel: normalize_channel(channel),
            username: &self.username,
        };

        let response = self.client.post(&self.webhook_url).json(&message).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        debug!("Posted chat message to {}", message.channel);
        Ok(())
    }
}
