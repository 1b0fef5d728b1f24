use std::fmt;
use std::time::Duration;

use anyhow::Context;

use async_trait::async_trait;

use reqwest::Client;

use secrecy::{ExposeSecret, Secret};

use serde::Serialize;

use url::Url;

use crate::notify::{DeliveryError, MessageSender};

/// Telegram Bot API client, limited to sending plain text messages
pub struct TelegramClient {
    client: Client,
    send_message_url: Secret<String>,
}

impl TelegramClient {
    pub fn new(
        mut api_base_url: Url,
        api_timeout: Duration,
        bot_token: &Secret<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        // Without a trailing slash `join` would replace the last path segment
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(&path);
        }

        // The token is part of the path, so the whole URL is treated as a secret.
        // `./` keeps the `bot<id>:` prefix from being parsed as a URL scheme.
        let send_message_url = api_base_url
            .join(&format!("./bot{}/sendMessage", bot_token.expose_secret()))
            .context("Failed to create send message endpoint URL")?;

        Ok(Self {
            client,
            send_message_url: Secret::new(send_message_url.into()),
        })
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("send_message_url", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    #[tracing::instrument(name = "Send a Telegram message", skip(self, text))]
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let body = SendMessageRequest { chat_id, text };

        let response = self
            .client
            .post(self.send_message_url.expose_secret().as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let description = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}
