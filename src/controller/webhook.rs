use std::str::FromStr;

use actix_web::{post, web, HttpRequest, HttpResponse, Responder};

use chrono::{FixedOffset, Utc};

use secrecy::{ExposeSecret, Secret};

use serde::{Deserialize, Serialize};

use thiserror::Error;

use crate::model::CREATED_AT_FORMAT;
use crate::notify::{DeliveryError, SharedSender};

pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Everything the webhook needs to answer bot commands
pub struct WebhookState {
    sender: Option<SharedSender>,
    secret_token: Secret<String>,
    site_name: String,
    clock: FixedOffset,
}

impl WebhookState {
    pub fn new(
        sender: Option<SharedSender>,
        secret_token: Secret<String>,
        site_name: impl Into<String>,
        clock: FixedOffset,
    ) -> Self {
        Self {
            sender,
            secret_token,
            site_name: site_name.into(),
            clock,
        }
    }
}

#[derive(Debug, Error)]
enum WebhookError {
    #[error("Invalid secret token")]
    InvalidSecret,

    #[error("Malformed update: {0}")]
    MalformedUpdate(#[from] serde_json::Error),

    #[error("Failed to reply: {0}")]
    ReplyFailed(#[from] DeliveryError),
}

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Serialize)]
struct WebhookReply {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Bot commands understood in private chats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Help,
    Status,
}

impl FromStr for Command {
    type Err = ();

    /// Parse the leading `/command` or `/command@botname` of a message
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let word = text.split_whitespace().next().ok_or(())?;
        let name = word.strip_prefix('/').ok_or(())?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "help" => Ok(Self::Help),
            "status" => Ok(Self::Status),
            _ => Err(()),
        }
    }
}

impl Command {
    fn reply(&self, state: &WebhookState) -> String {
        match self {
            Self::Start => format!(
                "Добро пожаловать в {}!\n\n\
                 Я буду уведомлять о новых заявках на услуги визажа и грима.\n\n\
                 Доступные команды:\n\
                 /help - Справка по командам\n\
                 /status - Статус бота",
                state.site_name
            ),
            Self::Help => format!(
                "Доступные команды:\n\n\
                 /start - Начать работу с ботом\n\
                 /help - Показать эту справку\n\
                 /status - Проверить статус бота\n\n\
                 Бот автоматически уведомляет о новых заявках с сайта {}",
                state.site_name
            ),
            Self::Status => format!(
                "Статус бота: Активен\nВремя: {}\nВерсия: {}",
                Utc::now()
                    .with_timezone(&state.clock)
                    .format(CREATED_AT_FORMAT),
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

async fn handle(req: &HttpRequest, state: &WebhookState, body: &[u8]) -> Result<(), WebhookError> {
    let presented = req
        .headers()
        .get(SECRET_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if presented != Some(state.secret_token.expose_secret().as_str()) {
        return Err(WebhookError::InvalidSecret);
    }

    let update: Update = serde_json::from_slice(body)?;

    let Some(message) = update.message else {
        return Ok(());
    };
    let Some(command) = message.text.as_deref().and_then(|t| t.parse::<Command>().ok()) else {
        return Ok(());
    };
    let Some(sender) = &state.sender else {
        tracing::warn!(?command, "Messaging channel is not configured, ignoring command");
        return Ok(());
    };

    let chat_id = message.chat.id.to_string();
    sender.send_message(&chat_id, &command.reply(state)).await?;
    tracing::info!(?command, chat.id = message.chat.id, "Answered bot command");

    Ok(())
}

/// Inbound updates from the messaging provider
#[tracing::instrument(name = "Receive a webhook update", skip(req, state, body))]
#[post("/webhook")]
pub async fn receive(
    req: HttpRequest,
    state: web::Data<WebhookState>,
    body: web::Bytes,
) -> impl Responder {
    let reply = match handle(&req, &state, &body).await {
        Ok(()) => WebhookReply {
            status: "ok",
            message: None,
        },
        Err(error) => {
            tracing::warn!(error.message = %error, "Failed to process webhook update");
            WebhookReply {
                status: "error",
                message: Some(error.to_string()),
            }
        }
    };

    HttpResponse::Ok().json(reply)
}
