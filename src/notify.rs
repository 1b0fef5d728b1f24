mod dispatcher;
mod formatter;
mod queue;
mod recipients;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use formatter::NotificationFormatter;
pub use queue::{drain_worker, spawn_worker, NotificationJob, NotificationQueue, ScheduleError};
pub use recipients::RecipientSet;

#[cfg(test)]
pub(crate) use dispatcher::tests as testing;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use thiserror::Error;

/// Failure of a single delivery attempt to a single recipient
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Messaging API rejected the message ({status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("Delivery did not complete within {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// An external channel able to deliver a text message to a recipient
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;
}

pub type SharedSender = Arc<dyn MessageSender>;
