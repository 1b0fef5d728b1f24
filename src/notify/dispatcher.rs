use std::time::Duration;

use super::{DeliveryError, NotificationFormatter, RecipientSet, SharedSender};
use crate::model::Booking;

/// Outcome of one dispatch, only ever reported through logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
}

/// Fans a booking notification out to every configured recipient
pub struct NotificationDispatcher {
    sender: Option<SharedSender>,
    recipients: RecipientSet,
    formatter: NotificationFormatter,
    attempt_timeout: Duration,
}

impl NotificationDispatcher {
    /// A dispatcher without a `sender` is a deliberate no-op
    pub fn new(
        sender: Option<SharedSender>,
        recipients: RecipientSet,
        formatter: NotificationFormatter,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            sender,
            recipients,
            formatter,
            attempt_timeout,
        }
    }

    /// Attempt delivery once per recipient, in order.
    ///
    /// A failed attempt is logged and never stops the remaining ones.
    #[tracing::instrument(
        name = "Dispatch booking notification",
        skip(self, booking),
        fields(booking.id = booking.id)
    )]
    pub async fn dispatch(&self, booking: &Booking) -> DispatchReport {
        let mut report = DispatchReport::default();

        let Some(sender) = &self.sender else {
            tracing::warn!("Messaging channel is not configured, skipping notification");
            return report;
        };

        let text = self.formatter.render(booking);

        for chat_id in self.recipients.iter() {
            report.attempted += 1;
            match self.attempt(sender, chat_id, &text).await {
                Ok(()) => {
                    tracing::info!(recipient = chat_id, "Notification delivered");
                    report.delivered += 1;
                }
                Err(error) => {
                    tracing::error!(
                        recipient = chat_id,
                        error.cause_chain = ?error,
                        error.message = %error,
                        "Failed to deliver notification"
                    );
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            delivered = report.delivered,
            "Notification dispatch finished"
        );
        report
    }

    async fn attempt(
        &self,
        sender: &SharedSender,
        chat_id: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        tokio::time::timeout(self.attempt_timeout, sender.send_message(chat_id, text))
            .await
            .map_err(|_| DeliveryError::TimedOut(self.attempt_timeout))?
    }
}
