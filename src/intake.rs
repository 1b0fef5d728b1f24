use thiserror::Error;

use crate::domain::{BookingForm, NewBooking, ValidationError};
use crate::notify::NotificationQueue;
use crate::repo::{BookingStore, StorageError};

/// Successful intake of a booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub booking_id: i64,
    pub notification: NotificationState,
}

/// What happened to the staff notification of an accepted booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationState {
    /// Handed to the dispatch worker
    Scheduled,
    /// The confirmation read found nothing, so there was nothing to announce
    SkippedUnconfirmed,
    /// The queue refused the job
    Dropped,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("Failed to persist booking")]
    PersistenceFailed(#[source] StorageError),
}

/// End-to-end booking intake: validate, persist, confirm, then schedule notification
#[derive(Debug, Clone)]
pub struct BookingIntake {
    store: BookingStore,
    notifications: NotificationQueue,
}

impl BookingIntake {
    pub fn new(store: BookingStore, notifications: NotificationQueue) -> Self {
        Self {
            store,
            notifications,
        }
    }

    #[tracing::instrument(name = "Accept a booking", skip(self, form))]
    pub async fn submit(&self, form: BookingForm) -> Result<Accepted, IntakeError> {
        let draft = NewBooking::try_from(form)?;
        tracing::debug!("Booking validated");

        let booking_id = self
            .store
            .create(&draft)
            .await
            .map_err(IntakeError::PersistenceFailed)?;
        tracing::info!(booking.id = booking_id, "Booking persisted");

        let confirmed = match self.store.get(booking_id).await {
            Ok(confirmed) => confirmed,
            Err(error) => {
                tracing::error!(
                    booking.id = booking_id,
                    error.cause_chain = ?error,
                    "Confirmation read failed for a committed booking"
                );
                None
            }
        };

        let notification = match confirmed {
            Some(booking) => match self.notifications.schedule(booking) {
                Ok(()) => {
                    tracing::info!(booking.id = booking_id, "Notification scheduled");
                    NotificationState::Scheduled
                }
                Err(error) => {
                    tracing::warn!(
                        booking.id = booking_id,
                        error.message = %error,
                        "Notification dropped"
                    );
                    NotificationState::Dropped
                }
            },
            None => {
                tracing::error!(
                    booking.id = booking_id,
                    "Booking missing right after creation, notification skipped"
                );
                NotificationState::SkippedUnconfirmed
            }
        };

        Ok(Accepted {
            booking_id,
            notification,
        })
    }
}
