use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use thiserror::Error;

use super::NotificationDispatcher;
use crate::model::Booking;

/// A confirmed booking snapshot waiting to be announced
#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub booking: Booking,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Notification queue is full")]
    Full,

    #[error("Notification worker has stopped")]
    Closed,
}

/// Producer side of the bounded notification queue
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<NotificationJob>,
}

impl NotificationQueue {
    /// Hand a booking to the dispatch worker without waiting for queue space
    pub fn schedule(&self, booking: Booking) -> Result<(), ScheduleError> {
        self.tx
            .try_send(NotificationJob { booking })
            .map_err(|e| match e {
                TrySendError::Full(_) => ScheduleError::Full,
                TrySendError::Closed(_) => ScheduleError::Closed,
            })
    }
}

/// Spawn the dispatch worker.
///
/// The worker drains jobs one at a time and exits once every queue handle is dropped.
pub fn spawn_worker(
    dispatcher: NotificationDispatcher,
    capacity: usize,
) -> (NotificationQueue, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<NotificationJob>(capacity.max(1));

    let handle = tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            dispatcher.dispatch(&job.booking).await;
        }
        tracing::info!("Notification worker stopped");
    });

    (NotificationQueue { tx }, handle)
}

/// Wait for the worker to finish the jobs already queued.
///
/// Every `NotificationQueue` must be dropped first, otherwise this only returns
/// after `grace`. Returns `false` when the worker did not stop in time.
pub async fn drain_worker(worker: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, worker).await {
        Ok(Ok(())) => true,
        Ok(Err(error)) => {
            tracing::error!(%error, "Notification worker failed");
            true
        }
        Err(_) => {
            tracing::warn!(?grace, "Notification worker did not drain in time");
            false
        }
    }
}
