use chrono::{FixedOffset, NaiveDateTime, SubsecRound, Utc};

use sqlx::SqlitePool;

use thiserror::Error;

use crate::domain::NewBooking;
use crate::model::{Booking, BookingStatus, CREATED_AT_FORMAT};

const SELECT_BOOKING: &str =
    "select id, name, phone, service, date, message, created_at, status from bookings";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to apply schema migrations")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable booking storage.
///
/// Every operation checks a connection out of the pool for its own duration only.
#[derive(Debug, Clone)]
pub struct BookingStore {
    pool: SqlitePool,
    clock: FixedOffset,
}

impl BookingStore {
    /// `clock` is the reference timezone creation timestamps are recorded in
    pub fn new(pool: SqlitePool, clock: FixedOffset) -> Self {
        Self { pool, clock }
    }

    /// Bring the schema up to date. Must complete before the store is shared.
    #[tracing::instrument(name = "Initialize booking storage", skip(self))]
    pub async fn init(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Current time in the reference timezone, truncated to whole seconds
    pub fn now(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.clock)
            .naive_local()
            .trunc_subsecs(0)
    }

    #[tracing::instrument(name = "Insert booking", skip(self, booking), fields(booking.name = %booking.name))]
    pub async fn create(&self, booking: &NewBooking) -> Result<i64, StorageError> {
        let created_at = self.now().format(CREATED_AT_FORMAT).to_string();

        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "insert into bookings (name, phone, service, date, message, created_at, status) \
             values (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(booking.name.as_ref())
        .bind(booking.phone.as_ref())
        .bind(booking.service.as_deref())
        .bind(booking.date.as_deref())
        .bind(booking.message.as_deref())
        .bind(created_at)
        .bind(BookingStatus::New)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        tx.commit().await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch booking by id", skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Booking>, StorageError> {
        let booking = sqlx::query_as::<_, Booking>(&format!("{SELECT_BOOKING} where id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    #[tracing::instrument(name = "Fetch latest bookings", skip(self))]
    pub async fn list(&self, limit: u32) -> Result<Vec<Booking>, StorageError> {
        let bookings =
            sqlx::query_as::<_, Booking>(&format!("{SELECT_BOOKING} order by id desc limit ?"))
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await?;

        Ok(bookings)
    }
}
