use chrono::NaiveDateTime;

use serde::Serialize;

/// Storage and wire format of booking creation timestamps
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    New,
}

/// Stored booking record
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Booking {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    /// Phone number in the form the visitor typed it
    pub phone: String,
    pub service: Option<String>,
    /// Free-form preferred date, never parsed
    pub date: Option<String>,
    pub message: Option<String>,
    /// Creation time in the reference timezone
    #[serde(serialize_with = "serialize_created_at")]
    pub created_at: NaiveDateTime,
    pub status: BookingStatus,
}

fn serialize_created_at<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&value.format(CREATED_AT_FORMAT))
}
