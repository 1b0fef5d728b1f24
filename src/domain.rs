mod new_booking;
mod person_name;
mod phone_number;

pub use new_booking::{BookingForm, NewBooking};
pub use person_name::PersonName;
pub use phone_number::PhoneNumber;

use thiserror::Error;

/// A client-caused rejection of a booking submission, identifying the offending field
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
