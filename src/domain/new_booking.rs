use serde::Deserialize;

use super::{PersonName, PhoneNumber, ValidationError};

/// Raw booking submission as received from the website
#[derive(Debug, Clone, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub service: Option<String>,
    pub date: Option<String>,
    pub message: Option<String>,
}

/// Validated booking, ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: PersonName,
    pub phone: PhoneNumber,
    pub service: Option<String>,
    pub date: Option<String>,
    pub message: Option<String>,
}

impl TryFrom<BookingForm> for NewBooking {
    type Error = ValidationError;

    fn try_from(form: BookingForm) -> Result<Self, Self::Error> {
        let name = form.name.parse()?;
        let phone = form.phone.parse()?;

        Ok(Self {
            name,
            phone,
            service: form.service,
            date: form.date,
            message: form.message,
        })
    }
}
