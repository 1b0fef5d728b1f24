use crate::model::{Booking, CREATED_AT_FORMAT};

const SERVICE_PLACEHOLDER: &str = "Не указана";
const DATE_PLACEHOLDER: &str = "Не указана";
const MESSAGE_PLACEHOLDER: &str = "Не указано";

/// Renders bookings into staff notification text
#[derive(Debug, Clone)]
pub struct NotificationFormatter {
    site_name: String,
}

impl NotificationFormatter {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    pub fn render(&self, booking: &Booking) -> String {
        format!(
            "Новая заявка на {site}\n\
             \n\
             Имя: {name}\n\
             Телефон: {phone}\n\
             Услуга: {service}\n\
             Дата: {date}\n\
             Сообщение: {message}\n\
             \n\
             Время заявки: {created_at}\n\
             ID заявки: {id}",
            site = self.site_name,
            name = booking.name,
            phone = booking.phone,
            service = or_placeholder(&booking.service, SERVICE_PLACEHOLDER),
            date = or_placeholder(&booking.date, DATE_PLACEHOLDER),
            message = or_placeholder(&booking.message, MESSAGE_PLACEHOLDER),
            created_at = booking.created_at.format(CREATED_AT_FORMAT),
            id = booking.id,
        )
    }
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => placeholder,
    }
}
