mod booking;

pub use booking::{Booking, BookingStatus, CREATED_AT_FORMAT};
