mod bookings;

pub use bookings::{BookingStore, StorageError};
