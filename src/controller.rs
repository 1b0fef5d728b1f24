pub mod bookings;
pub mod pages;
pub mod webhook;
