pub mod bookings;
pub mod listings;
pub mod negotiations;
