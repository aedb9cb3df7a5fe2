pub mod booking_service;
pub mod error;
pub mod negotiation_service;
pub mod payment_service;
