pub mod geo;
pub mod token;
