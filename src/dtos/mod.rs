pub mod bookingdtos;
pub mod listingdtos;
pub mod negotiationdtos;
