//! Data models for the restaurant API.
//!
//! - `MenuItem`: read-only menu entries, with the bestseller flag
//! - `Location`: address, phone, hours and coordinates
//! - `BookingRequest`: a table reservation
//! - `OrderRequest`, `OrderLine`: a delivery order and its lines
//! - `SignupProfile`: account creation fields

pub mod account;
pub mod booking;
pub mod location;
pub mod menu;
pub mod order;

pub use account::SignupProfile;
pub use booking::BookingRequest;
pub use location::Location;
pub use menu::{bestsellers, MenuItem};
pub use order::{OrderLine, OrderRequest};
