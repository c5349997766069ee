//! REST API client module for the COVA restaurant backend.
//!
//! This module provides the `ApiClient` for fetching the menu and location
//! and for submitting bookings, orders, sign-ins and sign-ups.
//!
//! The backend uses bearer token authentication. The token is obtained from
//! `/auth/token` or `/auth/signup` and kept in a `TokenStore`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::RequestError;
