//! Core library for the COVA restaurant client.
//!
//! - `auth`: the bearer credential and where it is kept
//! - `api`: the HTTP client for the restaurant backend
//! - `models`: menu, location, booking, order and account types
//! - `forms`: validation of what a visitor typed before anything is sent
//! - `config`: backend address and storage settings

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod utils;

pub use api::{ApiClient, RequestError};
pub use auth::{MemoryTokenStore, SessionData, TokenStorage, TokenStore};
pub use config::Config;
