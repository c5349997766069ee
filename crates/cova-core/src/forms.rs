//! Client-side form validation.
//!
//! Each form holds the raw text a visitor typed. `validate` applies the
//! constraints the page declares on its inputs (required fields, email
//! shape, date/time formats, the guest range) and produces the typed request.
//! A form that fails validation is never submitted.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::{BookingRequest, SignupProfile};

/// Smallest party the booking form accepts
pub const MIN_GUESTS: i64 = 1;

/// Largest party the booking form accepts
pub const MAX_GUESTS: i64 = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),

    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate,

    #[error("Time must be in HH:MM format")]
    InvalidTime,

    #[error("Guests must be a whole number")]
    InvalidGuests,

    #[error("Guests must be between {} and {}", MIN_GUESTS, MAX_GUESTS)]
    GuestsOutOfRange(i64),
}

#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub guests: String,
    pub notes: String,
}

impl BookingForm {
    pub fn validate(&self) -> Result<BookingRequest, FormError> {
        let name = required(&self.name, "Name")?;
        let phone = required(&self.phone, "Phone")?;
        let email = optional(&self.email);
        if let Some(ref email) = email {
            check_email(email, "Email")?;
        }

        let date = required(&self.date, "Date")?;
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?;

        let time = required(&self.time, "Time")?;
        let time = NaiveTime::parse_from_str(&time, "%H:%M").map_err(|_| FormError::InvalidTime)?;

        let guests = parse_guests(&self.guests)?;

        Ok(BookingRequest {
            name,
            phone,
            email,
            date,
            time,
            guests,
            notes: optional(&self.notes),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Returns the (identifier, secret) pair to authenticate with.
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let email = required(&self.email, "Email")?;
        check_email(&email, "Email")?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }
        Ok((email, self.password.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<SignupProfile, FormError> {
        let name = required(&self.name, "Full name")?;
        let email = required(&self.email, "Email")?;
        check_email(&email, "Email")?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }
        Ok(SignupProfile {
            name,
            email,
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_guests(value: &str) -> Result<u8, FormError> {
    let value = required(value, "Guests")?;
    let guests: i64 = value.parse().map_err(|_| FormError::InvalidGuests)?;
    if !(MIN_GUESTS..=MAX_GUESTS).contains(&guests) {
        return Err(FormError::GuestsOutOfRange(guests));
    }
    u8::try_from(guests).map_err(|_| FormError::GuestsOutOfRange(guests))
}

fn check_email(value: &str, field: &'static str) -> Result<(), FormError> {
    if looks_like_email(value) {
        Ok(())
    } else {
        Err(FormError::InvalidEmail(field))
    }
}

/// Same shape check an email input performs: `local@domain`, no spaces,
/// domain labels non-empty.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    }
}
