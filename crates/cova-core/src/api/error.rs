use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The one error raised for a response whose status is not 2xx.
///
/// `body` holds the raw response text; only the `Display` form is truncated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request failed with status {status}: {}", truncate_body(.body))]
pub struct RequestError {
    pub status: StatusCode,
    pub body: String,
}

impl RequestError {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
