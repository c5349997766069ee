use serde::{Deserialize, Serialize};

/// Fields posted to `/auth/signup`. `phone` is sent as an empty string when
/// the visitor leaves it blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SignupProfile {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}
