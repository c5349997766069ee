use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::TokenStore;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Body returned by the sign-in and sign-up endpoints.
///
/// Only `access_token` matters to the client; everything else the backend
/// sends is kept in `extra` so callers can display it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl SessionData {
    /// Interpret an auth response body. Non-object bodies carry no token.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => {
                serde_json::from_value(value).context("Failed to parse auth response")
            }
            _ => Ok(Self::default()),
        }
    }

    /// The credential to store, if the response carried a non-empty one
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// On-disk layout of the session file
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Keeps the credential in `session.json` under the data directory.
pub struct FileTokenStore {
    data_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn get_credential(&self) -> Result<Option<String>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let stored: StoredSession =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(stored.token))
    }

    fn set_credential(&self, token: &str) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    fn clear_credential(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}
