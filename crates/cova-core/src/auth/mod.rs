//! Session storage for the bearer credential.
//!
//! This module provides:
//! - `TokenStore`: the seam the API client reads and writes the credential through
//! - `FileTokenStore`: a session file in the application data directory
//! - `KeyringTokenStore`: OS-level storage via keyring
//! - `MemoryTokenStore`: process-local storage for tests and ephemeral runs
//!
//! At most one credential is stored at a time. Storage failures are returned
//! to the caller untouched.

pub mod credentials;
pub mod session;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub use credentials::KeyringTokenStore;
pub use session::{FileTokenStore, SessionData};

/// Persistent home of the single bearer credential.
///
/// Implementations must be cheap to call: the API client reads the
/// credential right before every request.
pub trait TokenStore: Send + Sync {
    /// Read the stored credential, if any. No side effects.
    fn get_credential(&self) -> Result<Option<String>>;

    /// Overwrite the stored credential.
    fn set_credential(&self, token: &str) -> Result<()>;

    /// Remove the stored credential. Succeeds when nothing is stored.
    fn clear_credential(&self) -> Result<()>;
}

/// Which backend holds the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

/// Open the configured token store.
pub fn open_store(storage: TokenStorage, data_dir: &Path) -> Arc<dyn TokenStore> {
    match storage {
        TokenStorage::File => Arc::new(FileTokenStore::new(data_dir.to_path_buf())),
        TokenStorage::Keyring => Arc::new(KeyringTokenStore::new()),
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a credential already stored
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_credential(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn set_credential(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear_credential(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
