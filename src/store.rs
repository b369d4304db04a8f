//! Credential storage seam.
//!
//! Hosts persist the API key however they like (keychain, preferences file,
//! secrets manager) and hand it to the orchestrator through
//! [`CredentialStore`].

use std::sync::Mutex;

/// Key-value access to the MaxStudio API key, supplied by the host.
pub trait CredentialStore: Send + Sync {
    /// Current API key, or `None` when none is stored.
    fn load_credential(&self) -> Option<String>;

    fn save_credential(&self, credential: &str);

    fn clear_credential(&self);
}

/// In-process [`CredentialStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Mutex::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_credential(&self) -> Option<String> {
        let guard = match self.credential.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().filter(|c| !c.trim().is_empty()).cloned()
    }

    fn save_credential(&self, credential: &str) {
        let mut guard = match self.credential.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(credential.trim().to_string());
    }

    fn clear_credential(&self) {
        let mut guard = match self.credential.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }
}
