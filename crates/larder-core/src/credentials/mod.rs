//! Credential gate for the external services.
//!
//! The gate answers one question for the coordinator: may a fetch against
//! this service be attempted? Storage is delegated to a [`CredentialStore`],
//! a plain key-value collaborator keyed by [`Service::credential_key`].

mod file;

pub use file::FileCredentialStore;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::error::{Error, Result};
use crate::frontend::Frontend;
use crate::types::Service;

/// Key-value persistence for credentials.
pub trait CredentialStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a service's credential.
    pub fn with(self, service: Service, value: impl Into<String>) -> Self {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(service.credential_key().to_string(), value.into());
        }
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Error::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Gatekeeper over the stored credentials.
#[derive(Clone)]
pub struct CredentialGate {
    store: Arc<dyn CredentialStore>,
    frontend: Arc<dyn Frontend>,
}

impl CredentialGate {
    pub fn new(store: Arc<dyn CredentialStore>, frontend: Arc<dyn Frontend>) -> Self {
        Self { store, frontend }
    }

    /// Whether a usable (non-blank) credential is configured.
    pub fn has(&self, service: Service) -> bool {
        self.get(service).is_some()
    }

    /// The credential for a service, if configured. Blank values count as absent.
    pub fn get(&self, service: Service) -> Option<String> {
        self.store
            .get(service.credential_key())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Store a credential for a service.
    pub fn set(&self, service: Service, value: &str) -> Result<()> {
        debug!("Storing credential for {} service", service);
        self.store.set(service.credential_key(), value.trim())
    }

    /// Ask the frontend to obtain a credential for a service.
    pub fn request(&self, service: Service) {
        debug!("Requesting credential for {} service", service);
        self.frontend.request_credential(service);
    }
}

/// Mask a secret for display, keeping only a short prefix.
pub fn mask(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}
