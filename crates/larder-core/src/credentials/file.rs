//! TOML-file credential store.
//!
//! Layout of `credentials.toml`:
//!
//! ```toml
//! suggestion_api_key = "sk-..."
//! image_api_key = "..."
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

use super::CredentialStore;
use crate::error::{Error, Result};
use crate::types::Service;

/// Credential store persisted to a TOML file, with optional in-process
/// overrides that are never written back.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    overrides: HashMap<String, String>,
}

impl FileCredentialStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<BTreeMap<String, String>>(&content)
                .map_err(|e| Error::parse(path.display().to_string(), e.to_string()))?
        } else {
            BTreeMap::new()
        };

        debug!("Loaded {} credential(s) from {:?}", entries.len(), path);

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            overrides: HashMap::new(),
        })
    }

    /// Apply `LARDER_SUGGESTION_KEY` / `LARDER_IMAGE_KEY` from the environment.
    pub fn with_env_overrides(self) -> Self {
        Service::ALL.iter().fold(self, |store, service| {
            match std::env::var(service.env_var()) {
                Ok(value) if !value.trim().is_empty() => store.with_override(*service, value),
                _ => store,
            }
        })
    }

    /// Override one service's credential for this process only.
    pub fn with_override(mut self, service: Service, value: impl Into<String>) -> Self {
        self.overrides
            .insert(service.credential_key().to_string(), value.into());
        self
    }

    /// Whether a key is currently served from an override.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(key) {
            return Some(value.clone());
        }
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Error::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)?;
        info!("Saved {} to {:?}", key, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = tempdir().expect("Failed to create temp dir");
        let store = FileCredentialStore::open(temp.path().join("credentials.toml")).unwrap();
        assert!(store.get("suggestion_api_key").is_none());
    }

    #[test]
    fn test_set_persists_and_reloads() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("nested").join("credentials.toml");

        let store = FileCredentialStore::open(&path).unwrap();
        store.set("image_api_key", "px-123").unwrap();
        assert!(path.exists());

        let reloaded = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reloaded.get("image_api_key").as_deref(), Some("px-123"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("credentials.toml");
        let store = FileCredentialStore::open(&path).unwrap();
        store.set("suggestion_api_key", "sk-1").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_override_wins_and_is_not_written() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("credentials.toml");
        std::fs::write(&path, "suggestion_api_key = \"from-file\"\n").unwrap();

        let store = FileCredentialStore::open(&path)
            .unwrap()
            .with_override(Service::Suggestion, "from-env");
        assert_eq!(store.get("suggestion_api_key").as_deref(), Some("from-env"));
        assert!(store.is_overridden("suggestion_api_key"));

        store.set("image_api_key", "px").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("from-file"));
        assert!(!content.contains("from-env"));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("credentials.toml");
        std::fs::write(&path, "this is not toml").unwrap();

        let err = FileCredentialStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
