use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Token file name in the data directory
const TOKEN_FILE: &str = "tokens.json";

/// An access/refresh token pair issued at sign-in or refresh.
///
/// The pair is always replaced as a unit - a refresh yields a brand-new
/// pair, never an updated half.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Holds the current credential pair, optionally mirrored to disk so a
/// session survives process restarts.
///
/// The store is shared by every in-flight request, so reads and writes
/// go through a mutex: a request never observes a half-replaced pair.
/// Disk persistence is best-effort - the in-memory update always wins
/// and a failed mirror write is logged, not surfaced.
pub struct TokenStore {
    data_dir: Option<PathBuf>,
    pair: Mutex<Option<CredentialPair>>,
}

impl TokenStore {
    /// Create a store persisted under the given data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir: Some(data_dir),
            pair: Mutex::new(None),
        }
    }

    /// Create a store with no disk mirror, for tests and ephemeral sessions.
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            pair: Mutex::new(None),
        }
    }

    /// Hydrate the store from disk. Returns true if a pair was loaded.
    pub fn load(&self) -> Result<bool> {
        let Some(path) = self.token_path() else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }

        let contents =
            std::fs::read_to_string(&path).context("Failed to read token file")?;
        let pair: CredentialPair =
            serde_json::from_str(&contents).context("Failed to parse token file")?;

        // A pair with an empty half is unusable; treat it as absent.
        if pair.access_token.is_empty() || pair.refresh_token.is_empty() {
            warn!("Stored token file is incomplete, ignoring");
            return Ok(false);
        }

        *self.pair.lock().unwrap() = Some(pair);
        debug!("Session tokens loaded from disk");
        Ok(true)
    }

    /// Replace the stored pair. Overwrites any prior pair.
    pub fn store(&self, pair: CredentialPair) {
        let mut guard = self.pair.lock().unwrap();
        *guard = Some(pair.clone());

        // Mirror to disk while still holding the lock so the file never
        // lags behind a concurrent replacement.
        if let Some(path) = self.token_path() {
            if let Err(e) = Self::persist(&path, &pair) {
                warn!(error = %e, "Failed to persist session tokens");
            }
        }
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.pair
            .lock()
            .unwrap()
            .as_ref()
            .map(|p| p.access_token.clone())
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.pair
            .lock()
            .unwrap()
            .as_ref()
            .map(|p| p.refresh_token.clone())
    }

    /// Remove both tokens. Clearing an empty store is a no-op.
    pub fn clear(&self) {
        let mut guard = self.pair.lock().unwrap();
        *guard = None;

        if let Some(path) = self.token_path() {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(error = %e, "Failed to remove token file");
                }
            }
        }
    }

    /// A session exists iff a credential pair is stored.
    pub fn is_authenticated(&self) -> bool {
        self.pair.lock().unwrap().is_some()
    }

    fn token_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(TOKEN_FILE))
    }

    fn persist(path: &PathBuf, pair: &CredentialPair) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(pair)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_read_back() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());

        store.store(CredentialPair::new("a1", "r1"));
        assert!(store.is_authenticated());
        assert_eq!(store.access_token().as_deref(), Some("a1"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn test_store_replaces_pair_as_a_unit() {
        let store = TokenStore::in_memory();
        store.store(CredentialPair::new("a1", "r1"));
        store.store(CredentialPair::new("a2", "r2"));
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().as_deref(), Some("r2"));
    }

    #[test]
    fn test_clear_removes_both_tokens() {
        let store = TokenStore::in_memory();
        store.store(CredentialPair::new("a1", "r1"));
        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(!store.is_authenticated());

        // Clearing an already-empty store is a no-op, not an error.
        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = TokenStore::new(dir.path().to_path_buf());
        store.store(CredentialPair::new("a1", "r1"));

        let reloaded = TokenStore::new(dir.path().to_path_buf());
        assert!(reloaded.load().expect("Failed to load token file"));
        assert_eq!(reloaded.access_token().as_deref(), Some("a1"));
        assert_eq!(reloaded.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn test_clear_removes_token_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = TokenStore::new(dir.path().to_path_buf());
        store.store(CredentialPair::new("a1", "r1"));
        store.clear();

        let reloaded = TokenStore::new(dir.path().to_path_buf());
        assert!(!reloaded.load().expect("Load should succeed on empty dir"));
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_load_rejects_incomplete_pair() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(TOKEN_FILE);
        std::fs::write(&path, r#"{"access_token": "a1", "refresh_token": ""}"#)
            .expect("Failed to write token file");

        let store = TokenStore::new(dir.path().to_path_buf());
        assert!(!store.load().expect("Load should not error"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_load_without_file_reports_absent() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = TokenStore::new(dir.path().to_path_buf());
        assert!(!store.load().expect("Load should succeed"));
    }
}
