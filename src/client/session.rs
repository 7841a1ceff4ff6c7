//! Process-wide credential storage, the localStorage analog.
//!
//! Whatever login stored is attached to every request until logout clears
//! it. There is no expiry check here: an expired token simply makes the
//! next call fail with a 401.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::utils::paths::get_session_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub email_address: String,
    pub plan: String,
}

/// Shared handle to the current session, optionally mirrored to disk.
#[derive(Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Memory-only store; nothing touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store mirrored to `path`, seeded from the file if it exists.
    pub fn at_path(path: PathBuf) -> Self {
        let current = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok());

        Self {
            current: Arc::new(RwLock::new(current)),
            path: Some(path),
        }
    }

    /// The default on-disk store under the minerva home directory.
    pub fn load_default() -> Result<Self> {
        Ok(Self::at_path(get_session_path()?))
    }

    pub fn get(&self) -> Option<Session> {
        self.current.read().expect("session lock poisoned").clone()
    }

    pub fn set(&self, session: Session) -> Result<()> {
        *self.current.write().expect("session lock poisoned") = Some(session.clone());

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&session)?;
            fs::write(path, content)
                .with_context(|| format!("Failed to persist session to {path:?}"))?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        *self.current.write().expect("session lock poisoned") = None;

        if let Some(path) = &self.path
            && path.exists()
        {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove session file {path:?}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_session() -> Session {
        Session {
            access_token: "token-123".to_string(),
            email_address: "user@example.com".to_string(),
            plan: "free".to_string(),
        }
    }

    #[test]
    fn test_in_memory_set_get_clear() {
        let store = SessionStore::in_memory();
        assert!(store.get().is_none());

        store.set(sample_session()).unwrap();
        assert_eq!(store.get().unwrap().email_address, "user@example.com");

        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();

        store.set(sample_session()).unwrap();
        assert!(other.get().is_some());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::at_path(path.clone());
        store.set(sample_session()).unwrap();

        let reloaded = SessionStore::at_path(path.clone());
        assert_eq!(reloaded.get().unwrap(), sample_session());

        reloaded.clear().unwrap();
        assert!(!path.exists());
        assert!(SessionStore::at_path(path).get().is_none());
    }
}
