//! Persisted session state
//!
//! The only durable client-side state: the auth token and permission list,
//! stored as JSON in a device-local file. Loaded at startup, cleared at
//! logout. Cart contents and poll state are deliberately not persisted.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{config::SessionConfig, error::AppResult};

/// Authenticated session as issued by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// File-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            path: config.path.clone(),
        }
    }

    /// Load the persisted session, if any.
    ///
    /// A corrupt file is treated as no session, with a diagnostic, so a bad
    /// write can never lock the user out of the app.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                None
            }
        }
    }

    /// Persist the session (login)
    pub fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Remove the persisted session (logout)
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> SessionStore {
        SessionStore::new(&SessionConfig {
            path: dir.join("session.json"),
        })
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let dir = std::env::temp_dir().join("labloan-session-roundtrip");
        let _ = fs::remove_dir_all(&dir);
        let store = store_in(&dir);

        assert!(store.load().is_none());

        let session = Session {
            token: "tok".to_string(),
            permissions: vec!["borrow".to_string()],
            user_id: Some(3),
        };
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.permissions, vec!["borrow"]);

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = std::env::temp_dir().join("labloan-session-corrupt");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("session.json"), "{not json").unwrap();

        let store = store_in(&dir);
        assert!(store.load().is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
