use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SessionCipher;
use crate::models::{AdminUser, AuthResponse};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Credentials held for the signed-in admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<AdminUser>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
            user: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user: AdminUser) -> Self {
        self.user = Some(user);
        self
    }

    /// Session produced by a successful login or refresh exchange.
    pub fn from_auth(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            refresh_token: auth.refresh_token,
            user: auth.user,
            created_at: Utc::now(),
        }
    }

    /// Replace the token pair after a refresh, keeping the cached profile
    /// unless the refresh response carried a newer one.
    pub fn rotated(&self, auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            refresh_token: auth.refresh_token,
            user: auth.user.or_else(|| self.user.clone()),
            created_at: Utc::now(),
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.trim().is_empty()
    }
}

/// Persisted key-value home of the session credentials.
///
/// Reads and writes are synchronous; the client reads at the start of each
/// attempt and only the refresh step (or login/logout) writes.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionData>>;
    fn save(&self, data: &SessionData) -> Result<()>;
    fn clear(&self) -> Result<()>;

    /// Access token, if one is stored.
    fn token(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|d| d.token).filter(|t| !t.is_empty()))
    }
}

/// Process-local store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: RwLock<Option<SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(data: SessionData) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionData>> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        *guard = Some(data.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Session persisted as JSON in the cache directory, optionally sealed.
pub struct FileSessionStore {
    cache_dir: PathBuf,
    cipher: Option<SessionCipher>,
}

impl FileSessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            cipher: None,
        }
    }

    /// Encrypt the session file with a key derived from `passphrase`.
    pub fn encrypted(cache_dir: PathBuf, passphrase: &str) -> Self {
        Self {
            cache_dir,
            cipher: Some(SessionCipher::new(passphrase)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionData>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read(&path).context("Failed to read session file")?;
        let plain = match &self.cipher {
            Some(cipher) => cipher.open(&contents)?,
            None => contents,
        };
        let data: SessionData =
            serde_json::from_slice(&plain).context("Failed to parse session file")?;
        Ok(Some(data))
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_vec_pretty(data)?;
        let contents = match &self.cipher {
            Some(cipher) => cipher.seal(&contents)?,
            None => contents,
        };
        Self::write_atomically(&path, &contents)?;
        debug!(path = %path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove session file")?;
            debug!(path = %path.display(), "Session cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> AdminUser {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "email": "ops@example.com",
            "first_name": "Ada",
            "last_name": "Ops"
        }))
        .expect("valid user")
    }

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        assert!(store.token().unwrap().is_none());

        store.save(&SessionData::new("A", "R1")).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("A"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_rotation_keeps_cached_profile() {
        let session = SessionData::new("A", "R1").with_user(sample_user());
        let rotated = session.rotated(AuthResponse {
            token: "B".into(),
            refresh_token: "R2".into(),
            user: None,
        });
        assert_eq!(rotated.token, "B");
        assert_eq!(rotated.refresh_token, "R2");
        assert_eq!(rotated.user, session.user);
    }

    #[test]
    fn test_file_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested"));

        assert!(store.load().unwrap().is_none());
        store
            .save(&SessionData::new("A", "R1").with_user(sample_user()))
            .unwrap();

        let loaded = store.load().unwrap().expect("session persisted");
        assert_eq!(loaded.token, "A");
        assert_eq!(loaded.user.map(|u| u.email), Some("ops@example.com".to_string()));
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_encrypted_file_store_hides_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::encrypted(dir.path().to_path_buf(), "correct horse");
        store.save(&SessionData::new("secret-access", "secret-refresh")).unwrap();

        let raw = std::fs::read(store.path()).unwrap();
        let raw_text = String::from_utf8_lossy(&raw);
        assert!(!raw_text.contains("secret-access"));
        assert!(!raw_text.contains("secret-refresh"));

        let loaded = store.load().unwrap().expect("session persisted");
        assert_eq!(loaded.refresh_token, "secret-refresh");

        let wrong = FileSessionStore::encrypted(dir.path().to_path_buf(), "wrong");
        assert!(wrong.load().is_err());
    }
}
