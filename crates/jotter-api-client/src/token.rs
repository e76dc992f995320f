//! Token storage for the API client.
//!
//! Where the bearer token lives between requests. The store is injected
//! into [`crate::ApiClient`] so embedders control persistence and tests
//! never reach into ambient state.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

pub trait TokenStore: Send + Sync {
    /// The current token, if logged in.
    fn token(&self) -> Option<String>;
    /// Replace the stored token.
    fn put(&self, token: &str) -> io::Result<()>;
    /// Discard the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> io::Result<()>;
}

/// Process-local token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn put(&self, token: &str) -> io::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// File-backed token store; a missing file means logged out.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), error = %error, "failed to read token file");
                None
            }
        }
    }

    fn put(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
            _ => Ok(()),
        }
    }
}
