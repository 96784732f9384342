//! Bearer-token persistence.
//!
//! The services only need get/set/clear, so storage is a seam: the demo
//! binary keeps the token in a file under the data directory, tests keep it
//! in memory.

use std::path::PathBuf;
use std::sync::RwLock;

/// Where the current session's bearer token lives.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: Option<String>);

    fn clear(&self) {
        self.set_token(None);
    }
}

/// In-memory store, used by tests and short-lived sessions.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[allow(clippy::unwrap_used)]
impl TokenStore for InMemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap() = token;
    }
}

/// File-backed store. The token is the entire file content; clearing
/// removes the file.
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
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::error!("Failed to read token file {}: {e}", self.path.display());
                None
            }
        }
    }

    fn set_token(&self, token: Option<String>) {
        let result = match token {
            Some(token) => {
                if let Some(parent) = self.path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                std::fs::write(&self.path, token)
            }
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            log::error!("Failed to update token file {}: {e}", self.path.display());
        }
    }
}
