//! Persistence for the session token.
//!
//! The token lives in a single slot named [`TOKEN_KEY`]. Its presence decides
//! whether a "who am I" request is attempted at all.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

/// Well-known key of the token slot.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    /// Persist `token`. An `Err` means it may not survive the process.
    fn store(&self, token: &str) -> io::Result<()>;
}

/// Process-local token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn store(&self, token: &str) -> io::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| io::Error::other("token slot poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }
}

/// Token slot backed by `<dir>/token`.
///
/// Read failures count as "no token". A token that could not be written is
/// held in memory instead, so the session stays valid for this process.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    unsaved: MemoryTokenStore,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
            unsaved: MemoryTokenStore::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        if let Some(token) = self.unsaved.load() {
            return Some(token);
        }
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn store(&self, token: &str) -> io::Result<()> {
        match self.write(token) {
            Ok(()) => {
                self.unsaved.clear();
                Ok(())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to persist session token");
                self.unsaved.store(token)?;
                Err(e)
            }
        }
    }
}
