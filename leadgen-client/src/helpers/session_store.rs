use shared_types::Session;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Returns the path of the saved session based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/leadgen/session.json`
/// - **Linux**: `~/.local/share/leadgen/session.json`
/// - **Windows**: `%LOCALAPPDATA%\leadgen\session.json`
pub fn get_session_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join("leadgen").join("session.json"),
        None => PathBuf::from("session.json"),
    }
}

/// Persists the local session marker between CLI runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means nobody is logged in.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::anonymous());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&contents)?;
        debug!("Loaded session from {:?}", self.path);
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        debug!("Saved session to {:?}", self.path);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(get_session_path())
    }
}
