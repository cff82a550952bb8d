//! JSON-file session storage.
//!
//! The session lives in `<data_dir>/session.json`, by default
//! `~/.thinktoart/session.json`.

use async_trait::async_trait;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::models::StoredSession;
use crate::traits::{SessionStorage, StorageError};

/// The default data directory name under the home directory.
pub const DATA_DIR: &str = ".thinktoart";

/// The session file name.
const SESSION_FILE: &str = "session.json";

/// `~/.thinktoart`, or `None` when there is no home directory.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR))
}

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Storage under the default data directory.
    pub fn new() -> Result<Self, StorageError> {
        default_data_dir()
            .map(|dir| Self::in_dir(&dir))
            .ok_or(StorageError::NoHomeDir)
    }

    /// Storage under an explicit data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(stored))
    }

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, session)?;
        writer.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
