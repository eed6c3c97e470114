//! Uploaded file storage on the local filesystem.
//!
//! Files are addressed by an opaque generated name (`<uuid>[.ext]`); the
//! client-supplied file name only contributes its extension.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Longest extension kept from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to store empty file")]
    Empty,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A directory of uploaded files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the upload directory.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, FileError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh name and return that name.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, FileError> {
        if bytes.is_empty() {
            return Err(FileError::Empty);
        }
        let name = match original_name.and_then(extension_of) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.root.join(&name), bytes).await?;
        debug!(name = %name, size = bytes.len(), "stored upload");
        Ok(name)
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, FileError> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, name: &str) -> Result<bool, FileError> {
        let path = self.resolve(name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    pub async fn delete(&self, name: &str) -> Result<(), FileError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(name = %name, "deleted upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Map a stored name to its path, refusing anything that could escape `root`.
    fn resolve(&self, name: &str) -> Result<PathBuf, FileError> {
        let valid = !name.is_empty()
            && name != "."
            && !name.contains("..")
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_');
        if !valid {
            return Err(FileError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// Lowercased alphanumeric extension of `name`, if it has a usable one.
fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
