use crate::api::Movie;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage key holding the JSON array of favorite movies.
pub const FAVORITES_KEY: &str = "favoriteMovies";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    pub fn user_message(&self) -> String {
        match self {
            StorageError::Read { path, .. } => {
                format!("Could not read favorites from {}", path.display())
            }
            StorageError::Write { path, .. } => {
                format!("Could not save favorites to {}", path.display())
            }
            StorageError::Encode(e) => format!("Could not encode favorites: {}", e),
        }
    }
}

/// Synchronous string key-value storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        write_replacing(&self.dir, &path, value)
            .map_err(|source| StorageError::Write { path, source })
    }
}

// Write to a sibling temp file and rename, so a reader never sees half a value.
fn write_replacing(dir: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Result of adding a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { total: usize },
    AlreadyPresent,
}

/// Favorite movies persisted under [`FAVORITES_KEY`], unique by id.
pub struct FavoritesStore {
    storage: Box<dyn Storage + Send>,
}

impl FavoritesStore {
    pub fn new(storage: Box<dyn Storage + Send>) -> Self {
        Self { storage }
    }

    /// Append `movie` unless a favorite with the same id is already stored.
    pub fn add(&mut self, movie: &Movie) -> Result<AddOutcome, StorageError> {
        let mut list = self.read()?;
        if list.iter().any(|m| m.id == movie.id) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        list.push(movie.clone());
        let encoded = serde_json::to_string(&list)?;
        self.storage.set_item(FAVORITES_KEY, &encoded)?;
        tracing::info!(id = movie.id, title = %movie.title, total = list.len(), "favorite added");
        Ok(AddOutcome::Added { total: list.len() })
    }

    // Missing, `null`, or unparsable values all read as an empty list.
    fn read(&self) -> Result<Vec<Movie>, StorageError> {
        let Some(raw) = self.storage.get_item(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Option<Vec<Movie>>>(&raw) {
            Ok(list) => Ok(list.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed favorites value");
                Ok(Vec::new())
            }
        }
    }
}
