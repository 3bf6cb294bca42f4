//! Single-document JSON persistence (profile, progress) with file locking.

use crate::store::{ProfileStore, ProgressStore};
use crate::{Error, Progress, Result, UserProfile};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load a JSON document under a shared lock
///
/// Returns `None` if the file doesn't exist. A corrupted file is logged and
/// also treated as absent.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    match serde_json::from_str::<T>(&contents) {
        Ok(doc) => {
            tracing::debug!("Loaded {:?}", path);
            Ok(Some(doc))
        }
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Ignoring it.", path, e);
            Ok(None)
        }
    }
}

/// Save a JSON document atomically
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the existing file.
pub fn save_document<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(doc)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {:?}", path);
    Ok(())
}

/// Profile stored as `profile.json`
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileStore for FileProfileStore {
    fn load_profile(&self) -> Result<Option<UserProfile>> {
        load_document(&self.path)
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        save_document(&self.path, profile)
    }
}

/// Progress counters stored as `progress.json`
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for FileProgressStore {
    fn load_progress(&self) -> Result<Progress> {
        Ok(load_document(&self.path)?.unwrap_or_default())
    }

    fn save_progress(&mut self, progress: &Progress) -> Result<()> {
        save_document(&self.path, progress)
    }
}
