use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::io::lock::{LockError, StoreLock};

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not encode prefs: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Where task texts are loaded from at session start and saved to afterwards.
///
/// Only the text of each task is persisted, as an unordered set: favorite
/// state and list order do not survive a restart, and duplicate texts
/// collapse into one.
pub trait TaskStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError>;
    fn save(&mut self, texts: &BTreeSet<String>) -> Result<(), StoreError>;
}

/// The prefs file: a flat JSON object of string sets, e.g.
/// `{"tasks": ["Buy milk", "Call mom"]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefs {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Prefs {
    pub fn string_set(&self, key: &str) -> BTreeSet<String> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    pub fn put_string_set(&mut self, key: &str, values: BTreeSet<String>) {
        self.entries.insert(key.to_string(), values);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

/// Read a prefs file. A missing file is empty. A file that doesn't parse is
/// copied to `<name>.bak` and treated as empty.
pub fn read_prefs(path: &Path) -> Result<Prefs, StoreError> {
    if !path.exists() {
        return Ok(Prefs::default());
    }
    let content = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    match serde_json::from_str::<Prefs>(&content) {
        Ok(prefs) => Ok(prefs),
        Err(e) => {
            // never start over from empty without a copy of the old file
            let bak = backup_path(path);
            fs::copy(path, &bak).map_err(|source| StoreError::WriteError {
                path: bak.clone(),
                source,
            })?;
            tracing::warn!(
                path = %path.display(),
                backup = %bak.display(),
                error = %e,
                "could not parse prefs file, starting empty"
            );
            Ok(Prefs::default())
        }
    }
}

/// Write a prefs file atomically
pub fn write_prefs(path: &Path, prefs: &Prefs) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(prefs)?;
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

/// Write to a temp file in the same directory, then rename over the target
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// A task set kept under one key of a prefs file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        FileStore {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for FileStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        let texts = read_prefs(&self.path)?.string_set(&self.key);
        tracing::debug!(path = %self.path.display(), key = %self.key, count = texts.len(), "loaded tasks");
        Ok(texts)
    }

    fn save(&mut self, texts: &BTreeSet<String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::WriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let _lock = StoreLock::acquire_default(&self.path)?;
        // Re-read under the lock so other keys written meanwhile survive
        let mut prefs = read_prefs(&self.path)?;
        prefs.put_string_set(&self.key, texts.clone());
        write_prefs(&self.path, &prefs)?;
        tracing::debug!(path = %self.path.display(), key = %self.key, count = texts.len(), "saved tasks");
        Ok(())
    }
}

/// In-process store, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    texts: BTreeSet<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryStore {
            texts: texts.into_iter().map(Into::into).collect(),
            saves: 0,
        }
    }

    pub fn texts(&self) -> &BTreeSet<String> {
        &self.texts
    }

    /// Number of times `save` has been called
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.texts.clone())
    }

    fn save(&mut self, texts: &BTreeSet<String>) -> Result<(), StoreError> {
        self.texts = texts.clone();
        self.saves += 1;
        Ok(())
    }
}
