//! Session persistence
//!
//! Best-effort local caching of the document text and a custom title per
//! session id, through a narrow key-value store. Writes are skipped when
//! nothing changed since the last save.

use crate::error::{StorageError, StorageResult};
use chrono::{DateTime, Local};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Prefix for every key this crate writes
const KEY_PREFIX: &str = "uwu-markdown";

/// Minimal key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every change
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store in the application data directory
    pub fn open_default() -> StorageResult<Self> {
        let dir = crate::config::Config::data_dir().map_err(|_| StorageError::NoDataDir)?;
        Self::open(dir.join("storage.json"))
    }

    /// Open a store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StorageError::ReadError {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::WriteError {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// What a previous session left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredSession {
    pub content: Option<String>,
    pub title: Option<String>,
}

/// Persists one session's document through a [`KeyValueStore`]
pub struct SessionPersistence {
    store: Box<dyn KeyValueStore>,
    session_id: String,
    saved_hash: Option<u64>,
    last_saved: Option<DateTime<Local>>,
}

impl SessionPersistence {
    pub fn new(store: Box<dyn KeyValueStore>, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
            saved_hash: None,
            last_saved: None,
        }
    }

    /// Persistence under a freshly generated session id
    pub fn with_new_session(store: Box<dyn KeyValueStore>) -> Self {
        Self::new(store, uuid::Uuid::new_v4().to_string())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn content_key(&self) -> String {
        format!("{}:{}:content", KEY_PREFIX, self.session_id)
    }

    pub fn title_key(&self) -> String {
        format!("{}:{}:title", KEY_PREFIX, self.session_id)
    }

    /// Read back whatever was stored for this session
    pub fn restore(&mut self) -> StorageResult<RestoredSession> {
        let restored = RestoredSession {
            content: self.store.get(&self.content_key())?,
            title: self.store.get(&self.title_key())?,
        };
        self.saved_hash = Some(snapshot_hash(
            restored.content.as_deref().unwrap_or(""),
            restored.title.as_deref(),
        ));
        Ok(restored)
    }

    /// Whether `content`/`title` differ from the last saved snapshot
    pub fn is_dirty(&self, content: &str, title: Option<&str>) -> bool {
        self.saved_hash != Some(snapshot_hash(content, title))
    }

    /// Interval save: writes only when something changed. Returns whether it wrote.
    pub fn autosave(&mut self, content: &str, title: Option<&str>) -> StorageResult<bool> {
        if !self.is_dirty(content, title) {
            return Ok(false);
        }
        self.save(content, title)?;
        Ok(true)
    }

    /// Manual save: always writes
    pub fn save(&mut self, content: &str, title: Option<&str>) -> StorageResult<()> {
        self.store.set(&self.content_key(), content)?;
        match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => self.store.set(&self.title_key(), title)?,
            None => self.store.remove(&self.title_key())?,
        }

        self.saved_hash = Some(snapshot_hash(content, title));
        self.last_saved = Some(Local::now());
        log::debug!("Saved session {} ({} bytes)", self.session_id, content.len());
        Ok(())
    }

    /// Drop everything stored for this session
    pub fn clear(&mut self) -> StorageResult<()> {
        self.store.remove(&self.content_key())?;
        self.store.remove(&self.title_key())?;
        self.saved_hash = None;
        Ok(())
    }
}

/// Hash of a content/title pair for change detection
fn snapshot_hash(content: &str, title: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    title.map(str::trim).filter(|t| !t.is_empty()).hash(&mut hasher);
    hasher.finish()
}
