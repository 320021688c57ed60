/*
[INPUT]:  Key/value preference reads and writes
[OUTPUT]: Persisted client-local preferences (avatar pointer, saved session)
[POS]:    Persistence layer - local preference store
[UPDATE]: When adding preference keys or storage backends
*/

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use taskdeck_adapter::SessionData;

/// Avatar URL key
pub const AVATAR_KEY: &str = "userAvatar";
/// Saved session key
pub const SESSION_KEY: &str = "session";

/// Synchronous string key/value store
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub fn avatar(store: &dyn PreferenceStore) -> Result<Option<String>> {
    store.get(AVATAR_KEY)
}

pub fn set_avatar(store: &dyn PreferenceStore, url: Option<&str>) -> Result<()> {
    match url {
        Some(url) => store.set(AVATAR_KEY, url),
        None => store.remove(AVATAR_KEY),
    }
}

pub fn load_session(store: &dyn PreferenceStore) -> Result<Option<SessionData>> {
    load_json(store, SESSION_KEY)
}

pub fn save_session(store: &dyn PreferenceStore, session: Option<&SessionData>) -> Result<()> {
    match session {
        Some(session) => save_json(store, SESSION_KEY, session),
        None => store.remove(SESSION_KEY),
    }
}

fn load_json<T: DeserializeOwned>(store: &dyn PreferenceStore, key: &str) -> Result<Option<T>> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str(&raw).with_context(|| format!("decode preference {key}")))
        .transpose()
}

fn save_json<T: Serialize>(store: &dyn PreferenceStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).with_context(|| format!("encode preference {key}"))?;
    store.set(key, &raw)
}

/// Preferences kept in one JSON object on disk
///
/// Every write rewrites the whole file through a temp file and rename.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferences {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("read preferences {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("parse preferences {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&tmp, content).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

/// Non-persistent store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}
