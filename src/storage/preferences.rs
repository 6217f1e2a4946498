//! Durable key-value namespace
//!
//! All persisted state (expense records, the manifest, sort and filter
//! state) lives in one flat map of string keys to bool / integer / text
//! values. The map is held in memory and written back atomically after each
//! edit. When a key is set, the whole map is stored as a single AES-256-GCM
//! envelope instead of plain JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::crypto::{decrypt_string, encrypt_string, DerivedKey, EncryptedData};
use crate::error::{MinexError, MinexResult};

use super::file_io::{read_json, write_json_atomic};

/// A single stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
        }
    }
}

type Entries = BTreeMap<String, PrefValue>;

/// On-disk layout of the namespace file
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
enum StoreFile {
    Plain { entries: Entries },
    Encrypted { data: EncryptedData },
}

impl Default for StoreFile {
    fn default() -> Self {
        Self::Plain {
            entries: Entries::new(),
        }
    }
}

/// Batched mutations applied under one write lock and saved once
pub struct Editor<'a> {
    entries: &'a mut Entries,
}

impl Editor<'_> {
    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.entries.insert(key.into(), PrefValue::Bool(value));
        self
    }

    pub fn put_i64(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.entries.insert(key.into(), PrefValue::Int(value));
        self
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), PrefValue::Text(value.into()));
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.remove(key);
        self
    }

    /// Current value, including changes made earlier in this edit
    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.entries.get(key)
    }
}

fn poisoned<T>(e: PoisonError<T>) -> MinexError {
    MinexError::Storage(format!("Preferences lock poisoned: {}", e))
}

/// The key-value namespace
pub struct Preferences {
    path: Option<PathBuf>,
    key: RwLock<Option<DerivedKey>>,
    entries: RwLock<Entries>,
}

impl Preferences {
    /// A namespace that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            key: RwLock::new(None),
            entries: RwLock::new(Entries::new()),
        }
    }

    /// Open the namespace stored at `path`
    ///
    /// A missing file is an empty namespace. An encrypted file requires
    /// `key`, and a wrong key fails with an encryption error.
    pub fn open(path: impl AsRef<Path>, key: Option<DerivedKey>) -> MinexResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file: StoreFile = read_json(&path)?;

        let entries = match file {
            StoreFile::Plain { entries } => entries,
            StoreFile::Encrypted { data } => {
                let key = key.as_ref().ok_or_else(|| {
                    MinexError::Encryption(
                        "Store is encrypted; a passphrase is required".to_string(),
                    )
                })?;
                let json = decrypt_string(&data, key)?;
                serde_json::from_str(&json)?
            }
        };

        debug!(
            "event=prefs_open path={} entries={} encrypted={}",
            path.display(),
            entries.len(),
            key.is_some()
        );

        Ok(Self {
            path: Some(path),
            key: RwLock::new(key),
            entries: RwLock::new(entries),
        })
    }

    /// Whether writes are encrypted
    pub fn is_encrypted(&self) -> MinexResult<bool> {
        Ok(self.key.read().map_err(poisoned)?.is_some())
    }

    /// Replace the encryption key (or drop it) and rewrite the file
    pub fn set_key(&self, key: Option<DerivedKey>) -> MinexResult<()> {
        {
            let mut current = self.key.write().map_err(poisoned)?;
            *current = key;
        }
        self.save()
    }

    pub fn get(&self, key: &str) -> MinexResult<Option<PrefValue>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    pub fn contains(&self, key: &str) -> MinexResult<bool> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.contains_key(key))
    }

    /// Missing keys and values of another type yield `default`
    pub fn get_bool_or(&self, key: &str, default: bool) -> MinexResult<bool> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()).unwrap_or(default))
    }

    pub fn get_i64_or(&self, key: &str, default: i64) -> MinexResult<i64> {
        Ok(self.get(key)?.and_then(|v| v.as_i64()).unwrap_or(default))
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> MinexResult<String> {
        Ok(self
            .get(key)?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| default.to_string()))
    }

    /// Apply a batch of changes and persist them
    pub fn edit<F, R>(&self, f: F) -> MinexResult<R>
    where
        F: FnOnce(&mut Editor<'_>) -> R,
    {
        let result = {
            let mut entries = self.entries.write().map_err(poisoned)?;
            let mut editor = Editor {
                entries: &mut entries,
            };
            f(&mut editor)
        };
        self.save()?;
        Ok(result)
    }

    fn save(&self) -> MinexResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let entries = self.entries.read().map_err(poisoned)?;
        let key = self.key.read().map_err(poisoned)?;

        let file = match key.as_ref() {
            Some(key) => {
                let json = serde_json::to_string(&*entries)?;
                StoreFile::Encrypted {
                    data: encrypt_string(&json, key)?,
                }
            }
            None => StoreFile::Plain {
                entries: entries.clone(),
            },
        };

        write_json_atomic(path, &file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, KeyDerivationParams};
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("data").join("expenses.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::open(store_path(&dir), None).unwrap();
        assert_eq!(prefs.get("all_expenses").unwrap(), None);
        assert!(!prefs.is_encrypted().unwrap());
    }

    #[test]
    fn test_edit_persists() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let prefs = Preferences::open(&path, None).unwrap();
        prefs
            .edit(|e| {
                e.put_bool("sorting_reversed", true)
                    .put_i64("sorting_type", 1)
                    .put_string("all_expenses", "a,b");
            })
            .unwrap();

        let reopened = Preferences::open(&path, None).unwrap();
        assert!(reopened.get_bool_or("sorting_reversed", false).unwrap());
        assert_eq!(reopened.get_i64_or("sorting_type", 0).unwrap(), 1);
        assert_eq!(reopened.get_string_or("all_expenses", "").unwrap(), "a,b");
    }

    #[test]
    fn test_typed_getters_fall_back_on_mismatch() {
        let prefs = Preferences::in_memory();
        prefs.edit(|e| {
            e.put_string("sorting_type", "name");
        })
        .unwrap();

        assert_eq!(prefs.get_i64_or("sorting_type", 7).unwrap(), 7);
        assert!(prefs.get_bool_or("missing", true).unwrap());
    }

    #[test]
    fn test_remove() {
        let prefs = Preferences::in_memory();
        prefs.edit(|e| {
            e.put_i64("x.cents", 5);
        })
        .unwrap();
        prefs.edit(|e| {
            e.remove("x.cents");
        })
        .unwrap();
        assert!(!prefs.contains("x.cents").unwrap());
    }

    #[test]
    fn test_encrypted_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let params = KeyDerivationParams::fast();

        let prefs = Preferences::open(&path, None).unwrap();
        prefs.edit(|e| {
            e.put_string("abc.name", "Coffee");
        })
        .unwrap();
        prefs
            .set_key(Some(derive_key("hunter2", &params).unwrap()))
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"encrypted\""));
        assert!(!raw.contains("Coffee"));

        let err = Preferences::open(&path, None).err().unwrap();
        assert!(matches!(err, MinexError::Encryption(_)));

        let wrong = derive_key("hunter3", &params).unwrap();
        assert!(Preferences::open(&path, Some(wrong)).is_err());

        let key = derive_key("hunter2", &params).unwrap();
        let reopened = Preferences::open(&path, Some(key)).unwrap();
        assert!(reopened.is_encrypted().unwrap());
        assert_eq!(
            reopened.get("abc.name").unwrap(),
            Some(PrefValue::Text("Coffee".into()))
        );
    }

    #[test]
    fn test_dropping_key_writes_plain() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let key = derive_key("pw", &KeyDerivationParams::fast()).unwrap();

        let prefs = Preferences::open(&path, Some(key)).unwrap();
        prefs.edit(|e| {
            e.put_bool("filter_card_opened", true);
        })
        .unwrap();
        prefs.set_key(None).unwrap();

        let reopened = Preferences::open(&path, None).unwrap();
        assert!(reopened.get_bool_or("filter_card_opened", false).unwrap());
    }

    #[test]
    fn test_value_json_shape() {
        let v: Entries =
            serde_json::from_str(r#"{"a": true, "b": -5, "c": "x"}"#).unwrap();
        assert_eq!(v["a"], PrefValue::Bool(true));
        assert_eq!(v["b"], PrefValue::Int(-5));
        assert_eq!(v["c"].kind(), "text");
    }
}
