//! Storage layer for minex
//!
//! One durable key-value namespace (`Preferences`) holds both the expense
//! records and the persisted sort/filter state. `Storage` is built once at
//! startup and handed to the services that need it.

pub mod expenses;
pub mod file_io;
pub mod filters;
pub mod preferences;

pub use expenses::{ExpenseRepository, ExpenseStore};
pub use file_io::{read_json, write_json_atomic};
pub use filters::FilterStateRepository;
pub use preferences::{PrefValue, Preferences};

use std::sync::Arc;

use crate::config::paths::MinexPaths;
use crate::crypto::DerivedKey;
use crate::error::MinexError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    prefs: Arc<Preferences>,
    pub expenses: ExpenseRepository,
    pub filters: FilterStateRepository,
}

impl Storage {
    /// Open the on-disk store, decrypting it with `key` when given
    pub fn open(paths: &MinexPaths, key: Option<DerivedKey>) -> Result<Self, MinexError> {
        paths.ensure_directories()?;
        let prefs = Preferences::open(paths.expenses_file(), key)?;
        Ok(Self::from_preferences(prefs))
    }

    /// A store that only lives in memory
    pub fn in_memory() -> Self {
        Self::from_preferences(Preferences::in_memory())
    }

    fn from_preferences(prefs: Preferences) -> Self {
        let prefs = Arc::new(prefs);
        Self {
            expenses: ExpenseRepository::new(prefs.clone()),
            filters: FilterStateRepository::new(prefs.clone()),
            prefs,
        }
    }

    /// Whether the store is written encrypted
    pub fn is_encrypted(&self) -> Result<bool, MinexError> {
        self.prefs.is_encrypted()
    }

    /// Re-encrypt with a new key, or write plain JSON with `None`
    pub fn set_key(&self, key: Option<DerivedKey>) -> Result<(), MinexError> {
        self.prefs.set_key(key)
    }
}
