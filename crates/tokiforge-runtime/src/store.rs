//! Persistence of the last applied theme name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key under which the theme name is stored when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "tokiforge-theme";

/// A durable string key-value store, such as browser local storage.
///
/// Writes are best effort: a store that cannot persist a value reports it
/// through its own logging and the theme change still succeeds.
pub trait ThemeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// A store held in memory. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `value` under `key`.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }
}

impl ThemeStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}
