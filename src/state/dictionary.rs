use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};

use crate::errors::DictError;

/// Format used when rendering an entry's timestamp.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A definition together with the moment it was (last) set.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub definition: String,
    pub created_at: DateTime<Local>,
}

impl Entry {
    fn new(definition: String) -> Self {
        Self {
            definition,
            created_at: Local::now(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Definition: {}\nDate: {}",
            self.definition,
            self.created_at.format(DATE_FORMAT)
        )
    }
}

/// In-memory word -> entry mapping.
///
/// Words are case-sensitive and used verbatim as keys. No ordering is kept.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: HashMap<String, Entry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `word`. The timestamp is always refreshed.
    pub fn add(&mut self, word: impl Into<String>, definition: impl Into<String>) {
        self.entries.insert(word.into(), Entry::new(definition.into()));
    }

    pub fn get(&self, word: &str) -> Result<&Entry, DictError> {
        self.entries.get(word).ok_or(DictError::NotFound)
    }

    /// Removing an absent word is a no-op.
    pub fn remove(&mut self, word: &str) {
        self.entries.remove(word);
    }

    /// Every word once, in no particular order, plus the whole mapping.
    pub fn list(&self) -> (Vec<String>, &HashMap<String, Entry>) {
        let words = self.entries.keys().cloned().collect();
        (words, &self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Dictionary handle shared between the CLI thread and the HTTP handlers.
///
/// Each operation holds the lock for its whole duration and hands back owned
/// data, so no guard ever escapes.
#[derive(Debug, Clone)]
pub struct SharedDictionary {
    inner: Arc<Mutex<Dictionary>>,
}

impl SharedDictionary {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Dictionary::new())),
        }
    }

    // Every operation is a single map call, so a poisoned map is still
    // consistent.
    fn lock(&self) -> MutexGuard<'_, Dictionary> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, word: impl Into<String>, definition: impl Into<String>) {
        self.lock().add(word, definition);
    }

    pub fn get(&self, word: &str) -> Result<Entry, DictError> {
        self.lock().get(word).cloned()
    }

    pub fn remove(&self, word: &str) {
        self.lock().remove(word);
    }

    pub fn list(&self) -> (Vec<String>, HashMap<String, Entry>) {
        let dict = self.lock();
        let (words, entries) = dict.list();
        (words, entries.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

impl Default for SharedDictionary {
    fn default() -> Self {
        Self::new()
    }
}
