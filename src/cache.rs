//! In-memory translation cache.
//!
//! Entries are insert-only: once a `(text, source, target)` key has a value it
//! stays authoritative until `clear()`. Concurrent writers racing on the same
//! key keep whichever value landed first.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Cache key: `(source_text, source_language_code, target_language_code)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub source: String,
    pub target: String,
}

impl CacheKey {
    pub fn new(text: &str, source: &str, target: &str) -> Self {
        Self {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: RwLock<HashMap<CacheKey, String>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str, source: &str, target: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&CacheKey::new(text, source, target)).cloned()
    }

    /// Insert a translation unless the key is already present.
    ///
    /// Returns `true` when the entry was newly inserted.
    pub fn insert(&self, text: &str, source: &str, target: &str, translated: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.entry(CacheKey::new(text, source, target)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(translated.to_string());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
