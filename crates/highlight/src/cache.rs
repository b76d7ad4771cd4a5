use crate::highlighter::Highlighted;
use crate::theme::ThemeKind;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub code: String,
    pub language: String,
    pub theme: ThemeKind,
}

impl CacheKey {
    pub fn new(code: &str, language: &str, theme: ThemeKind) -> Self {
        Self {
            code: code.to_string(),
            language: language.trim().to_lowercase(),
            theme,
        }
    }
}

/// Memoized highlight results for one export. Identical code blocks are
/// highlighted once.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: HashMap<CacheKey, Highlighted>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Highlighted> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: CacheKey, value: Highlighted) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
