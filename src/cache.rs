//! Memoization of compile results.
//!
//! Compilation is deterministic, so the output for an exact `(text, theme)`
//! pair can be reused. The cache is bounded; once full, the oldest entry is
//! evicted.

use std::collections::{HashMap, VecDeque};

use crate::render::Theme;
use crate::CompileOutput;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    theme: Theme,
    text: String,
}

/// Bounded compile cache keyed by exact document text and theme.
#[derive(Debug, Clone)]
pub struct CompileCache {
    capacity: usize,
    entries: HashMap<CacheKey, CompileOutput>,
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl CompileCache {
    /// Create a cache holding at most `capacity` entries (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a cached output.
    pub fn get(&mut self, text: &str, theme: Theme) -> Option<CompileOutput> {
        let key = CacheKey {
            theme,
            text: text.to_string(),
        };
        match self.entries.get(&key) {
            Some(output) => {
                self.hits += 1;
                Some(output.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store an output, evicting the oldest entry when full.
    pub fn insert(&mut self, text: &str, theme: Theme, output: CompileOutput) {
        let key = CacheKey {
            theme,
            text: text.to_string(),
        };
        if self.entries.contains_key(&key) {
            self.entries.insert(key, output);
            return;
        }

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, output);
    }

    /// Return the cached output or compute and store it.
    pub fn get_or_insert_with<F>(&mut self, text: &str, theme: Theme, compute: F) -> CompileOutput
    where
        F: FnOnce() -> CompileOutput,
    {
        if let Some(output) = self.get(text, theme) {
            return output;
        }
        let output = compute();
        self.insert(text, theme, output.clone());
        output
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Get the number of lookups that missed.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Remove all entries and reset counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
