//! Write-once cache of preloaded page images.
//!
//! Neighbouring pages are warmed as the reader moves through the book so the
//! widget has decoded images ready before a flip reveals them. Entries are
//! keyed by URL and never evicted; documents are small enough that the cache
//! growing for the whole session is fine.

use std::collections::HashMap;

/// URL → handle map, generic over the host's image handle type.
#[derive(Debug)]
pub struct PreloadCache<H> {
    entries: HashMap<String, H>,
}

impl<H> PreloadCache<H> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Start loading `url` with `start` unless it is already cached.
    ///
    /// Returns `true` when a new load was started. The first handle stored
    /// for a URL is kept for the rest of the session.
    pub fn warm<F>(&mut self, url: &str, start: F) -> bool
    where
        F: FnOnce(&str) -> H,
    {
        if self.entries.contains_key(url) {
            return false;
        }
        let handle = start(url);
        self.entries.insert(url.to_string(), handle);
        true
    }

    /// Whether `url` has been warmed.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Handle stored for `url`.
    pub fn get(&self, url: &str) -> Option<&H> {
        self.entries.get(url)
    }

    /// Number of cached URLs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been warmed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> Default for PreloadCache<H> {
    fn default() -> Self {
        Self::new()
    }
}
