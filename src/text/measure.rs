//! Text measurement with an explicit, caller-owned LRU cache.

use std::num::NonZeroUsize;

use lru::LruCache;

use super::ansi::visible_width;

/// Default number of distinct strings remembered by a [`WidthCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Visible extent of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSize {
    /// Widest line, in columns.
    pub width: usize,
    /// Number of lines (an empty string measures zero lines).
    pub height: usize,
}

/// Measure a block of text without caching.
pub fn measure_text(text: &str) -> TextSize {
    if text.is_empty() {
        return TextSize::default();
    }
    let mut size = TextSize::default();
    for line in text.split('\n') {
        size.width = size.width.max(visible_width(line));
        size.height += 1;
    }
    size
}

/// Least-recently-used cache of text measurements.
///
/// Owned by whoever drives rendering; two renderers never share one, and
/// tests can build isolated instances. When full, the least recently
/// measured string is evicted.
pub struct WidthCache {
    entries: LruCache<String, TextSize>,
    hits: u64,
    misses: u64,
}

impl WidthCache {
    /// Create a cache holding at most `capacity` strings (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Measure `text`, consulting the cache first.
    pub fn measure(&mut self, text: &str) -> TextSize {
        if let Some(size) = self.entries.get(text) {
            self.hits += 1;
            return *size;
        }
        self.misses += 1;
        let size = measure_text(text);
        if self.entries.len() == self.entries.cap().get() {
            tracing::trace!(capacity = self.entries.cap().get(), "width cache evicting");
        }
        self.entries.put(text.to_string(), size);
        size
    }

    /// Number of cached strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached strings.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Cache hits and misses since creation or the last [`clear`](Self::clear).
    pub const fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Drop every entry and reset the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for WidthCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidthCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.cap())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
