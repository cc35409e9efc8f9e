//! OSC 8 hyperlinks
//!
//! Cells store a small integer handle instead of the URI; the registry owns
//! the `(id, uri)` pairs and resolves handles at render time. The registry is
//! bounded, evicting in insertion order once the bound is exceeded.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Stable handle stored in cells. Handles are never reused within a buffer
/// lifetime.
pub type HyperlinkId = u32;

/// An explicit hyperlink: the (possibly empty) id parameter plus the URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub id: String,
    pub uri: String,
}

/// Registry mapping handles to hyperlinks.
///
/// Links with the same non-empty id share one entry; links with an empty id
/// are deduplicated by URI. Once `max_entries` is exceeded the oldest entry
/// is evicted; cells still holding its handle resolve to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperlinkRegistry {
    entries: HashMap<HyperlinkId, Hyperlink>,
    lookup: HashMap<String, HyperlinkId>,
    order: VecDeque<HyperlinkId>,
    next_id: HyperlinkId,
    max_entries: usize,
}

pub const DEFAULT_MAX_HYPERLINKS: usize = 1024;

impl Default for HyperlinkRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HYPERLINKS)
    }
}

impl HyperlinkRegistry {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lookup: HashMap::new(),
            order: VecDeque::new(),
            next_id: 1,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up or insert the link, returning its handle.
    pub fn insert(&mut self, id: &str, uri: &str) -> HyperlinkId {
        let key = Self::key(id, uri);
        if let Some(&handle) = self.lookup.get(&key) {
            return handle;
        }

        let handle = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            handle,
            Hyperlink {
                id: id.to_string(),
                uri: uri.to_string(),
            },
        );
        self.lookup.insert(key, handle);
        self.order.push_back(handle);

        while self.entries.len() > self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                if let Some(link) = self.entries.remove(&oldest) {
                    self.lookup.remove(&Self::key(&link.id, &link.uri));
                }
            }
        }

        handle
    }

    /// Resolve a handle; `None` once the entry has been evicted.
    pub fn get(&self, handle: HyperlinkId) -> Option<&Hyperlink> {
        self.entries.get(&handle)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lookup.clear();
        self.order.clear();
    }

    fn key(id: &str, uri: &str) -> String {
        if id.is_empty() {
            format!("uri:{uri}")
        } else {
            format!("id:{id}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_shares_entry() {
        let mut registry = HyperlinkRegistry::default();
        let a = registry.insert("doc", "https://example.com/a");
        let b = registry.insert("doc", "https://example.com/b");
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_id_dedupes_by_uri() {
        let mut registry = HyperlinkRegistry::default();
        let a = registry.insert("", "https://example.com");
        let b = registry.insert("", "https://example.com");
        let c = registry.insert("", "https://example.org");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_eviction_in_insertion_order() {
        let mut registry = HyperlinkRegistry::new(2);
        let a = registry.insert("", "https://one");
        let b = registry.insert("", "https://two");
        let c = registry.insert("", "https://three");
        assert!(registry.get(a).is_none());
        assert!(registry.get(b).is_some());
        assert!(registry.get(c).is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve() {
        let mut registry = HyperlinkRegistry::default();
        let handle = registry.insert("x", "https://example.com");
        let link = registry.get(handle).unwrap();
        assert_eq!(link.id, "x");
        assert_eq!(link.uri, "https://example.com");
    }
}
