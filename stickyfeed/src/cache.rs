use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::key::{KeyCacheKey, KeyMap};

#[derive(Clone, Debug)]
struct CachedList<T> {
    pages: BTreeMap<u32, Vec<T>>,
    highest: u32,
}

/// Already-fetched pages, keyed by `(list key, page)`.
///
/// The cache models the data source rather than the view: it outlives feed resets, so
/// re-showing a list serves its first pages without another round trip.
#[derive(Clone, Debug)]
pub struct PageCache<K, T> {
    lists: KeyMap<K, CachedList<T>>,
}

impl<K: KeyCacheKey, T> Default for PageCache<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KeyCacheKey, T> PageCache<K, T> {
    pub fn new() -> Self {
        Self {
            lists: KeyMap::new(),
        }
    }

    pub fn get(&self, key: &K, page: u32) -> Option<&[T]> {
        self.lists
            .get(key)
            .and_then(|l| l.pages.get(&page))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, key: &K, page: u32) -> bool {
        self.get(key, page).is_some()
    }

    /// The highest page number cached for `key` (`0` when nothing is cached).
    pub fn highest_cached_page(&self, key: &K) -> u32 {
        self.lists.get(key).map_or(0, |l| l.highest)
    }

    pub fn insert(&mut self, key: K, page: u32, items: Vec<T>) {
        let list = self.lists.entry(key).or_insert_with(|| CachedList {
            pages: BTreeMap::new(),
            highest: 0,
        });
        list.highest = list.highest.max(page);
        list.pages.insert(page, items);
    }

    /// Drops every cached page of `key`. Returns `false` if nothing was cached.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.lists.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    /// Total number of cached pages across all lists.
    pub fn len(&self) -> usize {
        self.lists.values().map(|l| l.pages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
