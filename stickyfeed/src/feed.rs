use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use crate::key::{KeyCacheKey, KeyMap, KeySet};
use crate::{FeedError, FeedOptions, FeedSnapshot, FeedStatus, PageCache};

/// An item with a stable identity. Keys must be unique within one list.
pub trait FeedItem {
    type Key: KeyCacheKey + Clone + fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// Pagination state of one list key.
///
/// A state is never reset in place: showing a list again builds a new one, which is what keeps
/// late responses for the old state from leaking into the new one.
#[derive(Clone, Debug)]
pub struct FeedState<T: FeedItem> {
    cursor: u32,
    items: Vec<T>,
    seen: KeySet<T::Key>,
    loading: bool,
    exhausted: bool,
    request_epoch: u64,
}

impl<T: FeedItem> Default for FeedState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FeedItem> FeedState<T> {
    pub fn new() -> Self {
        Self {
            cursor: 1,
            items: Vec::new(),
            seen: KeySet::new(),
            loading: false,
            exhausted: false,
            request_epoch: 0,
        }
    }

    /// The next page to load (1-based).
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn request_epoch(&self) -> u64 {
        self.request_epoch
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.seen.contains(key)
    }

    pub fn status(&self) -> FeedStatus {
        if self.exhausted {
            FeedStatus::Exhausted
        } else if self.loading {
            FeedStatus::Loading
        } else {
            FeedStatus::Idle
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            cursor: self.cursor,
            len: self.items.len(),
            status: self.status(),
            request_epoch: self.request_epoch,
        }
    }

    /// Appends items in order, dropping keys that are already present.
    /// Returns `(appended, duplicates)`.
    fn append(&mut self, page: impl IntoIterator<Item = T>) -> (usize, usize) {
        let mut appended = 0usize;
        let mut duplicates = 0usize;
        for item in page {
            if self.seen.insert(item.key()) {
                self.items.push(item);
                appended += 1;
            } else {
                duplicates += 1;
            }
        }
        (appended, duplicates)
    }
}

/// A fetch the caller must perform and hand back through [`FeedController::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest<K> {
    pub list_key: K,
    /// 1-based page number.
    pub page: u32,
    pub page_size: usize,
    pub epoch: u64,
}

impl<K> PageRequest<K> {
    /// Index of the first item of this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size)
    }
}

/// Outcome of [`FeedController::load_more`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadMore<K> {
    /// The list key has no state (it was never shown or has been abandoned).
    NotShown,
    /// A fetch is already in flight for this list.
    Busy,
    /// The list has been exhausted.
    Exhausted,
    /// The page is not cached: fetch it and call `complete`.
    Fetch(PageRequest<K>),
    /// The page was served from the cache and has already been applied.
    Cached(Settled),
}

/// How a page settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settled {
    Applied { appended: usize, duplicates: usize },
    Exhausted,
    /// The request was superseded; its result was ignored.
    Stale,
}

/// Notifications for the UI layer.
#[derive(Debug)]
pub enum FeedEvent<'a, K, T> {
    Updated {
        list_key: &'a K,
        items: &'a [T],
        loading: bool,
        exhausted: bool,
    },
    FetchFailed {
        list_key: &'a K,
        page: u32,
    },
}

/// Drives incremental loading for one or more list keys (tabs).
///
/// Per list key the state machine is `Idle -> Loading -> {Idle, Exhausted}`:
/// - `load_more` is a no-op while loading or exhausted, so redundant triggers coalesce into a
///   single request.
/// - Every request carries an epoch drawn from one controller-wide counter. A settled result is
///   applied only if it matches the list's current epoch; anything else is discarded silently.
/// - Pages already present in the [`PageCache`] are applied synchronously without a fetch.
///
/// The controller never performs I/O. It hands out [`PageRequest`]s and expects the caller to
/// return each result through [`Self::complete`].
pub struct FeedController<K, T: FeedItem> {
    options: FeedOptions<K, T>,
    feeds: KeyMap<K, FeedState<T>>,
    active: Option<K>,
    cache: PageCache<K, T>,
    next_epoch: u64,
}

impl<K, T> fmt::Debug for FeedController<K, T>
where
    K: KeyCacheKey + fmt::Debug,
    T: FeedItem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedController")
            .field("options", &self.options)
            .field("active", &self.active)
            .field("lists", &self.feeds.len())
            .field("cached_pages", &self.cache.len())
            .field("next_epoch", &self.next_epoch)
            .finish()
    }
}

impl<K, T> FeedController<K, T>
where
    K: KeyCacheKey + Clone + fmt::Debug,
    T: FeedItem + Clone,
{
    pub fn new(options: FeedOptions<K, T>) -> Self {
        sdebug!(page_size = options.page_size, "FeedController::new");
        Self {
            options,
            feeds: KeyMap::new(),
            active: None,
            cache: PageCache::new(),
            next_epoch: 0,
        }
    }

    pub fn options(&self) -> &FeedOptions<K, T> {
        &self.options
    }

    pub fn set_on_event(
        &mut self,
        on_event: Option<impl for<'a> Fn(FeedEvent<'a, K, T>) + Send + Sync + 'static>,
    ) {
        self.options.on_event = on_event.map(|f| alloc::sync::Arc::new(f) as _);
    }

    pub fn active_key(&self) -> Option<&K> {
        self.active.as_ref()
    }

    pub fn state(&self, key: &K) -> Option<&FeedState<T>> {
        self.feeds.get(key)
    }

    pub fn snapshot(&self, key: &K) -> Option<FeedSnapshot> {
        self.feeds.get(key).map(FeedState::snapshot)
    }

    pub fn page_cache(&self) -> &PageCache<K, T> {
        &self.cache
    }

    pub fn page_cache_mut(&mut self) -> &mut PageCache<K, T> {
        &mut self.cache
    }

    /// Makes `key` the active list.
    ///
    /// The previously active list is abandoned (its state dropped) and `key` gets a brand-new
    /// state. Showing the list that is already active is a no-op and returns `false`.
    pub fn show(&mut self, key: K) -> bool {
        if self.active.as_ref() == Some(&key) && self.feeds.contains_key(&key) {
            return false;
        }
        if let Some(prev) = self.active.take() {
            if prev != key {
                self.abandon(&prev);
            }
        }
        sdebug!(list_key = ?key, "FeedController::show");
        self.active = Some(key.clone());
        self.install_fresh(key);
        true
    }

    /// Replaces the state of `key` with a fresh one (cursor 1, no items, idle).
    ///
    /// Only lists that currently have state can be reset; anything else returns `false` and
    /// creates nothing (use [`Self::show`] to bring a list up).
    pub fn reset(&mut self, key: K) -> bool {
        if !self.feeds.contains_key(&key) {
            return false;
        }
        self.install_fresh(key);
        true
    }

    /// Number of lists currently holding state.
    pub fn list_count(&self) -> usize {
        self.feeds.len()
    }

    fn install_fresh(&mut self, key: K) {
        self.feeds.insert(key.clone(), FeedState::new());
        self.emit_updated(&key);
    }

    /// Drops the state of `key`. In-flight responses for it will be discarded.
    pub fn abandon(&mut self, key: &K) -> bool {
        if self.active.as_ref() == Some(key) {
            self.active = None;
        }
        self.feeds.remove(key).is_some()
    }

    /// Requests the next page of `key`.
    pub fn load_more(&mut self, key: &K) -> LoadMore<K> {
        let Some(state) = self.feeds.get_mut(key) else {
            return LoadMore::NotShown;
        };
        if state.exhausted {
            strace!(list_key = ?key, "load_more ignored: exhausted");
            return LoadMore::Exhausted;
        }
        if state.loading {
            strace!(list_key = ?key, "load_more ignored: in flight");
            return LoadMore::Busy;
        }

        self.next_epoch = self.next_epoch.saturating_add(1);
        let epoch = self.next_epoch;
        state.loading = true;
        state.request_epoch = epoch;
        let request = PageRequest {
            list_key: key.clone(),
            page: state.cursor,
            page_size: self.options.page_size,
            epoch,
        };
        sdebug!(list_key = ?key, page = request.page, epoch, "load_more");

        if let Some(cached) = self.cache.get(key, request.page) {
            let items = cached.to_vec();
            strace!(list_key = ?key, page = request.page, "serving page from cache");
            return LoadMore::Cached(self.apply(&request, items));
        }

        self.emit_updated(key);
        LoadMore::Fetch(request)
    }

    /// Settles a request previously returned by [`Self::load_more`].
    ///
    /// Superseded requests (the list was reset, abandoned or already settled) yield
    /// `Ok(Settled::Stale)` and change nothing. A failed fetch puts the list back to idle and is
    /// returned as [`FeedError::FetchFailed`].
    pub fn complete<E: fmt::Display>(
        &mut self,
        request: &PageRequest<K>,
        result: Result<Vec<T>, E>,
    ) -> Result<Settled, FeedError<K>> {
        if !self.is_current(request) {
            sdebug!(
                list_key = ?request.list_key,
                epoch = request.epoch,
                "discarding stale page"
            );
            return Ok(Settled::Stale);
        }

        match result {
            Ok(items) => Ok(self.apply(request, items)),
            Err(e) => {
                if let Some(state) = self.feeds.get_mut(&request.list_key) {
                    state.loading = false;
                }
                swarn!(list_key = ?request.list_key, page = request.page, "page fetch failed");
                if let Some(cb) = &self.options.on_event {
                    cb(FeedEvent::FetchFailed {
                        list_key: &request.list_key,
                        page: request.page,
                    });
                }
                self.emit_updated(&request.list_key);
                Err(FeedError::FetchFailed {
                    list_key: request.list_key.clone(),
                    page: request.page,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn is_current(&self, request: &PageRequest<K>) -> bool {
        self.feeds
            .get(&request.list_key)
            .is_some_and(|s| s.loading && s.request_epoch == request.epoch)
    }

    fn apply(&mut self, request: &PageRequest<K>, items: Vec<T>) -> Settled {
        let Some(state) = self.feeds.get_mut(&request.list_key) else {
            return Settled::Stale;
        };
        state.loading = false;

        if items.is_empty() {
            state.exhausted = true;
            sdebug!(list_key = ?request.list_key, page = request.page, "list exhausted");
            self.emit_updated(&request.list_key);
            return Settled::Exhausted;
        }

        let (appended, duplicates) = state.append(items.iter().cloned());
        state.cursor = state.cursor.saturating_add(1);
        if duplicates > 0 {
            swarn!(
                list_key = ?request.list_key,
                page = request.page,
                duplicates,
                "dropped items with duplicate keys"
            );
        }
        if !self.cache.contains(&request.list_key, request.page) {
            self.cache
                .insert(request.list_key.clone(), request.page, items);
        }
        self.emit_updated(&request.list_key);
        Settled::Applied {
            appended,
            duplicates,
        }
    }

    fn emit_updated(&self, key: &K) {
        let Some(cb) = &self.options.on_event else {
            return;
        };
        if let Some(state) = self.feeds.get(key) {
            cb(FeedEvent::Updated {
                list_key: key,
                items: &state.items,
                loading: state.loading,
                exhausted: state.exhausted,
            });
        }
    }
}
