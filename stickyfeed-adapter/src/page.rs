use alloc::vec::Vec;
use core::fmt;

use stickyfeed::{
    FeedController, FeedError, FeedItem, FeedOptions, IntersectionSample, IntersectionSource,
    LoadMore, PageRequest, Settled, VisibilityCallbacks, VisibilityDetector, VisibilityEdge,
    VisibilityOptions, WatchId,
};

use crate::TabKey;

/// Elements a [`FeedPage`] subscribes to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageElement<K> {
    /// A marker at the top of the page header. Scrolled away means the page is scrolled.
    HeaderSentinel,
    /// The element below the last item. Its identity changes with every `(tab, page)`, so a
    /// sentinel that stays on screen still yields a fresh `Appeared` after each page.
    LoadMoreSentinel { tab: K, page: u32 },
}

/// Background of the sticky header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderBackdrop {
    /// The header sentinel is on screen (page at rest near the top).
    #[default]
    Transparent,
    /// The header sentinel scrolled away.
    Opaque,
}

/// What to render below the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Footer {
    /// Nothing loaded yet and more may come.
    Skeleton,
    /// Items are shown and more may come.
    Loading,
    /// The list is exhausted.
    NoMore,
}

/// A tabbed infinite feed: a [`FeedController`] driven by a [`VisibilityDetector`].
///
/// The page holds no UI objects. The host owns the intersection source and forwards every batch
/// through [`Self::on_intersection`]; fetches come back out as [`PageRequest`]s and go back in
/// through [`Self::complete`].
pub struct FeedPage<K, T: FeedItem> {
    feed: FeedController<K, T>,
    detector: VisibilityDetector<PageElement<K>>,
    header_watch: Option<WatchId>,
    sentinel_watch: Option<WatchId>,
    backdrop: HeaderBackdrop,
}

impl<K, T> fmt::Debug for FeedPage<K, T>
where
    K: TabKey,
    T: FeedItem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedPage")
            .field("feed", &self.feed)
            .field("detector", &self.detector)
            .field("header_watch", &self.header_watch)
            .field("sentinel_watch", &self.sentinel_watch)
            .field("backdrop", &self.backdrop)
            .finish()
    }
}

impl<K, T> FeedPage<K, T>
where
    K: TabKey,
    T: FeedItem + Clone,
{
    pub fn new(feed_options: FeedOptions<K, T>, visibility_options: VisibilityOptions) -> Self {
        Self {
            feed: FeedController::new(feed_options),
            detector: VisibilityDetector::new(visibility_options),
            header_watch: None,
            sentinel_watch: None,
            backdrop: HeaderBackdrop::default(),
        }
    }

    pub fn feed(&self) -> &FeedController<K, T> {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut FeedController<K, T> {
        &mut self.feed
    }

    pub fn detector(&self) -> &VisibilityDetector<PageElement<K>> {
        &self.detector
    }

    pub fn tab(&self) -> Option<&K> {
        self.feed.active_key()
    }

    pub fn items(&self) -> &[T] {
        self.tab()
            .and_then(|tab| self.feed.state(tab))
            .map(|state| state.items())
            .unwrap_or(&[])
    }

    pub fn backdrop(&self) -> HeaderBackdrop {
        self.backdrop
    }

    pub fn header_watch(&self) -> Option<WatchId> {
        self.header_watch
    }

    pub fn sentinel_watch(&self) -> Option<WatchId> {
        self.sentinel_watch
    }

    /// The element the load-more watch is currently bound to.
    pub fn sentinel(&self) -> Option<&PageElement<K>> {
        self.sentinel_watch.and_then(|id| self.detector.handle(id))
    }

    /// `None` while no tab is shown.
    pub fn footer(&self) -> Option<Footer> {
        let state = self.feed.state(self.tab()?)?;
        Some(if state.is_exhausted() {
            Footer::NoMore
        } else if state.is_empty() {
            Footer::Skeleton
        } else {
            Footer::Loading
        })
    }

    /// Subscribes the header sentinel and shows `tab`.
    pub fn mount<S>(&mut self, tab: K, source: &mut S)
    where
        S: IntersectionSource<PageElement<K>>,
    {
        if self.header_watch.is_none() {
            let id = self.detector.watch(
                PageElement::HeaderSentinel,
                VisibilityCallbacks::new(),
                source,
            );
            self.header_watch = Some(id);
        }
        self.switch_tab(tab, source);
    }

    /// Shows `tab` with a fresh feed and re-arms the load-more sentinel.
    ///
    /// Switching to the tab already shown is a no-op and returns `false`.
    pub fn switch_tab<S>(&mut self, tab: K, source: &mut S) -> bool
    where
        S: IntersectionSource<PageElement<K>>,
    {
        if !self.feed.show(tab) {
            return false;
        }
        self.rearm(source);
        true
    }

    /// Forwards one intersection batch for watch `id`.
    ///
    /// Returns the fetch to perform when the load-more sentinel appeared and the page is not
    /// cached.
    pub fn on_intersection<S>(
        &mut self,
        id: WatchId,
        entries: &[IntersectionSample<PageElement<K>>],
        source: &mut S,
    ) -> Option<PageRequest<K>>
    where
        S: IntersectionSource<PageElement<K>>,
    {
        let edge = self.detector.deliver(id, entries);
        if self.header_watch == Some(id) {
            // Recorded state, not edges: the first hidden sample records no edge.
            self.backdrop = match self.detector.is_visible(id) {
                Some(false) => HeaderBackdrop::Opaque,
                Some(true) | None => HeaderBackdrop::Transparent,
            };
            return None;
        }
        if self.sentinel_watch == Some(id) && edge == Some(VisibilityEdge::Appeared) {
            return self.load_more(source);
        }
        None
    }

    /// Asks the feed for the next page of the active tab.
    pub fn load_more<S>(&mut self, source: &mut S) -> Option<PageRequest<K>>
    where
        S: IntersectionSource<PageElement<K>>,
    {
        let tab = self.tab()?.clone();
        match self.feed.load_more(&tab) {
            LoadMore::Fetch(request) => Some(request),
            LoadMore::Cached(_) => {
                self.rearm(source);
                None
            }
            LoadMore::NotShown | LoadMore::Busy | LoadMore::Exhausted => None,
        }
    }

    /// Settles a fetch. A page that advanced the cursor re-arms the sentinel.
    pub fn complete<E, S>(
        &mut self,
        request: &PageRequest<K>,
        result: Result<Vec<T>, E>,
        source: &mut S,
    ) -> Result<Settled, FeedError<K>>
    where
        E: fmt::Display,
        S: IntersectionSource<PageElement<K>>,
    {
        let settled = self.feed.complete(request, result)?;
        if matches!(settled, Settled::Applied { .. }) {
            self.rearm(source);
        }
        Ok(settled)
    }

    /// Disconnects every subscription.
    pub fn teardown<S>(&mut self, source: &mut S)
    where
        S: IntersectionSource<PageElement<K>>,
    {
        self.detector.unwatch_all(source);
        self.header_watch = None;
        self.sentinel_watch = None;
    }

    fn rearm<S>(&mut self, source: &mut S)
    where
        S: IntersectionSource<PageElement<K>>,
    {
        let Some(tab) = self.feed.active_key().cloned() else {
            return;
        };
        let Some(page) = self.feed.state(&tab).map(|s| s.cursor()) else {
            return;
        };
        let element = PageElement::LoadMoreSentinel { tab, page };
        if self.sentinel() == Some(&element) {
            return;
        }
        if let Some(old) = self.sentinel_watch.take() {
            self.detector.unwatch(old, source);
        }
        let id = self
            .detector
            .watch(element, VisibilityCallbacks::new(), source);
        self.sentinel_watch = Some(id);
    }
}
