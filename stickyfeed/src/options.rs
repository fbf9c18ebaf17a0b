use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{FeedEvent, SectionId, WatchId};

/// Thresholds used for intersection subscriptions unless overridden.
pub const DEFAULT_THRESHOLDS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// A callback fired when the docked section changes (never for a repeated identical result).
pub type OnActiveChange = Arc<dyn Fn(Option<SectionId>) + Send + Sync>;

/// A callback fired on a visibility edge of one watch.
pub type OnVisibilityEdge = Arc<dyn Fn(WatchId) + Send + Sync>;

/// A callback fired when a list's pagination state changes or a fetch fails.
pub type OnFeedEvent<K, T> = Arc<dyn for<'a> Fn(FeedEvent<'a, K, T>) + Send + Sync>;

/// Configuration for [`crate::StickyTracker`].
#[derive(Clone)]
pub struct StickyOptions {
    /// Minimum spacing between scroll-driven recomputes.
    pub throttle_ms: u64,
    /// Quiet period after the last scroll event before the settling recompute.
    pub debounce_ms: u64,
    pub on_active_change: Option<OnActiveChange>,
}

impl Default for StickyOptions {
    fn default() -> Self {
        Self {
            throttle_ms: 100,
            debounce_ms: 300,
            on_active_change: None,
        }
    }
}

impl StickyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_on_active_change(
        mut self,
        on_active_change: Option<impl Fn(Option<SectionId>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_active_change = on_active_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for StickyOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StickyOptions")
            .field("throttle_ms", &self.throttle_ms)
            .field("debounce_ms", &self.debounce_ms)
            .finish_non_exhaustive()
    }
}

/// Configuration for [`crate::VisibilityDetector`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityOptions {
    /// Ratios at which the source should report; more thresholds give finer sampling but the
    /// detector only ever emits edges.
    pub thresholds: Vec<f32>,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl VisibilityOptions {
    pub fn with_thresholds(mut self, thresholds: impl IntoIterator<Item = f32>) -> Self {
        self.thresholds = thresholds.into_iter().collect();
        self
    }
}

/// Per-watch edge callbacks.
#[derive(Clone, Default)]
pub struct VisibilityCallbacks {
    pub on_appear: Option<OnVisibilityEdge>,
    pub on_disappear: Option<OnVisibilityEdge>,
}

impl VisibilityCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_appear(mut self, on_appear: impl Fn(WatchId) + Send + Sync + 'static) -> Self {
        self.on_appear = Some(Arc::new(on_appear));
        self
    }

    pub fn with_on_disappear(
        mut self,
        on_disappear: impl Fn(WatchId) + Send + Sync + 'static,
    ) -> Self {
        self.on_disappear = Some(Arc::new(on_disappear));
        self
    }
}

impl core::fmt::Debug for VisibilityCallbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisibilityCallbacks")
            .field("on_appear", &self.on_appear.is_some())
            .field("on_disappear", &self.on_disappear.is_some())
            .finish()
    }
}

/// Configuration for [`crate::FeedController`].
pub struct FeedOptions<K, T> {
    /// Items per page. Carried on every [`crate::PageRequest`] so fetchers can compute offsets.
    pub page_size: usize,
    pub on_event: Option<OnFeedEvent<K, T>>,
}

impl<K, T> Default for FeedOptions<K, T> {
    fn default() -> Self {
        Self {
            page_size: 7,
            on_event: None,
        }
    }
}

impl<K, T> Clone for FeedOptions<K, T> {
    fn clone(&self) -> Self {
        Self {
            page_size: self.page_size,
            on_event: self.on_event.clone(),
        }
    }
}

impl<K, T> FeedOptions<K, T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            on_event: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_on_event(
        mut self,
        on_event: Option<impl for<'a> Fn(FeedEvent<'a, K, T>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_event = on_event.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K, T> core::fmt::Debug for FeedOptions<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeedOptions")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
