use alloc::collections::BTreeMap;

use crate::{
    IntersectionSample, IntersectionSource, SubscriptionId, VisibilityCallbacks, VisibilityEdge,
    VisibilityOptions, WatchId,
};

#[derive(Clone, Debug)]
struct Watch<H> {
    handle: H,
    subscription: SubscriptionId,
    visible: Option<bool>,
    callbacks: VisibilityCallbacks,
}

/// Converts raw intersection batches into edge-triggered appear/disappear events.
///
/// Intersection sources report at every threshold crossing, so a single scroll can produce many
/// samples for one element. The detector keeps the last known visibility per watch and only
/// reports a [`VisibilityEdge`] on an actual transition:
/// - `Appeared` on unknown/hidden -> visible
/// - `Disappeared` on visible -> hidden
///
/// The first sample that reports "hidden" only records the state.
#[derive(Clone, Debug)]
pub struct VisibilityDetector<H> {
    options: VisibilityOptions,
    watches: BTreeMap<WatchId, Watch<H>>,
    next_id: WatchId,
}

impl<H> Default for VisibilityDetector<H> {
    fn default() -> Self {
        Self::new(VisibilityOptions::default())
    }
}

impl<H> VisibilityDetector<H> {
    pub fn new(options: VisibilityOptions) -> Self {
        Self {
            options,
            watches: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn options(&self) -> &VisibilityOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    pub fn handle(&self, id: WatchId) -> Option<&H> {
        self.watches.get(&id).map(|w| &w.handle)
    }

    /// Last known visibility of a watch; `None` for unknown (no sample yet) or unwatched ids.
    pub fn is_visible(&self, id: WatchId) -> Option<bool> {
        self.watches.get(&id).and_then(|w| w.visible)
    }

    /// Subscribes to `handle` on `source` and starts tracking its visibility.
    pub fn watch(
        &mut self,
        handle: H,
        callbacks: VisibilityCallbacks,
        source: &mut impl IntersectionSource<H>,
    ) -> WatchId {
        let subscription = source.observe(&handle, &self.options.thresholds);
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        sdebug!(id, subscription, "VisibilityDetector::watch");
        self.watches.insert(
            id,
            Watch {
                handle,
                subscription,
                visible: None,
                callbacks,
            },
        );
        id
    }

    /// Stops tracking a watch and disconnects its subscription.
    ///
    /// Returns `false` if the id is not being watched.
    pub fn unwatch(&mut self, id: WatchId, source: &mut impl IntersectionSource<H>) -> bool {
        let Some(watch) = self.watches.remove(&id) else {
            return false;
        };
        sdebug!(id, subscription = watch.subscription, "VisibilityDetector::unwatch");
        source.disconnect(watch.subscription);
        true
    }

    /// Disconnects every subscription (component teardown).
    pub fn unwatch_all(&mut self, source: &mut impl IntersectionSource<H>) {
        for (_, watch) in core::mem::take(&mut self.watches) {
            source.disconnect(watch.subscription);
        }
    }
}

impl<H: PartialEq> VisibilityDetector<H> {
    /// Feeds one intersection batch delivered for watch `id`.
    ///
    /// The element counts as visible when any entry for its handle has a positive ratio. Entries
    /// for other handles are ignored; a batch with no entry for the handle changes nothing.
    pub fn deliver(&mut self, id: WatchId, entries: &[IntersectionSample<H>]) -> Option<VisibilityEdge> {
        let watch = self.watches.get_mut(&id)?;

        let mut seen = false;
        let mut visible = false;
        for entry in entries.iter().filter(|e| e.handle == watch.handle) {
            seen = true;
            if entry.is_intersecting() {
                visible = true;
                break;
            }
        }
        if !seen {
            return None;
        }

        let prev = watch.visible.replace(visible);
        let edge = match (prev, visible) {
            (Some(true), false) => VisibilityEdge::Disappeared,
            (Some(true), true) | (_, false) => return None,
            (_, true) => VisibilityEdge::Appeared,
        };

        strace!(id, ?edge, "visibility edge");
        let cb = match edge {
            VisibilityEdge::Appeared => &watch.callbacks.on_appear,
            VisibilityEdge::Disappeared => &watch.callbacks.on_disappear,
        };
        if let Some(cb) = cb {
            cb(id);
        }
        Some(edge)
    }
}
