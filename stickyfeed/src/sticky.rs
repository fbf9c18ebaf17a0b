use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{
    ActiveSectionState, Debounce, Section, SectionId, StickyOptions, Throttle, ViewportGeometry,
};

/// Why a recompute ran. Only used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecomputeReason {
    Mount,
    Throttle,
    Debounce,
    Manual,
}

/// Tracks which registered section currently straddles the top edge of a scroll container.
///
/// This type is intentionally UI-agnostic:
/// - Sections are registered with an opaque handle `H` that your [`ViewportGeometry`] resolves.
/// - Your adapter drives it with `mount`, `on_scroll(now_ms, ..)` and `tick(now_ms, ..)`.
/// - Scroll-driven recomputes are throttled (leading edge) and followed by one debounced
///   recompute once scrolling settles, so the resting position is always exact.
///
/// `on_active_change` fires only when the active id actually changes.
#[derive(Clone, Debug)]
pub struct StickyTracker<H> {
    options: StickyOptions,
    container: H,
    sections: Vec<Section<H>>,
    /// Order slots ever assigned, kept across unregistration.
    order: KeyMap<SectionId, usize>,
    next_order_index: usize,
    active_id: Option<SectionId>,
    last_scroll_offset: Option<i64>,
    last_reason: Option<RecomputeReason>,
    throttle: Throttle,
    debounce: Debounce,
    torn_down: bool,
}

impl<H> StickyTracker<H> {
    pub fn new(container: H, options: StickyOptions) -> Self {
        sdebug!(
            throttle_ms = options.throttle_ms,
            debounce_ms = options.debounce_ms,
            "StickyTracker::new"
        );
        Self {
            throttle: Throttle::new(options.throttle_ms),
            debounce: Debounce::new(options.debounce_ms),
            options,
            container,
            sections: Vec::new(),
            order: KeyMap::new(),
            next_order_index: 0,
            active_id: None,
            last_scroll_offset: None,
            last_reason: None,
            torn_down: false,
        }
    }

    pub fn options(&self) -> &StickyOptions {
        &self.options
    }

    pub fn container(&self) -> &H {
        &self.container
    }

    pub fn set_on_active_change(
        &mut self,
        on_active_change: Option<impl Fn(Option<SectionId>) + Send + Sync + 'static>,
    ) {
        self.options.on_active_change = on_active_change.map(|f| Arc::new(f) as _);
    }

    pub fn active_id(&self) -> Option<SectionId> {
        self.active_id
    }

    /// Returns a lightweight snapshot of the active section.
    pub fn state(&self) -> ActiveSectionState {
        ActiveSectionState {
            active_id: self.active_id,
        }
    }

    /// The container's scroll offset observed by the most recent recompute.
    pub fn last_scroll_offset(&self) -> Option<i64> {
        self.last_scroll_offset
    }

    /// Why the most recent (non-skipped) recompute ran.
    pub fn last_recompute_reason(&self) -> Option<RecomputeReason> {
        self.last_reason
    }

    /// Registered sections in recompute order.
    pub fn sections(&self) -> &[Section<H>] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section<H>> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Registers a section, or swaps the handle of an already registered id in place.
    ///
    /// Re-registering keeps the section's original position in the recompute order, also after
    /// an `unregister` (an element being remounted).
    pub fn register(&mut self, id: SectionId, handle: H) {
        if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
            strace!(id, "StickyTracker::register (replace handle)");
            section.handle = handle;
            return;
        }
        let order_index = match self.order.get(&id) {
            Some(&slot) => slot,
            None => {
                let slot = self.next_order_index;
                self.next_order_index = self.next_order_index.saturating_add(1);
                self.order.insert(id, slot);
                slot
            }
        };
        strace!(id, order_index, "StickyTracker::register");
        let pos = self
            .sections
            .partition_point(|s| s.order_index < order_index);
        self.sections.insert(
            pos,
            Section {
                id,
                order_index,
                handle,
            },
        );
    }

    /// Removes a section and returns its handle.
    ///
    /// Unregistering the active section clears the active id. It notifies unless the tracker has
    /// been torn down. The section keeps its order slot for a later `register`.
    pub fn unregister(&mut self, id: SectionId) -> Option<H> {
        let pos = self.sections.iter().position(|s| s.id == id)?;
        let section = self.sections.remove(pos);
        strace!(id, "StickyTracker::unregister");
        if self.active_id == Some(id) {
            self.set_active(None);
        }
        Some(section.handle)
    }

    /// The next instant at which `tick` has work to do, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        if self.torn_down {
            return None;
        }
        self.debounce.deadline()
    }

    /// Stops all pending timers. Subsequent scrolls, ticks and recomputes are ignored.
    pub fn teardown(&mut self) {
        sdebug!(sections = self.sections.len(), "StickyTracker::teardown");
        self.throttle.reset();
        self.debounce.cancel();
        self.torn_down = true;
    }

    fn set_active(&mut self, next: Option<SectionId>) -> bool {
        if self.active_id == next {
            return false;
        }
        sdebug!(prev = ?self.active_id, next = ?next, "active section changed");
        self.active_id = next;
        if self.torn_down {
            return true;
        }
        if let Some(cb) = &self.options.on_active_change {
            cb(next);
        }
        true
    }

    /// Recomputes immediately, regardless of throttling. Returns `true` if the active id changed.
    pub fn recompute(&mut self, geometry: &impl ViewportGeometry<H>) -> bool {
        self.recompute_for(RecomputeReason::Manual, geometry)
    }

    /// Initial recompute after the sections have been mounted.
    pub fn mount(&mut self, geometry: &impl ViewportGeometry<H>) -> bool {
        self.recompute_for(RecomputeReason::Mount, geometry)
    }

    /// Handles one scroll event.
    ///
    /// Recomputes right away if the throttle window allows it, and (re)arms the trailing
    /// debounce either way. Returns `true` if the active id changed.
    pub fn on_scroll(&mut self, now_ms: u64, geometry: &impl ViewportGeometry<H>) -> bool {
        if self.torn_down {
            return false;
        }
        let changed = if self.throttle.try_fire(now_ms) {
            self.recompute_for(RecomputeReason::Throttle, geometry)
        } else {
            false
        };
        self.debounce.schedule(now_ms);
        changed
    }

    /// Runs the trailing recompute once the debounce deadline has passed.
    pub fn tick(&mut self, now_ms: u64, geometry: &impl ViewportGeometry<H>) -> bool {
        if self.torn_down {
            return false;
        }
        if !self.debounce.poll(now_ms) {
            return false;
        }
        self.recompute_for(RecomputeReason::Debounce, geometry)
    }

    fn recompute_for(&mut self, reason: RecomputeReason, geometry: &impl ViewportGeometry<H>) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(container) = geometry.bounding_box(&self.container) else {
            strace!(?reason, "recompute skipped: container unavailable");
            return false;
        };
        self.last_scroll_offset = geometry.scroll_offset(&self.container);
        self.last_reason = Some(reason);
        strace!(?reason, offset = ?self.last_scroll_offset, "recompute");

        let boundary = container.top;
        let mut found = None;
        for section in &self.sections {
            let Some(rect) = geometry.bounding_box(&section.handle) else {
                continue;
            };
            if rect.straddles(boundary) {
                found = Some(section.id);
                break;
            }
        }
        self.set_active(found)
    }
}
