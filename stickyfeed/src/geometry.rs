use crate::{BoundingBox, SubscriptionId};

/// Read-only access to the host's layout.
///
/// Calls must be synchronous and cheap: the tracker reads fresh snapshots on every recompute and
/// never caches geometry across ticks. Returning `None` means the element is not (or no longer)
/// mounted.
pub trait ViewportGeometry<H> {
    fn bounding_box(&self, handle: &H) -> Option<BoundingBox>;

    fn scroll_offset(&self, container: &H) -> Option<i64>;
}

impl<H, G: ViewportGeometry<H> + ?Sized> ViewportGeometry<H> for &G {
    fn bounding_box(&self, handle: &H) -> Option<BoundingBox> {
        (**self).bounding_box(handle)
    }

    fn scroll_offset(&self, container: &H) -> Option<i64> {
        (**self).scroll_offset(container)
    }
}

/// A subscription-based intersection feed (e.g. an `IntersectionObserver` per element).
///
/// The host delivers the batches for a subscription back through
/// [`crate::VisibilityDetector::deliver`].
pub trait IntersectionSource<H> {
    /// Starts observing `handle`, reporting whenever its ratio crosses one of `thresholds`.
    fn observe(&mut self, handle: &H, thresholds: &[f32]) -> SubscriptionId;

    fn disconnect(&mut self, subscription: SubscriptionId);
}
