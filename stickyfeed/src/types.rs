/// Stable identity of a logical section.
pub type SectionId = u64;

/// Identity of a visibility watch handed out by [`crate::VisibilityDetector::watch`].
pub type WatchId = u64;

/// Identity of an intersection subscription handed out by an [`crate::IntersectionSource`].
pub type SubscriptionId = u64;

/// An element's bounding box in viewport coordinates (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl BoundingBox {
    pub fn new(top: i64, bottom: i64, left: i64, right: i64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn height(&self) -> u64 {
        self.bottom.saturating_sub(self.top).max(0) as u64
    }

    /// Returns `true` when the box starts at or above `line` and ends at or below it.
    pub fn straddles(&self, line: i64) -> bool {
        self.top <= line && self.bottom >= line
    }
}

/// A registered section. `order_index` is assigned on first registration and kept across
/// re-registrations of the same id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<H> {
    pub id: SectionId,
    pub order_index: usize,
    pub handle: H,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisibilityEdge {
    Appeared,
    Disappeared,
}

/// One entry of an intersection batch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionSample<H> {
    pub handle: H,
    /// Fraction of the element inside the root, in `[0, 1]`.
    pub ratio: f32,
}

impl<H> IntersectionSample<H> {
    pub fn new(handle: H, ratio: f32) -> Self {
        Self { handle, ratio }
    }

    pub fn is_intersecting(&self) -> bool {
        self.ratio > 0.0
    }
}
