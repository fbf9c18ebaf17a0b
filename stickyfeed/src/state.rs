use crate::SectionId;

/// A lightweight, serializable snapshot of a tracker's active section.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSectionState {
    pub active_id: Option<SectionId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedStatus {
    Idle,
    Loading,
    Exhausted,
}

/// A lightweight, serializable summary of one list's pagination state.
///
/// This is useful for status bars and debugging overlays that should not borrow the items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedSnapshot {
    pub cursor: u32,
    pub len: usize,
    pub status: FeedStatus,
    pub request_epoch: u64,
}
