/// Bound for tab (list) keys used by [`crate::FeedPage`].
///
/// With `std` this is `Hash + Eq`, otherwise `Ord`, plus `Clone + Debug`.
pub trait TabKey: stickyfeed::KeyCacheKey + Clone + core::fmt::Debug {}
impl<K: stickyfeed::KeyCacheKey + Clone + core::fmt::Debug> TabKey for K {}
