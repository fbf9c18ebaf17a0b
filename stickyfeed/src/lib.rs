//! Headless scroll-state engines for content feeds.
//!
//! This crate turns continuous, noisy viewport signals into discrete, stable application state:
//!
//! - [`StickyTracker`]: which section is currently docked under a sticky header.
//! - [`VisibilityDetector`]: edge-triggered appear/disappear events from intersection ratios.
//! - [`FeedController`]: a paginated loader with a page cache, an in-flight guard and
//!   epoch-based discarding of superseded responses.
//! - [`LayoutPolicy`]: sizing strategies for a fixed pane stacked above a scroll pane.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - element geometry (via [`ViewportGeometry`])
//! - intersection subscriptions (via [`IntersectionSource`])
//! - page fetching (by fulfilling the [`PageRequest`]s handed out by the controller)
//! - a clock (`now_ms`) for throttling and debouncing
//!
//! For ready-made wiring (simulated geometry, sticky scenes, feed pages), see the
//! `stickyfeed-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod error;
mod feed;
mod geometry;
mod key;
mod layout;
mod options;
mod schedule;
mod state;
mod sticky;
mod types;
mod visibility;


pub use cache::PageCache;
pub use error::FeedError;
pub use feed::{FeedController, FeedEvent, FeedItem, FeedState, LoadMore, PageRequest, Settled};
pub use geometry::{IntersectionSource, ViewportGeometry};
pub use layout::{FixedPane, LayoutPolicy, LayoutResolution, LayoutSizes, LayoutStrategy, PaneHeights};
pub use options::{
    DEFAULT_THRESHOLDS, FeedOptions, OnActiveChange, OnFeedEvent, OnVisibilityEdge,
    StickyOptions, VisibilityCallbacks, VisibilityOptions,
};
pub use schedule::{Debounce, Throttle};
pub use state::{ActiveSectionState, FeedSnapshot, FeedStatus};
pub use sticky::{RecomputeReason, StickyTracker};
pub use types::{
    BoundingBox, IntersectionSample, Section, SectionId, SubscriptionId, VisibilityEdge, WatchId,
};
pub use visibility::VisibilityDetector;

#[doc(hidden)]
pub use key::KeyCacheKey;
